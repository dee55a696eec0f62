//! Name-based access to a widget's properties
//!
//! Lookups follow one rule: a property that is missing, unset, or holds an
//! empty string counts as absent and the caller's default applies. References
//! resolve through the snapshot, so a dangling id is also just absent.

use crate::model::*;
use crate::snapshot::Snapshot;
use std::collections::HashMap;

pub struct Properties<'a> {
    widget: &'a Widget,
    snapshot: &'a Snapshot,
    values: HashMap<&'a str, &'a PropertyValue>,
}

impl<'a> Properties<'a> {
    pub fn new(widget: &'a Widget, snapshot: &'a Snapshot) -> Self {
        // Later records with the same name win
        let values = widget
            .properties
            .iter()
            .map(|p| (p.name.as_str(), &p.value))
            .collect();
        Self {
            widget,
            snapshot,
            values,
        }
    }

    pub fn widget(&self) -> &'a Widget {
        self.widget
    }

    /// Whether a record with this name exists at all, even an empty one
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&'a PropertyValue> {
        self.values.get(name).copied().filter(|v| !v.is_absent())
    }

    /// Source text of a present scalar, including zero and `false`
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(PropertyValue::display)
    }

    pub fn text_or(&self, name: &str, default: &str) -> String {
        self.text(name).unwrap_or_else(|| default.to_string())
    }

    /// Source text of a present, non-zero, non-false scalar
    pub fn truthy(&self, name: &str) -> Option<String> {
        self.get(name)
            .filter(|v| v.is_truthy())
            .and_then(PropertyValue::display)
    }

    /// First truthy value among alias names
    pub fn first_truthy(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.truthy(name))
    }

    pub fn flag(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(PropertyValue::Boolean(b)) => *b,
            Some(PropertyValue::Integer(n)) => *n != 0,
            Some(PropertyValue::Text(s)) => s.eq_ignore_ascii_case("true"),
            Some(PropertyValue::Json(serde_json::Value::Bool(b))) => *b,
            Some(_) | None => default,
        }
    }

    /// Structured value: a JSON property, or a string holding JSON
    pub fn json(&self, name: &str) -> Option<serde_json::Value> {
        match self.get(name)? {
            PropertyValue::Json(serde_json::Value::String(s)) | PropertyValue::Text(s) => {
                serde_json::from_str(s).ok()
            }
            PropertyValue::Json(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn action(&self, name: &str) -> Option<&'a Action> {
        match self.get(name)? {
            PropertyValue::Action(id) => self.snapshot.action(*id),
            _ => None,
        }
    }

    pub fn screen(&self, name: &str) -> Option<&'a Screen> {
        match self.get(name)? {
            PropertyValue::Screen(id) => self.snapshot.screen(*id),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<(&'a DataSource, &'a DataSourceField)> {
        match self.get(name)? {
            PropertyValue::DataField(id) => self.snapshot.field(*id),
            _ => None,
        }
    }

    /// Distinct property names in first-seen order with their effective values
    pub fn entries(&self) -> Vec<(&'a str, &'a PropertyValue)> {
        let mut seen = std::collections::HashSet::new();
        self.widget
            .properties
            .iter()
            .filter(|p| seen.insert(p.name.as_str()))
            .filter_map(|p| self.get(&p.name).map(|v| (p.name.as_str(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Snapshot {
        let json = r#"{
            "name": "Demo", "package_name": "com.example.demo",
            "screens": [{"id": 1, "name": "Home", "route_name": "/home", "widgets": [
                {"id": 1, "widget_type": "Text", "properties": [
                    {"property_name": "text", "property_type": "string", "string_value": ""},
                    {"property_name": "maxLines", "property_type": "integer", "integer_value": 0},
                    {"property_name": "softWrap", "property_type": "boolean", "boolean_value": false},
                    {"property_name": "fontSize", "property_type": "decimal", "decimal_value": 18},
                    {"property_name": "fontSize", "property_type": "decimal", "decimal_value": 20},
                    {"property_name": "onTap", "property_type": "action_reference", "action_reference": 9},
                    {"property_name": "dataSource", "property_type": "data_source_field_reference", "data_source_field_reference": 5},
                    {"property_name": "transform", "property_type": "string", "string_value": "{\"rotate\": 0.5}"}
                ]}
            ]}],
            "data_sources": [{"id": 3, "name": "News", "fields": [{"id": 5, "field_name": "title"}]}]
        }"#;
        Snapshot::from_json_str(json, "fixture").unwrap()
    }

    #[test]
    fn test_absent_rules() {
        let snapshot = fixture();
        let props = Properties::new(snapshot.widget(1).unwrap(), &snapshot);
        assert!(props.contains("text"));
        assert_eq!(props.text_or("text", "Text"), "Text");
        assert_eq!(props.text("maxLines").as_deref(), Some("0"));
        assert_eq!(props.truthy("maxLines"), None);
        assert!(!props.flag("softWrap", true));
        assert_eq!(props.text("fontSize").as_deref(), Some("20.0"));
    }

    #[test]
    fn test_reference_resolution() {
        let snapshot = fixture();
        let props = Properties::new(snapshot.widget(1).unwrap(), &snapshot);
        assert!(props.action("onTap").is_none());
        let (source, field) = props.field("dataSource").unwrap();
        assert_eq!(source.name, "News");
        assert_eq!(field.field_name, "title");
        assert_eq!(props.json("transform").unwrap()["rotate"], 0.5);
    }

    #[test]
    fn test_entries_are_distinct() {
        let snapshot = fixture();
        let props = Properties::new(snapshot.widget(1).unwrap(), &snapshot);
        let names: Vec<_> = props.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["maxLines", "softWrap", "fontSize", "onTap", "dataSource", "transform"]);
    }
}
