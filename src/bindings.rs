//! Data-bound widget scaffolding
//!
//! A widget bound to a data-source field renders as a fetch-then-branch
//! builder: loading, error, empty, then the populated view. Payload shape is
//! normalized on the Dart side by `ApiService._normalizeList`; [`normalize_payload`]
//! is the same rule set so the branch a payload lands in can be checked here.

use crate::model::{DataSource, DataSourceField};
use crate::utils::escape_dart_string;
use serde_json::Value;

/// Map keys searched, in order, for a wrapped list
pub const LIST_KEYS: &[&str] = &["data", "items", "results", "content", "list"];

/// Branch a data-bound widget ends up rendering for a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadRoute {
    Populated(usize),
    Empty,
    Error,
}

/// List view of a decoded response body. `None` for shapes the client rejects.
pub fn normalize_payload(payload: &Value) -> Option<Vec<Value>> {
    match payload {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => Some(items.clone()),
        Value::Object(map) => {
            let wrapped = LIST_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array));
            Some(match wrapped {
                Some(items) => items.clone(),
                None => vec![payload.clone()],
            })
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
    }
}

pub fn route_payload(payload: &Value) -> PayloadRoute {
    match normalize_payload(payload) {
        None => PayloadRoute::Error,
        Some(items) if items.is_empty() => PayloadRoute::Empty,
        Some(items) => PayloadRoute::Populated(items.len()),
    }
}

pub fn fetch_call(source: &DataSource) -> String {
    format!("_apiService.fetchData('{}')", escape_dart_string(&source.name))
}

/// Display expression for one record, with the title/name/label fallbacks
pub fn display_value(item_var: &str, field: &DataSourceField) -> String {
    format!(
        "displayValue({}, '{}')",
        item_var,
        escape_dart_string(&field.field_name)
    )
}

/// Raw record lookup, for fields consumed as URLs
pub fn field_lookup(item_var: &str, field: &DataSourceField) -> String {
    format!(
        "{}['{}']",
        item_var,
        escape_dart_string(&field.field_name)
    )
}

/// FutureBuilder over a list fetch. `populated` is the expression returned
/// once `items_var` holds at least one record.
pub fn future_list(
    source: &DataSource,
    items_var: &str,
    empty_message: &str,
    populated: &str,
    indent: &str,
) -> String {
    format!(
        "FutureBuilder<List<dynamic>>(
{i}  future: {fetch},
{i}  builder: (context, snapshot) {{
{i}    if (snapshot.connectionState == ConnectionState.waiting) {{
{i}      return Center(child: CircularProgressIndicator());
{i}    }}
{i}    if (snapshot.hasError) {{
{i}      return Center(child: Text('Error loading data'));
{i}    }}
{i}    final {var} = snapshot.data ?? [];
{i}    if ({var}.isEmpty) {{
{i}      return Center(child: Text('{empty}'));
{i}    }}
{i}    return {populated};
{i}  }},
{i})",
        i = indent,
        fetch = fetch_call(source),
        var = items_var,
        empty = escape_dart_string(empty_message),
        populated = populated,
    )
}

/// Text bound to the first record of a fetch
pub fn single_value(
    source: &DataSource,
    field: &DataSourceField,
    fallback: &str,
    style: &str,
    indent: &str,
) -> String {
    let fallback = escape_dart_string(fallback);
    format!(
        "FutureBuilder<List<dynamic>>(
{i}  future: {fetch},
{i}  builder: (context, snapshot) {{
{i}    if (snapshot.connectionState == ConnectionState.waiting) {{
{i}      return Text('...'{style});
{i}    }}
{i}    final items = snapshot.data ?? [];
{i}    if (snapshot.hasError || items.isEmpty) {{
{i}      return Text('{fallback}'{style});
{i}    }}
{i}    return Text({value}{style});
{i}  }},
{i})",
        i = indent,
        fetch = fetch_call(source),
        style = style,
        fallback = fallback,
        value = display_value("items.first", field),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> DataSource {
        serde_json::from_value(json!({
            "id": 1, "name": "Top Stories",
            "fields": [{"id": 2, "field_name": "headline"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_payload_routes() {
        assert_eq!(route_payload(&json!([])), PayloadRoute::Empty);
        assert_eq!(route_payload(&json!(null)), PayloadRoute::Empty);
        assert_eq!(route_payload(&json!([1, 2, 3])), PayloadRoute::Populated(3));
        assert_eq!(route_payload(&json!({"results": [{"a": 1}]})), PayloadRoute::Populated(1));
        assert_eq!(route_payload(&json!({"data": []})), PayloadRoute::Empty);
        assert_eq!(route_payload(&json!({"id": 4})), PayloadRoute::Populated(1));
        assert_eq!(route_payload(&json!("oops")), PayloadRoute::Error);
        assert_eq!(route_payload(&json!(5)), PayloadRoute::Error);
    }

    #[test]
    fn test_first_list_key_wins() {
        let payload = json!({"items": [1], "data": [1, 2]});
        assert_eq!(normalize_payload(&payload).unwrap().len(), 2);
        let payload = json!({"data": "not a list", "list": [1, 2, 3]});
        assert_eq!(normalize_payload(&payload).unwrap().len(), 3);
    }

    #[test]
    fn test_future_list_branches() {
        let src = source();
        let code = future_list(&src, "items", "No items available", "Text('x')", "  ");
        assert!(code.contains("future: _apiService.fetchData('Top Stories')"));
        assert!(code.contains("CircularProgressIndicator()"));
        assert!(code.contains("Text('Error loading data')"));
        assert!(code.contains("if (items.isEmpty)"));
        assert!(code.contains("return Text('x');"));
    }

    #[test]
    fn test_single_value() {
        let src = source();
        let code = single_value(&src, &src.fields[0], "News", ", style: TextStyle(fontSize: 18)", "");
        assert!(code.contains("return Text(displayValue(items.first, 'headline'), style: TextStyle(fontSize: 18));"));
        assert!(code.contains("return Text('News', style: TextStyle(fontSize: 18));"));
    }
}
