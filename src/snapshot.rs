//! Indexed, read-only view of an application snapshot
//!
//! Widgets reference their parent by id. The snapshot keeps the records as
//! loaded and builds id lookups plus a parent-to-children adjacency list once,
//! so tree walks never rescan the widget list.

use crate::error::{GeneratorError, Result};
use crate::model::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug)]
pub struct Snapshot {
    app: Application,
    widgets: HashMap<WidgetId, (usize, usize)>,
    widget_screens: HashMap<WidgetId, ScreenId>,
    children: HashMap<WidgetId, Vec<WidgetId>>,
    roots: HashMap<ScreenId, Vec<WidgetId>>,
    screens: HashMap<ScreenId, usize>,
    actions: HashMap<ActionId, usize>,
    data_sources: HashMap<DataSourceId, usize>,
    fields: HashMap<FieldId, (usize, usize)>,
    orphans: Vec<WidgetId>,
    duplicates: Vec<WidgetId>,
}

impl Snapshot {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GeneratorError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source, &path.display().to_string())
    }

    pub fn from_json_str(source: &str, label: &str) -> Result<Self> {
        let app: Application =
            serde_json::from_str(source).map_err(|e| GeneratorError::json(label, e))?;
        Self::from_application(app)
    }

    pub fn from_application(app: Application) -> Result<Self> {
        if app.package_name.trim().is_empty() {
            return Err(GeneratorError::snapshot("application package_name is empty"));
        }

        let mut widgets = HashMap::new();
        let mut widget_screens = HashMap::new();
        let mut positions = HashMap::new();
        let mut duplicates = Vec::new();
        let mut sequence = 0usize;

        for (si, screen) in app.screens.iter().enumerate() {
            for (wi, widget) in screen.widgets.iter().enumerate() {
                if widgets.contains_key(&widget.id) {
                    duplicates.push(widget.id);
                    continue;
                }
                widgets.insert(widget.id, (si, wi));
                widget_screens.insert(widget.id, screen.id);
                positions.insert(widget.id, sequence);
                sequence += 1;
            }
        }

        let mut children: HashMap<WidgetId, Vec<WidgetId>> = HashMap::new();
        let mut roots: HashMap<ScreenId, Vec<WidgetId>> = HashMap::new();
        let mut orphans = Vec::new();

        for (&id, &(si, wi)) in &widgets {
            let widget = &app.screens[si].widgets[wi];
            match widget.parent {
                None => roots.entry(app.screens[si].id).or_default().push(id),
                Some(parent) if widgets.contains_key(&parent) => {
                    children.entry(parent).or_default().push(id)
                }
                Some(_) => orphans.push(id),
            }
        }

        let sort_key = |id: &WidgetId| {
            let (si, wi) = widgets[id];
            (app.screens[si].widgets[wi].order, positions[id])
        };
        for list in children.values_mut().chain(roots.values_mut()) {
            list.sort_by_key(sort_key);
        }
        orphans.sort_unstable();

        let screens = app
            .screens
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        let actions = app
            .actions
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id, i))
            .collect();
        let data_sources = app
            .data_sources
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id, i))
            .collect();
        let mut fields = HashMap::new();
        for (di, source) in app.data_sources.iter().enumerate() {
            for (fi, field) in source.fields.iter().enumerate() {
                fields.insert(field.id, (di, fi));
            }
        }

        Ok(Self {
            app,
            widgets,
            widget_screens,
            children,
            roots,
            screens,
            actions,
            data_sources,
            fields,
            orphans,
            duplicates,
        })
    }

    pub fn application(&self) -> &Application {
        &self.app
    }

    pub fn screens(&self) -> &[Screen] {
        &self.app.screens
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.app.data_sources
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.get(&id).map(|&i| &self.app.screens[i])
    }

    pub fn screen_named(&self, name: &str) -> Option<&Screen> {
        self.app.screens.iter().find(|s| s.name == name)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets
            .get(&id)
            .map(|&(si, wi)| &self.app.screens[si].widgets[wi])
    }

    pub fn widget_screen(&self, id: WidgetId) -> Option<ScreenId> {
        self.widget_screens.get(&id).copied()
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// All widgets in input order
    pub fn all_widgets(&self) -> impl Iterator<Item = &Widget> {
        self.app.screens.iter().flat_map(|s| s.widgets.iter())
    }

    /// Children sorted by `(order, input position)`
    pub fn children(&self, id: WidgetId) -> Vec<&Widget> {
        self.children
            .get(&id)
            .map(|ids| ids.iter().filter_map(|&c| self.widget(c)).collect())
            .unwrap_or_default()
    }

    /// Parentless widgets of a screen, sorted by `(order, input position)`
    pub fn roots(&self, screen: ScreenId) -> Vec<&Widget> {
        self.roots
            .get(&screen)
            .map(|ids| ids.iter().filter_map(|&c| self.widget(c)).collect())
            .unwrap_or_default()
    }

    /// Ancestors from the immediate parent upward. Stops on a repeated id.
    pub fn ancestors(&self, id: WidgetId) -> Vec<&Widget> {
        let mut seen = HashSet::new();
        seen.insert(id);
        let mut out = Vec::new();
        let mut current = self.widget(id).and_then(|w| w.parent);
        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            match self.widget(parent_id) {
                Some(parent) => {
                    out.push(parent);
                    current = parent.parent;
                }
                None => break,
            }
        }
        out
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(&id).map(|&i| &self.app.actions[i])
    }

    pub fn data_source(&self, id: DataSourceId) -> Option<&DataSource> {
        self.data_sources.get(&id).map(|&i| &self.app.data_sources[i])
    }

    /// Field together with the data source that owns it
    pub fn field(&self, id: FieldId) -> Option<(&DataSource, &DataSourceField)> {
        self.fields.get(&id).map(|&(di, fi)| {
            let source = &self.app.data_sources[di];
            (source, &source.fields[fi])
        })
    }

    /// Structural problems worth reporting. None of them stop generation.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for id in &self.duplicates {
            warnings.push(format!("Duplicate widget id {} ignored", id));
        }

        for id in &self.orphans {
            if let Some(widget) = self.widget(*id) {
                warnings.push(format!(
                    "Widget {} ({}) references missing parent {}",
                    id,
                    widget.widget_type,
                    widget.parent.unwrap_or_default()
                ));
            }
        }

        for widget in self.all_widgets() {
            if let (Some(parent), Some(screen)) = (widget.parent, self.widget_screen(widget.id)) {
                if let Some(parent_screen) = self.widget_screen(parent) {
                    if parent_screen != screen && self.widgets.contains_key(&widget.id) {
                        warnings.push(format!(
                            "Widget {} on screen {} has parent {} on screen {}",
                            widget.id, screen, parent, parent_screen
                        ));
                    }
                }
            }
        }

        let mut cyclic: Vec<WidgetId> = self
            .widgets
            .keys()
            .copied()
            .filter(|&id| self.on_parent_cycle(id))
            .collect();
        cyclic.sort_unstable();
        for id in cyclic {
            warnings.push(format!(
                "Widget {} is part of a parent cycle and is unreachable",
                id
            ));
        }

        for (parent, ids) in &self.children {
            let mut orders = HashSet::new();
            for id in ids {
                if let Some(child) = self.widget(*id) {
                    if !orders.insert(child.order) {
                        warnings.push(format!(
                            "Children of widget {} share order {}; input order breaks the tie",
                            parent, child.order
                        ));
                    }
                }
            }
        }

        for widget in self.all_widgets() {
            for property in &widget.properties {
                let missing = match property.value {
                    PropertyValue::Action(id) if self.action(id).is_none() => Some("action"),
                    PropertyValue::Screen(id) if self.screen(id).is_none() => Some("screen"),
                    PropertyValue::DataField(id) if self.field(id).is_none() => {
                        Some("data source field")
                    }
                    _ => None,
                };
                if let Some(kind) = missing {
                    warnings.push(format!(
                        "Widget {} property '{}' references missing {}",
                        widget.id, property.name, kind
                    ));
                }
            }
        }

        for action in &self.app.actions {
            if let Some(target) = action.target_screen {
                if self.screen(target).is_none() {
                    warnings.push(format!(
                        "Action '{}' targets missing screen {}",
                        action.name, target
                    ));
                }
            }
            if let Some(source) = action.api_data_source {
                if self.data_source(source).is_none() {
                    warnings.push(format!(
                        "Action '{}' uses missing data source {}",
                        action.name, source
                    ));
                }
            }
        }

        let mut routes = HashSet::new();
        for screen in &self.app.screens {
            if !routes.insert(screen.route_name.as_str()) {
                warnings.push(format!("Duplicate route '{}'", screen.route_name));
            }
        }

        let homes = self.app.screens.iter().filter(|s| s.is_home_screen).count();
        if homes > 1 {
            warnings.push(format!("{} screens are flagged as home; the first wins", homes));
        }

        warnings.sort();
        warnings.dedup();
        warnings
    }

    fn on_parent_cycle(&self, id: WidgetId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if !seen.insert(node) {
                return node == id;
            }
            current = self.widget(node).and_then(|w| w.parent);
        }
        false
    }
}
