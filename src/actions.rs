//! Action and screen reference resolution
//!
//! Interactive widgets bind behaviour through `action_reference` or
//! `screen_reference` properties. Every resolution yields an [`ActionCode`]:
//! a statement list plus whether it awaits. Handlers render it either as a
//! callback (`() { ... }`) or inline, as the bottom navigation switch does.

use crate::context::{GeneratorContext, CONFIGURATION_SCREEN};
use crate::model::{Action, ActionType};
use crate::properties::Properties;
use crate::utils::{color_code, comment_safe, escape_dart_string, to_pascal_case};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCode {
    statements: String,
    is_async: bool,
}

impl ActionCode {
    pub fn noop() -> Self {
        Self {
            statements: String::new(),
            is_async: false,
        }
    }

    fn sync(statements: impl Into<String>) -> Self {
        Self {
            statements: statements.into(),
            is_async: false,
        }
    }

    fn awaiting(statements: impl Into<String>) -> Self {
        Self {
            statements: statements.into(),
            is_async: true,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn is_async(&self) -> bool {
        self.is_async
    }

    pub fn statements(&self) -> &str {
        &self.statements
    }

    /// Zero-argument closure form
    pub fn callback(&self) -> String {
        self.callback_with("")
    }

    /// Closure taking `params`, for typed consumers such as `onChanged`
    pub fn callback_with(&self, params: &str) -> String {
        if self.is_noop() {
            format!("({}) {{}}", params)
        } else if self.is_async {
            format!("({}) async {{ {} }}", params, self.statements)
        } else {
            format!("({}) {{ {} }}", params, self.statements)
        }
    }
}

pub fn navigate_to(route: &str) -> ActionCode {
    ActionCode::sync(format!(
        "Navigator.pushNamed(context, '{}');",
        escape_dart_string(route)
    ))
}

pub fn snackbar(message: &str) -> String {
    format!(
        "ScaffoldMessenger.of(context).showSnackBar(SnackBar(content: Text('{}')));",
        escape_dart_string(message)
    )
}

/// Visible acknowledgement used by buttons that have nothing bound
pub fn acknowledge(label: &str) -> ActionCode {
    ActionCode::sync(snackbar(&format!("{} clicked", label)))
}

/// Resolve an action record into code
pub fn resolve_action(action: &Action, ctx: &GeneratorContext<'_>) -> ActionCode {
    if ctx.on_screen(CONFIGURATION_SCREEN) {
        if let Some(method) = configuration_method(&action.name) {
            return ActionCode::sync(format!("{}();", method));
        }
    }

    match action.kind() {
        ActionType::Navigate => action
            .target_screen
            .and_then(|id| ctx.snapshot.screen(id))
            .map_or_else(ActionCode::noop, |screen| navigate_to(&screen.route_name)),
        ActionType::NavigateBack => ActionCode::sync("Navigator.pop(context);"),
        ActionType::ShowDialog => show_dialog(action),
        ActionType::ShowSnackbar => show_snackbar(action),
        ActionType::ApiCall => match action.api_data_source.and_then(|id| ctx.snapshot.data_source(id)) {
            Some(source) => ActionCode::awaiting(format!(
                "try {{ await _apiService.fetch{}(); {} }} catch (e) {{ {} }}",
                to_pascal_case(&source.name),
                snackbar("Success"),
                snackbar("Error")
            )),
            None => ActionCode::noop(),
        },
        ActionType::OpenUrl => match action.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => ActionCode::sync(format!("/* TODO: open URL {} */", comment_safe(url))),
            None => ActionCode::sync("/* TODO: open_url */"),
        },
        ActionType::Other(tag) => ActionCode::sync(format!("/* TODO: {} */", comment_safe(&tag))),
        _ => ActionCode::sync(format!("/* TODO: {} */", comment_safe(&action.action_type))),
    }
}

fn configuration_method(action_name: &str) -> Option<&'static str> {
    match action_name {
        "SaveConfiguration" => Some("_saveConfiguration"),
        "ValidateConfiguration" => Some("_validateUrl"),
        "LoadConfiguration" => Some("_loadSavedUrl"),
        _ => None,
    }
}

fn show_dialog(action: &Action) -> ActionCode {
    let title = escape_dart_string(non_empty(&action.dialog_title).unwrap_or("Alert"));
    let message = escape_dart_string(non_empty(&action.dialog_message).unwrap_or("Message"));
    ActionCode::sync(format!(
        "showDialog(
            context: context,
            builder: (context) => AlertDialog(
              title: Text('{}'),
              content: Text('{}'),
              actions: [
                TextButton(
                  onPressed: () => Navigator.pop(context),
                  child: Text('OK'),
                ),
              ],
            ),
          );",
        title, message
    ))
}

fn show_snackbar(action: &Action) -> ActionCode {
    let message = escape_dart_string(non_empty(&action.dialog_message).unwrap_or("Done"));
    let params = action.parameter_map().unwrap_or_default();
    let scalar = |key: &str| -> Option<String> {
        match params.get(key)? {
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    };

    let mut parts = vec![format!("content: Text('{}')", message)];
    if let Some(bg) = scalar("backgroundColor") {
        parts.push(format!("backgroundColor: {}", color_code(&bg)));
    }
    if let Some(ms) = scalar("durationMs") {
        parts.push(format!("duration: Duration(milliseconds: {})", ms));
    }
    if let Some(padding) = scalar("padding") {
        parts.push(format!("padding: EdgeInsets.all({})", padding));
    }
    if let Some(margin) = scalar("margin") {
        parts.push(format!("margin: EdgeInsets.all({})", margin));
    }

    ActionCode::sync(format!(
        "ScaffoldMessenger.of(context).showSnackBar(SnackBar({}));",
        parts.join(", ")
    ))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Resolve the named property as an action or screen reference.
/// `None` when neither resolves.
pub fn resolve_property(props: &Properties<'_>, name: &str, ctx: &GeneratorContext<'_>) -> Option<ActionCode> {
    if let Some(action) = props.action(name) {
        return Some(resolve_action(action, ctx));
    }
    props.screen(name).map(|screen| navigate_to(&screen.route_name))
}

/// Callback for the named property, `() {}` when nothing is bound
pub fn callback_or_noop(props: &Properties<'_>, name: &str, ctx: &GeneratorContext<'_>) -> String {
    resolve_property(props, name, ctx)
        .unwrap_or_else(ActionCode::noop)
        .callback()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;

    fn fixture() -> Snapshot {
        let json = r##"{
            "name": "Shop", "package_name": "com.example.shop",
            "screens": [
                {"id": 1, "name": "Home", "route_name": "/home"},
                {"id": 2, "name": "Configuration", "route_name": "/configuration"}
            ],
            "data_sources": [{"id": 4, "name": "product list"}],
            "actions": [
                {"id": 1, "name": "Go", "action_type": "navigate", "target_screen": 1},
                {"id": 2, "name": "Go Nowhere", "action_type": "navigate"},
                {"id": 3, "name": "Back", "action_type": "navigate_back"},
                {"id": 4, "name": "Ask", "action_type": "show_dialog", "dialog_title": "It's"},
                {"id": 5, "name": "Toast", "action_type": "show_snackbar", "dialog_message": "Saved",
                 "parameters": "{\"backgroundColor\": \"#00FF00\", \"durationMs\": 1500}"},
                {"id": 6, "name": "Load", "action_type": "api_call", "api_data_source": 4},
                {"id": 7, "name": "Ring", "action_type": "vibrate"},
                {"id": 8, "name": "SaveConfiguration", "action_type": "submit_form"},
                {"id": 9, "name": "Site", "action_type": "open_url", "url": "https://x.dev/*/"}
            ]
        }"##;
        Snapshot::from_json_str(json, "actions").unwrap()
    }

    fn resolve(snapshot: &Snapshot, id: u64) -> ActionCode {
        let ctx = GeneratorContext::new(snapshot);
        resolve_action(snapshot.action(id).unwrap(), &ctx)
    }

    #[test]
    fn test_navigation() {
        let s = fixture();
        assert_eq!(
            resolve(&s, 1).callback(),
            "() { Navigator.pushNamed(context, '/home'); }"
        );
        assert_eq!(resolve(&s, 2).callback(), "() {}");
        assert_eq!(resolve(&s, 3).callback(), "() { Navigator.pop(context); }");
    }

    #[test]
    fn test_dialog_and_snackbar() {
        let s = fixture();
        let dialog = resolve(&s, 4).callback();
        assert!(dialog.contains("title: Text('It\\'s')"));
        assert!(dialog.contains("content: Text('Message')"));

        let toast = resolve(&s, 5).callback();
        assert!(toast.contains("content: Text('Saved')"));
        assert!(toast.contains("backgroundColor: Color(0xFF00FF00)"));
        assert!(toast.contains("duration: Duration(milliseconds: 1500)"));
    }

    #[test]
    fn test_api_call_is_async() {
        let s = fixture();
        let code = resolve(&s, 6);
        assert!(code.is_async());
        assert!(code.callback().starts_with("() async { try { await _apiService.fetchProductList();"));
    }

    #[test]
    fn test_stubs() {
        let s = fixture();
        assert_eq!(resolve(&s, 7).callback(), "() { /* TODO: vibrate */ }");
        assert_eq!(
            resolve(&s, 9).callback(),
            "() { /* TODO: open URL https://x.dev/ * / */ }"
        );
    }

    #[test]
    fn test_configuration_methods_only_on_configuration_screen() {
        let s = fixture();
        assert_eq!(resolve(&s, 8).callback(), "() { /* TODO: submit_form */ }");

        let mut ctx = GeneratorContext::new(&s);
        ctx.set_current_screen(s.screen(2));
        let code = resolve_action(s.action(8).unwrap(), &ctx);
        assert_eq!(code.callback(), "() { _saveConfiguration(); }");
    }

    #[test]
    fn test_acknowledge() {
        assert_eq!(
            acknowledge("Buy").callback(),
            "() { ScaffoldMessenger.of(context).showSnackBar(SnackBar(content: Text('Buy clicked'))); }"
        );
    }
}
