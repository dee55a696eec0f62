//! Screen assembly
//!
//! A screen becomes one Dart file holding a `StatefulWidget`. Regular screens
//! go through [`builder`]; the splash and first-run configuration screens get
//! hand-written control flow from [`special`] but still render their declared
//! widget tree as the visible body.

pub mod builder;
pub mod special;

use crate::context::{GeneratorContext, CONFIGURATION_SCREEN, SPLASH_SCREEN};
use crate::model::{Screen, Widget};
use crate::utils::{color_code, indent, screen_class_name, screen_file_name};
use crate::widgets::{child_list, WidgetGenerator};

/// Widget types that fill Scaffold slots instead of the body
const CHROME_TYPES: [&str; 3] = ["BottomNavigationBar", "AppBar", "Drawer"];

/// Nesting level of the Scaffold's named arguments
pub(crate) const SLOT_LEVEL: usize = 3;

/// Members every generated screen state declares. Handlers emit code that
/// reads them, so special screens carry them too.
pub(crate) const STATE_FIELDS: &str = "  final ApiService _apiService = ApiService();
  final Map<String, TextEditingController> _controllers = {};
  final Map<String, dynamic> _stateVariables = {};
  int _selectedIndex = 0;
";

#[derive(Debug, Clone)]
pub struct ScreenArtifact {
    pub screen_name: String,
    pub class_name: String,
    pub file_name: String,
    pub code: String,
}

pub struct ScreenGenerator {
    widgets: WidgetGenerator,
}

impl Default for ScreenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenGenerator {
    pub fn new() -> Self {
        Self {
            widgets: WidgetGenerator::new(),
        }
    }

    pub fn widgets(&self) -> &WidgetGenerator {
        &self.widgets
    }

    pub fn is_special(screen_name: &str) -> bool {
        screen_name == SPLASH_SCREEN || screen_name == CONFIGURATION_SCREEN
    }

    /// Render one screen. The current screen on `ctx` is set for the
    /// duration of the call and cleared afterwards.
    pub fn generate<'a>(&self, screen: &'a Screen, ctx: &mut GeneratorContext<'a>) -> ScreenArtifact {
        log::debug!("Generating screen '{}' ({})", screen.name, screen.route_name);
        ctx.set_current_screen(Some(screen));

        let class_name = screen_class_name(&screen.name);
        let code = match screen.name.as_str() {
            SPLASH_SCREEN => special::splash(self, screen, &class_name, ctx),
            CONFIGURATION_SCREEN => special::configuration(self, screen, &class_name, ctx),
            _ => builder::regular(self, screen, &class_name, ctx),
        };

        ctx.set_current_screen(None);
        ScreenArtifact {
            screen_name: screen.name.clone(),
            class_name,
            file_name: screen_file_name(&screen.name),
            code,
        }
    }

    /// Scaffold body from the non-chrome roots. One root is used as is,
    /// several are stacked in a Column and none yields `empty`.
    pub(crate) fn body(
        &self,
        roots: &[&Widget],
        ctx: &mut GeneratorContext<'_>,
        centered: bool,
        empty: &str,
    ) -> String {
        match roots {
            [] => empty.to_string(),
            [only] => self.widgets.generate_widget(only, ctx, SLOT_LEVEL),
            many => {
                let items: Vec<String> = many
                    .iter()
                    .map(|w| self.widgets.generate_widget(w, ctx, SLOT_LEVEL + 2))
                    .collect();
                let pad = indent(SLOT_LEVEL + 1);
                let alignment = if centered {
                    format!("{pad}mainAxisAlignment: MainAxisAlignment.center,\n")
                } else {
                    String::new()
                };
                format!(
                    "Column(\n{alignment}{pad}children: [\n{}{pad}],\n{})",
                    child_list(&items, SLOT_LEVEL + 2),
                    indent(SLOT_LEVEL),
                )
            }
        }
    }
}

pub(crate) fn body_roots<'a>(ctx: &GeneratorContext<'a>, screen: &Screen) -> Vec<&'a Widget> {
    ctx.snapshot
        .roots(screen.id)
        .into_iter()
        .filter(|w| !CHROME_TYPES.contains(&w.widget_type.as_str()))
        .collect()
}

pub(crate) fn root_of_type<'a>(
    ctx: &GeneratorContext<'a>,
    screen: &Screen,
    widget_type: &str,
) -> Option<&'a Widget> {
    ctx.snapshot
        .roots(screen.id)
        .into_iter()
        .find(|w| w.widget_type == widget_type)
}

/// Import block: the fixed imports followed by active custom package imports.
/// Entries may be bare URIs or complete directives.
pub(crate) fn imports(ctx: &GeneratorContext<'_>, fixed: &[&str]) -> String {
    let mut lines: Vec<String> = fixed.iter().filter_map(|uri| import_line(uri)).collect();
    for custom in &ctx.snapshot.application().custom_widgets {
        if !custom.is_active {
            continue;
        }
        let Some(line) = import_line(&custom.import_statement) else {
            continue;
        };
        if !lines.contains(&line) {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Accepts either a complete import directive or a bare URI
fn import_line(statement: &str) -> Option<String> {
    let statement = statement.trim();
    if statement.is_empty() {
        None
    } else if statement.starts_with("import ") {
        Some(if statement.ends_with(';') {
            statement.to_string()
        } else {
            format!("{};", statement)
        })
    } else {
        Some(format!("import '{}';", statement.trim_matches(|c| c == '\'' || c == '"')))
    }
}

pub(crate) fn background_slot(screen: &Screen) -> Option<String> {
    screen
        .background_color
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!("      backgroundColor: {},\n", color_code(c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;

    #[test]
    fn test_import_line_forms() {
        assert_eq!(
            import_line("import 'package:lottie/lottie.dart'").unwrap(),
            "import 'package:lottie/lottie.dart';"
        );
        assert_eq!(
            import_line("package:shimmer/shimmer.dart").unwrap(),
            "import 'package:shimmer/shimmer.dart';"
        );
        assert!(import_line("  ").is_none());
    }

    #[test]
    fn test_imports_skip_inactive_and_duplicates() {
        let s = Snapshot::from_json_str(
            r#"{"name": "T", "package_name": "com.example.t", "custom_widgets": [
                {"package_name": "lottie", "import_statement": "package:lottie/lottie.dart"},
                {"package_name": "lottie", "import_statement": "import 'package:lottie/lottie.dart';"},
                {"package_name": "shimmer", "import_statement": "package:shimmer/shimmer.dart", "is_active": false}
            ]}"#,
            "test",
        )
        .unwrap();
        let ctx = GeneratorContext::new(&s);
        assert_eq!(
            imports(&ctx, &["package:flutter/material.dart"]),
            "import 'package:flutter/material.dart';\nimport 'package:lottie/lottie.dart';"
        );
    }

    #[test]
    fn test_special_names() {
        assert!(ScreenGenerator::is_special("SplashScreen"));
        assert!(ScreenGenerator::is_special("Configuration"));
        assert!(!ScreenGenerator::is_special("Home"));
    }
}
