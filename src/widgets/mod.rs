//! Widget handlers and the tree walker
//!
//! Each widget family lives in its own module and exposes handlers through
//! the [`WidgetHandler`] trait. [`WidgetGenerator`] keeps them in a fixed
//! order and dispatches each widget to the first handler that accepts its
//! type tag. Handlers recurse into children through the generator, so every
//! node goes through the same guards, placeholders and syntax repair.

pub mod advanced;
pub mod basic;
pub mod custom;
pub mod inputs;
pub mod layout;
pub mod lists;
pub mod navigation;
pub mod style;

use crate::context::GeneratorContext;
use crate::error::Result;
use crate::model::{DataSource, DataSourceField, PropertyValue, Widget};
use crate::properties::Properties;
use crate::utils::{check_dart_syntax, escape_dart_string, indent, repair_dart_syntax};

/// Converts one widget record into a Dart expression
pub trait WidgetHandler: Send + Sync {
    /// Short family name used in logs
    fn name(&self) -> &'static str;

    fn can_handle(&self, widget_type: &str) -> bool;

    /// Render `widget` as a Dart expression. `indent_level` is the nesting
    /// depth of the line the expression starts on; continuation lines are
    /// indented relative to it.
    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String>;
}

pub struct WidgetGenerator {
    handlers: Vec<Box<dyn WidgetHandler>>,
}

impl Default for WidgetGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetGenerator {
    /// Registry with every built-in handler. The `Custom_*` catch-all goes last.
    pub fn new() -> Self {
        let mut handlers: Vec<Box<dyn WidgetHandler>> = Vec::new();
        handlers.extend(basic::handlers());
        handlers.extend(layout::handlers());
        handlers.extend(lists::handlers());
        handlers.extend(inputs::handlers());
        handlers.extend(navigation::handlers());
        handlers.extend(advanced::handlers());
        handlers.push(Box::new(custom::CustomWidgetHandler::new()));
        Self { handlers }
    }

    pub fn handler_for(&self, widget_type: &str) -> Option<&dyn WidgetHandler> {
        self.handlers
            .iter()
            .find(|h| h.can_handle(widget_type))
            .map(|h| h.as_ref())
    }

    pub fn supports(&self, widget_type: &str) -> bool {
        self.handler_for(widget_type).is_some()
    }

    /// Render one widget and its subtree. Never fails: unknown types, handler
    /// errors and traversal violations become visible placeholders and are
    /// recorded on the context.
    pub fn generate_widget(
        &self,
        widget: &Widget,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> String {
        let Some(handler) = self.handler_for(&widget.widget_type) else {
            ctx.add_warning(format!("No handler for widget type: {}", widget.widget_type));
            return format!(
                "Container(child: Text('Unsupported widget: {}'))",
                escape_dart_string(&widget.widget_type)
            );
        };

        if let Err(e) = ctx.enter(widget.id) {
            ctx.add_error(format!(
                "Skipping {} widget {}: {}",
                widget.widget_type, widget.id, e
            ));
            return error_placeholder(widget);
        }

        log::trace!(
            "{} handler rendering widget {} ({})",
            handler.name(),
            widget.id,
            widget.widget_type
        );
        let result = handler.generate(widget, self, ctx, indent_level);
        ctx.leave(widget.id);

        match result {
            Ok(code) => match check_dart_syntax(&code) {
                None => code,
                Some(problem) => {
                    ctx.add_warning(format!(
                        "Syntax issue in {} widget {}: {}",
                        widget.widget_type, widget.id, problem
                    ));
                    repair_dart_syntax(&code)
                }
            },
            Err(e) => {
                ctx.add_error(format!(
                    "Error generating {} widget {}: {}",
                    widget.widget_type, widget.id, e
                ));
                error_placeholder(widget)
            }
        }
    }

    /// Render every child of `widget` in order
    pub fn generate_children(
        &self,
        widget: &Widget,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Vec<String> {
        children_of(ctx, widget)
            .into_iter()
            .map(|child| self.generate_widget(child, ctx, indent_level))
            .collect()
    }

    /// First child rendered, or `None` for a leaf
    pub fn generate_first_child(
        &self,
        widget: &Widget,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Option<String> {
        children_of(ctx, widget)
            .first()
            .map(|child| self.generate_widget(child, ctx, indent_level))
    }
}

fn error_placeholder(widget: &Widget) -> String {
    format!(
        "Container(child: Text('Error generating: {}'))",
        escape_dart_string(&widget.widget_type)
    )
}

/// Ordered children of a widget, borrowed from the snapshot
pub fn children_of<'a>(ctx: &GeneratorContext<'a>, widget: &Widget) -> Vec<&'a Widget> {
    ctx.snapshot.children(widget.id)
}

/// Data-source field bound through the `dataSource` property. A reference to
/// a missing field is reported and the widget falls back to its static form.
pub fn bound_field<'a>(
    props: &Properties<'a>,
    ctx: &mut GeneratorContext<'_>,
) -> Option<(&'a DataSource, &'a DataSourceField)> {
    let widget = props.widget();
    match props.get("dataSource") {
        Some(PropertyValue::DataField(id)) => {
            let bound = props.field("dataSource");
            if bound.is_none() {
                ctx.add_warning(format!(
                    "{} widget {} is bound to missing data source field {}",
                    widget.widget_type, widget.id, id
                ));
            }
            bound
        }
        _ => None,
    }
}

/// `children: [...]` body lines, one rendered child per line with a trailing comma
pub fn child_list(items: &[String], indent_level: usize) -> String {
    let pad = indent(indent_level);
    items
        .iter()
        .map(|item| format!("{}{},\n", pad, item))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn render(snapshot: &crate::snapshot::Snapshot, id: u64) -> (String, Vec<String>, Vec<String>) {
        let generator = WidgetGenerator::new();
        let mut ctx = GeneratorContext::new(snapshot);
        let code = generator.generate_widget(snapshot.widget(id).unwrap(), &mut ctx, 0);
        let (warnings, errors) = ctx.into_diagnostics();
        (code, warnings, errors)
    }

    #[test]
    fn test_registry_order_and_coverage() {
        let generator = WidgetGenerator::new();
        for tag in [
            "Text", "ElevatedButton", "Container", "Column", "ListView", "GridView", "TextField",
            "BottomNavigationBar", "Card", "Wrap", "AspectRatio", "Tooltip", "Custom_shimmer", "lottie",
        ] {
            assert!(generator.supports(tag), "{} should be handled", tag);
        }
        assert_eq!(generator.handler_for("Custom_anything").unwrap().name(), "custom");
        assert!(!generator.supports("Hologram"));
    }

    #[test]
    fn test_unknown_type_placeholder() {
        let s = screen_with(r#"{"id": 1, "widget_type": "Hologram"}"#);
        let (code, warnings, errors) = render(&s, 1);
        assert_eq!(code, "Container(child: Text('Unsupported widget: Hologram'))");
        assert_eq!(warnings.len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unknown_child_keeps_siblings() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "Column"},
               {"id": 2, "widget_type": "Text", "parent": 1, "order": 0},
               {"id": 3, "widget_type": "Hologram", "parent": 1, "order": 1},
               {"id": 4, "widget_type": "Text", "parent": 1, "order": 2}"#,
        );
        let (code, warnings, _) = render(&s, 1);
        assert!(code.contains("Unsupported widget: Hologram"));
        assert_eq!(code.matches("Text('Text')").count(), 2);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_depth_ceiling_reports_once() {
        let mut widgets = vec![r#"{"id": 1, "widget_type": "Center"}"#.to_string()];
        for id in 2..=8 {
            widgets.push(format!(
                r#"{{"id": {}, "widget_type": "Center", "parent": {}}}"#,
                id,
                id - 1
            ));
        }
        let s = screen_with(&widgets.join(","));
        let generator = WidgetGenerator::new();
        let mut ctx = GeneratorContext::with_max_depth(&s, 4);
        let code = generator.generate_widget(s.widget(1).unwrap(), &mut ctx, 0);
        assert!(code.contains("Error generating: Center"));
        assert_eq!(ctx.errors().len(), 1);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_unbalanced_fragment_is_repaired() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Container", "properties": [{}]}}"#,
            text_prop("width", "10(")
        ));
        let (code, warnings, errors) = render(&s, 1);
        assert!(code.contains("width: 10(,"));
        assert!(crate::utils::DelimiterBalance::of(&code).is_balanced());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Syntax issue in Container widget 1: Unbalanced parentheses"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_child_list_lines() {
        let lines = child_list(&["A()".to_string(), "B()".to_string()], 2);
        assert_eq!(lines, "    A(),\n    B(),\n");
    }
}
