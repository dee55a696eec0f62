//! Containers, flex layouts, stacks and single-child wrappers

use super::style::enum_member;
use super::{children_of, WidgetGenerator, WidgetHandler};
use crate::context::GeneratorContext;
use crate::error::Result;
use crate::model::Widget;
use crate::properties::Properties;
use crate::utils::{color_code, indent};
use serde_json::Value;

pub fn handlers() -> Vec<Box<dyn WidgetHandler>> {
    vec![
        Box::new(ContainerHandler),
        Box::new(FlexHandler),
        Box::new(StackHandler),
        Box::new(PositionedHandler),
        Box::new(ExpandedHandler),
        Box::new(PaddingHandler),
        Box::new(CenterHandler),
        Box::new(AlignHandler),
        Box::new(SizedBoxHandler),
    ]
}

pub struct ContainerHandler;

impl ContainerHandler {
    fn decoration(props: &Properties<'_>) -> Vec<String> {
        let mut parts = Vec::new();

        if let Some(color) = props.first_truthy(&["color", "decoration.color"]) {
            parts.push(format!("color: {}", color_code(&color)));
        }
        if let Some(radius) = props.first_truthy(&["borderRadius", "decoration.borderRadius"]) {
            parts.push(format!("borderRadius: BorderRadius.circular({})", radius));
        }

        let border_color = props.first_truthy(&["borderColor", "decoration.border.color"]);
        let border_width = props.first_truthy(&["borderWidth", "decoration.border.width"]);
        if border_color.is_some() || border_width.is_some() {
            parts.push(format!(
                "border: Border.all(color: {}, width: {})",
                border_color.map_or_else(|| "Colors.black".to_string(), |c| color_code(&c)),
                border_width.unwrap_or_else(|| "1.0".to_string())
            ));
        }

        let shadow_color = props.first_truthy(&["boxShadowColor", "decoration.boxShadow.color"]);
        let shadow_blur = props.first_truthy(&["boxShadowBlur", "decoration.boxShadow.blurRadius"]);
        let shadow_spread = props.first_truthy(&["boxShadowSpread", "decoration.boxShadow.spreadRadius"]);
        let shadow_x = props.first_truthy(&["boxShadowOffsetX", "decoration.boxShadow.offsetX"]);
        let shadow_y = props.first_truthy(&["boxShadowOffsetY", "decoration.boxShadow.offsetY"]);
        if shadow_color.is_some() || shadow_blur.is_some() || shadow_spread.is_some() {
            let mut shadow = Vec::new();
            if let Some(color) = shadow_color {
                shadow.push(format!("color: {}", color_code(&color)));
            }
            if let Some(blur) = shadow_blur {
                shadow.push(format!("blurRadius: {}", blur));
            }
            if let Some(spread) = shadow_spread {
                shadow.push(format!("spreadRadius: {}", spread));
            }
            shadow.push(format!(
                "offset: Offset({}, {})",
                shadow_x.unwrap_or_else(|| "0".to_string()),
                shadow_y.unwrap_or_else(|| "0".to_string())
            ));
            parts.push(format!("boxShadow: [BoxShadow({})]", shadow.join(", ")));
        }

        if let Some(gradient) = Self::gradient(props) {
            parts.push(gradient);
        }

        parts
    }

    /// Linear gradient from a comma list (2 to 4 colors) or a start/end pair
    fn gradient(props: &Properties<'_>) -> Option<String> {
        if let Some(list) = props.first_truthy(&["gradient", "decoration.gradient"]) {
            let colors: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .take(4)
                .map(color_code)
                .collect();
            if colors.len() >= 2 {
                return Some(format!("gradient: LinearGradient(colors: [{}])", colors.join(", ")));
            }
        }
        let start = props.first_truthy(&["gradientStart", "decoration.gradient.startColor"])?;
        let end = props.first_truthy(&["gradientEnd", "decoration.gradient.endColor"])?;
        Some(format!(
            "gradient: LinearGradient(colors: [{}, {}])",
            color_code(&start),
            color_code(&end)
        ))
    }

    fn transform(props: &Properties<'_>) -> Option<String> {
        let Value::Object(map) = props.json("transform")? else {
            return None;
        };
        let scalar = |v: &Value| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if let Some(angle) = map.get("rotate") {
            return Some(format!("Matrix4.rotationZ({})", scalar(angle)));
        }
        if let Some(factor) = map.get("scale") {
            return Some(format!("Matrix4.identity()..scale({})", scalar(factor)));
        }
        if map.contains_key("translateX") || map.contains_key("translateY") {
            let x = map.get("translateX").map_or("0".to_string(), scalar);
            let y = map.get("translateY").map_or("0".to_string(), scalar);
            return Some(format!("Matrix4.translationValues({}, {}, 0)", x, y));
        }
        if let Some(offset) = map.get("translate") {
            let (x, y) = match offset {
                Value::Object(o) => (
                    o.get("x").map_or("0".to_string(), scalar),
                    o.get("y").map_or("0".to_string(), scalar),
                ),
                Value::Array(a) => (
                    a.first().map_or("0".to_string(), scalar),
                    a.get(1).map_or("0".to_string(), scalar),
                ),
                other => (scalar(other), "0".to_string()),
            };
            return Some(format!("Matrix4.translationValues({}, {}, 0)", x, y));
        }
        None
    }

    fn constraints(props: &Properties<'_>) -> Option<String> {
        let parts: Vec<String> = ["minWidth", "maxWidth", "minHeight", "maxHeight"]
            .iter()
            .filter_map(|key| props.truthy(key).map(|v| format!("{}: {}", key, v)))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(format!("BoxConstraints({})", parts.join(", ")))
        }
    }
}

impl WidgetHandler for ContainerHandler {
    fn name(&self) -> &'static str {
        "container"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Container"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);

        let mut code = String::from("Container(\n");
        for key in ["width", "height"] {
            if let Some(value) = props.truthy(key) {
                code.push_str(&format!("{ind}  {}: {},\n", key, value));
            }
        }
        if let Some(padding) = props.truthy("padding") {
            code.push_str(&format!("{ind}  padding: EdgeInsets.all({}),\n", padding));
        }
        if let Some(margin) = props.truthy("margin") {
            code.push_str(&format!("{ind}  margin: EdgeInsets.all({}),\n", margin));
        }

        let decoration = Self::decoration(&props);
        if !decoration.is_empty() {
            code.push_str(&format!("{ind}  decoration: BoxDecoration({}),\n", decoration.join(", ")));
        }
        if let Some(transform) = Self::transform(&props) {
            code.push_str(&format!("{ind}  transform: {},\n", transform));
        }
        if let Some(clip) = props.truthy("clipBehavior") {
            code.push_str(&format!("{ind}  clipBehavior: {},\n", enum_member("Clip", &clip, "none")));
        }
        if let Some(alignment) = props.truthy("alignment") {
            code.push_str(&format!("{ind}  alignment: {},\n", enum_member("Alignment", &alignment, "center")));
        }
        if let Some(constraints) = Self::constraints(&props) {
            code.push_str(&format!("{ind}  constraints: {},\n", constraints));
        }

        let children = children_of(ctx, widget);
        match children.as_slice() {
            [] => {}
            [only] => {
                let child = generator.generate_widget(only, ctx, indent_level + 1);
                code.push_str(&format!("{ind}  child: {},\n", child));
            }
            many => {
                let inner = indent(indent_level + 1);
                code.push_str(&format!("{ind}  child: Column(\n{inner}  children: [\n"));
                for child in many {
                    let rendered = generator.generate_widget(child, ctx, indent_level + 3);
                    code.push_str(&format!("{inner}    {},\n", rendered));
                }
                code.push_str(&format!("{inner}  ],\n{inner}),\n"));
            }
        }

        code.push_str(&format!("{ind})"));
        Ok(code)
    }
}

/// Column and Row
pub struct FlexHandler;

impl WidgetHandler for FlexHandler {
    fn name(&self) -> &'static str {
        "flex"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        matches!(widget_type, "Column" | "Row")
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);
        let kind = widget.widget_type.as_str();

        let main = enum_member("MainAxisAlignment", &props.text_or("mainAxisAlignment", "start"), "start");
        let cross = enum_member("CrossAxisAlignment", &props.text_or("crossAxisAlignment", "center"), "center");

        let mut code = format!(
            "{kind}(\n{ind}  mainAxisAlignment: {main},\n{ind}  crossAxisAlignment: {cross},"
        );
        let min_size = widget.widget_id.as_deref() == Some("home_column")
            || props.text("mainAxisSize").map_or(false, |v| v.ends_with("min"));
        if min_size {
            code.push_str(&format!("\n{ind}  mainAxisSize: MainAxisSize.min,"));
        }
        code.push_str(&format!("\n{ind}  children: ["));

        let spacer = props.truthy("spacing").map(|s| {
            let axis = if kind == "Column" { "height" } else { "width" };
            format!("SizedBox({}: {})", axis, s)
        });
        let children = generator.generate_children(widget, ctx, indent_level + 2);
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                if let Some(spacer) = &spacer {
                    code.push_str(&format!("\n{ind}    {},", spacer));
                }
            }
            code.push_str(&format!("\n{ind}    {},", child));
        }
        code.push_str(&format!("\n{ind}  ],\n{ind})"));

        let elevation = props.truthy("elevation");
        let background = props.truthy("backgroundColor");
        let radius = props.truthy("borderRadius");
        if elevation.is_some() || background.is_some() || radius.is_some() {
            let mut decoration = Vec::new();
            if let Some(bg) = background {
                decoration.push(format!("color: {}", color_code(&bg)));
            }
            if let Some(r) = radius {
                decoration.push(format!("borderRadius: BorderRadius.circular({})", r));
            }
            if let Some(e) = elevation {
                decoration.push(format!("boxShadow: [BoxShadow(color: Colors.black26, blurRadius: {})]", e));
            }
            code = format!(
                "Container(\n{ind}  decoration: BoxDecoration({}),\n{ind}  child: {}\n{ind})",
                decoration.join(", "),
                code
            );
        }
        if let Some(padding) = props.truthy("padding") {
            code = format!(
                "Padding(\n{ind}  padding: EdgeInsets.all({}),\n{ind}  child: {}\n{ind})",
                padding, code
            );
        }

        Ok(code)
    }
}

pub struct StackHandler;

impl WidgetHandler for StackHandler {
    fn name(&self) -> &'static str {
        "stack"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Stack"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);

        let mut code = String::from("Stack(\n");
        if let Some(alignment) = props.truthy("alignment") {
            code.push_str(&format!(
                "{ind}  alignment: {},\n",
                enum_member("Alignment", &alignment, "topLeft")
            ));
        }
        if let Some(fit) = props.truthy("fit") {
            code.push_str(&format!("{ind}  fit: {},\n", enum_member("StackFit", &fit, "loose")));
        }
        code.push_str(&format!("{ind}  children: [\n"));
        for child in generator.generate_children(widget, ctx, indent_level + 2) {
            code.push_str(&format!("{ind}    {},\n", child));
        }
        code.push_str(&format!("{ind}  ],\n{ind})"));
        Ok(code)
    }
}

pub struct PositionedHandler;

impl WidgetHandler for PositionedHandler {
    fn name(&self) -> &'static str {
        "positioned"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Positioned"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let mut params: Vec<String> = ["top", "bottom", "left", "right", "width", "height"]
            .iter()
            .filter_map(|key| props.text(key).map(|v| format!("{}: {}", key, v)))
            .collect();
        let child = generator
            .generate_first_child(widget, ctx, indent_level)
            .unwrap_or_else(|| "Container()".to_string());
        params.push(format!("child: {}", child));
        Ok(format!("Positioned({})", params.join(", ")))
    }
}

/// Expanded and Flexible
pub struct ExpandedHandler;

impl WidgetHandler for ExpandedHandler {
    fn name(&self) -> &'static str {
        "expanded"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        matches!(widget_type, "Expanded" | "Flexible")
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);
        let kind = widget.widget_type.as_str();

        let mut code = format!("{kind}(\n{ind}  flex: {},", props.text_or("flex", "1"));
        if kind == "Flexible" {
            code.push_str(&format!(
                "\n{ind}  fit: {},",
                enum_member("FlexFit", &props.text_or("fit", "loose"), "loose")
            ));
        }
        let child = generator
            .generate_first_child(widget, ctx, indent_level + 1)
            .unwrap_or_else(|| "Container()".to_string());
        code.push_str(&format!("\n{ind}  child: {},\n{ind})", child));
        Ok(code)
    }
}

pub struct PaddingHandler;

impl WidgetHandler for PaddingHandler {
    fn name(&self) -> &'static str {
        "padding"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Padding"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);
        let padding = props.text_or("padding", "8.0");
        let child = generator
            .generate_first_child(widget, ctx, indent_level + 1)
            .unwrap_or_else(|| "Container()".to_string());
        Ok(format!(
            "Padding(\n{ind}  padding: EdgeInsets.all({padding}),\n{ind}  child: {child},\n{ind})"
        ))
    }
}

pub struct CenterHandler;

impl WidgetHandler for CenterHandler {
    fn name(&self) -> &'static str {
        "center"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Center"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let mut params = Vec::new();
        for key in ["widthFactor", "heightFactor"] {
            if let Some(value) = props.truthy(key) {
                params.push(format!("{}: {}", key, value));
            }
        }
        let child = generator
            .generate_first_child(widget, ctx, indent_level)
            .unwrap_or_else(|| "Container()".to_string());
        params.push(format!("child: {}", child));
        Ok(format!("Center({})", params.join(", ")))
    }
}

pub struct AlignHandler;

impl WidgetHandler for AlignHandler {
    fn name(&self) -> &'static str {
        "align"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Align"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);
        let alignment = enum_member("Alignment", &props.text_or("alignment", "center"), "center");
        let child = generator
            .generate_first_child(widget, ctx, indent_level + 1)
            .unwrap_or_else(|| "Container()".to_string());
        Ok(format!(
            "Align(\n{ind}  alignment: {alignment},\n{ind}  child: {child},\n{ind})"
        ))
    }
}

pub struct SizedBoxHandler;

impl WidgetHandler for SizedBoxHandler {
    fn name(&self) -> &'static str {
        "sized_box"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "SizedBox"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let mut params = Vec::new();
        for key in ["width", "height"] {
            if let Some(value) = props.truthy(key) {
                params.push(format!("{}: {}", key, value));
            }
        }
        if let Some(child) = generator.generate_first_child(widget, ctx, indent_level) {
            params.push(format!("child: {}", child));
        }
        Ok(format!("SizedBox({})", params.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::widgets::test_support::*;

    fn render(snapshot: &Snapshot, id: u64) -> String {
        let generator = WidgetGenerator::new();
        let mut ctx = GeneratorContext::new(snapshot);
        generator.generate_widget(snapshot.widget(id).unwrap(), &mut ctx, 0)
    }

    #[test]
    fn test_column_children_and_spacing() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Column", "properties": [{}, {}]}},
               {{"id": 2, "widget_type": "Text", "parent": 1, "order": 1}},
               {{"id": 3, "widget_type": "Divider", "parent": 1, "order": 0}}"#,
            text_prop("mainAxisAlignment", "center"),
            text_prop("spacing", "12"),
        ));
        assert_eq!(
            render(&s, 1),
            "Column(\n  mainAxisAlignment: MainAxisAlignment.center,\n  crossAxisAlignment: CrossAxisAlignment.center,\n  children: [\n    Divider(),\n    SizedBox(height: 12),\n    Text('Text'),\n  ],\n)"
        );
    }

    #[test]
    fn test_home_column_is_min_sized() {
        let s = screen_with(r#"{"id": 1, "widget_type": "Column", "widget_id": "home_column"}"#);
        assert!(render(&s, 1).contains("mainAxisSize: MainAxisSize.min,"));
    }

    #[test]
    fn test_row_wrapped_in_decoration_and_padding() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Row", "properties": [{}, {}]}}"#,
            text_prop("backgroundColor", "#EEEEEE"),
            text_prop("padding", "16"),
        ));
        let code = render(&s, 1);
        assert!(code.starts_with("Padding(\n  padding: EdgeInsets.all(16),\n  child: Container("));
        assert!(code.contains("decoration: BoxDecoration(color: Color(0xFFEEEEEE)),"));
        assert!(code.contains("child: Row("));
    }

    #[test]
    fn test_container_decoration() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Container", "properties": [{}, {}, {}, {}, {}]}},
               {{"id": 2, "widget_type": "Text", "parent": 1}}"#,
            text_prop("width", "100"),
            text_prop("decoration.color", "#FFFFFF"),
            text_prop("borderWidth", "2"),
            text_prop("gradient", "#000000, #FFFFFF"),
            text_prop("transform", r#"{"rotate": 0.1}"#),
        ));
        let code = render(&s, 1);
        assert!(code.starts_with("Container(\n  width: 100,\n"));
        assert!(code.contains(
            "decoration: BoxDecoration(color: Color(0xFFFFFFFF), border: Border.all(color: Colors.black, width: 2), gradient: LinearGradient(colors: [Color(0xFF000000), Color(0xFFFFFFFF)])),"
        ));
        assert!(code.contains("transform: Matrix4.rotationZ(0.1),"));
        assert!(code.contains("  child: Text('Text'),\n)"));
    }

    #[test]
    fn test_container_translation() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Container", "properties": [{}]}},
               {{"id": 2, "widget_type": "Container", "properties": [{}]}},
               {{"id": 3, "widget_type": "Container", "properties": [{}]}}"#,
            text_prop("transform", r#"{"translateX": 10, "translateY": 5}"#),
            text_prop("transform", r#"{"translateY": 4}"#),
            text_prop("transform", r#"{"translate": {"x": 3}}"#),
        ));
        assert!(render(&s, 1).contains("transform: Matrix4.translationValues(10, 5, 0),"));
        assert!(render(&s, 2).contains("transform: Matrix4.translationValues(0, 4, 0),"));
        assert!(render(&s, 3).contains("transform: Matrix4.translationValues(3, 0, 0),"));
    }

    #[test]
    fn test_container_with_several_children_uses_column() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "Container"},
               {"id": 2, "widget_type": "Text", "parent": 1, "order": 0},
               {"id": 3, "widget_type": "Divider", "parent": 1, "order": 1}"#,
        );
        let code = render(&s, 1);
        assert!(code.contains("child: Column(\n    children: [\n      Text('Text'),\n      Divider(),\n    ],\n  ),"));
    }

    #[test]
    fn test_single_child_wrappers() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "Padding"},
               {"id": 2, "widget_type": "Center"},
               {"id": 3, "widget_type": "Text", "parent": 2},
               {"id": 4, "widget_type": "Flexible"},
               {"id": 5, "widget_type": "SizedBox"}"#,
        );
        assert_eq!(render(&s, 1), "Padding(\n  padding: EdgeInsets.all(8.0),\n  child: Container(),\n)");
        assert_eq!(render(&s, 2), "Center(child: Text('Text'))");
        assert_eq!(
            render(&s, 4),
            "Flexible(\n  flex: 1,\n  fit: FlexFit.loose,\n  child: Container(),\n)"
        );
        assert_eq!(render(&s, 5), "SizedBox()");
    }

    #[test]
    fn test_stack_and_positioned() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Stack"}},
               {{"id": 2, "widget_type": "Positioned", "parent": 1, "properties": [{}]}}"#,
            text_prop("top", "10"),
        ));
        assert_eq!(
            render(&s, 1),
            "Stack(\n  children: [\n    Positioned(top: 10, child: Container()),\n  ],\n)"
        );
    }
}
