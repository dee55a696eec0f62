//! Text, buttons, icons, images and dividers

use super::style::{enum_member, icon_name, text_style};
use super::{bound_field, WidgetGenerator, WidgetHandler};
use crate::actions::{acknowledge, callback_or_noop, resolve_property};
use crate::bindings::single_value;
use crate::context::GeneratorContext;
use crate::error::Result;
use crate::model::Widget;
use crate::properties::Properties;
use crate::utils::{color_code, escape_dart_string, indent};

pub fn handlers() -> Vec<Box<dyn WidgetHandler>> {
    vec![
        Box::new(TextHandler),
        Box::new(ButtonHandler),
        Box::new(IconButtonHandler),
        Box::new(FloatingActionButtonHandler),
        Box::new(IconHandler),
        Box::new(ImageHandler),
        Box::new(DividerHandler),
    ]
}

pub struct TextHandler;

impl WidgetHandler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Text"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let text = props.text_or("text", "Text");
        let style = text_style(&props);

        if let Some((source, field)) = bound_field(&props, ctx) {
            return Ok(single_value(source, field, &text, &style, &indent(indent_level)));
        }

        let mut params = String::new();
        if let Some(align) = props.truthy("textAlign") {
            params.push_str(&format!(", textAlign: {}", enum_member("TextAlign", &align, "start")));
        }
        if props.get("softWrap").is_some() {
            params.push_str(&format!(", softWrap: {}", props.flag("softWrap", true)));
        }
        if let Some(overflow) = props.truthy("overflow") {
            params.push_str(&format!(", overflow: {}", enum_member("TextOverflow", &overflow, "clip")));
        }
        if let Some(max_lines) = props.truthy("maxLines") {
            params.push_str(&format!(", maxLines: {}", max_lines));
        }

        Ok(format!("Text('{}'{}{})", escape_dart_string(&text), style, params))
    }
}

/// ElevatedButton, TextButton and OutlinedButton
pub struct ButtonHandler;

impl WidgetHandler for ButtonHandler {
    fn name(&self) -> &'static str {
        "button"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        matches!(widget_type, "ElevatedButton" | "TextButton" | "OutlinedButton")
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);
        let kind = widget.widget_type.as_str();

        let label = props.text_or("text", "Button");
        let action = resolve_property(&props, "onPressed", ctx)
            .unwrap_or_else(|| acknowledge(&label))
            .callback();

        let mut style_args = Vec::new();
        if let Some(bg) = props.first_truthy(&["backgroundColor", "style.backgroundColor"]) {
            style_args.push(format!("backgroundColor: {}", color_code(&bg)));
        }
        if let Some(fg) = props.first_truthy(&["foregroundColor", "style.foregroundColor"]) {
            style_args.push(format!("foregroundColor: {}", color_code(&fg)));
        }
        if let Some(padding) = props.first_truthy(&["padding", "style.padding"]) {
            style_args.push(format!("padding: EdgeInsets.all({})", padding));
        }
        if let Some(elevation) = props.truthy("elevation") {
            style_args.push(format!("elevation: {}", elevation));
        }
        if let Some(radius) = props.truthy("borderRadius") {
            style_args.push(format!(
                "shape: RoundedRectangleBorder(borderRadius: BorderRadius.circular({}))",
                radius
            ));
        }
        if kind == "OutlinedButton" {
            let border_color = props.truthy("borderColor");
            let border_width = props.truthy("borderWidth");
            if border_color.is_some() || border_width.is_some() {
                style_args.push(format!(
                    "side: BorderSide(color: {}, width: {})",
                    border_color.map_or_else(|| "Colors.grey".to_string(), |c| color_code(&c)),
                    border_width.unwrap_or_else(|| "1.0".to_string())
                ));
            }
        }

        let mut code = format!(
            "{kind}(\n{ind}  onPressed: {action},\n{ind}  child: Text('{label}')",
            label = escape_dart_string(&label),
        );
        if !style_args.is_empty() {
            code.push_str(&format!(
                ",\n{ind}  style: {kind}.styleFrom({})",
                style_args.join(", ")
            ));
        }
        code.push_str(&format!("\n{ind})"));

        let width = props.truthy("width");
        let height = props.truthy("height");
        if width.is_some() || height.is_some() {
            let mut size = Vec::new();
            if let Some(w) = width {
                size.push(format!("width: {}", w));
            }
            if let Some(h) = height {
                size.push(format!("height: {}", h));
            }
            code = format!("SizedBox({}, child: {})", size.join(", "), code);
        }
        if let Some(margin) = props.truthy("margin") {
            code = format!("Padding(padding: EdgeInsets.all({}), child: {})", margin, code);
        }

        Ok(code)
    }
}

pub struct IconButtonHandler;

impl WidgetHandler for IconButtonHandler {
    fn name(&self) -> &'static str {
        "icon_button"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "IconButton"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);

        let mut icon = format!("Icon(Icons.{}", icon_name(props.text("icon"), "add"));
        if let Some(color) = props.truthy("color") {
            icon.push_str(&format!(", color: {}", color_code(&color)));
        }
        if let Some(size) = props.truthy("size") {
            icon.push_str(&format!(", size: {}", size));
        }
        icon.push(')');

        let mut code = format!(
            "IconButton(\n{ind}  icon: {icon},\n{ind}  onPressed: {},\n",
            callback_or_noop(&props, "onPressed", ctx)
        );
        if let Some(radius) = props.truthy("splashRadius") {
            code.push_str(&format!("{ind}  splashRadius: {},\n", radius));
        }
        code.push_str(&format!("{ind})"));
        Ok(code)
    }
}

pub struct FloatingActionButtonHandler;

impl WidgetHandler for FloatingActionButtonHandler {
    fn name(&self) -> &'static str {
        "fab"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "FloatingActionButton"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let icon = icon_name(props.text("icon"), "add");

        let mut params = vec![format!("onPressed: {}", callback_or_noop(&props, "onPressed", ctx))];
        if let Some(bg) = props.truthy("backgroundColor") {
            params.push(format!("backgroundColor: {}", color_code(&bg)));
        }
        if let Some(fg) = props.truthy("foregroundColor") {
            params.push(format!("foregroundColor: {}", color_code(&fg)));
        }

        let extended = props.flag("extended", false);
        if props.flag("mini", false) && !extended {
            params.push("mini: true".to_string());
        }

        if extended {
            let label = props.text_or("label", "Action");
            Ok(format!(
                "FloatingActionButton.extended({}, label: Text('{}'), icon: Icon(Icons.{}))",
                params.join(", "),
                escape_dart_string(&label),
                icon
            ))
        } else {
            Ok(format!(
                "FloatingActionButton({}, child: Icon(Icons.{}))",
                params.join(", "),
                icon
            ))
        }
    }
}

pub struct IconHandler;

impl WidgetHandler for IconHandler {
    fn name(&self) -> &'static str {
        "icon"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Icon"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let mut params = Vec::new();
        if let Some(size) = props.truthy("size") {
            params.push(format!("size: {}", size));
        }
        if let Some(color) = props.truthy("color") {
            params.push(format!("color: {}", color_code(&color)));
        }

        let icon = icon_name(props.text("icon"), "info");
        if params.is_empty() {
            Ok(format!("Icon(Icons.{})", icon))
        } else {
            Ok(format!("Icon(Icons.{}, {})", icon, params.join(", ")))
        }
    }
}

pub struct ImageHandler;

impl WidgetHandler for ImageHandler {
    fn name(&self) -> &'static str {
        "image"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Image"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let Some(url) = props.first_truthy(&["imageUrl", "url", "src", "source"]) else {
            return Ok("Icon(Icons.image, size: 50)".to_string());
        };

        let fit = enum_member("BoxFit", &props.text_or("fit", "cover"), "cover");
        let mut params = vec![format!("fit: {}", fit)];
        for key in ["width", "height"] {
            if let Some(value) = props.truthy(key) {
                params.push(format!("{}: {}", key, value));
            }
        }
        if let Some(alignment) = props.truthy("alignment") {
            params.push(format!("alignment: {}", enum_member("Alignment", &alignment, "center")));
        }
        if let Some(repeat) = props.truthy("repeat") {
            params.push(format!("repeat: {}", enum_member("ImageRepeat", &repeat, "noRepeat")));
        }
        if let Some(mode) = props.truthy("colorBlendMode") {
            params.push(format!("colorBlendMode: {}", enum_member("BlendMode", &mode, "srcIn")));
        }
        if let Some(scale) = props.truthy("scale") {
            params.push(format!("scale: {}", scale));
        }

        let escaped = escape_dart_string(&url);
        let code = if url.starts_with("http") {
            params.push("errorBuilder: (c,e,s) => Icon(Icons.image)".to_string());
            format!("Image.network('{}', {})", escaped, params.join(", "))
        } else {
            format!("Image.asset('{}', {})", escaped, params.join(", "))
        };

        match props.truthy("opacity") {
            Some(opacity) => Ok(format!("Opacity(opacity: {}, child: {})", opacity, code)),
            None => Ok(code),
        }
    }
}

pub struct DividerHandler;

impl WidgetHandler for DividerHandler {
    fn name(&self) -> &'static str {
        "divider"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Divider"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let mut params = Vec::new();
        for key in ["height", "thickness"] {
            if let Some(value) = props.truthy(key) {
                params.push(format!("{}: {}", key, value));
            }
        }
        if let Some(color) = props.truthy("color") {
            params.push(format!("color: {}", color_code(&color)));
        }
        for key in ["indent", "endIndent"] {
            if let Some(value) = props.truthy(key) {
                params.push(format!("{}: {}", key, value));
            }
        }
        Ok(format!("Divider({})", params.join(", ")))
    }
}
