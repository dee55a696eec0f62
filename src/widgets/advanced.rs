//! Cards, builders, pagers and decorative wrappers

use super::style::{icon_name, text_style_args};
use super::{bound_field, children_of, WidgetGenerator, WidgetHandler};
use crate::actions::callback_or_noop;
use crate::bindings::fetch_call;
use crate::context::GeneratorContext;
use crate::error::Result;
use crate::model::Widget;
use crate::properties::Properties;
use crate::utils::{color_code, escape_dart_string, indent};

pub fn handlers() -> Vec<Box<dyn WidgetHandler>> {
    vec![
        Box::new(CardHandler),
        Box::new(FutureBuilderHandler),
        Box::new(StreamBuilderHandler),
        Box::new(PagerHandler),
        Box::new(WrapHandler),
        Box::new(AspectRatioHandler),
        Box::new(SafeAreaHandler),
        Box::new(ScaffoldHandler),
        Box::new(TooltipHandler),
        Box::new(RichTextHandler),
        Box::new(ChipHandler),
        Box::new(AvatarHandler),
        Box::new(BottomSheetHandler),
        Box::new(DialogHandler),
        Box::new(BadgeHandler),
    ]
}

fn first_child_or(
    generator: &WidgetGenerator,
    widget: &Widget,
    ctx: &mut GeneratorContext<'_>,
    indent_level: usize,
    fallback: &str,
) -> String {
    generator
        .generate_first_child(widget, ctx, indent_level)
        .unwrap_or_else(|| fallback.to_string())
}

pub struct CardHandler;

impl WidgetHandler for CardHandler {
    fn name(&self) -> &'static str {
        "card"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Card"
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

        let mut code = format!("Card(\n{ind}  elevation: {},", props.text_or("elevation", "4"));
        if let Some(margin) = props.truthy("margin") {
            code.push_str(&format!("\n{ind}  margin: EdgeInsets.all({}),", margin));
        }
        if let Some(color) = props.truthy("color") {
            code.push_str(&format!("\n{ind}  color: {},", color_code(&color)));
        }
        code.push_str(&format!("\n{ind}  child: "));

        let children = children_of(ctx, widget);
        match children.as_slice() {
            [] => code.push_str("Container()"),
            [only] => code.push_str(&generator.generate_widget(only, ctx, indent_level + 1)),
            many => {
                let inner = indent(indent_level + 1);
                code.push_str(&format!("Column(\n{inner}  children: [\n"));
                for child in many {
                    let rendered = generator.generate_widget(child, ctx, indent_level + 3);
                    code.push_str(&format!("{inner}    {},\n", rendered));
                }
                code.push_str(&format!("{inner}  ],\n{inner})"));
            }
        }
        code.push_str(&format!(",\n{ind})"));
        Ok(code)
    }
}

pub struct FutureBuilderHandler;

impl WidgetHandler for FutureBuilderHandler {
    fn name(&self) -> &'static str {
        "future_builder"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "FutureBuilder"
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

        if let Some((source, _)) = bound_field(&props, ctx) {
            let child = first_child_or(generator, widget, ctx, indent_level + 2, "Container()");
            return Ok(format!(
                "FutureBuilder<List<dynamic>>(
{ind}  future: {fetch},
{ind}  builder: (context, snapshot) {{
{ind}    if (snapshot.connectionState == ConnectionState.waiting) {{
{ind}      return Center(child: CircularProgressIndicator());
{ind}    }}
{ind}    if (snapshot.hasError) {{
{ind}      return Center(child: Text('Error: ${{snapshot.error}}'));
{ind}    }}
{ind}    if (!snapshot.hasData || snapshot.data!.isEmpty) {{
{ind}      return Center(child: Text('No data available'));
{ind}    }}
{ind}    return {child};
{ind}  }},
{ind})",
                fetch = fetch_call(source),
            ));
        }

        let child = first_child_or(generator, widget, ctx, indent_level + 3, "Container()");
        Ok(format!(
            "FutureBuilder(
{ind}  future: Future.value(true),
{ind}  builder: (context, snapshot) {{
{ind}    if (snapshot.hasData) {{
{ind}      return {child};
{ind}    }}
{ind}    return CircularProgressIndicator();
{ind}  }},
{ind})"
        ))
    }
}

pub struct StreamBuilderHandler;

impl WidgetHandler for StreamBuilderHandler {
    fn name(&self) -> &'static str {
        "stream_builder"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "StreamBuilder"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let child = first_child_or(generator, widget, ctx, indent_level + 2, "Container()");
        Ok(format!(
            "StreamBuilder(
{ind}  stream: Stream.empty(),
{ind}  builder: (context, snapshot) {{
{ind}    return {child};
{ind}  }},
{ind})"
        ))
    }
}

/// PageView and TabBarView: every child is a page
pub struct PagerHandler;

impl WidgetHandler for PagerHandler {
    fn name(&self) -> &'static str {
        "pager"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        matches!(widget_type, "PageView" | "TabBarView")
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let mut code = format!("{}(\n{ind}  children: [\n", widget.widget_type);
        for child in generator.generate_children(widget, ctx, indent_level + 2) {
            code.push_str(&format!("{ind}    {},\n", child));
        }
        code.push_str(&format!("{ind}  ],\n{ind})"));
        Ok(code)
    }
}

pub struct WrapHandler;

impl WidgetHandler for WrapHandler {
    fn name(&self) -> &'static str {
        "wrap"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Wrap"
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
        let mut code = format!(
            "Wrap(\n{ind}  spacing: {},\n{ind}  runSpacing: {},\n{ind}  children: [\n",
            props.text_or("spacing", "8.0"),
            props.text_or("runSpacing", "8.0")
        );
        for child in generator.generate_children(widget, ctx, indent_level + 2) {
            code.push_str(&format!("{ind}    {},\n", child));
        }
        code.push_str(&format!("{ind}  ],\n{ind})"));
        Ok(code)
    }
}

pub struct AspectRatioHandler;

impl WidgetHandler for AspectRatioHandler {
    fn name(&self) -> &'static str {
        "aspect_ratio"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "AspectRatio"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let ratio = Properties::new(widget, ctx.snapshot).text_or("aspectRatio", "1.0");
        let child = first_child_or(generator, widget, ctx, indent_level + 1, "Container()");
        Ok(format!(
            "AspectRatio(\n{ind}  aspectRatio: {ratio},\n{ind}  child: {child},\n{ind})"
        ))
    }
}

pub struct SafeAreaHandler;

impl WidgetHandler for SafeAreaHandler {
    fn name(&self) -> &'static str {
        "safe_area"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "SafeArea"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let child = first_child_or(generator, widget, ctx, indent_level + 1, "Container()");
        Ok(format!("SafeArea(\n{ind}  child: {child},\n{ind})"))
    }
}

/// Nested scaffold; the first child becomes its body
pub struct ScaffoldHandler;

impl WidgetHandler for ScaffoldHandler {
    fn name(&self) -> &'static str {
        "scaffold"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Scaffold"
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
        let mut code = String::from("Scaffold(\n");
        if let Some(bg) = props.truthy("backgroundColor") {
            code.push_str(&format!("{ind}  backgroundColor: {},\n", color_code(&bg)));
        }
        let body = first_child_or(generator, widget, ctx, indent_level + 1, "Container()");
        code.push_str(&format!("{ind}  body: {body},\n{ind})"));
        Ok(code)
    }
}

pub struct TooltipHandler;

impl WidgetHandler for TooltipHandler {
    fn name(&self) -> &'static str {
        "tooltip"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Tooltip"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let message = Properties::new(widget, ctx.snapshot).text_or("message", "Tooltip");
        let child = first_child_or(generator, widget, ctx, indent_level, "Icon(Icons.info_outline)");
        Ok(format!(
            "Tooltip(message: '{}', child: {})",
            escape_dart_string(&message),
            child
        ))
    }
}

pub struct RichTextHandler;

impl WidgetHandler for RichTextHandler {
    fn name(&self) -> &'static str {
        "rich_text"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "RichText"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let text = escape_dart_string(&props.text_or("text", "Text"));
        // RichText does not pick up the ambient text style on its own
        let style = match text_style_args(&props) {
            args if args.is_empty() => "DefaultTextStyle.of(context).style".to_string(),
            args => format!("DefaultTextStyle.of(context).style.merge(TextStyle({}))", args.join(", ")),
        };
        Ok(format!("RichText(text: TextSpan(text: '{}', style: {}))", text, style))
    }
}

/// Chip, or ActionChip when a press handler is bound
pub struct ChipHandler;

impl WidgetHandler for ChipHandler {
    fn name(&self) -> &'static str {
        "chip"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Chip"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let label = props
            .first_truthy(&["label", "text"])
            .unwrap_or_else(|| "Chip".to_string());

        let mut params = vec![format!("label: Text('{}')", escape_dart_string(&label))];
        if props.contains("icon") {
            params.push(format!("avatar: Icon(Icons.{})", icon_name(props.text("icon"), "label")));
        }
        if let Some(bg) = props.truthy("backgroundColor") {
            params.push(format!("backgroundColor: {}", color_code(&bg)));
        }

        if props.contains("onPressed") {
            params.push(format!("onPressed: {}", callback_or_noop(&props, "onPressed", ctx)));
            Ok(format!("ActionChip({})", params.join(", ")))
        } else {
            Ok(format!("Chip({})", params.join(", ")))
        }
    }
}

/// Avatar and CircleAvatar
pub struct AvatarHandler;

impl WidgetHandler for AvatarHandler {
    fn name(&self) -> &'static str {
        "avatar"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        matches!(widget_type, "Avatar" | "CircleAvatar")
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let mut params = vec![format!("radius: {}", props.text_or("radius", "24"))];
        if let Some(bg) = props.truthy("backgroundColor") {
            params.push(format!("backgroundColor: {}", color_code(&bg)));
        }
        match props.first_truthy(&["imageUrl", "url", "src"]) {
            Some(url) => params.push(format!("backgroundImage: NetworkImage('{}')", escape_dart_string(&url))),
            None => {
                let text = props.text_or("text", "A");
                params.push(format!("child: Text('{}')", escape_dart_string(&text)));
            }
        }
        Ok(format!("CircleAvatar({})", params.join(", ")))
    }
}

pub struct BottomSheetHandler;

impl WidgetHandler for BottomSheetHandler {
    fn name(&self) -> &'static str {
        "bottom_sheet"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "BottomSheet"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let child = first_child_or(generator, widget, ctx, indent_level + 1, "Container()");
        Ok(format!(
            "BottomSheet(\n{ind}  onClosing: () {{}},\n{ind}  builder: (context) => {child},\n{ind})"
        ))
    }
}

/// Inline AlertDialog. Children, when present, form the content.
pub struct DialogHandler;

impl WidgetHandler for DialogHandler {
    fn name(&self) -> &'static str {
        "dialog"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Dialog"
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
        let title = escape_dart_string(&props.text_or("title", "Dialog"));
        let fallback = format!("Text('{}')", escape_dart_string(&props.text_or("content", "")));
        let content = first_child_or(generator, widget, ctx, indent_level + 1, &fallback);
        Ok(format!(
            "AlertDialog(
{ind}  title: Text('{title}'),
{ind}  content: {content},
{ind}  actions: [
{ind}    TextButton(
{ind}      onPressed: () => Navigator.pop(context),
{ind}      child: Text('OK'),
{ind}    ),
{ind}  ],
{ind})"
        ))
    }
}

pub struct BadgeHandler;

impl WidgetHandler for BadgeHandler {
    fn name(&self) -> &'static str {
        "badge"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Badge"
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
        if let Some(label) = props.first_truthy(&["label", "text", "count"]) {
            params.push(format!("label: Text('{}')", escape_dart_string(&label)));
        }
        if let Some(bg) = props.truthy("backgroundColor") {
            params.push(format!("backgroundColor: {}", color_code(&bg)));
        }
        let child = first_child_or(generator, widget, ctx, indent_level, "Icon(Icons.notifications)");
        params.push(format!("child: {}", child));
        Ok(format!("Badge({})", params.join(", ")))
    }
}
