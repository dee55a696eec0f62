//! Third-party pub.dev widgets
//!
//! `Custom_<package>` tags, and bare package names, go to a package-specific
//! renderer when one is known. Anything else falls back to a generic call
//! whose named parameters mirror the widget's properties.

use super::style::identifier;
use super::{children_of, WidgetGenerator, WidgetHandler};
use crate::actions::{navigate_to, resolve_action, resolve_property, ActionCode};
use crate::context::GeneratorContext;
use crate::error::{GeneratorError, Result};
use crate::model::{PropertyValue, Widget};
use crate::properties::Properties;
use crate::utils::{color_code, color_expression, escape_dart_string, indent};

const CUSTOM_PREFIX: &str = "Custom_";

pub struct CustomWidgetHandler {
    packages: Vec<(&'static str, Box<dyn WidgetHandler>)>,
}

impl Default for CustomWidgetHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomWidgetHandler {
    pub fn new() -> Self {
        let packages: Vec<(&'static str, Box<dyn WidgetHandler>)> = vec![
            ("carousel_slider", Box::new(CarouselHandler)),
            ("flutter_rating_bar", Box::new(RatingBarHandler)),
            ("shimmer", Box::new(ShimmerHandler)),
            ("cached_network_image", Box::new(CachedImageHandler)),
            ("lottie", Box::new(LottieHandler)),
            ("charts_flutter", Box::new(ChartHandler)),
            ("qr_flutter", Box::new(QrHandler)),
            ("flutter_spinkit", Box::new(SpinKitHandler)),
            ("flutter_svg", Box::new(SvgHandler)),
            ("video_player", Box::new(VideoPlayerHandler)),
        ];
        Self { packages }
    }

    fn package_of(widget_type: &str) -> String {
        widget_type
            .strip_prefix(CUSTOM_PREFIX)
            .unwrap_or(widget_type)
            .to_lowercase()
    }

    fn package_handler(&self, package: &str) -> Option<&dyn WidgetHandler> {
        self.packages
            .iter()
            .find(|(name, _)| *name == package)
            .map(|(_, handler)| handler.as_ref())
    }

    /// Generic call: every property becomes a named argument, children fill
    /// the `child`/`children` slot unless `childrenParam` names another one.
    fn generic(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> String {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);
        let class = Self::class_name(widget, ctx);

        let mut args = Vec::new();
        for (name, value) in props.entries() {
            if name == "childrenParam" {
                continue;
            }
            if let Some(formatted) = format_argument(value, ctx) {
                args.push(format!("{}: {}", identifier(name, "value"), formatted));
            }
        }

        let children = children_of(ctx, widget);
        if !children.is_empty() {
            let default_slot = if children.len() > 1 { "children" } else { "child" };
            let slot = props
                .text("childrenParam")
                .unwrap_or_else(|| default_slot.to_string());
            let slot = identifier(&slot, "child");
            if slot == "children" || slot == "items" {
                let mut list = format!("{}: [\n", slot);
                for child in &children {
                    let rendered = generator.generate_widget(child, ctx, indent_level + 2);
                    list.push_str(&format!("{ind}    {},\n", rendered));
                }
                list.push_str(&format!("{ind}  ]"));
                args.push(list);
            } else if children.len() > 1 {
                let mut column = format!("{}: Column(\n{ind}    children: [\n", slot);
                for child in &children {
                    let rendered = generator.generate_widget(child, ctx, indent_level + 3);
                    column.push_str(&format!("{ind}      {},\n", rendered));
                }
                column.push_str(&format!("{ind}    ],\n{ind}  )"));
                args.push(column);
            } else {
                let rendered = generator.generate_widget(children[0], ctx, indent_level + 1);
                args.push(format!("{}: {}", slot, rendered));
            }
        }

        if args.is_empty() {
            format!("{}()", class)
        } else {
            format!(
                "{}(\n{ind}  {},\n{ind})",
                class,
                args.join(&format!(",\n{ind}  "))
            )
        }
    }

    /// Registered class name for the package, else the tag itself
    fn class_name(widget: &Widget, ctx: &GeneratorContext<'_>) -> String {
        let bare = widget
            .widget_type
            .strip_prefix(CUSTOM_PREFIX)
            .unwrap_or(&widget.widget_type);
        ctx.snapshot
            .application()
            .custom_widgets
            .iter()
            .filter(|w| w.is_active && !w.widget_class_name.is_empty())
            .find(|w| w.package_name.eq_ignore_ascii_case(bare))
            .map(|w| identifier(&w.widget_class_name, "Container"))
            .unwrap_or_else(|| identifier(bare, "Container"))
    }
}

impl WidgetHandler for CustomWidgetHandler {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.starts_with(CUSTOM_PREFIX) || self.package_handler(widget_type).is_some()
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let package = Self::package_of(&widget.widget_type);
        if package.trim().is_empty() {
            return Err(GeneratorError::handler(
                &widget.widget_type,
                widget.id,
                "custom widget tag names no package",
            ));
        }
        match self.package_handler(&package) {
            Some(handler) => handler.generate(widget, generator, ctx, indent_level),
            None => Ok(self.generic(widget, generator, ctx, indent_level)),
        }
    }
}

fn format_argument(value: &PropertyValue, ctx: &GeneratorContext<'_>) -> Option<String> {
    match value {
        PropertyValue::Text(s) if s.starts_with("Icons.") || s.starts_with("Colors.") => Some(s.clone()),
        PropertyValue::Text(s) | PropertyValue::Url(s) => Some(format!("'{}'", escape_dart_string(s))),
        PropertyValue::Color(c) => Some(color_code(c)),
        PropertyValue::Alignment(a) => Some(format!("Alignment.{}", identifier(a, "center"))),
        PropertyValue::Json(serde_json::Value::String(s)) => Some(format!("'{}'", escape_dart_string(s))),
        PropertyValue::Json(v) => Some(format!("'{}'", escape_dart_string(&v.to_string()))),
        PropertyValue::Action(id) => Some(
            ctx.snapshot
                .action(*id)
                .map_or_else(ActionCode::noop, |action| resolve_action(action, ctx))
                .callback(),
        ),
        PropertyValue::Screen(id) => Some(
            ctx.snapshot
                .screen(*id)
                .map_or_else(ActionCode::noop, |screen| navigate_to(&screen.route_name))
                .callback(),
        ),
        PropertyValue::DataField(_) | PropertyValue::Unset => None,
        other => other.display(),
    }
}

pub struct CarouselHandler;

impl WidgetHandler for CarouselHandler {
    fn name(&self) -> &'static str {
        "carousel_slider"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("carousel")
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
            "CarouselSlider(
{ind}  options: CarouselOptions(
{ind}    height: {height},
{ind}    autoPlay: {auto_play},
{ind}    enlargeCenterPage: {enlarge},
{ind}    autoPlayInterval: Duration(seconds: 3),
{ind}    autoPlayAnimationDuration: Duration(milliseconds: 800),
{ind}  ),
{ind}  items: [\n",
            height = props.text_or("height", "200"),
            auto_play = props.flag("autoPlay", true),
            enlarge = props.flag("enlargeCenterPage", true),
        );
        let slides = generator.generate_children(widget, ctx, indent_level + 2);
        if slides.is_empty() {
            code.push_str(&format!("{ind}    // TODO: Add slides here\n"));
        }
        for slide in slides {
            code.push_str(&format!("{ind}    {},\n", slide));
        }
        code.push_str(&format!("{ind}  ],\n{ind})"));
        Ok(code)
    }
}

pub struct RatingBarHandler;

impl WidgetHandler for RatingBarHandler {
    fn name(&self) -> &'static str {
        "flutter_rating_bar"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("rating")
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
        let on_update = resolve_property(&props, "onRatingUpdate", ctx)
            .unwrap_or_else(ActionCode::noop)
            .callback_with("rating");
        Ok(format!(
            "RatingBar.builder(
{ind}  initialRating: {initial},
{ind}  minRating: {min},
{ind}  allowHalfRating: {half},
{ind}  itemCount: {count},
{ind}  itemBuilder: (context, _) => Icon(
{ind}    Icons.star,
{ind}    color: Colors.amber,
{ind}  ),
{ind}  onRatingUpdate: {on_update},
{ind})",
            initial = props.text_or("initialRating", "3.0"),
            min = props.text_or("minRating", "1"),
            half = props.flag("allowHalfRating", true),
            count = props.text_or("itemCount", "5"),
        ))
    }
}

pub struct ShimmerHandler;

impl WidgetHandler for ShimmerHandler {
    fn name(&self) -> &'static str {
        "shimmer"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("shimmer")
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
        let base = props
            .truthy("baseColor")
            .map_or_else(|| "Colors.grey[300]!".to_string(), |c| color_expression(&c));
        let highlight = props
            .truthy("highlightColor")
            .map_or_else(|| "Colors.grey[100]!".to_string(), |c| color_expression(&c));
        let child = generator
            .generate_first_child(widget, ctx, indent_level + 1)
            .unwrap_or_else(|| {
                format!(
                    "Container(\n{ind}    width: double.infinity,\n{ind}    height: 100,\n{ind}    color: Colors.white,\n{ind}  )"
                )
            });
        Ok(format!(
            "Shimmer.fromColors(\n{ind}  baseColor: {base},\n{ind}  highlightColor: {highlight},\n{ind}  child: {child},\n{ind})"
        ))
    }
}

pub struct CachedImageHandler;

impl WidgetHandler for CachedImageHandler {
    fn name(&self) -> &'static str {
        "cached_network_image"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().replace('_', "").contains("cachednetworkimage")
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let url = Properties::new(widget, ctx.snapshot).text_or("imageUrl", "");
        Ok(format!(
            "CachedNetworkImage(
{ind}  imageUrl: '{url}',
{ind}  placeholder: (context, url) => CircularProgressIndicator(),
{ind}  errorWidget: (context, url, error) => Icon(Icons.error),
{ind}  fit: BoxFit.cover,
{ind})",
            url = escape_dart_string(&url),
        ))
    }
}

pub struct LottieHandler;

impl WidgetHandler for LottieHandler {
    fn name(&self) -> &'static str {
        "lottie"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("lottie")
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
        let asset = props.text_or("asset", "assets/animations/loading.json");
        Ok(format!(
            "Lottie.asset(\n{ind}  '{asset}',\n{ind}  repeat: {repeat},\n{ind}  animate: {animate},\n{ind})",
            asset = escape_dart_string(&asset),
            repeat = props.flag("repeat", true),
            animate = props.flag("animate", true),
        ))
    }
}

/// charts_flutter bar, line and pie charts over a small inline series
pub struct ChartHandler;

impl WidgetHandler for ChartHandler {
    fn name(&self) -> &'static str {
        "charts_flutter"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("chart")
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
        let animate = props.flag("animate", true);

        let (chart, domain, data) = match props.text_or("chartType", "bar").as_str() {
            "bar" => ("BarChart", "String", "const [MapEntry('A', 5), MapEntry('B', 25), MapEntry('C', 100)]"),
            "pie" => ("PieChart<String>", "String", "const [MapEntry('A', 5), MapEntry('B', 25), MapEntry('C', 100)]"),
            "line" => ("LineChart", "int", "const [MapEntry(0, 5), MapEntry(1, 25), MapEntry(2, 100)]"),
            _ => return Ok("Container(child: Text('Unsupported chart type'))".to_string()),
        };
        Ok(format!(
            "charts.{chart}(
{ind}  [
{ind}    charts.Series<MapEntry<{domain}, int>, {domain}>(
{ind}      id: 'Sample',
{ind}      domainFn: (entry, _) => entry.key,
{ind}      measureFn: (entry, _) => entry.value,
{ind}      data: {data},
{ind}    ),
{ind}  ],
{ind}  animate: {animate},
{ind})"
        ))
    }
}

pub struct QrHandler;

impl WidgetHandler for QrHandler {
    fn name(&self) -> &'static str {
        "qr_flutter"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("qr")
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
        Ok(format!(
            "QrImageView(\n{ind}  data: '{data}',\n{ind}  version: QrVersions.auto,\n{ind}  size: {size},\n{ind})",
            data = escape_dart_string(&props.text_or("data", "https://example.com")),
            size = props.text_or("size", "200"),
        ))
    }
}

pub struct SpinKitHandler;

impl WidgetHandler for SpinKitHandler {
    fn name(&self) -> &'static str {
        "flutter_spinkit"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("spinkit")
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
        let kind = identifier(&props.text_or("type", "FadingCircle"), "FadingCircle");
        let color = props
            .truthy("color")
            .map_or_else(|| "Theme.of(context).primaryColor".to_string(), |c| color_expression(&c));
        Ok(format!(
            "SpinKit{kind}(\n{ind}  color: {color},\n{ind}  size: {size},\n{ind})",
            size = props.text_or("size", "50.0"),
        ))
    }
}

pub struct SvgHandler;

impl WidgetHandler for SvgHandler {
    fn name(&self) -> &'static str {
        "flutter_svg"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("svg")
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
        let mut code = format!(
            "SvgPicture.asset(\n{ind}  '{}'",
            escape_dart_string(&props.text_or("asset", ""))
        );
        for key in ["width", "height"] {
            if let Some(value) = props.truthy(key) {
                code.push_str(&format!(",\n{ind}  {}: {}", key, value));
            }
        }
        code.push_str(&format!(",\n{ind})"));
        Ok(code)
    }
}

pub struct VideoPlayerHandler;

impl WidgetHandler for VideoPlayerHandler {
    fn name(&self) -> &'static str {
        "video_player"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type.to_lowercase().contains("video")
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
        Ok(format!(
            "AspectRatio(
{ind}  aspectRatio: {ratio},
{ind}  child: VideoPlayer(VideoPlayerController.networkUrl(Uri.parse('{url}'))),
{ind})",
            ratio = props.text_or("aspectRatio", "16 / 9"),
            url = escape_dart_string(&props.text_or("url", "")),
        ))
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
    fn test_package_dispatch() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "Custom_Shimmer"},
               {"id": 2, "widget_type": "lottie"},
               {"id": 3, "widget_type": "Custom_qr_flutter"}"#,
        );
        assert!(render(&s, 1).starts_with("Shimmer.fromColors(\n  baseColor: Colors.grey[300]!,"));
        assert!(render(&s, 2).starts_with("Lottie.asset(\n  'assets/animations/loading.json',"));
        assert!(render(&s, 3).contains("data: 'https://example.com',"));
    }

    #[test]
    fn test_generic_mapping_and_children_param() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Custom_FancyPanel", "properties": [{}, {}, {}, {}]}},
               {{"id": 2, "widget_type": "Text", "parent": 1}}"#,
            text_prop("title", "Hi"),
            text_prop("icon", "Icons.star"),
            r#"{"property_name": "expanded", "property_type": "boolean", "boolean_value": true}"#,
            text_prop("childrenParam", "body"),
        ));
        assert_eq!(
            render(&s, 1),
            "FancyPanel(\n  title: 'Hi',\n  icon: Icons.star,\n  expanded: true,\n  body: Text('Text'),\n)"
        );
    }

    #[test]
    fn test_generic_children_list() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "Custom_Masonry"},
               {"id": 2, "widget_type": "Text", "parent": 1},
               {"id": 3, "widget_type": "Divider", "parent": 1}"#,
        );
        assert_eq!(
            render(&s, 1),
            "Masonry(\n  children: [\n    Text('Text'),\n    Divider(),\n  ],\n)"
        );
    }

    #[test]
    fn test_tag_without_package_is_an_error() {
        let s = screen_with(r#"{"id": 1, "widget_type": "Custom_"}"#);
        let generator = WidgetGenerator::new();
        let mut ctx = GeneratorContext::new(&s);
        let code = generator.generate_widget(s.widget(1).unwrap(), &mut ctx, 0);
        assert_eq!(code, "Container(child: Text('Error generating: Custom_'))");
        assert_eq!(ctx.errors().len(), 1);
        assert!(ctx.errors()[0].contains("custom widget tag names no package"));
    }

    #[test]
    fn test_singular_slot_wraps_several_children() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Custom_Sheet", "properties": [{}]}},
               {{"id": 2, "widget_type": "Text", "parent": 1, "order": 0}},
               {{"id": 3, "widget_type": "Divider", "parent": 1, "order": 1}}"#,
            text_prop("childrenParam", "body"),
        ));
        assert_eq!(
            render(&s, 1),
            "Sheet(\n  body: Column(\n    children: [\n      Text('Text'),\n      Divider(),\n    ],\n  ),\n)"
        );
    }

    #[test]
    fn test_registered_class_name_is_sanitized() {
        let s = screen_with_extras(
            r#"{"id": 1, "widget_type": "Custom_glass_kit"}"#,
            r#""custom_widgets": [{"package_name": "glass_kit", "widget_class_name": "Glass Container();"}]"#,
        );
        assert_eq!(render(&s, 1), "GlassContainer()");
    }

    #[test]
    fn test_registered_class_name_wins() {
        let s = screen_with_extras(
            r#"{"id": 1, "widget_type": "Custom_glass_kit"}"#,
            r#""custom_widgets": [{"package_name": "glass_kit", "widget_class_name": "GlassContainer"}]"#,
        );
        assert_eq!(render(&s, 1), "GlassContainer()");
    }

    #[test]
    fn test_unknown_chart_type() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "Custom_charts_flutter", "properties": [{}]}}"#,
            text_prop("chartType", "radar"),
        ));
        assert_eq!(render(&s, 1), "Container(child: Text('Unsupported chart type'))");
    }
}
