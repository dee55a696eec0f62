//! Scrollable collections: lists, grids, list tiles and scroll views
//!
//! ListView and GridView switch to a fetch-backed builder when bound to a
//! data-source field. Nested inside a `SingleChildScrollView` they shrink-wrap
//! and stop scrolling on their own.

use super::style::{icon_name, identifier};
use super::{bound_field, children_of, WidgetGenerator, WidgetHandler};
use crate::actions::callback_or_noop;
use crate::bindings::{display_value, field_lookup, future_list};
use crate::context::GeneratorContext;
use crate::error::Result;
use crate::model::{DataSourceField, Widget};
use crate::properties::Properties;
use crate::snapshot::Snapshot;
use crate::utils::{escape_dart_string, indent};

pub fn handlers() -> Vec<Box<dyn WidgetHandler>> {
    vec![
        Box::new(ListViewHandler),
        Box::new(GridViewHandler),
        Box::new(ListTileHandler),
        Box::new(ScrollViewHandler),
    ]
}

fn inside_scroll_view(snapshot: &Snapshot, widget: &Widget) -> bool {
    snapshot
        .ancestors(widget.id)
        .iter()
        .any(|w| w.widget_type == "SingleChildScrollView")
}

fn scroll_physics(never: bool) -> &'static str {
    if never {
        "NeverScrollableScrollPhysics()"
    } else {
        "AlwaysScrollableScrollPhysics()"
    }
}

fn is_horizontal(props: &Properties<'_>) -> bool {
    props
        .text("scrollDirection")
        .map_or(false, |d| d.trim_start_matches("Axis.") == "horizontal")
}

fn axis(horizontal: bool) -> &'static str {
    if horizontal {
        "Axis.horizontal"
    } else {
        "Axis.vertical"
    }
}

pub struct ListViewHandler;

impl ListViewHandler {
    fn list_item(field: &DataSourceField, horizontal: bool, indent_level: usize) -> String {
        let i = indent(indent_level);
        let width = if horizontal {
            format!("\n{i}  width: 150,")
        } else {
            String::new()
        };
        format!(
            "Container({width}
{i}  margin: EdgeInsets.symmetric(horizontal: 4, vertical: 4),
{i}  child: Card(
{i}    elevation: 2,
{i}    child: InkWell(
{i}      onTap: () {{
{i}        if (item['id'] != null) {{
{i}          Navigator.pushNamed(context, '/detail/${{item['id']}}');
{i}        }}
{i}      }},
{i}      child: Padding(
{i}        padding: EdgeInsets.all(8),
{i}        child: Column(
{i}          crossAxisAlignment: CrossAxisAlignment.start,
{i}          children: [
{i}            if (item['image'] != null)
{i}              Container(
{i}                height: 120,
{i}                width: double.infinity,
{i}                child: Image.network(
{i}                  item['image'].toString(),
{i}                  fit: BoxFit.cover,
{i}                  errorBuilder: (c,e,s) => Icon(Icons.image),
{i}                ),
{i}              ),
{i}            Text(
{i}              {value},
{i}              style: TextStyle(fontWeight: FontWeight.bold),
{i}            ),
{i}          ],
{i}        ),
{i}      ),
{i}    ),
{i}  ),
{i})",
            value = display_value("item", field),
        )
    }
}

impl WidgetHandler for ListViewHandler {
    fn name(&self) -> &'static str {
        "list_view"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "ListView"
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
        let horizontal = is_horizontal(&props);
        let physics = scroll_physics(!horizontal && inside_scroll_view(ctx.snapshot, widget));

        if let Some((source, field)) = bound_field(&props, ctx) {
            let p = indent(indent_level + 2);
            let builder = format!(
                "ListView.builder(
{p}  scrollDirection: {axis},
{p}  shrinkWrap: {shrink},
{p}  physics: {physics},
{p}  primary: false,
{p}  itemCount: items.length,
{p}  itemBuilder: (context, index) {{
{p}    final item = items[index];
{p}    return {item};
{p}  }},
{p})",
                axis = axis(horizontal),
                shrink = !horizontal,
                item = Self::list_item(field, horizontal, indent_level + 4),
            );
            let code = future_list(source, "items", "No items available", &builder, &ind);
            return Ok(if horizontal {
                let height = props.truthy("height").unwrap_or_else(|| "250".to_string());
                format!("Container(height: {}, child: {})", height, code)
            } else {
                code
            });
        }

        let mut code = format!(
            "ListView(
{ind}  scrollDirection: {axis},
{ind}  shrinkWrap: {shrink},
{ind}  physics: {physics},
{ind}  primary: false,
{ind}  children: [
",
            axis = axis(horizontal),
            shrink = !horizontal,
        );
        for child in generator.generate_children(widget, ctx, indent_level + 2) {
            code.push_str(&format!("{ind}    {},\n", child));
        }
        code.push_str(&format!("{ind}  ],\n{ind})"));
        Ok(code)
    }
}

pub struct GridViewHandler;

impl GridViewHandler {
    fn grid_item(field: &DataSourceField, indent_level: usize) -> String {
        let i = indent(indent_level);
        if field.field_type == "image_url" {
            format!(
                "Card(
{i}  child: Image.network(
{i}    ({lookup} ?? '').toString(),
{i}    fit: BoxFit.cover,
{i}    errorBuilder: (c,e,s) => Icon(Icons.image),
{i}  ),
{i})",
                lookup = field_lookup("item", field),
            )
        } else {
            format!(
                "Card(
{i}  child: Center(
{i}    child: Padding(
{i}      padding: EdgeInsets.all(8),
{i}      child: Text(
{i}        {value},
{i}        textAlign: TextAlign.center,
{i}      ),
{i}    ),
{i}  ),
{i})",
                value = display_value("item", field),
            )
        }
    }
}

impl WidgetHandler for GridViewHandler {
    fn name(&self) -> &'static str {
        "grid_view"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "GridView"
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
        let columns = props.truthy("crossAxisCount").unwrap_or_else(|| "2".to_string());
        let aspect_ratio = props.truthy("childAspectRatio").unwrap_or_else(|| "1.0".to_string());
        let nested = inside_scroll_view(ctx.snapshot, widget);
        let physics = scroll_physics(nested);

        if let Some((source, field)) = bound_field(&props, ctx) {
            let p = indent(indent_level + 2);
            let item_count = match props.truthy("itemLimit") {
                Some(limit) => format!("data.length > {0} ? {0} : data.length", limit),
                None => "data.length".to_string(),
            };
            let builder = format!(
                "GridView.builder(
{p}  scrollDirection: {axis},
{p}  shrinkWrap: {nested},
{p}  physics: {physics},
{p}  gridDelegate: SliverGridDelegateWithFixedCrossAxisCount(
{p}    crossAxisCount: {columns},
{p}    crossAxisSpacing: 8,
{p}    mainAxisSpacing: 8,
{p}    childAspectRatio: {aspect_ratio},
{p}  ),
{p}  itemCount: {item_count},
{p}  itemBuilder: (context, index) {{
{p}    final item = data[index];
{p}    return {item};
{p}  }},
{p})",
                axis = axis(is_horizontal(&props)),
                item = Self::grid_item(field, indent_level + 4),
            );
            let code = future_list(source, "data", "No items", &builder, &ind);
            return Ok(match props.truthy("height") {
                Some(height) => format!("Container(height: {}, child: {})", height, code),
                None => code,
            });
        }

        let mut code = format!(
            "GridView.count(
{ind}  crossAxisCount: {columns},
{ind}  shrinkWrap: {nested},
{ind}  physics: {physics},
{ind}  childAspectRatio: {aspect_ratio},
{ind}  children: [
"
        );
        for child in generator.generate_children(widget, ctx, indent_level + 2) {
            code.push_str(&format!("{ind}    {},\n", child));
        }
        code.push_str(&format!("{ind}  ],\n{ind})"));
        Ok(code)
    }
}

pub struct ListTileHandler;

impl WidgetHandler for ListTileHandler {
    fn name(&self) -> &'static str {
        "list_tile"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "ListTile"
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
            "ListTile(\n{ind}  title: Text('{}'),",
            escape_dart_string(&props.text_or("title", "Title"))
        );
        if let Some(subtitle) = props.text("subtitle") {
            code.push_str(&format!("\n{ind}  subtitle: Text('{}'),", escape_dart_string(&subtitle)));
        }
        if props.contains("leading") {
            code.push_str(&format!("\n{ind}  leading: Icon(Icons.{}),", icon_name(props.text("leading"), "info")));
        }
        if props.contains("trailing") {
            code.push_str(&format!(
                "\n{ind}  trailing: Icon(Icons.{}),",
                icon_name(props.text("trailing"), "arrow_forward")
            ));
        }
        if props.contains("onTap") {
            code.push_str(&format!("\n{ind}  onTap: {},", callback_or_noop(&props, "onTap", ctx)));
        }
        code.push_str(&format!("\n{ind})"));
        Ok(code)
    }
}

pub struct ScrollViewHandler;

impl WidgetHandler for ScrollViewHandler {
    fn name(&self) -> &'static str {
        "scroll_view"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "SingleChildScrollView"
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
        let physics = props
            .text("physics")
            .map(|p| p.trim_end_matches("()").to_string())
            .unwrap_or_else(|| "AlwaysScrollableScrollPhysics".to_string());

        let mut code = format!(
            "SingleChildScrollView(\n{ind}  scrollDirection: {},\n{ind}  physics: {}(),\n{ind}  child: ",
            axis(is_horizontal(&props)),
            identifier(&physics, "AlwaysScrollableScrollPhysics")
        );

        let children = children_of(ctx, widget);
        match children.as_slice() {
            [] => code.push_str("Container()"),
            [only] => code.push_str(&generator.generate_widget(only, ctx, indent_level + 1)),
            many => {
                code.push_str(&format!("Column(\n{ind}    mainAxisSize: MainAxisSize.min,\n{ind}    children: [\n"));
                for child in many {
                    let rendered = generator.generate_widget(child, ctx, indent_level + 3);
                    code.push_str(&format!("{ind}      {},\n", rendered));
                }
                code.push_str(&format!("{ind}    ],\n{ind}  )"));
            }
        }
        code.push_str(&format!(",\n{ind})"));
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::*;

    const NEWS: &str = r#""data_sources": [{"id": 1, "name": "News", "fields": [
        {"id": 10, "field_name": "headline"},
        {"id": 11, "field_name": "thumbnail", "field_type": "image_url"}
    ]}]"#;

    fn bound(field: u64) -> String {
        format!(
            r#"{{"property_name": "dataSource", "property_type": "data_source_field_reference", "data_source_field_reference": {}}}"#,
            field
        )
    }

    fn render(snapshot: &Snapshot, id: u64) -> (String, Vec<String>) {
        let generator = WidgetGenerator::new();
        let mut ctx = GeneratorContext::new(snapshot);
        let code = generator.generate_widget(snapshot.widget(id).unwrap(), &mut ctx, 0);
        (code, ctx.into_diagnostics().0)
    }

    #[test]
    fn test_bound_list_view() {
        let s = screen_with_extras(
            &format!(r#"{{"id": 1, "widget_type": "ListView", "properties": [{}]}}"#, bound(10)),
            NEWS,
        );
        let (code, warnings) = render(&s, 1);
        assert!(code.starts_with("FutureBuilder<List<dynamic>>("));
        assert!(code.contains("future: _apiService.fetchData('News'),"));
        assert!(code.contains("Text('No items available')"));
        assert!(code.contains("scrollDirection: Axis.vertical,"));
        assert!(code.contains("shrinkWrap: true,"));
        assert!(code.contains("physics: AlwaysScrollableScrollPhysics(),"));
        assert!(code.contains("displayValue(item, 'headline')"));
        assert!(code.contains("Navigator.pushNamed(context, '/detail/${item['id']}');"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_horizontal_list_gets_height() {
        let s = screen_with_extras(
            &format!(
                r#"{{"id": 1, "widget_type": "ListView", "properties": [{}, {}]}}"#,
                bound(10),
                text_prop("scrollDirection", "horizontal")
            ),
            NEWS,
        );
        let (code, _) = render(&s, 1);
        assert!(code.starts_with("Container(height: 250, child: FutureBuilder"));
        assert!(code.contains("width: 150,"));
        assert!(code.contains("shrinkWrap: false,"));
    }

    #[test]
    fn test_nested_static_list_stops_scrolling() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "SingleChildScrollView"},
               {"id": 2, "widget_type": "Column", "parent": 1},
               {"id": 3, "widget_type": "ListView", "parent": 2},
               {"id": 4, "widget_type": "Text", "parent": 3}"#,
        );
        let (code, _) = render(&s, 3);
        assert!(code.contains("physics: NeverScrollableScrollPhysics(),"));
        assert!(code.contains("    Text('Text'),\n"));
    }

    #[test]
    fn test_missing_field_falls_back_with_warning() {
        let s = screen_with_extras(
            &format!(r#"{{"id": 1, "widget_type": "ListView", "properties": [{}]}}"#, bound(99)),
            NEWS,
        );
        let (code, warnings) = render(&s, 1);
        assert!(code.starts_with("ListView("));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_grid_views() {
        let s = screen_with_extras(
            &format!(
                r#"{{"id": 1, "widget_type": "GridView", "properties": [{}, {}]}},
                   {{"id": 2, "widget_type": "GridView"}},
                   {{"id": 3, "widget_type": "Icon", "parent": 2}}"#,
                bound(11),
                text_prop("itemLimit", "6")
            ),
            NEWS,
        );
        let (dynamic, _) = render(&s, 1);
        assert!(dynamic.contains("final data = snapshot.data ?? [];"));
        assert!(dynamic.contains("Text('No items')"));
        assert!(dynamic.contains("itemCount: data.length > 6 ? 6 : data.length,"));
        assert!(dynamic.contains("(item['thumbnail'] ?? '').toString(),"));

        let (fixed, _) = render(&s, 2);
        assert!(fixed.starts_with("GridView.count(\n  crossAxisCount: 2,\n  shrinkWrap: false,"));
        assert!(fixed.contains("    Icon(Icons.info),\n"));
    }

    #[test]
    fn test_list_tile() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "ListTile", "properties": [{}, {}, {}]}}"#,
            text_prop("title", "Inbox"),
            text_prop("leading", "mail"),
            r#"{"property_name": "onTap", "property_type": "screen_reference", "screen_reference": 1}"#,
        ));
        let (code, _) = render(&s, 1);
        assert_eq!(
            code,
            "ListTile(\n  title: Text('Inbox'),\n  leading: Icon(Icons.mail),\n  onTap: () { Navigator.pushNamed(context, '/home'); },\n)"
        );
    }

    #[test]
    fn test_scroll_view_wraps_many_children() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "SingleChildScrollView"},
               {"id": 2, "widget_type": "Text", "parent": 1},
               {"id": 3, "widget_type": "Divider", "parent": 1}"#,
        );
        let (code, _) = render(&s, 1);
        assert_eq!(
            code,
            "SingleChildScrollView(\n  scrollDirection: Axis.vertical,\n  physics: AlwaysScrollableScrollPhysics(),\n  child: Column(\n    mainAxisSize: MainAxisSize.min,\n    children: [\n      Text('Text'),\n      Divider(),\n    ],\n  ),\n)"
        );
    }
}
