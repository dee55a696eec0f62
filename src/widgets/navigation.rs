//! Navigation containers
//!
//! Bottom bars, drawers and tab strips describe their entries as child
//! widgets. Each child carries its own `icon`, `label`/`text` and `onTap`.

use super::style::icon_name;
use super::{children_of, WidgetGenerator, WidgetHandler};
use crate::actions::{resolve_property, ActionCode};
use crate::context::GeneratorContext;
use crate::error::Result;
use crate::model::Widget;
use crate::properties::Properties;
use crate::utils::{color_code, escape_dart_string, indent};

pub fn handlers() -> Vec<Box<dyn WidgetHandler>> {
    vec![
        Box::new(BottomNavigationHandler),
        Box::new(AppBarHandler),
        Box::new(DrawerHandler),
        Box::new(TabBarHandler),
    ]
}

pub struct BottomNavigationHandler;

impl WidgetHandler for BottomNavigationHandler {
    fn name(&self) -> &'static str {
        "bottom_navigation"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "BottomNavigationBar"
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

        let mut items = Vec::new();
        let mut actions = Vec::new();
        for (i, child) in children_of(ctx, widget).into_iter().enumerate() {
            let child_props = Properties::new(child, ctx.snapshot);
            let icon = icon_name(child_props.text("icon"), "home");
            let label = child_props
                .text("label")
                .unwrap_or_else(|| format!("Item {}", i + 1));
            items.push((icon, escape_dart_string(&label)));
            actions.push(resolve_property(&child_props, "onTap", ctx).unwrap_or_else(ActionCode::noop));
        }

        let is_async = actions.iter().any(ActionCode::is_async);
        let selected = props
            .truthy("selectedItemColor")
            .map_or_else(|| "Theme.of(context).primaryColor".to_string(), |c| color_code(&c));

        let mut code = format!(
            "BottomNavigationBar(
{ind}  type: BottomNavigationBarType.fixed,
{ind}  currentIndex: _selectedIndex,
{ind}  selectedItemColor: {selected},
{ind}  unselectedItemColor: Colors.grey,
{ind}  onTap: (index) {async_kw}{{
{ind}    setState(() {{
{ind}      _selectedIndex = index;
{ind}    }});
{ind}    switch (index) {{",
            async_kw = if is_async { "async " } else { "" },
        );
        for (i, action) in actions.iter().enumerate() {
            let statement = if action.is_noop() {
                "// No action configured"
            } else {
                action.statements()
            };
            code.push_str(&format!(
                "\n{ind}      case {i}:\n{ind}        {statement}\n{ind}        break;"
            ));
        }
        code.push_str(&format!("\n{ind}    }}\n{ind}  }},\n{ind}  items: ["));
        for (icon, label) in &items {
            code.push_str(&format!(
                "\n{ind}    BottomNavigationBarItem(\n{ind}      icon: Icon(Icons.{icon}),\n{ind}      label: '{label}',\n{ind}    ),"
            ));
        }
        code.push_str(&format!("\n{ind}  ],\n{ind})"));
        Ok(code)
    }
}

pub struct AppBarHandler;

impl WidgetHandler for AppBarHandler {
    fn name(&self) -> &'static str {
        "app_bar"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "AppBar"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let mut params = vec![format!(
            "title: Text('{}')",
            escape_dart_string(&props.text_or("title", "App"))
        )];
        if let Some(bg) = props.truthy("backgroundColor") {
            params.push(format!("backgroundColor: {}", color_code(&bg)));
        }
        if props.get("centerTitle").is_some() {
            params.push(format!("centerTitle: {}", props.flag("centerTitle", false)));
        }
        if let Some(elevation) = props.text("elevation") {
            params.push(format!("elevation: {}", elevation));
        }
        Ok(format!("AppBar({})", params.join(", ")))
    }
}

pub struct DrawerHandler;

impl WidgetHandler for DrawerHandler {
    fn name(&self) -> &'static str {
        "drawer"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Drawer"
    }

    fn generate(
        &self,
        widget: &Widget,
        generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let mut code = format!("Drawer(\n{ind}  child: ");

        let children = children_of(ctx, widget);
        match children.as_slice() {
            [] => code.push_str("Container()"),
            [only] => code.push_str(&generator.generate_widget(only, ctx, indent_level + 1)),
            many => {
                code.push_str(&format!("ListView(\n{ind}    padding: EdgeInsets.zero,\n{ind}    children: ["));
                for child in many {
                    let rendered = generator.generate_widget(child, ctx, indent_level + 3);
                    code.push_str(&format!("\n{ind}      {},", rendered));
                }
                code.push_str(&format!("\n{ind}    ],\n{ind}  )"));
            }
        }
        code.push_str(&format!(",\n{ind})"));
        Ok(code)
    }
}

pub struct TabBarHandler;

impl WidgetHandler for TabBarHandler {
    fn name(&self) -> &'static str {
        "tab_bar"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "TabBar"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let mut tabs: Vec<String> = children_of(ctx, widget)
            .into_iter()
            .map(|child| Properties::new(child, ctx.snapshot).text_or("text", "Tab"))
            .collect();
        if tabs.is_empty() {
            tabs = vec!["Tab 1".to_string(), "Tab 2".to_string()];
        }

        let mut code = format!("TabBar(\n{ind}  tabs: [");
        for tab in &tabs {
            code.push_str(&format!("\n{ind}    Tab(text: '{}'),", escape_dart_string(tab)));
        }
        code.push_str(&format!("\n{ind}  ],\n{ind})"));
        Ok(code)
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
    fn test_bottom_navigation_switch() {
        let s = screen_with_extras(
            &format!(
                r#"{{"id": 1, "widget_type": "BottomNavigationBar"}},
                   {{"id": 2, "widget_type": "Icon", "parent": 1, "order": 0, "properties": [{}, {},
                       {{"property_name": "onTap", "property_type": "screen_reference", "screen_reference": 1}}]}},
                   {{"id": 3, "widget_type": "Icon", "parent": 1, "order": 1}}"#,
                text_prop("icon", "home"),
                text_prop("label", "Home"),
            ),
            r#""data_sources": []"#,
        );
        let code = render(&s, 1);
        assert!(code.contains("onTap: (index) {\n"));
        assert!(code.contains("      case 0:\n        Navigator.pushNamed(context, '/home');\n        break;"));
        assert!(code.contains("      case 1:\n        // No action configured\n        break;"));
        assert!(code.contains("label: 'Home',"));
        assert!(code.contains("label: 'Item 2',"));
    }

    #[test]
    fn test_async_entry_makes_on_tap_async() {
        let s = screen_with_extras(
            r#"{"id": 1, "widget_type": "BottomNavigationBar"},
               {"id": 2, "widget_type": "Icon", "parent": 1, "properties": [
                   {"property_name": "onTap", "property_type": "action_reference", "action_reference": 4}
               ]}"#,
            r#""data_sources": [{"id": 3, "name": "feed"}],
               "actions": [{"id": 4, "name": "Refresh", "action_type": "api_call", "api_data_source": 3}]"#,
        );
        let code = render(&s, 1);
        assert!(code.contains("onTap: (index) async {"));
        assert!(code.contains("await _apiService.fetchFeed();"));
    }

    #[test]
    fn test_app_bar() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "AppBar", "properties": [{}, {}]}}"#,
            text_prop("title", "Settings"),
            text_prop("backgroundColor", "#123456"),
        ));
        assert_eq!(
            render(&s, 1),
            "AppBar(title: Text('Settings'), backgroundColor: Color(0xFF123456))"
        );
    }

    #[test]
    fn test_drawer_with_many_children_uses_list_view() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "Drawer"},
               {"id": 2, "widget_type": "Text", "parent": 1},
               {"id": 3, "widget_type": "Divider", "parent": 1},
               {"id": 4, "widget_type": "Drawer"}"#,
        );
        assert_eq!(
            render(&s, 1),
            "Drawer(\n  child: ListView(\n    padding: EdgeInsets.zero,\n    children: [\n      Text('Text'),\n      Divider(),\n    ],\n  ),\n)"
        );
        assert_eq!(render(&s, 4), "Drawer(\n  child: Container(),\n)");
    }

    #[test]
    fn test_tab_bar_defaults() {
        let s = screen_with(r#"{"id": 1, "widget_type": "TabBar"}"#);
        assert_eq!(
            render(&s, 1),
            "TabBar(\n  tabs: [\n    Tab(text: 'Tab 1'),\n    Tab(text: 'Tab 2'),\n  ],\n)"
        );
    }
}
