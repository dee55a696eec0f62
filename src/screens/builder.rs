//! Regular screens

use super::{background_slot, body_roots, imports, root_of_type, ScreenGenerator, SLOT_LEVEL, STATE_FIELDS};
use crate::context::GeneratorContext;
use crate::model::Screen;
use crate::utils::escape_dart_string;

const SCREEN_IMPORTS: [&str; 3] = [
    "package:flutter/material.dart",
    "../services/api_service.dart",
    "../models/app_models.dart",
];

const EMPTY_BODY: &str = "Center(child: Text('No content configured for this screen'))";

pub(crate) fn regular<'a>(
    generator: &ScreenGenerator,
    screen: &'a Screen,
    class_name: &str,
    ctx: &mut GeneratorContext<'a>,
) -> String {
    let widgets = generator.widgets();

    let app_bar = if screen.show_app_bar {
        let title = screen
            .app_bar_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&screen.name);
        Some(format!(
            "AppBar(\n        title: Text('{}'),\n        automaticallyImplyLeading: {},\n      )",
            escape_dart_string(title),
            screen.show_back_button
        ))
    } else {
        root_of_type(ctx, screen, "AppBar").map(|w| widgets.generate_widget(w, ctx, SLOT_LEVEL))
    };
    let drawer = root_of_type(ctx, screen, "Drawer").map(|w| widgets.generate_widget(w, ctx, SLOT_LEVEL));
    let roots = body_roots(ctx, screen);
    let body = generator.body(&roots, ctx, false, EMPTY_BODY);
    let bottom = root_of_type(ctx, screen, "BottomNavigationBar")
        .map(|w| widgets.generate_widget(w, ctx, SLOT_LEVEL));

    let mut scaffold = String::new();
    if let Some(app_bar) = app_bar {
        scaffold.push_str(&format!("      appBar: {},\n", app_bar));
    }
    if let Some(background) = background_slot(screen) {
        scaffold.push_str(&background);
    }
    if let Some(drawer) = drawer {
        scaffold.push_str(&format!("      drawer: {},\n", drawer));
    }
    scaffold.push_str(&format!("      body: {},\n", body));
    if let Some(bottom) = bottom {
        scaffold.push_str(&format!("      bottomNavigationBar: {},\n", bottom));
    }

    format!(
        "{imports}

class {class_name} extends StatefulWidget {{
  @override
  _{class_name}State createState() => _{class_name}State();
}}

class _{class_name}State extends State<{class_name}> {{
{STATE_FIELDS}
  @override
  void dispose() {{
    _controllers.values.forEach((controller) => controller.dispose());
    super.dispose();
  }}

  @override
  Widget build(BuildContext context) {{
    return Scaffold(
{scaffold}    );
  }}
}}
",
        imports = imports(ctx, &SCREEN_IMPORTS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::utils::check_dart_syntax;

    fn snapshot(screen_fields: &str, widgets: &str) -> Snapshot {
        let json = format!(
            r#"{{"name": "T", "package_name": "com.example.t", "screens": [
                {{"id": 1, "name": "Home", "route_name": "/home", {} "widgets": [{}]}},
                {{"id": 2, "name": "Details", "route_name": "/details"}}
            ]}}"#,
            screen_fields, widgets
        );
        Snapshot::from_json_str(&json, "test").unwrap()
    }

    fn render(s: &Snapshot) -> (String, usize) {
        let generator = ScreenGenerator::new();
        let mut ctx = GeneratorContext::new(s);
        let artifact = generator.generate(s.screen(1).unwrap(), &mut ctx);
        assert!(ctx.current_screen().is_none());
        (artifact.code, ctx.warnings().len())
    }

    #[test]
    fn test_empty_screen_placeholder() {
        let s = snapshot(r#""app_bar_title": "Welcome","#, "");
        let (code, _) = render(&s);
        assert!(code.starts_with("import 'package:flutter/material.dart';\nimport '../services/api_service.dart';"));
        assert!(code.contains("class HomeScreen extends StatefulWidget {"));
        assert!(code.contains("_HomeScreenState createState() => _HomeScreenState();"));
        assert!(code.contains("      appBar: AppBar(\n        title: Text('Welcome'),\n        automaticallyImplyLeading: true,\n      ),\n"));
        assert!(code.contains("      body: Center(child: Text('No content configured for this screen')),\n    );"));
        assert!(code.contains("int _selectedIndex = 0;"));
        assert_eq!(check_dart_syntax(&code), None);
    }

    #[test]
    fn test_single_root_is_the_body() {
        let s = snapshot("", r#"{"id": 1, "widget_type": "Divider"}"#);
        let (code, _) = render(&s);
        assert!(code.contains("      body: Divider(),\n"));
        assert!(code.contains("title: Text('Home')"));
    }

    #[test]
    fn test_multiple_roots_are_stacked() {
        let s = snapshot(
            "",
            r#"{"id": 1, "widget_type": "Divider", "order": 1},
               {"id": 2, "widget_type": "Text", "order": 0}"#,
        );
        let (code, _) = render(&s);
        assert!(code.contains(
            "      body: Column(\n        children: [\n          Text('Text'),\n          Divider(),\n        ],\n      ),\n"
        ));
    }

    #[test]
    fn test_chrome_widgets_fill_scaffold_slots() {
        let s = snapshot(
            r##""show_app_bar": false, "background_color": "#fafafa","##,
            r#"{"id": 1, "widget_type": "AppBar"},
               {"id": 2, "widget_type": "Drawer"},
               {"id": 3, "widget_type": "Text"},
               {"id": 4, "widget_type": "BottomNavigationBar"}"#,
        );
        let (code, warnings) = render(&s);
        assert!(code.contains("      appBar: AppBar(title: Text('App')),\n"));
        assert!(code.contains("      backgroundColor: Color(0xFFFAFAFA),\n"));
        assert!(code.contains("      drawer: Drawer(\n        child: Container(),\n      ),\n"));
        assert!(code.contains("      body: Text('Text'),\n"));
        assert!(code.contains("      bottomNavigationBar: BottomNavigationBar(\n"));
        assert_eq!(warnings, 0);
        assert_eq!(check_dart_syntax(&code), None);
    }

    #[test]
    fn test_hidden_app_bar_without_widget() {
        let s = snapshot(r#""show_app_bar": false,"#, "");
        let (code, _) = render(&s);
        assert!(!code.contains("appBar:"));
    }
}
