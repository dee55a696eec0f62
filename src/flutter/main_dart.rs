//! `lib/main.dart`

use crate::context::GeneratorContext;
use crate::utils::{escape_dart_string, screen_file_name};

pub fn render(ctx: &GeneratorContext<'_>) -> String {
    let app = ctx.snapshot.application();
    let mut screen_imports = String::new();
    for screen in ctx.snapshot.screens() {
        screen_imports.push_str(&format!("import 'screens/{}';\n", screen_file_name(&screen.name)));
    }
    let theme_mode = if app.theme.is_dark_mode {
        "ThemeMode.dark"
    } else {
        "ThemeMode.light"
    };

    format!(
        "import 'package:flutter/material.dart';
import 'theme/app_theme.dart';
import 'routes/app_routes.dart';
{screen_imports}
void main() {{
  runApp(MyApp());
}}

class MyApp extends StatelessWidget {{
  @override
  Widget build(BuildContext context) {{
    return MaterialApp(
      title: '{title}',
      theme: AppTheme.lightTheme,
      darkTheme: AppTheme.darkTheme,
      themeMode: {theme_mode},
      initialRoute: '{route}',
      routes: AppRoutes.routes,
      debugShowCheckedModeBanner: false,
    );
  }}
}}
",
        title = escape_dart_string(&app.name),
        route = escape_dart_string(&ctx.initial_route),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;

    #[test]
    fn test_entry_point() {
        let s = Snapshot::from_json_str(
            r#"{"name": "Joe's News", "package_name": "com.example.news",
                "theme": {"is_dark_mode": true},
                "screens": [
                    {"id": 1, "name": "SplashScreen", "route_name": "/splash"},
                    {"id": 2, "name": "Product List", "route_name": "/products"}
                ]}"#,
            "test",
        )
        .unwrap();
        let ctx = GeneratorContext::new(&s);
        let code = render(&ctx);
        assert!(code.contains("import 'screens/splash_screen_screen.dart';\nimport 'screens/product_list_screen.dart';\n"));
        assert!(code.contains("title: 'Joe\\'s News',"));
        assert!(code.contains("themeMode: ThemeMode.dark,"));
        assert!(code.contains("initialRoute: '/splash',"));
    }
}
