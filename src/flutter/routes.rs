//! `lib/routes/app_routes.dart`

use crate::context::GeneratorContext;
use crate::utils::{escape_dart_string, screen_class_name, screen_file_name};
use std::collections::HashSet;

/// Route table. A route declared twice keeps its first screen, since a Dart
/// map literal rejects duplicate keys.
pub fn render(ctx: &mut GeneratorContext<'_>) -> String {
    let screens = ctx.snapshot.screens();
    let mut imports = String::new();
    let mut mappings = String::new();
    let mut seen = HashSet::new();

    for screen in screens {
        imports.push_str(&format!("import '../screens/{}';\n", screen_file_name(&screen.name)));
        if !seen.insert(screen.route_name.as_str()) {
            ctx.add_warning(format!(
                "Route '{}' of screen '{}' is already taken, skipping it in the route table",
                screen.route_name, screen.name
            ));
            continue;
        }
        mappings.push_str(&format!(
            "      '{}': (context) => {}(),\n",
            escape_dart_string(&screen.route_name),
            screen_class_name(&screen.name)
        ));
    }

    format!(
        "import 'package:flutter/material.dart';
{imports}
class AppRoutes {{
  static Map<String, WidgetBuilder> get routes {{
    return {{
{mappings}    }};
  }}
}}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;

    #[test]
    fn test_route_table() {
        let s = Snapshot::from_json_str(
            r#"{"name": "A", "package_name": "com.example.a", "screens": [
                {"id": 1, "name": "Home", "route_name": "/home"},
                {"id": 2, "name": "Cart & Checkout", "route_name": "/cart"},
                {"id": 3, "name": "Other", "route_name": "/home"}
            ]}"#,
            "test",
        )
        .unwrap();
        let mut ctx = GeneratorContext::new(&s);
        let code = render(&mut ctx);
        assert!(code.contains("import '../screens/cart_and_checkout_screen.dart';"));
        assert!(code.contains("      '/home': (context) => HomeScreen(),\n"));
        assert!(code.contains("      '/cart': (context) => CartandcheckoutScreen(),\n"));
        assert!(!code.contains("OtherScreen()"));
        assert_eq!(ctx.warnings().len(), 1);
    }
}
