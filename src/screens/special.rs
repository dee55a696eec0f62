//! Splash and first-run configuration screens
//!
//! Both keep the generic state members so their declared widgets render the
//! same way they would on a regular screen.

use super::{background_slot, body_roots, imports, ScreenGenerator, STATE_FIELDS};
use crate::context::{GeneratorContext, CONFIGURATION_SCREEN};
use crate::model::Screen;
use crate::utils::escape_dart_string;

const SPLASH_DELAY_SECONDS: u32 = 2;
const VALIDATION_TIMEOUT_SECONDS: u32 = 10;

const SPLASH_EMPTY_BODY: &str = "Center(\n        child: CircularProgressIndicator(),\n      )";

pub(crate) fn splash<'a>(
    generator: &ScreenGenerator,
    screen: &'a Screen,
    class_name: &str,
    ctx: &mut GeneratorContext<'a>,
) -> String {
    let next_route = escape_dart_string(&ctx.splash_next_route());

    let mut fixed = vec!["package:flutter/material.dart"];
    if ctx.has_config_screen {
        fixed.push("package:shared_preferences/shared_preferences.dart");
    }
    fixed.extend(["../services/api_service.dart", "../models/app_models.dart"]);

    let navigation = if ctx.has_config_screen {
        let config_route = ctx
            .snapshot
            .screen_named(CONFIGURATION_SCREEN)
            .map_or("/configuration", |s| s.route_name.as_str());
        format!(
            "    final prefs = await SharedPreferences.getInstance();
    final savedUrl = prefs.getString('base_url');

    if (savedUrl == null || savedUrl.isEmpty) {{
      Navigator.pushReplacementNamed(context, '{}');
    }} else {{
      Navigator.pushReplacementNamed(context, '{next_route}');
    }}",
            escape_dart_string(config_route)
        )
    } else {
        format!("    Navigator.pushReplacementNamed(context, '{next_route}');")
    };

    let roots = body_roots(ctx, screen);
    let body = generator.body(&roots, ctx, true, SPLASH_EMPTY_BODY);
    let background = background_slot(screen).unwrap_or_default();

    format!(
        "{imports}

class {class_name} extends StatefulWidget {{
  @override
  _{class_name}State createState() => _{class_name}State();
}}

class _{class_name}State extends State<{class_name}> {{
{STATE_FIELDS}
  @override
  void initState() {{
    super.initState();
    _checkConfigurationAndNavigate();
  }}

  @override
  void dispose() {{
    _controllers.values.forEach((controller) => controller.dispose());
    super.dispose();
  }}

  Future<void> _checkConfigurationAndNavigate() async {{
    await Future.delayed(Duration(seconds: {SPLASH_DELAY_SECONDS}));

    if (!mounted) return;

{navigation}
  }}

  @override
  Widget build(BuildContext context) {{
    return Scaffold(
{background}      body: {body},
    );
  }}
}}
",
        imports = imports(ctx, &fixed),
    )
}

pub(crate) fn configuration<'a>(
    generator: &ScreenGenerator,
    screen: &'a Screen,
    class_name: &str,
    ctx: &mut GeneratorContext<'a>,
) -> String {
    let home_route = escape_dart_string(&ctx.home_route());
    let title = escape_dart_string(
        screen
            .app_bar_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Configuration"),
    );

    let roots = body_roots(ctx, screen);
    if roots.is_empty() {
        log::debug!("Configuration screen has no widgets, using the default URL form");
    }
    let body = generator.body(&roots, ctx, false, DEFAULT_FORM);
    let background = background_slot(screen).unwrap_or_default();
    let app_bar = if screen.show_app_bar {
        format!("      appBar: AppBar(\n        title: Text('{title}'),\n      ),\n")
    } else {
        String::new()
    };

    format!(
        "{imports}

class {class_name} extends StatefulWidget {{
  @override
  _{class_name}State createState() => _{class_name}State();
}}

class _{class_name}State extends State<{class_name}> {{
{STATE_FIELDS}  final TextEditingController _urlController = TextEditingController();
  bool _isValidating = false;
  bool _isSaving = false;
  String? _errorMessage;

  @override
  void initState() {{
    super.initState();
    _loadSavedUrl();
  }}

  @override
  void dispose() {{
    _urlController.dispose();
    _controllers.values.forEach((controller) => controller.dispose());
    super.dispose();
  }}

  Future<void> _loadSavedUrl() async {{
    final prefs = await SharedPreferences.getInstance();
    final savedUrl = prefs.getString('base_url');
    if (savedUrl != null) {{
      setState(() {{
        _urlController.text = savedUrl;
      }});
    }}
  }}

  Future<void> _validateUrl() async {{
    final url = _urlController.text.trim();

    if (url.isEmpty) {{
      setState(() {{
        _errorMessage = 'Please enter a URL';
      }});
      return;
    }}

    setState(() {{
      _isValidating = true;
      _errorMessage = null;
    }});

    try {{
      String testUrl = url;
      if (!testUrl.startsWith('http://') && !testUrl.startsWith('https://')) {{
        testUrl = 'http://' + testUrl;
      }}

      final response = await http.get(
        Uri.parse('$testUrl/api/test'),
      ).timeout(Duration(seconds: {VALIDATION_TIMEOUT_SECONDS}));

      if (response.statusCode == 200) {{
        setState(() {{
          _isValidating = false;
          _errorMessage = null;
        }});
        _urlController.text = testUrl;
        _saveConfiguration();
      }} else {{
        setState(() {{
          _isValidating = false;
          _errorMessage = 'Server returned error: ${{response.statusCode}}';
        }});
      }}
    }} catch (e) {{
      setState(() {{
        _isValidating = false;
        _errorMessage = 'Connection failed: ${{e.toString()}}';
      }});
    }}
  }}

  Future<void> _saveConfiguration() async {{
    final url = _urlController.text.trim();

    setState(() {{
      _isSaving = true;
    }});

    String cleanUrl = url;
    if (cleanUrl.endsWith('/')) {{
      cleanUrl = cleanUrl.substring(0, cleanUrl.length - 1);
    }}

    final prefs = await SharedPreferences.getInstance();
    await prefs.setString('base_url', cleanUrl);

    _apiService.clearCache();

    setState(() {{
      _isSaving = false;
    }});

    ScaffoldMessenger.of(context).showSnackBar(
      SnackBar(
        content: Text('Configuration saved successfully!'),
        backgroundColor: Colors.green,
      ),
    );

    await Future.delayed(Duration(seconds: 1));
    if (mounted) {{
      Navigator.pushReplacementNamed(context, '{home_route}');
    }}
  }}

  @override
  Widget build(BuildContext context) {{
    return Scaffold(
{app_bar}{background}      body: {body},
    );
  }}
}}
",
        imports = imports(
            ctx,
            &[
                "package:flutter/material.dart",
                "package:shared_preferences/shared_preferences.dart",
                "import 'package:http/http.dart' as http;",
                "../services/api_service.dart",
                "../models/app_models.dart",
            ]
        ),
    )
}

const DEFAULT_FORM: &str = "Padding(
        padding: EdgeInsets.all(16),
        child: Column(
          mainAxisAlignment: MainAxisAlignment.center,
          children: [
            TextField(
              controller: _urlController,
              decoration: InputDecoration(
                hintText: 'Enter server URL',
                labelText: 'Server URL',
                prefixIcon: Icon(Icons.link),
                border: OutlineInputBorder(),
                errorText: _errorMessage,
              ),
            ),
            SizedBox(height: 20),
            ElevatedButton(
              onPressed: (_isValidating || _isSaving) ? null : _validateUrl,
              child: _isValidating
                  ? CircularProgressIndicator(color: Colors.white)
                  : Text('Validate and Save'),
            ),
          ],
        ),
      )";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::utils::check_dart_syntax;

    fn snapshot(screens: &str, extras: &str) -> Snapshot {
        let json = format!(
            r#"{{"name": "T", "package_name": "com.example.t", "screens": [{}]{}}}"#,
            screens, extras
        );
        Snapshot::from_json_str(&json, "test").unwrap()
    }

    fn render(s: &Snapshot, screen: u64) -> String {
        let generator = ScreenGenerator::new();
        let mut ctx = GeneratorContext::new(s);
        generator.generate(s.screen(screen).unwrap(), &mut ctx).code
    }

    #[test]
    fn test_splash_without_configuration() {
        let s = snapshot(
            r#"{"id": 1, "name": "SplashScreen", "route_name": "/splash"},
               {"id": 2, "name": "Feed", "route_name": "/feed"}"#,
            "",
        );
        let code = render(&s, 1);
        assert!(code.contains("class SplashscreenScreen extends StatefulWidget"));
        assert!(!code.contains("shared_preferences"));
        assert!(code.contains("await Future.delayed(Duration(seconds: 2));"));
        assert!(code.contains("    Navigator.pushReplacementNamed(context, '/feed');\n  }"));
        assert!(code.contains("body: Center(\n        child: CircularProgressIndicator(),\n      ),"));
        assert_eq!(check_dart_syntax(&code), None);
    }

    #[test]
    fn test_splash_checks_saved_url() {
        let s = snapshot(
            r#"{"id": 1, "name": "SplashScreen", "route_name": "/splash", "widgets": [
                   {"id": 1, "widget_type": "Icon", "order": 0},
                   {"id": 2, "widget_type": "Text", "order": 1}
               ]},
               {"id": 2, "name": "Configuration", "route_name": "/setup"},
               {"id": 3, "name": "Home", "route_name": "/home"}"#,
            "",
        );
        let code = render(&s, 1);
        assert!(code.contains("import 'package:shared_preferences/shared_preferences.dart';"));
        assert!(code.contains("Navigator.pushReplacementNamed(context, '/setup');"));
        assert!(code.contains("Navigator.pushReplacementNamed(context, '/home');"));
        assert!(code.contains("body: Column(\n        mainAxisAlignment: MainAxisAlignment.center,\n        children: [\n"));
        assert_eq!(check_dart_syntax(&code), None);
    }

    #[test]
    fn test_configuration_default_form() {
        let s = snapshot(
            r#"{"id": 1, "name": "Configuration", "route_name": "/configuration"},
               {"id": 2, "name": "Feed", "route_name": "/feed", "is_home_screen": true}"#,
            "",
        );
        let code = render(&s, 1);
        assert!(code.contains("import 'package:http/http.dart' as http;"));
        assert!(code.contains("Uri.parse('$testUrl/api/test'),\n      ).timeout(Duration(seconds: 10));"));
        assert!(code.contains("_errorMessage = 'Server returned error: ${response.statusCode}';"));
        assert!(code.contains("_apiService.clearCache();"));
        assert!(code.contains("Navigator.pushReplacementNamed(context, '/feed');"));
        assert!(code.contains("onPressed: (_isValidating || _isSaving) ? null : _validateUrl,"));
        assert!(code.contains("      appBar: AppBar(\n        title: Text('Configuration'),\n      ),\n"));
        assert_eq!(check_dart_syntax(&code), None);
    }

    #[test]
    fn test_configuration_declared_widgets_wire_into_state() {
        let s = snapshot(
            r#"{"id": 1, "name": "Configuration", "route_name": "/configuration", "widgets": [
                   {"id": 1, "widget_type": "Column"},
                   {"id": 2, "widget_type": "TextField", "widget_id": "url_input", "parent": 1, "order": 0},
                   {"id": 3, "widget_type": "ElevatedButton", "parent": 1, "order": 1, "properties": [
                       {"property_name": "onPressed", "property_type": "action_reference", "action_reference": 9}
                   ]}
               ]}"#,
            r#", "actions": [{"id": 9, "name": "SaveConfiguration", "action_type": "save_data"}]"#,
        );
        let code = render(&s, 1);
        assert!(code.contains("controller: _urlController,"));
        assert!(code.contains("onPressed: () { _saveConfiguration(); },"));
        assert!(!code.contains("Validate and Save"));
        assert!(code.contains("Navigator.pushReplacementNamed(context, '/home');"));
        assert_eq!(check_dart_syntax(&code), None);
    }
}
