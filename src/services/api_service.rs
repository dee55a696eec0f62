//! `lib/services/api_service.dart`
//!
//! One singleton client with a `fetch<Name>()` method per data source, a
//! base-URL resolver and `fetchData(name)`, the list-normalizing entry point
//! data-bound widgets call.

use crate::bindings::LIST_KEYS;
use crate::context::GeneratorContext;
use crate::model::DataSource;
use crate::utils::{escape_dart_string, to_pascal_case};
use std::collections::HashMap;

/// Base URL placeholder resolved from saved preferences at runtime
pub const DYNAMIC_BASE_URL: &str = "DYNAMIC";

const HTTP_METHODS: [&str; 6] = ["get", "post", "put", "patch", "delete", "head"];

pub fn fetch_method_name(source: &DataSource) -> String {
    format!("fetch{}", to_pascal_case(&source.name))
}

pub fn render(ctx: &mut GeneratorContext<'_>) -> String {
    let sources = ctx.snapshot.data_sources();
    let mut code = String::from("import 'dart:convert';\nimport 'package:http/http.dart' as http;\n");
    if ctx.uses_dynamic_url {
        code.push_str("import 'package:shared_preferences/shared_preferences.dart';\n");
    }
    code.push_str(
        "
class ApiService {
  static final ApiService _instance = ApiService._internal();
  factory ApiService() => _instance;
  ApiService._internal();
",
    );
    code.push_str(if ctx.uses_dynamic_url {
        DYNAMIC_BASE_URL_MANAGEMENT
    } else {
        STATIC_BASE_URL_MANAGEMENT
    });

    // Pascal-cased names can collide; the first source keeps the method
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut cases = Vec::new();
    for source in sources {
        if source.fields.is_empty() {
            ctx.add_warning(format!("data source {} has no fields defined", source.name));
        }
        let method = fetch_method_name(source);
        if let Some(owner) = owners.get(&method) {
            ctx.add_warning(format!(
                "Data source '{}' maps to {}() which '{}' already defines",
                source.name, method, owner
            ));
        } else {
            owners.insert(method.clone(), source.name.as_str());
            code.push_str(&fetch_method(source, &method, ctx));
        }
        cases.push((escape_dart_string(&source.name), method));
    }

    code.push_str(NORMALIZE_LIST_HEAD);
    let keys: Vec<String> = LIST_KEYS.iter().map(|k| format!("'{}'", k)).collect();
    code.push_str(&keys.join(", "));
    code.push_str(NORMALIZE_LIST_TAIL);

    code.push_str(
        "
  Future<List<dynamic>> fetchData(String dataSourceName) async {
    switch (dataSourceName) {",
    );
    let mut seen = Vec::new();
    for (name, method) in &cases {
        if seen.contains(name) {
            continue;
        }
        seen.push(name.clone());
        code.push_str(&format!(
            "\n      case '{}':\n        return _normalizeList(await {}());",
            name, method
        ));
    }
    code.push_str(
        "
      default:
        throw Exception('Unknown data source: $dataSourceName');
    }
  }
}
",
    );
    code
}

fn fetch_method(source: &DataSource, method_name: &str, ctx: &mut GeneratorContext<'_>) -> String {
    let base_url = if source.use_dynamic_base_url {
        DYNAMIC_BASE_URL.to_string()
    } else {
        escape_dart_string(&source.base_url)
    };
    let verb = source.method.to_lowercase();
    let verb = if HTTP_METHODS.contains(&verb.as_str()) {
        verb
    } else {
        ctx.add_warning(format!(
            "Data source '{}' uses unsupported method '{}', falling back to GET",
            source.name, source.method
        ));
        "get".to_string()
    };

    let mut headers = String::from("          'Content-Type': 'application/json',");
    for (key, value) in source.header_pairs() {
        headers.push_str(&format!(
            "\n          '{}': '{}',",
            escape_dart_string(&key),
            escape_dart_string(&value)
        ));
    }

    format!(
        "
  Future<dynamic> {method_name}() async {{
    try {{
      final baseUrl = await _getBaseUrl('{base_url}');
      final url = '${{baseUrl}}{endpoint}';
      final response = await http.{verb}(
        Uri.parse(url),
        headers: {{
{headers}
        }},
      );

      if (response.statusCode == 200) {{
        return json.decode(response.body);
      }} else {{
        throw Exception('Failed to load data: ${{response.statusCode}}');
      }}
    }} catch (e) {{
      throw Exception('Network error: $e');
    }}
  }}
",
        endpoint = escape_dart_string(&source.endpoint),
    )
}

const DYNAMIC_BASE_URL_MANAGEMENT: &str = "
  String? _cachedBaseUrl;

  // Saved configuration wins over the default from the snapshot
  Future<String> _getBaseUrl(String defaultUrl) async {
    if (_cachedBaseUrl != null && _cachedBaseUrl!.isNotEmpty) {
      return _cachedBaseUrl!;
    }

    final prefs = await SharedPreferences.getInstance();
    final savedUrl = prefs.getString('base_url');

    if (defaultUrl == 'DYNAMIC' || defaultUrl.isEmpty) {
      if (savedUrl == null || savedUrl.isEmpty) {
        throw Exception('No server URL configured. Please configure the server URL first.');
      }
      _cachedBaseUrl = savedUrl;
      return _cachedBaseUrl!;
    }

    _cachedBaseUrl = (savedUrl != null && savedUrl.isNotEmpty) ? savedUrl : defaultUrl;
    return _cachedBaseUrl!;
  }

  void clearCache() {
    _cachedBaseUrl = null;
  }
";

const STATIC_BASE_URL_MANAGEMENT: &str = "
  Future<String> _getBaseUrl(String defaultUrl) async {
    return defaultUrl;
  }

  void clearCache() {}
";

const NORMALIZE_LIST_HEAD: &str = "
  List<dynamic> _normalizeList(dynamic data) {
    if (data == null) return [];
    if (data is List) return data;
    if (data is Map) {
      for (final key in const [";

const NORMALIZE_LIST_TAIL: &str = "]) {
        final value = data[key];
        if (value is List) return value;
      }
      return [data];
    }
    throw Exception('Unexpected response type: ${data.runtimeType}');
  }
";
