//! `lib/models/app_models.dart`
//!
//! Fixed model classes plus `displayValue`, the record-to-text helper every
//! data-bound widget calls.

/// Keys tried after the configured field when rendering a record as text
pub const DISPLAY_FALLBACK_KEYS: &[&str] = &["title", "name", "label", "text"];

pub fn render() -> String {
    let fallbacks: Vec<String> = DISPLAY_FALLBACK_KEYS.iter().map(|k| format!("'{}'", k)).collect();
    format!(
        "{MODELS}
/// Text for one record: the configured field, then common label keys, then
/// the first non-null value.
String displayValue(dynamic item, String field) {{
  if (item == null) return '';
  if (item is! Map) return item.toString();
  final direct = item[field];
  if (direct != null) return direct.toString();
  for (final key in const [{keys}]) {{
    final value = item[key];
    if (value != null) return value.toString();
  }}
  for (final value in item.values) {{
    if (value != null) return value.toString();
  }}
  return '';
}}
",
        keys = fallbacks.join(", "),
    )
}

/// Rust mirror of the generated `displayValue`, used to check how records render
pub fn display_value(item: &serde_json::Value, field: &str) -> String {
    use serde_json::Value;

    fn text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    match item {
        Value::Null => String::new(),
        Value::Object(map) => std::iter::once(field)
            .chain(DISPLAY_FALLBACK_KEYS.iter().copied())
            .find_map(|key| map.get(key).filter(|v| !v.is_null()))
            .or_else(|| map.values().find(|v| !v.is_null()))
            .map(text)
            .unwrap_or_default(),
        other => text(other),
    }
}

const MODELS: &str = "// Data models for the application

class AppData {
  final Map<String, dynamic> data;

  AppData(this.data);

  factory AppData.fromJson(Map<String, dynamic> json) {
    return AppData(json);
  }

  Map<String, dynamic> toJson() {
    return data;
  }

  dynamic operator [](String key) => data[key];
  void operator []=(String key, dynamic value) => data[key] = value;
}

class ApiResponse<T> {
  final bool success;
  final T? data;
  final String? error;
  final int? statusCode;

  ApiResponse({
    required this.success,
    this.data,
    this.error,
    this.statusCode,
  });

  factory ApiResponse.success(T data, [int statusCode = 200]) {
    return ApiResponse(success: true, data: data, statusCode: statusCode);
  }

  factory ApiResponse.error(String error, [int statusCode = 500]) {
    return ApiResponse(success: false, error: error, statusCode: statusCode);
  }
}

class ListItem {
  final String? id;
  final String? title;
  final String? description;
  final String? imageUrl;
  final Map<String, dynamic> extras;

  ListItem({
    this.id,
    this.title,
    this.description,
    this.imageUrl,
    Map<String, dynamic>? extras,
  }) : extras = extras ?? {};

  factory ListItem.fromJson(Map<String, dynamic> json) {
    return ListItem(
      id: json['id']?.toString(),
      title: json['title']?.toString() ?? json['name']?.toString(),
      description: json['description']?.toString(),
      imageUrl: json['imageUrl']?.toString() ?? json['image']?.toString(),
      extras: json,
    );
  }

  Map<String, dynamic> toJson() {
    return {
      if (id != null) 'id': id,
      if (title != null) 'title': title,
      if (description != null) 'description': description,
      if (imageUrl != null) 'imageUrl': imageUrl,
      ...extras,
    };
  }
}

class Category {
  final String? id;
  final String? name;
  final String? icon;
  final String? image;
  final String? description;
  final int? itemCount;

  Category({
    this.id,
    this.name,
    this.icon,
    this.image,
    this.description,
    this.itemCount,
  });

  factory Category.fromJson(Map<String, dynamic> json) {
    return Category(
      id: json['id']?.toString(),
      name: json['name']?.toString(),
      icon: json['icon']?.toString(),
      image: json['image']?.toString(),
      description: json['description']?.toString(),
      itemCount: json['itemCount'] != null ? int.tryParse(json['itemCount'].toString()) : null,
    );
  }

  Map<String, dynamic> toJson() {
    return {
      if (id != null) 'id': id,
      if (name != null) 'name': name,
      if (icon != null) 'icon': icon,
      if (image != null) 'image': image,
      if (description != null) 'description': description,
      if (itemCount != null) 'itemCount': itemCount,
    };
  }
}

class User {
  final String? id;
  final String? name;
  final String? email;
  final String? avatarUrl;
  final Map<String, dynamic> metadata;

  User({
    this.id,
    this.name,
    this.email,
    this.avatarUrl,
    Map<String, dynamic>? metadata,
  }) : metadata = metadata ?? {};

  factory User.fromJson(Map<String, dynamic> json) {
    return User(
      id: json['id']?.toString(),
      name: json['name']?.toString(),
      email: json['email']?.toString(),
      avatarUrl: json['avatarUrl']?.toString() ?? json['avatar']?.toString(),
      metadata: json,
    );
  }

  Map<String, dynamic> toJson() {
    return {
      if (id != null) 'id': id,
      if (name != null) 'name': name,
      if (email != null) 'email': email,
      if (avatarUrl != null) 'avatarUrl': avatarUrl,
      ...metadata,
    };
  }
}

class DynamicModel {
  final Map<String, dynamic> _data;

  DynamicModel(this._data);

  factory DynamicModel.fromJson(Map<String, dynamic> json) {
    return DynamicModel(json);
  }

  Map<String, dynamic> toJson() => _data;

  dynamic get(String key) => _data[key];
  void set(String key, dynamic value) => _data[key] = value;
  bool has(String key) => _data.containsKey(key);

  String? getString(String key) => _data[key]?.toString();

  int? getInt(String key) {
    final value = _data[key];
    if (value == null) return null;
    if (value is int) return value;
    return int.tryParse(value.toString());
  }

  double? getDouble(String key) {
    final value = _data[key];
    if (value == null) return null;
    if (value is double) return value;
    if (value is int) return value.toDouble();
    return double.tryParse(value.toString());
  }

  bool? getBool(String key) {
    final value = _data[key];
    if (value == null) return null;
    if (value is bool) return value;
    final text = value.toString().toLowerCase();
    return text == 'true' || text == '1';
  }

  List<dynamic>? getList(String key) {
    final value = _data[key];
    return value is List ? value : null;
  }

  Map<String, dynamic>? getMap(String key) {
    final value = _data[key];
    return value is Map<String, dynamic> ? value : null;
  }
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::check_dart_syntax;
    use serde_json::json;

    #[test]
    fn test_models_file() {
        let code = render();
        for class in ["AppData", "ApiResponse<T>", "ListItem", "Category", "User", "DynamicModel"] {
            assert!(code.contains(&format!("class {} {{", class)), "missing {}", class);
        }
        assert!(code.contains("for (final key in const ['title', 'name', 'label', 'text'])"));
        assert_eq!(check_dart_syntax(&code), None);
    }

    #[test]
    fn test_display_value_fallbacks() {
        assert_eq!(display_value(&json!({"headline": "A", "title": "B"}), "headline"), "A");
        assert_eq!(display_value(&json!({"headline": null, "name": "N"}), "headline"), "N");
        assert_eq!(display_value(&json!({"id": 7, "other": "x"}), "headline"), "7");
        assert_eq!(display_value(&json!({}), "headline"), "");
        assert_eq!(display_value(&json!(42), "headline"), "42");
        assert_eq!(display_value(&json!(null), "headline"), "");
    }
}
