//! Shared style fragments: text styles, icon names, enum members

use crate::properties::Properties;
use crate::utils::{color_code, escape_dart_string};

fn font_weight(value: &str) -> String {
    if value.starts_with("FontWeight.") {
        return value.to_string();
    }
    let weight = match value {
        "thin" => "w100",
        "light" => "w300",
        "regular" => "w400",
        "medium" => "w500",
        "semibold" => "w600",
        "bold" => "w700",
        "black" => "w900",
        other if other.starts_with('w') => other,
        _ => "w500",
    };
    format!("FontWeight.{}", identifier(weight, "w500"))
}

/// `TextStyle` arguments from the text style properties, in a fixed order
pub fn text_style_args(props: &Properties<'_>) -> Vec<String> {
    let mut parts = Vec::new();

    if let Some(color) = props.truthy("color") {
        parts.push(format!("color: {}", color_code(&color)));
    }
    if let Some(size) = props.truthy("fontSize") {
        parts.push(format!("fontSize: {}", size));
    }
    if let Some(weight) = props.truthy("fontWeight") {
        parts.push(format!("fontWeight: {}", font_weight(&weight)));
    }
    if let Some(font_style) = props.truthy("fontStyle") {
        parts.push(format!("fontStyle: FontStyle.{}", identifier(&font_style, "normal")));
    }
    if let Some(family) = props.truthy("fontFamily") {
        parts.push(format!("fontFamily: '{}'", escape_dart_string(&family)));
    }
    for key in ["letterSpacing", "wordSpacing", "height"] {
        if let Some(value) = props.truthy(key) {
            parts.push(format!("{}: {}", key, value));
        }
    }
    if let Some(decoration) = props.truthy("decoration") {
        parts.push(format!("decoration: TextDecoration.{}", identifier(&decoration, "none")));
    }
    if let Some(color) = props.truthy("decorationColor") {
        parts.push(format!("decorationColor: {}", color_code(&color)));
    }
    if let Some(style) = props.truthy("decorationStyle") {
        parts.push(format!("decorationStyle: TextDecorationStyle.{}", identifier(&style, "solid")));
    }
    if let Some(thickness) = props.truthy("decorationThickness") {
        parts.push(format!("decorationThickness: {}", thickness));
    }

    parts
}

/// `, style: TextStyle(...)` or an empty string when no style property is set
pub fn text_style(props: &Properties<'_>) -> String {
    let parts = text_style_args(props);
    if parts.is_empty() {
        String::new()
    } else {
        format!(", style: TextStyle({})", parts.join(", "))
    }
}

/// Keep only identifier characters, falling back to `default` when nothing is left
pub fn identifier(value: &str, default: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if cleaned.is_empty() {
        default.to_string()
    } else {
        cleaned
    }
}

/// `Icons.x` member name from a property value that may already carry the prefix
pub fn icon_name(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) => identifier(v.trim().trim_start_matches("Icons."), default),
        None => default.to_string(),
    }
}

/// Enum member such as `MainAxisAlignment.center`, accepting a prefixed value
pub fn enum_member(enum_name: &str, value: &str, default: &str) -> String {
    let prefix = format!("{}.", enum_name);
    let member = identifier(value.trim().trim_start_matches(prefix.as_str()), default);
    format!("{}.{}", enum_name, member)
}
