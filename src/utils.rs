//! String and Dart source helpers shared by every emitter

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters treated as word separators by the case converters
const SPECIAL_CHARS: &str = "&+-*/\\|?!@#$%^()[]{}<>,.;:'\"`~";

const TEXT_REPLACEMENTS: &[(&str, &str)] = &[
    ("🔴", "[RED]"),
    ("🟢", "[GREEN]"),
    ("🔵", "[BLUE]"),
    ("🟡", "[YELLOW]"),
    ("⚠\u{FE0F}", "[WARNING]"),
    ("⚠", "[WARNING]"),
    ("❌", "[X]"),
    ("✅", "[CHECK]"),
    ("📱", "[PHONE]"),
    ("🛒", "[CART]"),
    ("📰", "[NEWS]"),
    ("–", "-"),
    ("—", "-"),
    ("…", "..."),
    ("\u{2018}", "'"),
    ("\u{2019}", "'"),
    ("\u{201C}", "\""),
    ("\u{201D}", "\""),
];

fn acronym_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("static pattern"))
}

fn camel_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").expect("static pattern"))
}

fn underscore_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_+").expect("static pattern"))
}

/// Convert arbitrary text to `snake_case`, prefixing `_` when it would start with a digit
pub fn to_snake_case(text: &str) -> String {
    let text = text.replace('&', "_and_");
    let text: String = text
        .chars()
        .map(|c| if SPECIAL_CHARS.contains(c) { '_' } else { c })
        .collect();
    let text = acronym_boundary().replace_all(&text, "${1}_${2}");
    let text = camel_boundary().replace_all(&text, "${1}_${2}");
    let text = text.to_lowercase().replace(' ', "_");
    let text = underscore_runs().replace_all(&text, "_");
    let text = text.trim_matches('_');

    if text.chars().next().map_or(false, |c| c.is_numeric()) {
        format!("_{}", text)
    } else {
        text.to_string()
    }
}

/// Convert arbitrary text to `PascalCase`. Each word keeps only its first letter upper-case.
pub fn to_pascal_case(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if c == '_' || SPECIAL_CHARS.contains(c) { ' ' } else { c })
        .collect();
    spaced.split_whitespace().map(capitalize).collect()
}

pub fn to_camel_case(text: &str) -> String {
    let pascal = to_pascal_case(text);
    let mut chars = pascal.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let camel: String = first.to_lowercase().chain(chars).collect();
    if first.is_numeric() {
        format!("_{}", camel)
    } else {
        camel
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Dart class name for a screen, shared by screens, routes and the entry point
pub fn screen_class_name(screen_name: &str) -> String {
    let normalized: String = screen_name
        .replace('&', "And")
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    format!("{}Screen", to_pascal_case(&normalized))
}

pub fn screen_file_name(screen_name: &str) -> String {
    format!("{}_screen.dart", to_snake_case(screen_name))
}

/// Make text safe to embed inside a single- or double-quoted Dart literal.
///
/// Text is NFKD-normalized, a fixed set of emoji and typographic marks is
/// replaced, control characters are dropped, remaining non-ASCII characters
/// fall back to their ASCII decomposition (or a space), and finally the Dart
/// escapes are applied with backslash first.
pub fn escape_dart_string(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut normalized: String = text.nfkd().collect();
    for &(from, to) in TEXT_REPLACEMENTS {
        if normalized.contains(from) {
            normalized = normalized.replace(from, to);
        }
    }

    let mut cleaned = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        let code = c as u32;
        if code < 32 {
            if matches!(c, '\n' | '\r' | '\t') {
                cleaned.push(c);
            }
        } else if (127..160).contains(&code) {
            continue;
        } else if code >= 160 {
            // Marks split off by the decomposition belong to a base letter already kept
            if is_combining_mark(c) {
                continue;
            }
            let ascii: String = std::iter::once(c).nfkd().filter(char::is_ascii).collect();
            if ascii.is_empty() {
                cleaned.push(' ');
            } else {
                cleaned.push_str(&ascii);
            }
        } else {
            cleaned.push(c);
        }
    }

    let mut escaped = String::with_capacity(cleaned.len() + 8);
    for c in cleaned.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '$' => escaped.push_str("\\$"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterBalance {
    pub parens: isize,
    pub brackets: isize,
    pub braces: isize,
}

impl DelimiterBalance {
    /// Opening minus closing count per delimiter kind. Delimiters inside
    /// quoted literals and comments are not counted.
    pub fn of(code: &str) -> Self {
        let mut balance = Self::default();
        let mut quote: Option<char> = None;
        let mut in_comment = false;
        let mut chars = code.chars().peekable();

        while let Some(c) = chars.next() {
            if in_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    in_comment = false;
                }
                continue;
            }
            if let Some(q) = quote {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' => quote = Some(c),
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    in_comment = true;
                }
                '/' if chars.peek() == Some(&'/') => {
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            break;
                        }
                    }
                }
                '(' => balance.parens += 1,
                ')' => balance.parens -= 1,
                '[' => balance.brackets += 1,
                ']' => balance.brackets -= 1,
                '{' => balance.braces += 1,
                '}' => balance.braces -= 1,
                _ => {}
            }
        }
        balance
    }

    pub fn is_balanced(&self) -> bool {
        self.parens == 0 && self.brackets == 0 && self.braces == 0
    }
}

/// Count-based delimiter check. Returns a description of every imbalance.
pub fn check_dart_syntax(code: &str) -> Option<String> {
    let balance = DelimiterBalance::of(code);
    if balance.is_balanced() {
        return None;
    }

    let mut errors = Vec::new();
    for (name, delta) in [
        ("parentheses", balance.parens),
        ("brackets", balance.brackets),
        ("braces", balance.braces),
    ] {
        if delta != 0 {
            let side = if delta > 0 { "open" } else { "close" };
            errors.push(format!("Unbalanced {}: {} extra {}", name, delta.abs(), side));
        }
    }
    Some(errors.join("; "))
}

/// Append missing closers in `)`, `]`, `}` order. Surplus closers are left alone.
pub fn repair_dart_syntax(code: &str) -> String {
    let balance = DelimiterBalance::of(code);
    let mut repaired = code.to_string();
    for (closer, delta) in [(')', balance.parens), (']', balance.brackets), ('}', balance.braces)] {
        for _ in 0..delta.max(0) {
            repaired.push(closer);
        }
    }
    repaired
}

/// `Color(0xFFRRGGBB)` from a six-digit hex string, otherwise `Colors.grey`
pub fn color_code(hex: &str) -> String {
    let digits = hex.trim_start_matches('#');
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("Color(0xFF{})", digits.to_uppercase())
    } else {
        "Colors.grey".to_string()
    }
}

/// Like [`color_code`] but passes Dart color expressions (`Colors.x`, `Color(..)`) through
pub fn color_expression(value: &str) -> String {
    let value = value.trim();
    if value.starts_with("Colors.") || value.starts_with("Color(") || value.starts_with("Theme.of(") {
        value.to_string()
    } else {
        color_code(value)
    }
}

pub fn edge_insets_all(value: &str) -> String {
    if value.is_empty() {
        "EdgeInsets.zero".to_string()
    } else {
        format!("EdgeInsets.all({})", value)
    }
}

/// EdgeInsets from structured JSON: a number, `{horizontal, vertical}` or per-side keys
pub fn edge_insets_from_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Number(n) => edge_insets_all(&n.to_string()),
        serde_json::Value::String(s) => edge_insets_all(s),
        serde_json::Value::Object(map) => {
            if map.contains_key("horizontal") || map.contains_key("vertical") {
                let h = map.get("horizontal").map_or("0".to_string(), json_scalar);
                let v = map.get("vertical").map_or("0".to_string(), json_scalar);
                format!("EdgeInsets.symmetric(horizontal: {}, vertical: {})", h, v)
            } else {
                let parts: Vec<String> = ["top", "right", "bottom", "left"]
                    .iter()
                    .filter_map(|side| map.get(*side).map(|v| format!("{}: {}", side, json_scalar(v))))
                    .collect();
                if parts.is_empty() {
                    "EdgeInsets.zero".to_string()
                } else {
                    format!("EdgeInsets.only({})", parts.join(", "))
                }
            }
        }
        _ => "EdgeInsets.zero".to_string(),
    }
}

fn json_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn indent(level: usize) -> String {
    "  ".repeat(level)
}

/// Break up comment delimiters so text can sit inside a Dart block comment.
/// Dart block comments nest, so `/*` matters as much as `*/`.
pub fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
        .replace("/*", "/ *")
        .replace(['\n', '\r'], " ")
}
