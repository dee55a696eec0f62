//! `lib/theme/app_theme.dart`

use crate::model::Theme;
use crate::utils::escape_dart_string;

/// ARGB literal for a theme color. Anything but six (RGB) or eight (ARGB) hex
/// digits is replaced by `fallback`.
pub fn argb_literal(value: &str, fallback: &str) -> String {
    let digits = value.trim().trim_start_matches('#');
    if digits.chars().all(|c| c.is_ascii_hexdigit()) {
        match digits.len() {
            6 => return format!("0xFF{}", digits.to_uppercase()),
            8 => return format!("0x{}", digits.to_uppercase()),
            _ => {}
        }
    }
    log::warn!("Invalid theme color '{}', using {}", value, fallback);
    argb_literal(fallback, "#000000")
}

pub fn render(theme: &Theme) -> String {
    let defaults = Theme::default();
    let primary = argb_literal(&theme.primary_color, &defaults.primary_color);
    let accent = argb_literal(&theme.accent_color, &defaults.accent_color);
    let background = argb_literal(&theme.background_color, &defaults.background_color);
    let text = argb_literal(&theme.text_color, &defaults.text_color);
    let font = if theme.font_family.trim().is_empty() {
        defaults.font_family
    } else {
        escape_dart_string(&theme.font_family)
    };

    format!(
        "import 'package:flutter/material.dart';

class AppTheme {{
  static const Color primaryColor = Color({primary});
  static const Color accentColor = Color({accent});
  static const Color backgroundColor = Color({background});
  static const Color textColor = Color({text});

  static ThemeData get lightTheme {{
    return ThemeData(
      primarySwatch: _createMaterialColor(primaryColor),
      primaryColor: primaryColor,
      colorScheme: ColorScheme.fromSeed(
        seedColor: primaryColor,
        brightness: Brightness.light,
      ),
      scaffoldBackgroundColor: backgroundColor,
      fontFamily: '{font}',
      textTheme: TextTheme(
        bodyLarge: TextStyle(color: textColor),
        bodyMedium: TextStyle(color: textColor),
        titleLarge: TextStyle(color: textColor),
      ),
{shared}    );
  }}

  static ThemeData get darkTheme {{
    return ThemeData(
      primarySwatch: _createMaterialColor(primaryColor),
      primaryColor: primaryColor,
      colorScheme: ColorScheme.fromSeed(
        seedColor: primaryColor,
        brightness: Brightness.dark,
      ),
      scaffoldBackgroundColor: Color(0xFF121212),
      fontFamily: '{font}',
      textTheme: TextTheme(
        bodyLarge: TextStyle(color: Colors.white),
        bodyMedium: TextStyle(color: Colors.white),
        titleLarge: TextStyle(color: Colors.white),
      ),
{shared}    );
  }}

{SWATCH_HELPER}}}
",
        shared = SHARED_COMPONENT_THEMES,
    )
}

const SHARED_COMPONENT_THEMES: &str = "      appBarTheme: AppBarTheme(
        backgroundColor: primaryColor,
        foregroundColor: Colors.white,
        elevation: 2,
      ),
      elevatedButtonTheme: ElevatedButtonThemeData(
        style: ElevatedButton.styleFrom(
          backgroundColor: primaryColor,
          foregroundColor: Colors.white,
        ),
      ),
      floatingActionButtonTheme: FloatingActionButtonThemeData(
        backgroundColor: accentColor,
      ),
";

const SWATCH_HELPER: &str = "  static MaterialColor _createMaterialColor(Color color) {
    final strengths = <double>[.05];
    final swatch = <int, Color>{};
    final r = (color.r * 255).round();
    final g = (color.g * 255).round();
    final b = (color.b * 255).round();

    for (int i = 1; i < 10; i++) {
      strengths.add(0.1 * i);
    }

    for (final strength in strengths) {
      final double ds = 0.5 - strength;
      swatch[(strength * 1000).round()] = Color.fromRGBO(
        r + ((ds < 0 ? r : (255 - r)) * ds).round(),
        g + ((ds < 0 ? g : (255 - g)) * ds).round(),
        b + ((ds < 0 ? b : (255 - b)) * ds).round(),
        1,
      );
    }

    return MaterialColor(color.toARGB32(), swatch);
  }
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::check_dart_syntax;

    #[test]
    fn test_argb_literal() {
        assert_eq!(argb_literal("#1e88e5", "#2196F3"), "0xFF1E88E5");
        assert_eq!(argb_literal("80FFFFFF", "#2196F3"), "0x80FFFFFF");
        assert_eq!(argb_literal("blue", "#2196F3"), "0xFF2196F3");
        assert_eq!(argb_literal("#12345", "#2196F3"), "0xFF2196F3");
    }

    #[test]
    fn test_theme_file() {
        let theme = Theme {
            primary_color: "#00796B".to_string(),
            accent_color: "nope".to_string(),
            font_family: String::new(),
            ..Theme::default()
        };
        let code = render(&theme);
        assert!(code.contains("static const Color primaryColor = Color(0xFF00796B);"));
        assert!(code.contains("static const Color accentColor = Color(0xFFFF4081);"));
        assert_eq!(code.matches("fontFamily: 'Roboto',").count(), 2);
        assert_eq!(code.matches("floatingActionButtonTheme").count(), 2);
        assert_eq!(check_dart_syntax(&code), None);
    }
}
