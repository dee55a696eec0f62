//! Project-level Dart and YAML files: entry point, theme, routes, pubspec
//! and the shared widget library.

pub mod custom_widgets;
pub mod main_dart;
pub mod pubspec;
pub mod routes;
pub mod theme;

pub const ANALYSIS_OPTIONS: &str = "include: package:flutter_lints/flutter.yaml

linter:
  rules:
    prefer_const_constructors: false
    library_private_types_in_public_api: false
    avoid_print: false
";
