//! `pubspec.yaml`

use crate::model::Application;
use crate::utils::to_snake_case;

pub const SDK_CONSTRAINT: &str = ">=3.0.0 <4.0.0";

pub const DEFAULT_DEPENDENCIES: &[(&str, &str)] = &[
    ("http", "^1.1.0"),
    ("shared_preferences", "^2.2.2"),
    ("url_launcher", "^6.2.1"),
    ("image_picker", "^1.0.4"),
    ("path_provider", "^2.1.1"),
];

const DEFAULT_DESCRIPTION: &str = "A Flutter application generated by Flutter App Builder";

/// Dart package name: the last segment of the application id
pub fn package_name(app: &Application) -> String {
    let last = app.package_name.rsplit('.').next().unwrap_or(&app.package_name);
    let name = to_snake_case(last);
    if name.is_empty() {
        "app".to_string()
    } else {
        name
    }
}

/// Version constraint for a registered custom package
fn constraint(version: &str) -> String {
    let version = version.trim();
    if version.is_empty() {
        "any".to_string()
    } else if version.starts_with(|c: char| c.is_ascii_digit()) {
        format!("^{}", version)
    } else {
        version.to_string()
    }
}

/// Plain scalars that YAML could misread are single-quoted
fn scalar(value: &str) -> String {
    const SPECIAL: &[char] = &[
        '>', '<', ':', '{', '}', '[', ']', ',', '&', '*', '#', '?', '|', '-', '=', '!', '%', '@', '`', '\'', '"',
    ];
    if value.is_empty() || value.contains(SPECIAL) {
        format!("'{}'", value.replace('\'', "''"))
    } else {
        value.to_string()
    }
}

pub fn render(app: &Application) -> String {
    let description = app
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION);

    let mut dependencies: Vec<(String, String)> = DEFAULT_DEPENDENCIES
        .iter()
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect();
    for custom in app.custom_widgets.iter().filter(|c| c.is_active) {
        let name = custom.package_name.trim();
        if name.is_empty() {
            continue;
        }
        let version = constraint(&custom.package_version);
        match dependencies.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = version,
            None => dependencies.push((name.to_string(), version)),
        }
    }

    let mut yaml = format!(
        "name: {}\ndescription: {}\nversion: {}\npublish_to: 'none'\n\nenvironment:\n  sdk: {}\n\ndependencies:\n  flutter:\n    sdk: flutter\n",
        package_name(app),
        scalar(description),
        scalar(&format!("{}+1", app.version)),
        scalar(SDK_CONSTRAINT),
    );
    for (name, version) in &dependencies {
        yaml.push_str(&format!("  {}: {}\n", name, scalar(version)));
    }
    yaml.push_str(
        "
dev_dependencies:
  flutter_test:
    sdk: flutter
  flutter_lints: ^3.0.0

flutter:
  uses-material-design: true
  assets:
    - assets/images/
",
    );
    yaml
}
