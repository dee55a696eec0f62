//! Flutter Project Generator
//!
//! Turns a JSON application snapshot (screens, widget trees, actions and
//! data sources configured in a no-code builder) into a ready-to-build
//! Flutter project written in Dart.
//!
//! # Features
//!
//! - Handlers for more than sixty widget types, plus `Custom_*` pub.dev widgets
//! - Static and data-bound lists and grids with loading, error and empty states
//! - Action callbacks (navigation, dialogs, API calls, URL launches, ...)
//! - Splash and first-run configuration screens with persisted base URLs
//! - Best-effort output: broken widgets become visible placeholders
//!
//! # Basic Usage
//!
//! ```no_run
//! use flutterc::{generate_project, Result};
//!
//! fn main() -> Result<()> {
//!     let stats = generate_project("app.json", "build")?;
//!     println!("{} files written", stats.file_count);
//!     Ok(())
//! }
//! ```
//!
//! # Generation Pipeline
//!
//! 1. **Snapshot**: parse the JSON document and index widgets by id and parent
//! 2. **Project files**: pubspec, analysis options, entry point, theme, routes
//! 3. **Screens**: walk each screen's widget forest through the handler registry
//! 4. **Services**: API client with one fetch method per data source, shared models
//! 5. **Write**: lay the file map out on disk, retrying transient failures

pub mod actions;
pub mod bindings;
pub mod cli;
pub mod context;
pub mod error;
pub mod flutter;
pub mod generator;
pub mod model;
pub mod properties;
pub mod screens;
pub mod services;
pub mod snapshot;
pub mod utils;
pub mod widgets;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

// Re-export commonly used types and functions
pub use cli::EnhancedCli;
pub use context::{GeneratorContext, DEFAULT_MAX_WIDGET_DEPTH};
pub use error::{GeneratorError, Result};
pub use generator::{GeneratedProject, ProjectGenerator, WriteReport};
pub use model::{Application, PropertyValue, Screen, Widget};
pub use screens::{ScreenArtifact, ScreenGenerator};
pub use snapshot::Snapshot;
pub use widgets::{WidgetGenerator, WidgetHandler};

/// Generator version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Generation options and settings
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Log per-screen detail while rendering
    pub debug_mode: bool,

    /// Deepest widget nesting rendered before a subtree is cut off
    pub max_widget_depth: usize,

    /// Attempts per file write (and per directory removal) before giving up
    pub write_retries: u32,

    /// Base delay between attempts; doubles on every retry
    pub retry_backoff_ms: u64,

    /// Remove an existing project directory before writing
    pub clean_output: bool,

    /// Emit `lib/widgets/custom_widgets.dart`
    pub emit_custom_widgets: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            debug_mode: false,
            max_widget_depth: DEFAULT_MAX_WIDGET_DEPTH,
            write_retries: 3,
            retry_backoff_ms: 100,
            clean_output: false,
            emit_custom_widgets: true,
        }
    }
}

/// Generation statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    /// Screens rendered
    pub screen_count: usize,

    /// Widget records in the snapshot
    pub widget_count: usize,

    /// Configured data sources
    pub data_source_count: usize,

    /// Files in the generated project
    pub file_count: usize,

    /// Bytes written to disk (rendered bytes on a dry run)
    pub bytes_written: u64,

    pub warning_count: usize,
    pub error_count: usize,

    /// Wall time in milliseconds
    pub generation_time_ms: u64,
}

impl GenerationStats {
    pub fn from_project(snapshot: &Snapshot, project: &GeneratedProject) -> Self {
        Self {
            screen_count: snapshot.screens().len(),
            widget_count: snapshot.widget_count(),
            data_source_count: snapshot.data_sources().len(),
            file_count: project.file_count(),
            bytes_written: project.total_bytes(),
            warning_count: project.warnings.len(),
            error_count: project.errors.len(),
            generation_time_ms: 0,
        }
    }
}

/// Main generator entry point with default options
pub fn generate_project<P: AsRef<Path>, Q: AsRef<Path>>(snapshot_path: P, output_dir: Q) -> Result<GenerationStats> {
    generate_project_with_options(snapshot_path, output_dir, GeneratorOptions::default())
}

/// Generate with custom options
pub fn generate_project_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    snapshot_path: P,
    output_dir: Q,
    options: GeneratorOptions,
) -> Result<GenerationStats> {
    let start_time = Instant::now();
    let snapshot_path = snapshot_path.as_ref();

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!(
            "Generating '{}' into '{}'...",
            snapshot_path.display(),
            output_dir.as_ref().display()
        );
        log::debug!("Generator options: {:?}", options);
    }

    let snapshot = Snapshot::load(snapshot_path)?;
    let generator = ProjectGenerator::new(options);
    let project = generator.render(&snapshot);
    let report = generator.write(&project, output_dir)?;

    let mut stats = GenerationStats::from_project(&snapshot, &project);
    stats.bytes_written = report.bytes_written;
    stats.generation_time_ms = start_time.elapsed().as_millis() as u64;

    if generator.options().debug_mode {
        log::info!("Generation successful!");
        log::info!("Project: {}", report.root.display());
        log::info!("Files: {} ({} bytes)", report.files_written, report.bytes_written);
        log::info!("Generation time: {}ms", stats.generation_time_ms);
        log::debug!("Full stats: {:?}", stats);
    }

    Ok(stats)
}

/// Snapshot overview for the `analyze` command
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotAnalysis {
    pub application: String,
    pub package_name: String,
    /// Widget count per type tag
    pub widget_types: BTreeMap<String, usize>,
    /// Type tags no handler accepts; these render as placeholders
    pub unknown_types: Vec<String>,
    /// Widgets with a data source field reference
    pub data_bound_widgets: usize,
    pub warnings: Vec<String>,
    pub stats: GenerationStats,
}

/// Render a snapshot in memory and summarize it without writing anything
pub fn analyze_snapshot(snapshot: &Snapshot) -> SnapshotAnalysis {
    let start_time = Instant::now();
    let registry = WidgetGenerator::new();

    let mut widget_types = BTreeMap::new();
    let mut data_bound_widgets = 0;
    for widget in snapshot.all_widgets() {
        *widget_types.entry(widget.widget_type.clone()).or_insert(0) += 1;
        if widget
            .properties
            .iter()
            .any(|p| matches!(p.value, PropertyValue::DataField(_)))
        {
            data_bound_widgets += 1;
        }
    }
    let unknown_types = widget_types
        .keys()
        .filter(|tag| !registry.supports(tag))
        .cloned()
        .collect();

    let project = ProjectGenerator::new(GeneratorOptions::default()).render(snapshot);
    let mut stats = GenerationStats::from_project(snapshot, &project);
    stats.generation_time_ms = start_time.elapsed().as_millis() as u64;

    let app = snapshot.application();
    SnapshotAnalysis {
        application: app.name.clone(),
        package_name: app.package_name.clone(),
        widget_types,
        unknown_types,
        data_bound_widgets,
        warnings: project.warnings,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const NEWS_APP: &str = include_str!("../demos/news_app.json");

    fn news_snapshot() -> Snapshot {
        Snapshot::from_json_str(NEWS_APP, "news_app.json").unwrap()
    }

    #[test]
    fn test_generate_news_app() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("news_app.json");
        let output_dir = temp_dir.path().join("build");
        fs::write(&input_path, NEWS_APP).unwrap();

        let stats = generate_project(&input_path, &output_dir).unwrap();
        assert_eq!(stats.screen_count, 4);
        assert_eq!(stats.data_source_count, 1);
        assert_eq!(stats.file_count, 12);
        assert!(stats.bytes_written > 0);
        assert_eq!(stats.error_count, 0);

        let root = output_dir.join("com_example_daily_news");
        let home = fs::read_to_string(root.join("lib/screens/home_screen.dart")).unwrap();
        assert!(home.contains("class HomeScreen extends StatefulWidget"));
        assert!(home.contains("_apiService.fetchData('Headlines')"));
        assert!(home.contains("Navigator.pushNamed(context, '/settings')"));
        assert!(home.contains("bottomNavigationBar: BottomNavigationBar("));
        assert!(home.contains("import 'package:shimmer/shimmer.dart';"));

        let splash = fs::read_to_string(root.join("lib/screens/splash_screen_screen.dart")).unwrap();
        assert!(splash.contains("Navigator.pushReplacementNamed(context, '/configuration');"));

        let api = fs::read_to_string(root.join("lib/services/api_service.dart")).unwrap();
        assert!(api.contains("Future<dynamic> fetchHeadlines() async"));
        assert!(api.contains("import 'package:shared_preferences/shared_preferences.dart';"));

        let pubspec = fs::read_to_string(root.join("pubspec.yaml")).unwrap();
        assert!(pubspec.contains("  shimmer: ^3.0.0\n"));

        let main = fs::read_to_string(root.join("lib/main.dart")).unwrap();
        assert!(main.contains("initialRoute: '/',"));
    }

    #[test]
    fn test_unsupported_widget_is_a_placeholder() {
        let project = ProjectGenerator::new(GeneratorOptions::default()).render(&news_snapshot());
        let settings = project.file("lib/screens/settings_screen.dart").unwrap();
        assert!(settings.contains("Container(child: Text('Unsupported widget: Hologram'))"));
        assert!(project
            .warnings
            .iter()
            .any(|w| w == "No handler for widget type: Hologram"));
    }

    #[test]
    fn test_missing_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let result = generate_project(temp_dir.path().join("missing.json"), temp_dir.path());
        assert!(matches!(result, Err(GeneratorError::FileNotFound { .. })));
    }

    #[test]
    fn test_malformed_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("broken.json");
        fs::write(&input_path, "{ \"name\": ").unwrap();
        let result = generate_project(&input_path, temp_dir.path());
        assert!(matches!(result, Err(GeneratorError::Json { .. })));
    }

    #[test]
    fn test_analyze_snapshot() {
        let analysis = analyze_snapshot(&news_snapshot());
        assert_eq!(analysis.package_name, "com.example.daily_news");
        assert_eq!(analysis.widget_types.get("Text"), Some(&2));
        assert_eq!(analysis.unknown_types, vec!["Hologram".to_string()]);
        assert_eq!(analysis.data_bound_widgets, 1);
        assert_eq!(analysis.stats.screen_count, 4);
        assert_eq!(analysis.stats.widget_count, 11);

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["stats"]["file_count"], 12);
    }

    #[test]
    fn test_default_options() {
        let options = GeneratorOptions::default();
        assert_eq!(options.max_widget_depth, 64);
        assert_eq!(options.write_retries, 3);
        assert_eq!(options.retry_backoff_ms, 100);
        assert!(!options.clean_output);
        assert!(options.emit_custom_widgets);
    }
}
