use crate::{
    analyze_snapshot, cli::OutputFormat, generate_project_with_options, utils::to_snake_case, GenerationStats,
    GeneratorError, GeneratorOptions, ProjectGenerator, Result, Snapshot,
};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Instant;

fn required<'a>(matches: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    matches.get_one::<String>(name).ok_or_else(|| GeneratorError::InvalidFormat {
        message: format!("Missing required argument '{}'", name),
    })
}

// --- GENERATE ---
pub fn handle_generate_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let output_dir = cli.output_directory(matches);
    let options = cli.build_generator_options(matches);

    if matches.get_flag("dry-run") {
        return dry_run(input_path, options, matches.get_flag("stats"));
    }

    if matches.get_flag("watch") {
        watch_and_generate(input_path, &output_dir, options)
    } else {
        generate_once(input_path, &output_dir, options, matches.get_flag("stats"))
    }
}

fn generate_once(input_path: &str, output_dir: &str, options: GeneratorOptions, show_stats: bool) -> Result<()> {
    println!("🔨 Generating {} -> {}", input_path, output_dir);

    let stats = generate_project_with_options(input_path, output_dir, options)?;

    println!("✅ Generation successful!");
    println!("   Files: {} ({} bytes)", stats.file_count, stats.bytes_written);
    println!("   Time: {}ms", stats.generation_time_ms);
    if stats.warning_count > 0 || stats.error_count > 0 {
        println!(
            "   Diagnostics: {} warnings, {} errors (run with -v to see them)",
            stats.warning_count, stats.error_count
        );
    }

    if show_stats {
        print_detailed_stats(&stats);
    }
    Ok(())
}

fn dry_run(input_path: &str, options: GeneratorOptions, show_stats: bool) -> Result<()> {
    println!("🔍 Dry run for {}", input_path);

    let start = Instant::now();
    let snapshot = Snapshot::load(input_path)?;
    let project = ProjectGenerator::new(options).render(&snapshot);
    let mut stats = GenerationStats::from_project(&snapshot, &project);
    stats.generation_time_ms = start.elapsed().as_millis() as u64;

    println!("   Project directory: {}", project.project_dir);
    for (path, content) in &project.files {
        println!("   {} ({} bytes)", path.display(), content.len());
    }
    print_diagnostics(&project.warnings, &project.errors);

    if show_stats {
        print_detailed_stats(&stats);
    }
    Ok(())
}

fn watch_and_generate(input_path: &str, output_dir: &str, options: GeneratorOptions) -> Result<()> {
    println!("👀 Watching {} for changes...", input_path);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| GeneratorError::Io(std::io::Error::new(std::io::ErrorKind::Other, format!("Failed to create file watcher: {}", e))))?;

    watcher
        .watch(Path::new(input_path), RecursiveMode::NonRecursive)
        .map_err(|e| GeneratorError::Io(std::io::Error::new(std::io::ErrorKind::Other, format!("Failed to watch file: {}", e))))?;

    match generate_project_with_options(input_path, output_dir, options.clone()) {
        Ok(_) => println!("✅ Initial generation successful"),
        Err(e) => eprintln!("❌ Initial generation failed: {}", e),
    }

    loop {
        match rx.recv() {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    continue;
                }
                println!("🔄 Snapshot changed, regenerating...");
                match generate_project_with_options(input_path, output_dir, options.clone()) {
                    Ok(stats) => println!(
                        "✅ Regenerated {} files ({} warnings, {}ms)",
                        stats.file_count, stats.warning_count, stats.generation_time_ms
                    ),
                    Err(e) => eprintln!("❌ Generation failed: {}", e),
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

// --- CHECK ---
pub fn handle_check_command(matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let recursive = matches.get_flag("recursive");

    if recursive && Path::new(input_path).is_dir() {
        check_directory_recursive(input_path)
    } else {
        check_single_file(Path::new(input_path))
    }
}

/// Load and render one snapshot. Render errors fail the check; warnings do not.
fn check_single_file(input_path: &Path) -> Result<()> {
    println!("🔍 Checking {}", input_path.display());
    let snapshot = match Snapshot::load(input_path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            println!("❌ {} - {}", input_path.display(), e);
            return Err(e);
        }
    };

    let project = ProjectGenerator::new(GeneratorOptions::default()).render(&snapshot);
    print_diagnostics(&project.warnings, &project.errors);
    if project.errors.is_empty() {
        println!("✅ {} - {} warnings", input_path.display(), project.warnings.len());
        Ok(())
    } else {
        println!("❌ {} - {} errors", input_path.display(), project.errors.len());
        Err(GeneratorError::snapshot(format!(
            "{} produced {} generation errors",
            input_path.display(),
            project.errors.len()
        )))
    }
}

fn check_directory_recursive(dir_path: &str) -> Result<()> {
    let mut total_files = 0;
    let mut error_files = 0;

    for entry in walkdir::WalkDir::new(dir_path).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            GeneratorError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Directory traversal error: {}", e),
            ))
        })?;
        if entry.file_type().is_file() && entry.path().extension().map_or(false, |ext| ext == "json") {
            total_files += 1;
            if check_single_file(entry.path()).is_err() {
                error_files += 1;
            }
        }
    }

    println!("\n📊 Check Summary:");
    println!("   Total snapshots: {}", total_files);
    println!("   Snapshots with errors: {}", error_files);
    if total_files > 0 {
        println!(
            "   Success rate: {:.1}%",
            (total_files - error_files) as f64 / total_files as f64 * 100.0
        );
    }

    if error_files > 0 {
        Err(GeneratorError::snapshot(format!("{} snapshots have errors", error_files)))
    } else {
        Ok(())
    }
}

// --- ANALYZE ---
pub fn handle_analyze_command(matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required(matches, "input")?;
    let output_path = matches.get_one::<String>("output");
    let format = matches.get_one::<OutputFormat>("format").unwrap_or(&OutputFormat::Debug);

    println!("🔬 Analyzing {}", input_path);

    let snapshot = Snapshot::load(input_path)?;
    let report = analyze_snapshot(&snapshot);
    let analysis = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report).map_err(|e| GeneratorError::CodeGen {
            message: format!("JSON serialization error: {}", e),
        })?,
        OutputFormat::Debug => format!("Snapshot Analysis: {}\n\n{:#?}", input_path, report),
    };

    if let Some(output_file) = output_path {
        std::fs::write(output_file, analysis)?;
        println!("✅ Analysis saved to {}", output_file);
    } else {
        println!("{}", analysis);
    }
    Ok(())
}

// --- INIT ---
pub fn handle_init_command(matches: &clap::ArgMatches) -> Result<()> {
    let app_name = required(matches, "name")?;

    println!("🚀 Initializing new application snapshot: {}", app_name);

    let project_dir = PathBuf::from(to_snake_case(app_name));
    if project_dir.exists() {
        return Err(GeneratorError::InvalidFormat {
            message: format!("Directory '{}' already exists", project_dir.display()),
        });
    }
    std::fs::create_dir_all(&project_dir)?;

    let snapshot_path = project_dir.join("app.json");
    std::fs::write(&snapshot_path, starter_snapshot(app_name)?)?;

    println!("✅ Snapshot created successfully!");
    println!("   File: {}", snapshot_path.display());
    println!("\nNext steps:");
    println!("   {} generate {} -o build", crate::NAME, snapshot_path.display());

    Ok(())
}

/// Two-screen application: a splash that hands over to a home screen
fn starter_snapshot(app_name: &str) -> Result<String> {
    let package = to_snake_case(app_name);
    let package = if package.is_empty() { "app".to_string() } else { package };
    let snapshot = serde_json::json!({
        "name": app_name,
        "package_name": format!("com.example.{}", package),
        "version": "1.0.0",
        "theme": {
            "primary_color": "#2196F3",
            "accent_color": "#FF4081",
            "background_color": "#FFFFFF",
            "text_color": "#000000",
            "font_family": "Roboto"
        },
        "screens": [
            {
                "id": 1,
                "name": "SplashScreen",
                "route_name": "/",
                "show_app_bar": false,
                "widgets": [
                    {"id": 1, "widget_type": "Text", "properties": [
                        {"property_name": "text", "property_type": "string", "string_value": app_name}
                    ]}
                ]
            },
            {
                "id": 2,
                "name": "Home",
                "route_name": "/home",
                "is_home_screen": true,
                "app_bar_title": app_name,
                "widgets": [
                    {"id": 2, "widget_type": "Column"},
                    {"id": 3, "widget_type": "Text", "parent": 2, "order": 0, "properties": [
                        {"property_name": "text", "property_type": "string", "string_value": format!("Welcome to {}", app_name)}
                    ]},
                    {"id": 4, "widget_type": "ElevatedButton", "parent": 2, "order": 1, "properties": [
                        {"property_name": "text", "property_type": "string", "string_value": "Get Started"}
                    ]}
                ]
            }
        ],
        "data_sources": [],
        "actions": []
    });
    serde_json::to_string_pretty(&snapshot).map_err(|e| GeneratorError::CodeGen {
        message: format!("JSON serialization error: {}", e),
    })
}

// --- HELPERS ---
fn print_diagnostics(warnings: &[String], errors: &[String]) {
    for warning in warnings {
        println!("   ⚠️  {}", warning);
    }
    for error in errors {
        println!("   ❌ {}", error);
    }
}

fn print_detailed_stats(stats: &GenerationStats) {
    println!("\n📊 Detailed Generation Statistics:");
    println!("   Screens: {}", stats.screen_count);
    println!("   Widgets: {}", stats.widget_count);
    println!("   Data sources: {}", stats.data_source_count);
    println!("   Files: {}", stats.file_count);
    println!("   Bytes: {}", stats.bytes_written);
    println!("   Warnings: {}", stats.warning_count);
    println!("   Errors: {}", stats.error_count);
    println!("   Generation time: {}ms", stats.generation_time_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_starter_snapshot_generates() {
        let json = starter_snapshot("Todo List").unwrap();
        let snapshot = Snapshot::from_json_str(&json, "starter").unwrap();
        assert_eq!(snapshot.application().package_name, "com.example.todo_list");
        assert_eq!(snapshot.screens().len(), 2);

        let project = ProjectGenerator::new(GeneratorOptions::default()).render(&snapshot);
        assert!(project.errors.is_empty());
        assert!(project.warnings.is_empty(), "{:?}", project.warnings);
        assert!(project
            .file("lib/screens/home_screen.dart")
            .unwrap()
            .contains("Text('Welcome to Todo List')"));
    }

    #[test]
    fn test_check_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("apps");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("todo.json"), starter_snapshot("Todo").unwrap()).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "not a snapshot").unwrap();
        assert!(check_directory_recursive(temp_dir.path().to_str().unwrap()).is_ok());

        fs::write(nested.join("broken.json"), "{").unwrap();
        assert!(check_directory_recursive(temp_dir.path().to_str().unwrap()).is_err());
    }
}
