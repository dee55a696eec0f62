//! Project orchestration
//!
//! Generation happens in two steps. [`ProjectGenerator::render`] turns a
//! snapshot into an in-memory file map and never touches the disk;
//! [`ProjectGenerator::write`] lays the map out under an output directory,
//! retrying transient I/O failures.

use crate::context::GeneratorContext;
use crate::error::{GeneratorError, Result};
use crate::flutter::{self, ANALYSIS_OPTIONS};
use crate::screens::ScreenGenerator;
use crate::services;
use crate::snapshot::Snapshot;
use crate::utils::check_dart_syntax;
use crate::GeneratorOptions;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directories created even when nothing is written into them
pub const PROJECT_SKELETON: &[&str] = &[
    "lib/screens",
    "lib/widgets",
    "lib/services",
    "lib/models",
    "lib/theme",
    "lib/routes",
    "lib/utils",
    "assets/images",
    "assets/fonts",
];

/// Everything one generation run produced, keyed by project-relative path
#[derive(Debug, Clone, Default)]
pub struct GeneratedProject {
    pub project_dir: String,
    pub files: BTreeMap<PathBuf, String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl GeneratedProject {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.values().map(|content| content.len() as u64).sum()
    }

    pub fn file(&self, relative: &str) -> Option<&str> {
        self.files.get(Path::new(relative)).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    pub root: PathBuf,
    pub files_written: usize,
    pub bytes_written: u64,
}

pub struct ProjectGenerator {
    options: GeneratorOptions,
    screens: ScreenGenerator,
}

impl ProjectGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            screens: ScreenGenerator::new(),
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Project directory name: the package name with dots turned into underscores
    pub fn project_dir_name(snapshot: &Snapshot) -> String {
        snapshot.application().package_name.trim().replace('.', "_")
    }

    pub fn render(&self, snapshot: &Snapshot) -> GeneratedProject {
        let app = snapshot.application();
        log::info!("Rendering '{}' ({})", app.name, app.package_name);

        let mut ctx = GeneratorContext::with_max_depth(snapshot, self.options.max_widget_depth);
        for warning in snapshot.validate() {
            ctx.add_warning(warning);
        }

        let mut files = BTreeMap::new();
        files.insert(PathBuf::from("pubspec.yaml"), flutter::pubspec::render(app));
        files.insert(PathBuf::from("analysis_options.yaml"), ANALYSIS_OPTIONS.to_string());
        files.insert(PathBuf::from("lib/main.dart"), flutter::main_dart::render(&ctx));
        files.insert(PathBuf::from("lib/theme/app_theme.dart"), flutter::theme::render(&app.theme));
        files.insert(PathBuf::from("lib/routes/app_routes.dart"), flutter::routes::render(&mut ctx));

        log::info!("Generating {} screens", snapshot.screens().len());
        for screen in snapshot.screens() {
            let artifact = self.screens.generate(screen, &mut ctx);
            if let Some(problem) = check_dart_syntax(&artifact.code) {
                ctx.add_warning(format!("Screen '{}' may not compile: {}", screen.name, problem));
            }
            let path = PathBuf::from("lib/screens").join(&artifact.file_name);
            if files.contains_key(&path) {
                ctx.add_warning(format!(
                    "Screen '{}' overwrites {}, another screen maps to the same file",
                    screen.name,
                    path.display()
                ));
            }
            if self.options.debug_mode {
                log::debug!("{} -> {} ({} bytes)", artifact.class_name, path.display(), artifact.code.len());
            }
            files.insert(path, artifact.code);
        }

        log::info!("Generating services for {} data sources", snapshot.data_sources().len());
        files.insert(
            PathBuf::from("lib/services/api_service.dart"),
            services::api_service::render(&mut ctx),
        );
        files.insert(PathBuf::from("lib/models/app_models.dart"), services::models::render());
        if self.options.emit_custom_widgets {
            files.insert(
                PathBuf::from("lib/widgets/custom_widgets.dart"),
                flutter::custom_widgets::render(),
            );
        }

        let (warnings, errors) = ctx.into_diagnostics();
        log::info!(
            "Rendered {} files with {} warnings and {} errors",
            files.len(),
            warnings.len(),
            errors.len()
        );
        GeneratedProject {
            project_dir: Self::project_dir_name(snapshot),
            files,
            warnings,
            errors,
        }
    }

    /// Write a rendered project below `output_dir`. The project directory is
    /// wiped first when `clean_output` is set.
    pub fn write<P: AsRef<Path>>(&self, project: &GeneratedProject, output_dir: P) -> Result<WriteReport> {
        let root = output_dir.as_ref().join(&project.project_dir);
        log::info!("Writing project to {}", root.display());

        if self.options.clean_output && root.exists() {
            log::debug!("Removing existing {}", root.display());
            self.with_retry(&format!("remove {}", root.display()), || fs::remove_dir_all(&root))?;
        }

        for dir in PROJECT_SKELETON {
            fs::create_dir_all(root.join(dir))?;
        }

        let mut report = WriteReport {
            root: root.clone(),
            ..WriteReport::default()
        };
        for (relative, content) in &project.files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            self.with_retry(&format!("write {}", path.display()), || fs::write(&path, content))?;
            log::debug!("Wrote {} ({} bytes)", relative.display(), content.len());
            report.files_written += 1;
            report.bytes_written += content.len() as u64;
        }
        Ok(report)
    }

    /// Run `op`, retrying transient failures with exponential backoff
    fn with_retry<T>(&self, label: &str, op: impl FnMut() -> std::io::Result<T>) -> Result<T> {
        retry(self.options.write_retries, self.options.retry_backoff_ms, label, op)
    }
}

pub(crate) fn retry<T>(
    attempts: u32,
    backoff_ms: u64,
    label: &str,
    mut op: impl FnMut() -> std::io::Result<T>,
) -> Result<T> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let error = GeneratorError::Io(e);
                if attempt >= attempts || !error.is_transient() {
                    return Err(error);
                }
                let delay = backoff_ms.saturating_mul(1 << (attempt - 1).min(16));
                log::warn!(
                    "Attempt {}/{} to {} failed: {}; retrying in {}ms",
                    attempt,
                    attempts,
                    label,
                    error,
                    delay
                );
                std::thread::sleep(Duration::from_millis(delay));
                attempt += 1;
            }
        }
    }
}
