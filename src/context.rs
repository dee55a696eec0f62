//! Per-run generation state
//!
//! One context lives for one generation run. It carries the read-only
//! snapshot, flags derived from it once up front, and the diagnostics that
//! handlers record along the way.

use crate::error::{GeneratorError, Result};
use crate::model::{Screen, WidgetId};
use crate::snapshot::Snapshot;
use std::collections::HashSet;

/// Screens with hand-written templates instead of the generic assembler
pub const SPLASH_SCREEN: &str = "SplashScreen";
pub const CONFIGURATION_SCREEN: &str = "Configuration";

pub const DEFAULT_MAX_WIDGET_DEPTH: usize = 64;

pub struct GeneratorContext<'a> {
    pub snapshot: &'a Snapshot,
    pub uses_dynamic_url: bool,
    pub has_config_screen: bool,
    pub initial_route: String,
    current_screen: Option<&'a Screen>,
    warnings: Vec<String>,
    errors: Vec<String>,
    visiting: HashSet<WidgetId>,
    depth: usize,
    max_depth: usize,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self::with_max_depth(snapshot, DEFAULT_MAX_WIDGET_DEPTH)
    }

    pub fn with_max_depth(snapshot: &'a Snapshot, max_depth: usize) -> Self {
        let has_config_screen = snapshot.screen_named(CONFIGURATION_SCREEN).is_some();
        let uses_dynamic_url = has_config_screen
            || snapshot
                .data_sources()
                .iter()
                .any(|source| source.use_dynamic_base_url);

        Self {
            snapshot,
            uses_dynamic_url,
            has_config_screen,
            initial_route: initial_route(snapshot),
            current_screen: None,
            warnings: Vec::new(),
            errors: Vec::new(),
            visiting: HashSet::new(),
            depth: 0,
            max_depth,
        }
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.errors.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_diagnostics(self) -> (Vec<String>, Vec<String>) {
        (self.warnings, self.errors)
    }

    pub fn set_current_screen(&mut self, screen: Option<&'a Screen>) {
        self.current_screen = screen;
    }

    pub fn current_screen(&self) -> Option<&'a Screen> {
        self.current_screen
    }

    pub fn on_screen(&self, name: &str) -> bool {
        self.current_screen.map_or(false, |s| s.name == name)
    }

    /// Mark a widget as being rendered. Fails on re-entry or when the depth ceiling is hit.
    pub fn enter(&mut self, widget: WidgetId) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(GeneratorError::LimitExceeded {
                limit_type: "widget nesting depth".to_string(),
                limit: self.max_depth,
            });
        }
        if !self.visiting.insert(widget) {
            return Err(GeneratorError::codegen(format!(
                "Widget {} is its own ancestor",
                widget
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self, widget: WidgetId) {
        if self.visiting.remove(&widget) {
            self.depth = self.depth.saturating_sub(1);
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Route used by the splash screen once its delay elapses
    pub fn splash_next_route(&self) -> String {
        self.snapshot
            .screen_named("Home")
            .or_else(|| {
                self.snapshot
                    .screens()
                    .iter()
                    .find(|s| s.name != SPLASH_SCREEN && s.name != CONFIGURATION_SCREEN)
            })
            .map_or_else(|| "/home".to_string(), |s| s.route_name.clone())
    }

    /// Route the configuration screen continues to after saving
    pub fn home_route(&self) -> String {
        self.snapshot
            .screens()
            .iter()
            .find(|s| s.is_home_screen)
            .map_or_else(|| "/home".to_string(), |s| s.route_name.clone())
    }
}

fn initial_route(snapshot: &Snapshot) -> String {
    if let Some(splash) = snapshot.screen_named(SPLASH_SCREEN) {
        return splash.route_name.clone();
    }
    snapshot
        .screens()
        .iter()
        .find(|s| s.name == "Home" || s.is_home_screen)
        .map_or_else(|| "/home".to_string(), |s| s.route_name.clone())
}
