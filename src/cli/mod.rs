mod config;
mod handlers;

use crate::error::Result;
use crate::GeneratorOptions;
use clap::{Arg, ArgAction, Command, ValueEnum};
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Debug,
}

pub struct EnhancedCli {
    config: config::ConfigFile,
    start_time: Instant,
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        self.setup_logging(matches.get_count("verbose"))?;

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        let result = match matches.subcommand() {
            Some(("generate", sub_matches)) => handlers::handle_generate_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(sub_matches),
            Some(("analyze", sub_matches)) => handlers::handle_analyze_command(sub_matches),
            Some(("init", sub_matches)) => handlers::handle_init_command(sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        };
        log::debug!("Finished in {}ms", self.start_time.elapsed().as_millis());
        result
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("Flutterc Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("generate")
                    .about("Generate a Flutter project from an application snapshot")
                    .arg(Arg::new("input").help("Snapshot JSON file").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("DIR").help("Output directory"))
                    .arg(Arg::new("clean").long("clean").help("Remove the existing project directory first").action(ArgAction::SetTrue))
                    .arg(Arg::new("dry-run").long("dry-run").help("Render in memory and list files without writing").action(ArgAction::SetTrue))
                    .arg(Arg::new("debug").short('d').long("debug").help("Log per-screen detail").action(ArgAction::SetTrue))
                    .arg(Arg::new("max-depth").long("max-depth").value_name("N").value_parser(clap::value_parser!(usize)).help("Maximum widget nesting depth"))
                    .arg(Arg::new("no-custom-widgets").long("no-custom-widgets").help("Skip lib/widgets/custom_widgets.dart").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show detailed generation statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch the snapshot and regenerate on change").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Validate snapshots and report generation diagnostics")
                    .arg(Arg::new("input").help("Snapshot file or directory").required(true).index(1))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Check every .json file in the directory recursively").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("analyze")
                    .about("Summarize widget usage and generation statistics")
                    .arg(Arg::new("input").help("Snapshot JSON file").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output analysis to file"))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(OutputFormat)).default_value("debug").help("Analysis output format")),
            )
            .subcommand(
                Command::new("init")
                    .about("Write a starter application snapshot")
                    .arg(Arg::new("name").help("Application name").required(true).index(1)),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
        Ok(())
    }

    /// Output directory: the flag, then the config file, then the current directory
    pub fn output_directory(&self, matches: &clap::ArgMatches) -> String {
        matches
            .get_one::<String>("output")
            .cloned()
            .or_else(|| self.config.output_directory.clone())
            .unwrap_or_else(|| ".".to_string())
    }

    pub fn build_generator_options(&self, matches: &clap::ArgMatches) -> GeneratorOptions {
        merge_options(&self.config, matches)
    }
}

/// Config file values over the defaults, explicit flags over both
fn merge_options(config: &config::ConfigFile, matches: &clap::ArgMatches) -> GeneratorOptions {
    let mut options = GeneratorOptions::default();
    if let Some(depth) = config.max_widget_depth {
        options.max_widget_depth = depth;
    }
    if let Some(retries) = config.write_retries {
        options.write_retries = retries;
    }
    if let Some(backoff) = config.retry_backoff_ms {
        options.retry_backoff_ms = backoff;
    }
    if let Some(emit) = config.emit_custom_widgets {
        options.emit_custom_widgets = emit;
    }

    options.debug_mode = matches.get_flag("debug") || config.debug_mode.unwrap_or(false);
    options.clean_output = matches.get_flag("clean") || config.clean_output.unwrap_or(false);
    if matches.get_flag("no-custom-widgets") {
        options.emit_custom_widgets = false;
    }
    if let Some(depth) = matches.get_one::<usize>("max-depth") {
        options.max_widget_depth = *depth;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_matches(args: &[&str]) -> clap::ArgMatches {
        let mut argv = vec!["flutterc", "generate", "app.json"];
        argv.extend_from_slice(args);
        let matches = EnhancedCli::new().build_cli().get_matches_from(argv);
        matches.subcommand_matches("generate").unwrap().clone()
    }

    #[test]
    fn test_flags_override_config() {
        let config = config::ConfigFile {
            max_widget_depth: Some(12),
            clean_output: Some(false),
            emit_custom_widgets: Some(true),
            write_retries: Some(5),
            ..Default::default()
        };
        let options = merge_options(&config, &generate_matches(&["--clean", "--max-depth", "20", "--no-custom-widgets"]));
        assert_eq!(options.max_widget_depth, 20);
        assert!(options.clean_output);
        assert!(!options.emit_custom_widgets);
        assert_eq!(options.write_retries, 5);
        assert_eq!(options.retry_backoff_ms, 100);
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let config = config::ConfigFile {
            max_widget_depth: Some(12),
            debug_mode: Some(true),
            ..Default::default()
        };
        let options = merge_options(&config, &generate_matches(&[]));
        assert_eq!(options.max_widget_depth, 12);
        assert!(options.debug_mode);
        assert!(!options.clean_output);
    }

    #[test]
    fn test_output_directory_precedence() {
        let mut cli = EnhancedCli::new();
        assert_eq!(cli.output_directory(&generate_matches(&[])), ".");
        cli.config.output_directory = Some("build".to_string());
        assert_eq!(cli.output_directory(&generate_matches(&[])), "build");
        assert_eq!(cli.output_directory(&generate_matches(&["-o", "out"])), "out");
    }
}
