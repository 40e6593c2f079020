//! Command-line interface for rowpager
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading, environment overrides and validation
//! - Mode selection (interactive pager vs dumping every page)
//! - The `version` and `config` subcommands

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{Config, LogLevel, SourceFormat};
use crate::error::Result;

/// rowpager - Incremental terminal pager for nested data
#[derive(Parser, Debug)]
#[command(
    name = "rowpager",
    version,
    about = "Page through nested data a screenful of rows at a time",
    long_about = "Pages through JSON documents and text files. Nested JSON objects with an
`items` array are paginated as panels, sharing each page's row budget with their
siblings. Data is read lazily, only as far as the pages displayed so far require."
)]
pub struct CliArgs {
    /// Input file (JSON array or text)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Rows per page (0 shows everything on one page)
    #[arg(short = 'r', long = "rows", value_name = "ROWS")]
    pub rows_per_page: Option<usize>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Input format (auto, json, lines)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Print every page and exit instead of starting the pager
    #[arg(long)]
    pub dump: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for rowpager
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file, environment and arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {e}");
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        config.apply_env()?;
        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Input file, if one was given
    pub fn input_path(&self) -> Option<&Path> {
        self.args.file.as_deref()
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_pagination_args(config, args);
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);
    }

    fn apply_pagination_args(config: &mut Config, args: &CliArgs) {
        if let Some(rows) = args.rows_per_page {
            config.pagination.rows_per_page = rows;
        }

        if let Some(format_str) = &args.format {
            config.source.format = Self::parse_source_format(format_str);
        }
    }

    /// Apply display-related CLI arguments to configuration
    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if args.no_color {
            config.display.color_output = false;
        }

        if args.quiet {
            config.display.show_page_header = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Parse input format string
    fn parse_source_format(format_str: &str) -> SourceFormat {
        match format_str.to_lowercase().as_str() {
            "auto" => SourceFormat::Auto,
            "json" => SourceFormat::Json,
            "lines" | "text" | "txt" => SourceFormat::Lines,
            _ => {
                eprintln!("Warning: Unknown format '{format_str}', using auto");
                SourceFormat::Auto
            }
        }
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("rowpager version {}", crate::VERSION);
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("Configuration file does not exist, defaults apply");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => println!("Configuration validation failed: {e}"),
            },
            Err(e) => println!("Failed to load configuration: {e}"),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        println!("Configuration file: {}", self.get_config_path().display());
        println!();
        println!("{}", self.config.to_toml_string()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }

    /// Print banner with version and input info
    pub fn print_banner(&self) {
        if self.args.quiet {
            return;
        }
        let input = self
            .input_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(no input)".to_string());
        let rows = match self.config.pagination.rows_per_page {
            0 => "all rows on one page".to_string(),
            n => format!("{n} rows per page"),
        };
        println!("rowpager {}: {input}, {rows}", crate::VERSION);
        println!("Type 'help' for commands.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(argv: &[&str]) -> CliInterface {
        let args = CliArgs::try_parse_from(argv).unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args);
        CliInterface { args, config }
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from(vec!["rowpager"]).unwrap();
        assert!(args.file.is_none());
        assert!(args.rows_per_page.is_none());
        assert!(!args.dump);
    }

    #[test]
    fn test_cli_args_with_file_and_rows() {
        let cli = cli(&["rowpager", "data.json", "-r", "5"]);
        assert_eq!(cli.input_path(), Some(Path::new("data.json")));
        assert_eq!(cli.config().pagination.rows_per_page, 5);
    }

    #[test]
    fn test_cli_args_with_flags() {
        let cli = cli(&["rowpager", "--no-color", "--quiet", "--dump"]);
        assert!(cli.args().dump);
        assert!(!cli.config().display.color_output);
        assert!(!cli.config().display.show_page_header);
        assert_eq!(cli.config().logging.level, LogLevel::Error);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli(&["rowpager", "-v"]).config().logging.level, LogLevel::Debug);
        assert_eq!(cli(&["rowpager", "--vv"]).config().logging.level, LogLevel::Trace);
        assert_eq!(cli(&["rowpager"]).config().logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_format_argument() {
        assert_eq!(
            cli(&["rowpager", "--format", "JSON"]).config().source.format,
            SourceFormat::Json
        );
        assert_eq!(
            cli(&["rowpager", "--format", "lines"]).config().source.format,
            SourceFormat::Lines
        );
        assert_eq!(
            cli(&["rowpager", "--format", "yaml"]).config().source.format,
            SourceFormat::Auto
        );
    }

    #[test]
    fn test_subcommands() {
        let args = CliArgs::try_parse_from(vec!["rowpager", "config", "--show"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Config {
                show: true,
                validate: false
            })
        ));

        let args = CliArgs::try_parse_from(vec!["rowpager", "version"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Version)));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let args =
            CliArgs::try_parse_from(vec!["rowpager", "-c", "/nonexistent/rowpager.toml"]).unwrap();
        assert!(CliInterface::from_args(args).is_err());
    }
}
