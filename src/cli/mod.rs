//! Command-line interface for railassets
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and argument overrides
//! - Turning query arguments into a [`Query`]
//! - Dispatching subcommands (see [`commands`])

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::domain::AssetKind;
use crate::error::{QueryError, Result};
use crate::export::ExportFormat;
use crate::query::{FilterState, Query, SortDirection, SortSpec};

/// Railway asset console - query and export asset collections
#[derive(Parser, Debug)]
#[command(
    name = "railassets",
    version,
    about = "Query and export railway asset collections",
    long_about = "Filter, sort and page through railway asset records (tracks, electrification,
signaling, structures, stations) and export them as spreadsheet, CSV or PDF reports."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for railassets
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one page of matching records as a table
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Page to show (1-based)
        #[arg(long, value_name = "N", default_value_t = 1)]
        page: usize,

        /// Records per page (defaults to the configured page size)
        #[arg(long = "page-size", value_name = "N")]
        page_size: Option<usize>,
    },

    /// Export every matching record in sort order
    Export {
        #[command(flatten)]
        query: QueryArgs,

        /// Output format
        #[arg(short = 'f', long, value_enum)]
        format: ExportFormat,

        /// Report title (defaults to the asset kind's report title)
        #[arg(long)]
        title: Option<String>,

        /// Filename prefix (a timestamp and extension are appended)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Output directory
        #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

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

/// Collection, filters and sort shared by `list` and `export`
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// JSON file holding the collection (array or {"records": [...]})
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: PathBuf,

    /// Asset kind of the records
    #[arg(short = 'k', long, value_enum)]
    pub kind: AssetKind,

    /// Free-text search term
    #[arg(short = 's', long, value_name = "TERM")]
    pub search: Option<String>,

    /// Filter clause, repeatable (e.g. --filter estado=Ativo --filter km_inicial=10)
    #[arg(long = "filter", value_name = "NAME=VALUE")]
    pub filters: Vec<String>,

    /// Field to sort by
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

/// Split a `NAME=VALUE` filter argument
///
/// # Arguments
/// * `arg` - Raw argument; the value may itself contain `=`
///
/// # Returns
/// * `Result<(String, String)>` - Trimmed name and untrimmed value
pub fn parse_filter_arg(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(QueryError::MalformedFilter(arg.to_string()).into()),
    }
}

impl QueryArgs {
    /// Build the filter state for these arguments
    ///
    /// Starts from the kind's default filters and sets each named clause.
    pub fn filter_state(&self) -> Result<FilterState> {
        let mut state = self.kind.default_filters();
        if let Some(term) = &self.search {
            state.set("search", term.as_str())?;
        }
        for arg in &self.filters {
            let (name, value) = parse_filter_arg(arg)?;
            state.set(&name, value)?;
        }
        Ok(state)
    }

    /// Sort requested on the command line, if any
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.as_ref().map(|field| SortSpec {
            field: field.clone(),
            direction: if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        })
    }

    /// Build the full query
    ///
    /// # Arguments
    /// * `page` - 1-based page index
    /// * `page_size` - Records per page, must be positive
    ///
    /// # Returns
    /// * `Result<Query>` - Query, or a filter/page/page-size error
    pub fn to_query(&self, page: usize, page_size: usize) -> Result<Query> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize.into());
        }
        if page == 0 {
            return Err(QueryError::InvalidPage.into());
        }
        let mut query = Query::new(self.filter_state()?, page_size).on_page(page);
        query.sort = self.sort_spec();
        Ok(query)
    }
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

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        // Invalid command-line overrides are an error, not a fallback
        Self::apply_args_to_config(&mut config, args);
        config.validate()?;
        Ok(config)
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_logging_args(config, args);
        Self::apply_export_args(config, args);
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

    /// Apply export-related CLI arguments to configuration
    fn apply_export_args(config: &mut Config, args: &CliArgs) {
        if let Commands::Export { name, out_dir, .. } = &args.command {
            if let Some(dir) = out_dir {
                config.export.output_dir = dir.clone();
            }
            if let Some(name) = name {
                config.export.base_name = Some(name.clone());
            }
        }
    }

    /// Get configuration file path (from args or default)
    pub fn config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }

    /// Run the selected subcommand, printing its output
    pub async fn execute(&self) -> Result<()> {
        match &self.args.command {
            Commands::List {
                query,
                page,
                page_size,
            } => {
                let page_size = page_size.unwrap_or(self.config.display.page_size);
                let output = commands::list(&self.config, query, *page, page_size).await?;
                println!("{}", output);
            }
            Commands::Export {
                query,
                format,
                title,
                ..
            } => {
                let summary =
                    commands::export(&self.config, query, *format, title.as_deref()).await?;
                if !self.args.quiet {
                    println!("{}", summary);
                }
            }
            Commands::Config { show, validate } => {
                let output = commands::config(&self.config, &self.config_path(), *show, *validate);
                println!("{}", output);
            }
        }
        Ok(())
    }
}
