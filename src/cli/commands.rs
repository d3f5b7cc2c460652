//! Subcommand implementations
//!
//! Each command loads the collection snapshot through a [`JsonFileStore`],
//! runs the query pipeline and either renders a page or exports every
//! match. Output is returned as text so the commands are testable without
//! capturing stdout.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::export::encoders::PrintPdfBackend;
use crate::export::encoders::pdf::PageSetup;
use crate::export::{DirectorySink, ExportCoordinator, ExportFormat, ExportSummary, PdfEncoder};
use crate::formatter::Formatter;
use crate::record::Record;
use crate::store::{JsonFileStore, RecordStore};

use super::QueryArgs;

async fn load_records(args: &QueryArgs) -> Result<Vec<Record>> {
    let store = JsonFileStore::new(&args.input);
    let records = store.list().await?;
    debug!(
        "Loaded {} {} record(s) from {}",
        records.len(),
        args.kind.collection(),
        args.input.display()
    );
    Ok(records)
}

/// `list`: render one page of matching records
///
/// # Arguments
/// * `config` - Effective configuration (table style, column width)
/// * `args` - Collection, filters and sort
/// * `page` - 1-based page index
/// * `page_size` - Records per page
///
/// # Returns
/// * `Result<String>` - Table and status line
pub async fn list(
    config: &Config,
    args: &QueryArgs,
    page: usize,
    page_size: usize,
) -> Result<String> {
    let query = args.to_query(page, page_size)?;
    let records = load_records(args).await?;
    let result = query.run(&records);
    Ok(Formatter::from_config(&config.display).format_page(args.kind, &result))
}

/// Coordinator configured from the export settings
pub fn coordinator(config: &Config) -> ExportCoordinator {
    let backend = match &config.export.pdf.font_path {
        Some(path) => PrintPdfBackend::with_font(path),
        None => PrintPdfBackend::new(),
    };
    let setup = PageSetup::default().with_orientation(config.export.pdf.orientation);
    let sink = DirectorySink::new(&config.export.output_dir);

    ExportCoordinator::new(Arc::new(sink))
        .with_pdf(PdfEncoder::new(Arc::new(backend)).with_setup(setup))
}

/// `export`: export every matching record, in sort order
///
/// # Arguments
/// * `config` - Effective configuration (output dir, base name, PDF setup)
/// * `args` - Collection, filters and sort
/// * `format` - Selected encoding
/// * `title` - Title override; the kind's report title when `None`
///
/// # Returns
/// * `Result<ExportSummary>` - What was written where
pub async fn export(
    config: &Config,
    args: &QueryArgs,
    format: ExportFormat,
    title: Option<&str>,
) -> Result<ExportSummary> {
    config.validate()?;
    let query = args.to_query(1, config.display.page_size)?;
    let records = load_records(args).await?;
    let ordered = query.ordered(&records);
    info!("Exporting {} of {} record(s)", ordered.len(), records.len());

    let mut model = args.kind.format_for_export(&ordered);
    if let Some(title) = title {
        model = model.with_title(title);
    }

    let base_name = config
        .export
        .base_name
        .clone()
        .unwrap_or_else(|| args.kind.export_base_name());

    coordinator(config).export(&model, format, &base_name).await
}

/// `config`: show and/or validate the effective configuration
///
/// # Returns
/// * `String` - Report text
pub fn config(config: &Config, path: &Path, show: bool, validate: bool) -> String {
    let mut out = Vec::new();

    if validate {
        out.push(format!("Validating configuration file: {}", path.display()));
        if !path.exists() {
            out.push("Configuration file does not exist, defaults apply".to_string());
        } else {
            match Config::load_from_file(Some(path)).and_then(|c| c.validate()) {
                Ok(()) => out.push("Configuration is valid".to_string()),
                Err(e) => out.push(format!("Configuration is invalid: {}", e)),
            }
        }
    }

    if show || !validate {
        out.push(format!("Configuration file: {}", path.display()));
        out.push(String::new());
        match config.to_toml() {
            Ok(text) => out.push(text),
            Err(e) => out.push(format!("Error formatting configuration: {}\n{:#?}", e, config)),
        }
    }

    out.join("\n")
}
