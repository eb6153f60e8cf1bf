//! Unified ingestion entrypoint.
//!
//! [`ingest`] runs the whole pipeline for one file held in memory:
//!
//! 1. validation: format resolution, empty input, upload limit (errors are returned)
//! 2. format dispatch and parsing (errors are recorded on the dataset)
//! 3. column/row capping
//! 4. preview extraction, content hashing, storage-strategy selection
//!
//! [`ingest_from_path`] and [`ingest_from_source`] read the bytes first; [`reprocess`] re-runs
//! steps 2 to 4 in place for an existing [`Dataset`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{IngestionError, IngestionResult};
use crate::sources::{ByteSource, Clock, SystemClock};
use crate::types::Table;

use super::capping::cap_table;
use super::hashing::{content_hash, content_hash_or_empty};
use super::observability::{
    severity_for_error, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
};
use super::preview::extract_preview;
use super::storage::select_storage_strategy;
use super::{csv, json, parquet, text, xml};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// JSON array-of-objects, single object, or NDJSON.
    Json,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
    /// XML documents.
    Xml,
    /// Plain text, one record per line.
    Text,
    /// Apache Parquet.
    Parquet,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive, leading dot allowed).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.');
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" | "ndjson" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            "xml" => Some(Self::Xml),
            "txt" | "text" | "log" => Some(Self::Text),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Limits applied during ingestion.
///
/// Deserializable so hosts can load them from configuration; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionLimits {
    /// Columns kept per dataset (leading columns win).
    pub max_columns: usize,
    /// Rows kept per dataset (leading rows win).
    pub max_rows: usize,
    /// Inputs larger than this are rejected before parsing.
    pub max_upload_bytes: u64,
    /// Inputs larger than this use separate storage.
    pub max_inline_bytes: u64,
    /// Rows stored in [`Dataset::preview`].
    pub preview_rows: usize,
}

impl Default for IngestionLimits {
    fn default() -> Self {
        Self {
            max_columns: 100,
            max_rows: 100_000,
            max_upload_bytes: 100 * 1024 * 1024,
            max_inline_bytes: 10 * 1024 * 1024,
            preview_rows: 10,
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, detect the format from the file extension.
    pub format: Option<IngestionFormat>,
    /// Capping and size limits.
    pub limits: IngestionLimits,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
    /// Source of `processed_at` timestamps.
    pub clock: Arc<dyn Clock>,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("limits", &self.limits)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            limits: IngestionLimits::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
            clock: Arc::new(SystemClock),
        }
    }
}

/// Parser output before capping.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    /// Parsed schema and records.
    pub table: Table,
    /// Length of the source in bytes.
    pub raw_byte_len: usize,
}

/// Dispatch `bytes` to the parser for `format`, reading at most `max_rows` records.
pub fn parse_bytes(
    bytes: &[u8],
    format: IngestionFormat,
    max_rows: usize,
) -> IngestionResult<ParsedInput> {
    let table = match format {
        IngestionFormat::Csv => csv::ingest_csv_from_bytes(bytes, max_rows)?,
        IngestionFormat::Tsv => csv::ingest_delimited_from_bytes(bytes, b'\t', max_rows)?,
        IngestionFormat::Json => json::ingest_json_from_bytes(bytes, max_rows)?,
        IngestionFormat::Excel => ingest_excel_dispatch(bytes, max_rows)?,
        IngestionFormat::Xml => xml::ingest_xml_from_bytes(bytes, max_rows)?,
        IngestionFormat::Text => text::ingest_text_from_bytes(bytes, max_rows)?,
        IngestionFormat::Parquet => parquet::ingest_parquet_from_bytes(bytes, max_rows)?,
    };
    Ok(ParsedInput {
        table,
        raw_byte_len: bytes.len(),
    })
}

fn ingest_excel_dispatch(bytes: &[u8], max_rows: usize) -> IngestionResult<Table> {
    // Avoid unused warnings when the feature is off.
    let _ = (bytes, max_rows);

    #[cfg(feature = "excel")]
    {
        super::excel::ingest_excel_from_bytes(bytes, max_rows)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestionError::malformed(
            "excel",
            "excel ingestion not enabled (enable cargo feature 'excel')",
        ))
    }
}

/// Ingest one file held in memory.
///
/// Only validation errors are returned: unsupported or missing extension, empty input, input
/// above [`IngestionLimits::max_upload_bytes`]. A parse failure still yields a [`Dataset`], with
/// `processed == false` and the cause in `processing_errors`.
///
/// `extension` selects the parser unless [`IngestionOptions::format`] overrides it.
///
/// ```rust
/// use tabular_insight::ingestion::{ingest, IngestionOptions};
///
/// # fn main() -> Result<(), tabular_insight::IngestionError> {
/// let ds = ingest("scores.csv", b"a,b\n1,10\n2,20\n", "csv", &IngestionOptions::default())?;
/// assert!(ds.processed);
/// assert_eq!(ds.row_count, 2);
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(level = "debug", skip(bytes, options), fields(size = bytes.len()))]
pub fn ingest(
    file_name: &str,
    bytes: &[u8],
    extension: &str,
    options: &IngestionOptions,
) -> IngestionResult<Dataset> {
    let mut ctx = IngestionContext {
        file_name: file_name.to_owned(),
        format: None,
    };
    let format = validate(&mut ctx, bytes, extension, options)?;
    let hash = content_hash(bytes);
    Ok(build_dataset(&ctx, None, bytes, format, hash, options))
}

/// Read `path` and ingest it, detecting the format from its extension.
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<Dataset> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            let ctx = IngestionContext {
                file_name,
                format: IngestionFormat::from_extension(extension),
            };
            return Err(report_rejection(&ctx, options, e.into()));
        }
    };
    ingest(&file_name, &bytes, extension, options)
}

/// Read `id` from a [`ByteSource`] and ingest it.
///
/// The content hash is computed from a second read of the source; if that read fails the
/// dataset gets an empty hash and the observer a warning.
pub fn ingest_from_source(
    source: &dyn ByteSource,
    id: &str,
    options: &IngestionOptions,
) -> IngestionResult<Dataset> {
    let extension = Path::new(id).extension().and_then(|s| s.to_str()).unwrap_or("");
    let mut ctx = IngestionContext {
        file_name: id.to_owned(),
        format: IngestionFormat::from_extension(extension),
    };

    let bytes = match source.read_all(id) {
        Ok(b) => b,
        Err(e) => return Err(report_rejection(&ctx, options, e.into())),
    };
    let format = validate(&mut ctx, &bytes, extension, options)?;
    let hash = content_hash_or_empty(source, id);
    Ok(build_dataset(&ctx, None, &bytes, format, hash, options))
}

/// Re-run parsing, capping and the derived fields of `dataset` from its original bytes.
///
/// The id, file name and detected type are kept; everything derived from the content is
/// replaced. Validation errors leave `dataset` untouched.
pub fn reprocess(dataset: &mut Dataset, bytes: &[u8], options: &IngestionOptions) -> IngestionResult<()> {
    let mut ctx = IngestionContext {
        file_name: dataset.file_name.clone(),
        format: Some(dataset.file_type),
    };
    let opts = IngestionOptions {
        format: Some(dataset.file_type),
        ..options.clone()
    };
    let format = validate(&mut ctx, bytes, "", &opts)?;
    let hash = content_hash(bytes);
    *dataset = build_dataset(&ctx, dataset.id.take(), bytes, format, hash, options);
    Ok(())
}

fn validate(
    ctx: &mut IngestionContext,
    bytes: &[u8],
    extension: &str,
    options: &IngestionOptions,
) -> IngestionResult<IngestionFormat> {
    let resolved = match options.format {
        Some(f) => Ok(f),
        None if extension.trim().is_empty() => Err(IngestionError::MissingExtension {
            name: ctx.file_name.clone(),
        }),
        None => IngestionFormat::from_extension(extension).ok_or_else(|| {
            IngestionError::UnsupportedFormat {
                extension: extension.to_owned(),
            }
        }),
    };
    let format = resolved.map_err(|e| report_rejection(ctx, options, e))?;
    ctx.format = Some(format);

    let size = bytes.len() as u64;
    if size == 0 {
        return Err(report_rejection(ctx, options, IngestionError::EmptyInput));
    }
    if size > options.limits.max_upload_bytes {
        return Err(report_rejection(
            ctx,
            options,
            IngestionError::InputTooLarge {
                size,
                limit: options.limits.max_upload_bytes,
            },
        ));
    }
    Ok(format)
}

fn build_dataset(
    ctx: &IngestionContext,
    id: Option<String>,
    bytes: &[u8],
    format: IngestionFormat,
    content_hash: String,
    options: &IngestionOptions,
) -> Dataset {
    let limits = &options.limits;
    let file_size = bytes.len() as u64;

    if content_hash.is_empty() {
        notify_warning(ctx, options, "content hash unavailable; stored empty hash");
    }

    let parsed = match parse_bytes(bytes, format, limits.max_rows) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(error = %err, "parse failed; recording on dataset");
            report_failure(ctx, options, &err);
            return Dataset {
                id,
                file_name: ctx.file_name.clone(),
                file_type: format,
                file_size,
                schema: Default::default(),
                row_count: 0,
                column_count: 0,
                preview: None,
                content_hash,
                processing_errors: Some(err.to_string()),
                use_separate_storage: false,
                processed: false,
                processed_at: None,
                records: Table::default(),
            };
        }
    };

    let records = cap_table(parsed.table, limits.max_columns, limits.max_rows);
    let row_count = records.row_count();
    let column_count = records.column_count();
    let preview = extract_preview(&records, limits.preview_rows);
    let storage = select_storage_strategy(row_count, file_size, limits.max_rows, limits.max_inline_bytes);
    tracing::debug!(row_count, column_count, ?storage, "dataset built");

    if let Some(obs) = options.observer.as_ref() {
        obs.on_success(
            ctx,
            IngestionStats {
                rows: row_count,
                columns: column_count,
                bytes: file_size,
            },
        );
    }

    Dataset {
        id,
        file_name: ctx.file_name.clone(),
        file_type: format,
        file_size,
        schema: records.schema.clone(),
        row_count,
        column_count,
        preview: Some(preview),
        content_hash,
        processing_errors: None,
        use_separate_storage: storage.is_separate(),
        processed: true,
        processed_at: Some(options.clock.now()),
        records,
    }
}

fn report_rejection(ctx: &IngestionContext, options: &IngestionOptions, err: IngestionError) -> IngestionError {
    report_failure(ctx, options, &err);
    err
}

fn report_failure(ctx: &IngestionContext, options: &IngestionOptions, err: &IngestionError) {
    if let Some(obs) = options.observer.as_ref() {
        let sev = severity_for_error(err);
        obs.on_failure(ctx, sev, err);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, err);
        }
    }
}

fn notify_warning(ctx: &IngestionContext, options: &IngestionOptions, message: &str) {
    tracing::warn!(file = %ctx.file_name, "{message}");
    if let Some(obs) = options.observer.as_ref() {
        obs.on_warning(ctx, message);
    }
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue ingestion work in a job system.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> IngestionResult<Dataset> {
        ingest_from_path(&self.path, &self.options)
    }
}
