//! Worksheet-backed record store.
//!
//! A [`Store`] addresses one spreadsheet-like location and reads/writes whole
//! worksheets. Venue reads are fail-soft (errors log and yield no rows); every
//! write returns a `Result` so callers can report failures.

pub mod http;
pub mod local;

use std::path::PathBuf;

use crate::error::LunchError;
use crate::history::HistoryLog;
use crate::options::OptionLists;
use crate::record::{HISTORY_COLUMNS, HistoryEntry, VENUE_COLUMNS, VenueRecord, header_index};

use self::http::HttpSheets;
use self::local::LocalSheets;

/// Backend-specific configuration.
#[derive(Clone)]
pub enum StoreConfig {
    Local {
        base_dir: PathBuf,
    },
    Http {
        url: String,
        token: Option<String>,
    },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local { base_dir } => f
                .debug_struct("Local")
                .field("base_dir", base_dir)
                .finish(),
            Self::Http { url, token } => f
                .debug_struct("Http")
                .field("url", url)
                .field("token", &token.as_ref().map(|_| "[REDACTED]"))
                .finish(),
        }
    }
}

/// A whole worksheet: header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Split a raw values grid into header and rows. An empty grid has no header.
    pub fn from_values(mut values: Vec<Vec<String>>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let headers = values.remove(0);
        Self {
            headers,
            rows: values,
        }
    }

    pub fn into_values(self) -> Vec<Vec<String>> {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        values.push(self.headers);
        values.extend(self.rows);
        values
    }

    /// Rows with at least one non-blank cell.
    fn data_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.rows
            .iter()
            .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
    }
}

enum Backend {
    Local(LocalSheets),
    Http(HttpSheets),
}

pub struct Store {
    backend: Backend,
    list_sheet: String,
    history_sheet: String,
}

impl Store {
    pub fn new(config: StoreConfig, list_sheet: String, history_sheet: String) -> Self {
        let backend = match config {
            StoreConfig::Local { base_dir } => Backend::Local(LocalSheets::new(base_dir)),
            StoreConfig::Http { url, token } => Backend::Http(HttpSheets::new(url, token)),
        };
        Self {
            backend,
            list_sheet,
            history_sheet,
        }
    }

    /// Local store with the default worksheet names, rooted at `base_dir`.
    pub fn local(base_dir: PathBuf) -> Self {
        Self::new(
            StoreConfig::Local { base_dir },
            "list".to_string(),
            "history".to_string(),
        )
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::Local(_) => "local",
            Backend::Http(_) => "http",
        }
    }

    pub async fn read_table(&self, sheet: &str) -> Result<Table, LunchError> {
        match &self.backend {
            Backend::Local(b) => b.read(sheet).await,
            Backend::Http(b) => b.read(sheet).await,
        }
    }

    pub async fn write_table(&self, sheet: &str, table: Table) -> Result<(), LunchError> {
        match &self.backend {
            Backend::Local(b) => b.write(sheet, &table).await,
            Backend::Http(b) => b.write(sheet, table).await,
        }
    }

    /// Strict venue read; errors propagate.
    pub async fn try_load(&self) -> Result<Vec<VenueRecord>, LunchError> {
        let table = self.read_table(&self.list_sheet).await?;
        let index = header_index(&table.headers);
        Ok(table
            .data_rows()
            .map(|row| VenueRecord::from_row(&index, row))
            .collect())
    }

    /// All venue rows in storage order, or nothing if the store is unreachable.
    pub async fn load(&self) -> Vec<VenueRecord> {
        match self.try_load().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    backend = self.backend_name(),
                    "venue load failed, showing empty data: {e}"
                );
                Vec::new()
            }
        }
    }

    /// Replace the venue worksheet with `records`. Last writer wins.
    pub async fn save(&self, records: &[VenueRecord]) -> Result<(), LunchError> {
        let table = Table::new(
            VENUE_COLUMNS,
            records.iter().map(VenueRecord::to_row).collect(),
        );
        self.write_table(&self.list_sheet, table)
            .await
            .inspect_err(|e| tracing::warn!("venue save failed: {e}"))?;
        tracing::info!(rows = records.len(), "venue sheet saved");
        Ok(())
    }

    /// Validate and append one venue row. Returns the new row count.
    ///
    /// Reads strictly: a failed read aborts instead of overwriting the sheet
    /// with a single row.
    pub async fn append(
        &self,
        record: VenueRecord,
        options: &OptionLists,
    ) -> Result<usize, LunchError> {
        record.validate(options)?;
        let mut records = self.try_load().await?;
        records.push(record);
        self.save(&records).await?;
        Ok(records.len())
    }

    pub async fn try_load_history(&self) -> Result<Vec<HistoryEntry>, LunchError> {
        let table = self.read_table(&self.history_sheet).await?;
        let index = header_index(&table.headers);
        Ok(table
            .data_rows()
            .map(|row| HistoryEntry::from_row(&index, row))
            .collect())
    }

    pub async fn save_history(&self, entries: &[HistoryEntry]) -> Result<(), LunchError> {
        let table = Table::new(
            HISTORY_COLUMNS,
            entries.iter().map(HistoryEntry::to_row).collect(),
        );
        self.write_table(&self.history_sheet, table).await
    }

    pub fn history(&self) -> HistoryLog<'_> {
        HistoryLog::new(self)
    }
}
