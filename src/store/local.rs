use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::LunchError;
use crate::store::Table;

/// Worksheets kept as markdown pipe tables, one file per sheet.
///
/// Writes go through an internal Mutex and land atomically (temp + rename),
/// so readers never see a half-written sheet.
pub struct LocalSheets {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalSheets {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            write_lock: Mutex::new(()),
        }
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        let safe: String = sheet
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{safe}.md"))
    }

    pub async fn read(&self, sheet: &str) -> Result<Table, LunchError> {
        let content = read_to_string_lossy(&self.sheet_path(sheet)).await?;
        Ok(parse_table(&content))
    }

    pub async fn write(&self, sheet: &str, table: &Table) -> Result<(), LunchError> {
        let _lock = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.base_dir).await?;
        let path = self.sheet_path(sheet);
        atomic_write(&path, &format_table(table)).await?;
        tracing::debug!(path = %path.display(), rows = table.rows.len(), "sheet written");
        Ok(())
    }
}

async fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
    let tmp_path = path.with_extension(format!("tmp.{}", std::process::id()));
    tokio::fs::write(&tmp_path, content.as_bytes()).await?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e);
    }
    Ok(())
}

/// Missing file reads as empty.
async fn read_to_string_lossy(path: &Path) -> Result<String, std::io::Error> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

fn escape_cell(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push(' '),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn format_row(cells: &[String]) -> String {
    let mut line = String::from("|");
    for c in cells {
        line.push(' ');
        line.push_str(&escape_cell(c));
        line.push_str(" |");
    }
    line
}

pub(crate) fn format_table(table: &Table) -> String {
    let mut out = format_row(&table.headers);
    out.push('\n');
    out.push('|');
    for _ in &table.headers {
        out.push_str("---|");
    }
    out.push('\n');
    for row in &table.rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

/// Split one `| a | b |` line into unescaped, trimmed cells.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.trim().chars().peekable();
    if chars.peek() == Some(&'|') {
        chars.next();
    }
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some('|') | Some('\\') => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                _ => current.push('\\'),
            },
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    // Text after the last pipe only counts when the row wasn't closed.
    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }
    cells
}

fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|c| {
            let t = c.trim_matches(':');
            !t.is_empty() && t.chars().all(|ch| ch == '-')
        })
}

pub(crate) fn parse_table(content: &str) -> Table {
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with('|'));

    let Some(header_line) = lines.next() else {
        return Table::default();
    };
    let headers = split_row(header_line);
    let rows = lines
        .map(split_row)
        .filter(|cells| !is_separator(cells))
        .collect();
    Table { headers, rows }
}
