//! Per-category output files (CSV or JSON).

use crate::catalogue::models::{CategoryLink, ProductRecord, COLUMNS};
use crate::config::OutputFormat;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes one file per category under a root directory.
#[derive(Debug, Clone)]
pub struct CategoryWriter {
    root: PathBuf,
    format: OutputFormat,
    nested: bool,
}

impl CategoryWriter {
    /// Creates a writer placing files directly under `root`.
    pub fn new(root: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self { root: root.into(), format, nested: false }
    }

    /// Places each file inside its own category directory.
    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Directory holding the category's file (and downloaded images).
    pub fn directory_for(&self, category: &CategoryLink) -> PathBuf {
        if self.nested {
            self.root.join(file_stem(&category.name))
        } else {
            self.root.clone()
        }
    }

    /// Full path of the category's output file.
    pub fn path_for(&self, category: &CategoryLink) -> PathBuf {
        self.directory_for(category)
            .join(format!("{}.{}", file_stem(&category.name), self.format.extension()))
    }

    /// Writes `records` in order, header first; returns the file path.
    pub fn write(&self, category: &CategoryLink, records: &[ProductRecord]) -> Result<PathBuf> {
        let dir = self.directory_for(category);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let path = self.path_for(category);
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);

        match self.format {
            OutputFormat::Csv => write_csv(&mut out, records)?,
            OutputFormat::Json => serde_json::to_writer_pretty(&mut out, records)
                .context("Failed to serialize records")?,
        }
        out.flush().with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

/// File-system safe name for a category: trimmed, separators replaced.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();

    if stem.is_empty() || stem == "." || stem == ".." {
        "_".to_string()
    } else {
        stem
    }
}

/// Writes the header row then one row per record.
pub fn write_csv<W: Write>(writer: W, records: &[ProductRecord]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(COLUMNS).context("Failed to write CSV header")?;
    for record in records {
        csv.serialize(record)
            .with_context(|| format!("Failed to write row for {}", record.product_page_url))?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Renders records as a CSV document.
pub fn csv_string(records: &[ProductRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}

/// Reads records back from a CSV document written by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ProductRecord>> {
    let mut csv = csv::Reader::from_reader(reader);

    let headers = csv.headers().context("Failed to read CSV header")?;
    if headers.iter().ne(COLUMNS.iter().copied()) {
        anyhow::bail!("Unexpected CSV header: {:?}", headers);
    }

    csv.deserialize()
        .map(|row| row.context("Failed to read CSV row"))
        .collect()
}

/// Reads a category file from disk.
pub fn read_csv_file(path: &Path) -> Result<Vec<ProductRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_csv(file)
}
