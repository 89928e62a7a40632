//! Writing store tables back to delimited text.
//!
//! Writes go straight to the destination path. There is no temporary file
//! and rename, so a failed write can leave a truncated file behind.

use crate::error::{AtlasError, Result};
use crate::table::StoreTable;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

/// Write `table` as CSV with a header row, creating parent directories.
pub fn save_csv(table: &StoreTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AtlasError::persist(path, e))?;
    }

    let mut file = File::create(path).map_err(|e| AtlasError::persist(path, e))?;
    let mut frame = table.frame().clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| AtlasError::persist(path, e))?;

    debug!("Wrote {} rows to {}", table.height(), path.display());
    Ok(())
}
