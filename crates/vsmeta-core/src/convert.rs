//! Per-file conversion: one work item in, one sidecar out.
//!
//! Each call is fully independent: no shared state, no ordering between
//! files. That is what lets the driver fan conversions out across a
//! worker pool.

use std::fs;

use crate::error::Error;
use crate::scan::WorkItem;
use crate::{asset, encode, nfo, writer, ProcessOptions};

/// What happened to one work item.
#[derive(Debug)]
pub enum Outcome {
    /// A sidecar was written. Warnings carry non-fatal asset problems.
    Written { warnings: Vec<String> },
    /// Target already existed and overwrite is off.
    Skipped,
}

/// Convert one video's metadata into its sidecar.
///
/// Absent artwork is omitted from the output, never an error. A missing or
/// malformed NFO document fails this item only; the caller records the
/// reason and continues the batch.
pub fn convert_one(item: &WorkItem, options: &ProcessOptions) -> Result<Outcome, Error> {
    if options.delete_vsmeta && item.target_path.exists() {
        fs::remove_file(&item.target_path).map_err(Error::Write)?;
    }
    if item.target_path.exists() && !options.overwrite {
        return Ok(Outcome::Skipped);
    }
    if !item.nfo_path.exists() {
        return Err(Error::MissingSource);
    }
    let xml = fs::read(&item.nfo_path).map_err(|_| Error::MissingSource)?;
    let record = nfo::parse_nfo(&xml)?;

    let mut warnings = Vec::new();
    let mut embed = |path| match asset::embed(path) {
        Ok(blob) => blob,
        Err(e) => {
            warnings.push(e.to_string());
            None
        }
    };
    let poster = embed(&item.poster_path);
    let fanart = embed(&item.fanart_path);

    let bytes = encode::encode_vsmeta(&record, poster.as_ref(), fanart.as_ref());
    writer::write_sidecar(&item.target_path, &bytes)?;
    Ok(Outcome::Written { warnings })
}
