use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::eprime::EprimeLog;
use crate::error::ParseError;
use crate::table;
use crate::trial::TrialRecord;

/// One full pass over a log file: decode, segment into trials, extract
/// fields, write the events table and its sidecar. Returns the path of
/// the written table.
pub fn convert(input: &Path, dest: &Path) -> Result<PathBuf> {
    let log = EprimeLog::read(input)?;
    let blocks = log.trial_blocks();
    info!(trials = blocks.len(), "parsed {}", input.display());

    let records = if blocks.is_empty() {
        Vec::new()
    } else {
        let baseline = log.sync_baseline_ms()?.ok_or(ParseError::MissingSync)?;
        debug!(baseline_ms = baseline, "onset baseline");
        blocks
            .iter()
            .map(|block| TrialRecord::from_block(block, baseline))
            .collect::<Result<Vec<_>, _>>()?
    };

    fs::create_dir_all(dest).with_context(|| format!("creating {}", dest.display()))?;
    let out = table::events_path(input, dest)?;
    table::write_events_tsv(&out, &records)?;
    table::write_sidecar_json(&table::sidecar_path(&out))?;
    info!("wrote {}", out.display());

    Ok(out)
}
