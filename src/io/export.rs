//! CSV export for per-hour simulation records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::HourRecord;

/// Column header for trajectory export.
const HEADER: &str = "hour,generation,stock_pre_supply,tier,supply,vent,stock";

/// Exports a trajectory to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_trajectory(records: &[HourRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_trajectory_csv(records, buf)
}

/// Writes a trajectory as CSV to any writer: a header row, then one row per
/// hour. Output is deterministic for identical records.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_trajectory_csv(records: &[HourRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in records {
        wtr.write_record(&[
            r.hour.to_string(),
            format!("{:.4}", r.generation),
            format!("{:.4}", r.stock_pre_supply),
            r.tier.as_str().to_string(),
            format!("{:.4}", r.supply),
            format!("{:.4}", r.vent),
            format!("{:.4}", r.stock),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
