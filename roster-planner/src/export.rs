use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::schedule::{QualityReport, Roster};

/// Writes the roster table as CSV:
/// `day,slot,category,role,person_id,person_name,shortage_count`.
///
/// Absent values are written as empty cells.
pub fn write_roster<W: Write>(roster: &Roster, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in &roster.rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_roster_csv<P: AsRef<Path>>(roster: &Roster, path: P) -> Result<()> {
    let file = File::create(path)?;
    write_roster(roster, file)
}

/// Pretty-printed JSON quality report.
pub fn write_report_json<P: AsRef<Path>>(report: &QualityReport, path: P) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
