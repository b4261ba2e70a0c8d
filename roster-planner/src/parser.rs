use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::{PlanError, Result};
use crate::model::{
    AvailabilityEntry, AvailabilityMatrix, Grade, Person, PlanningInput, PriorityTable, Qualification, Registry, Role,
    Slot,
};

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> PlanError {
    PlanError::Parse {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    Ok(ReaderBuilder::new().trim(Trim::All).from_path(path)?)
}

/// Finds a column by name, falling back to its usual position.
fn column(headers: &StringRecord, name: &str, fallback: usize) -> usize {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .unwrap_or(fallback)
}

/// Loads `id,name,grade,qualifications`.
///
/// Grades are numeric ranks or abbreviations; qualification tags are
/// separated by `;` or whitespace.
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<Registry> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    let headers = reader.headers()?.clone();
    let id_col = column(&headers, "id", 0);
    let name_col = column(&headers, "name", 1);
    let grade_col = column(&headers, "grade", 2);
    let quals_col = column(&headers, "qualifications", 3);

    let mut persons = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);

        let id = record.get(id_col).unwrap_or("");
        if id.is_empty() {
            return Err(parse_error(path, line, "missing person id"));
        }
        let name = record.get(name_col).unwrap_or("");
        let grade: Grade = record
            .get(grade_col)
            .unwrap_or("")
            .parse()
            .map_err(|reason: String| parse_error(path, line, reason))?;
        let qualifications = record
            .get(quals_col)
            .unwrap_or("")
            .split(|c: char| c == ';' || c.is_whitespace())
            .filter(|tag| !tag.is_empty())
            .map(|tag| tag.parse::<Qualification>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|reason| parse_error(path, line, reason))?;

        persons.push(Person::new(id, name, grade).with_qualifications(qualifications));
    }

    info!(persons = persons.len(), path = %path.display(), "registry loaded");
    Registry::new(persons)
}

/// Splits a `YYYY-MM-DD_creneauN` (or `_slotN`) header.
fn parse_day_slot(header: &str) -> Option<(NaiveDate, Slot)> {
    let (day, slot) = header.split_once('_')?;
    let day = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    let lower = slot.to_ascii_lowercase();
    let number = lower
        .strip_prefix("creneau")
        .or_else(|| lower.strip_prefix("slot"))?
        .parse::<u8>()
        .ok()?;
    Some((day, Slot::new(number)?))
}

/// Reads one availability cell: yes-like words or a positive preference
/// weight mean available; no-like words, empty or zero mean unavailable.
fn parse_cell(value: &str) -> std::result::Result<AvailabilityEntry, String> {
    let lower = value.trim().to_lowercase();
    match lower.as_str() {
        "oui" | "yes" | "true" | "x" => return Ok(AvailabilityEntry::available(1.0)),
        "non" | "no" | "false" | "" => return Ok(AvailabilityEntry::unavailable()),
        _ => {}
    }
    let weight: f64 = lower
        .parse()
        .map_err(|_| format!("unrecognised availability value `{}`", value.trim()))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("preference must be a non-negative number, got `{}`", value.trim()));
    }
    if weight == 0.0 {
        Ok(AvailabilityEntry::unavailable())
    } else {
        Ok(AvailabilityEntry::available(weight))
    }
}

/// Loads the wide availability sheet: one row per person, one column per
/// (day, slot).
pub fn load_availability<P: AsRef<Path>>(path: P) -> Result<AvailabilityMatrix> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    let headers = reader.headers()?.clone();

    let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
    for header in headers.iter().skip(1) {
        let key = parse_day_slot(header)
            .ok_or_else(|| parse_error(path, 1, format!("column `{}` is not `YYYY-MM-DD_creneauN`", header)))?;
        columns.push(key);
    }
    debug!(columns = columns.len(), "availability columns recognised");

    let mut matrix = AvailabilityMatrix::new();
    let mut rows = 0;
    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);
        let id = record.get(0).unwrap_or("");
        if id.is_empty() {
            return Err(parse_error(path, line, "missing person id"));
        }
        for (&(day, slot), value) in columns.iter().zip(record.iter().skip(1)) {
            let entry = parse_cell(value).map_err(|reason| parse_error(path, line, reason))?;
            matrix.insert(id, day, slot, entry)?;
        }
        rows += 1;
    }

    info!(rows, entries = matrix.len(), path = %path.display(), "availability loaded");
    Ok(matrix)
}

/// Loads `grade,role,score`.
pub fn load_priorities<P: AsRef<Path>>(path: P) -> Result<PriorityTable> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    let headers = reader.headers()?.clone();
    let grade_col = column(&headers, "grade", 0);
    let role_col = column(&headers, "role", 1);
    let score_col = column(&headers, "score", 2);

    let mut table = PriorityTable::new();
    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);
        let grade: Grade = record
            .get(grade_col)
            .unwrap_or("")
            .parse()
            .map_err(|reason: String| parse_error(path, line, reason))?;
        let role: Role = record
            .get(role_col)
            .unwrap_or("")
            .parse()
            .map_err(|reason: String| parse_error(path, line, reason))?;
        let raw_score = record.get(score_col).unwrap_or("");
        let score: i32 = raw_score
            .parse()
            .map_err(|_| parse_error(path, line, format!("score `{}` is not an integer", raw_score)))?;
        table.insert(grade, role, score);
    }

    info!(pairs = table.len(), path = %path.display(), "priority table loaded");
    Ok(table)
}

/// Reads all three files into one snapshot; priorities are optional.
pub fn load_input(registry: &Path, availability: &Path, priorities: Option<&Path>) -> Result<PlanningInput> {
    let registry = load_registry(registry)?;
    let availability = load_availability(availability)?;
    let priorities = match priorities {
        Some(path) => load_priorities(path)?,
        None => PriorityTable::new(),
    };
    Ok(PlanningInput::new(registry, availability, priorities))
}
