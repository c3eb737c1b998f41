use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use sortie_backend::{BackendClient, BackendError};
use tracing::{debug, info};
use uuid::Uuid;

/// Destination for validated profile rows. The import only talks to the
/// backend through this seam, so a validation failure provably never
/// reaches the network.
#[async_trait]
pub trait ProfileSink: Send + Sync {
    async fn insert_profiles(&self, rows: &[Value]) -> Result<Vec<Value>, BackendError>;
}

#[async_trait]
impl ProfileSink for BackendClient {
    async fn insert_profiles(&self, rows: &[Value]) -> Result<Vec<Value>, BackendError> {
        self.insert("profiles", rows).await
    }
}

/// Accepted header spellings per target column of `profiles`.
const FIELD_MAPPINGS: &[(&str, &[&str])] = &[
    (
        "service_number",
        &["service_number", "service number", "service_no", "service no", "service"],
    ),
    ("rank", &["rank"]),
    ("first_name", &["first_name", "first name", "firstname", "fname"]),
    ("last_name", &["last_name", "last name", "lastname", "lname"]),
    (
        "specialization",
        &["specialization", "speciality", "role", "position"],
    ),
    ("command", &["command", "cmd"]),
    (
        "base_location",
        &["base_location", "base location", "base", "airbase", "air_base", "air base"],
    ),
    (
        "date_of_joining",
        &["date_of_joining", "date of joining", "joining_date", "joining date", "doj"],
    ),
    (
        "phone",
        &["phone", "contact", "mobile", "telephone", "contact information"],
    ),
    (
        "emergency_contact",
        &["emergency_contact", "emergency contact", "emergency", "next_of_kin"],
    ),
];

/// Columns a row must carry a non-blank value for.
const REQUIRED_FIELDS: &[&str] = &[
    "service_number",
    "rank",
    "first_name",
    "last_name",
    "specialization",
    "command",
];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Outcome of one import run. `errors` non-empty means nothing was
/// inserted.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<String>,
}

/// Parse CSV text into rows keyed by normalized (trimmed, lowercased)
/// header names. Empty lines are skipped by the reader.
pub fn parse_csv(text: &str) -> Result<Vec<HashMap<String, String>>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }
    debug!(rows = rows.len(), "parsed CSV");
    Ok(rows)
}

/// Look a column up through its aliases; blank values count as absent.
fn field_value<'a>(row: &'a HashMap<String, String>, field: &str) -> Option<&'a str> {
    let aliases = FIELD_MAPPINGS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, aliases)| *aliases)?;
    for alias in aliases {
        if let Some(v) = row.get(*alias) {
            let v = v.trim();
            if !v.is_empty() {
                return Some(v);
            }
        }
    }
    None
}

/// Validate required fields, reporting one error per offending row.
pub fn validate_rows(rows: &[HashMap<String, String>]) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        for field in REQUIRED_FIELDS {
            if field_value(row, field).is_none() {
                let mut available: Vec<&str> = row
                    .iter()
                    .filter(|(_, v)| !v.trim().is_empty())
                    .map(|(k, _)| k.as_str())
                    .collect();
                available.sort_unstable();
                errors.push(format!(
                    "Row {}: Missing {}. Available fields: {}",
                    index + 1,
                    field,
                    available.join(", ")
                ));
                break;
            }
        }
    }
    errors
}

/// Accepts plain dates and full timestamps, emits RFC 3339.
fn parse_joining_date(raw: &str) -> Option<String> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let dt = d.and_hms_opt(0, 0, 0)?.and_utc();
        return Some(dt.to_rfc3339());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).to_rfc3339());
    }
    None
}

/// Map validated rows to `profiles` insert objects, stamping the owning
/// user id on each.
pub fn to_insert_rows(
    rows: &[HashMap<String, String>],
    user_id: Uuid,
) -> Result<Vec<Value>, Vec<String>> {
    let mut out = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let date_of_joining = match field_value(row, "date_of_joining") {
            Some(raw) => match parse_joining_date(raw) {
                Some(iso) => Value::String(iso),
                None => {
                    errors.push(format!("Row {}: invalid date_of_joining '{raw}'", index + 1));
                    continue;
                }
            },
            None => Value::Null,
        };

        let opt = |field: &str| match field_value(row, field) {
            Some(v) => Value::String(v.to_string()),
            None => Value::Null,
        };

        out.push(json!({
            "user_id": user_id,
            "service_number": opt("service_number"),
            "rank": opt("rank"),
            "first_name": opt("first_name"),
            "last_name": opt("last_name"),
            "specialization": opt("specialization"),
            "command": opt("command"),
            "base_location": opt("base_location"),
            "date_of_joining": date_of_joining,
            "phone": opt("phone"),
            "emergency_contact": opt("emergency_contact"),
        }));
    }

    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}

/// Full import: parse, validate, insert as one batch. Validation errors
/// come back in the report with nothing inserted.
pub async fn import_profiles<S: ProfileSink + ?Sized>(
    client: &S,
    user_id: Uuid,
    csv_text: &str,
) -> Result<ImportReport, ImportError> {
    let rows = parse_csv(csv_text)?;

    let errors = validate_rows(&rows);
    if !errors.is_empty() {
        return Ok(ImportReport { imported: 0, errors });
    }

    let to_insert = match to_insert_rows(&rows, user_id) {
        Ok(v) => v,
        Err(errors) => return Ok(ImportReport { imported: 0, errors }),
    };

    if to_insert.is_empty() {
        return Ok(ImportReport::default());
    }

    client.insert_profiles(&to_insert).await?;
    info!(imported = to_insert.len(), "bulk import complete");
    Ok(ImportReport {
        imported: to_insert.len(),
        errors: Vec::new(),
    })
}
