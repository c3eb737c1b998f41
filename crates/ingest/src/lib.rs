//! Bulk CSV import of personnel records.
//!
//! Operators export personnel lists from whatever system they have, so
//! headers arrive in every imaginable spelling. Headers are normalized
//! (trimmed, lowercased) and each target column accepts a list of
//! aliases. Validation is all-or-nothing: any bad row aborts the import
//! before a single insert.

pub mod csv_import;

pub use csv_import::{import_profiles, parse_csv, ImportError, ImportReport, ProfileSink};
