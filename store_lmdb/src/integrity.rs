//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the node begins
//! executing transactions.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::Env;

use attest_store::StateKey;

use crate::environment::{META_DB, STATE_DB};
use crate::LmdbError;

/// Summary of an integrity check run.
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Database names that we expect to exist in a valid environment.
const EXPECTED_DATABASES: &[&str] = &[STATE_DB, META_DB];

/// Check LMDB database integrity on startup.
///
/// Opens each expected database and counts its entries; every key of the
/// state database must decode as a [`StateKey`]. Read failures and
/// undecodable keys are recorded in the report rather than causing a hard
/// error.
pub fn check_integrity(env: &Arc<Env>) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.read_txn()?;

    for &db_name in EXPECTED_DATABASES {
        let db = match env.open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => db,
            Ok(None) => {
                report.errors.push(format!("database '{}' is missing", db_name));
                continue;
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to open database '{}': {}", db_name, e));
                continue;
            }
        };
        report.databases_checked += 1;

        match db.len(&rtxn) {
            Ok(count) => report.total_entries += count,
            Err(e) => report
                .errors
                .push(format!("failed to read database '{}': {}", db_name, e)),
        }

        if db_name != STATE_DB {
            continue;
        }
        for entry in db.iter(&rtxn)? {
            match entry {
                Ok((key, _)) => {
                    if let Err(e) = StateKey::decode(key) {
                        report.errors.push(e.to_string());
                    }
                }
                Err(e) => {
                    report.errors.push(format!("failed to iterate '{}': {}", db_name, e));
                    break;
                }
            }
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
