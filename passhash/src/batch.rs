//! Batch driver: gathers passwords from arguments and an import file, hashes
//! each one and renders the results as a JSON object keyed by password.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::crypto::{HashError, SaltedHasher};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("import file unreadable: {0}")]
    Import(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error("render failed: {0}")]
    Render(String),
}

/// A password that could not be hashed.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub error: HashError,
}

#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct BatchReport {
    /// Encoded digests keyed by password, in password order.
    pub hashes: BTreeMap<String, String>,
    #[serde(skip)]
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reads one password per line, trimming whitespace and skipping blank lines.
pub fn read_password_file(path: &Path) -> Result<Vec<String>, BatchError> {
    let content = fs::read_to_string(path).map_err(|e| BatchError::Import(format!("{e}")))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Command line passwords first, then the lines of `import` if that file exists.
pub fn collect_passwords(
    cli: &[String],
    import: Option<&Path>,
) -> Result<Vec<String>, BatchError> {
    let mut passwords = Vec::with_capacity(cli.len());

    if !cli.is_empty() {
        passwords.extend(cli.iter().cloned());
        log::info!("received {} passwords from arguments", cli.len());
    }

    if let Some(path) = import {
        if path.is_file() {
            let lines = read_password_file(path)?;
            log::info!("received {} passwords from {}", lines.len(), path.display());
            passwords.extend(lines);
        } else {
            log::warn!("import file {} does not exist, skipping", path.display());
        }
    }

    log::info!("received {} passwords in total", passwords.len());
    Ok(passwords)
}

/// Hashes every distinct password. Failures are recorded once and skipped.
pub fn hash_all(hasher: &mut SaltedHasher, passwords: &[String]) -> BatchReport {
    let mut report = BatchReport::default();
    let mut failed: HashSet<&str> = HashSet::new();
    for (index, password) in passwords.iter().enumerate() {
        if report.hashes.contains_key(password) || failed.contains(password.as_str()) {
            log::debug!("password #{index} repeats an earlier entry, skipping");
            continue;
        }
        match hasher.hash(password) {
            Ok(encoded) => {
                report.hashes.insert(password.clone(), encoded);
            }
            Err(error) => {
                log::warn!("skipping password #{index}: {error}");
                failed.insert(password);
                report.failures.push(BatchFailure { index, error });
            }
        }
    }
    log::info!(
        "hashed {} passwords with {}, {} failed",
        report.hashes.len(),
        hasher.algorithm_name().unwrap_or("released hasher"),
        report.failures.len()
    );
    report
}

pub fn render(report: &BatchReport) -> Result<String, BatchError> {
    serde_json::to_string_pretty(report).map_err(|e| BatchError::Render(format!("{e}")))
}

pub fn export(rendered: &str, path: &Path) -> Result<(), BatchError> {
    fs::write(path, rendered).map_err(|e| BatchError::Export(format!("{e}")))?;
    log::info!("hash generation is complete, results written to {}", path.display());
    Ok(())
}
