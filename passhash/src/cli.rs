//! Command line surface. `run` resolves flags against the config file and
//! drives either a hashing batch or a single verification.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::batch::{self, BatchReport};
use crate::config::{resolve_config, validate_salt_length};
use crate::crypto::{Algorithm, OsSaltSource, SaltedHasher};

/// Generate salted password hashes in the RabbitMQ user database format.
#[derive(Parser, Debug)]
#[command(name = "rabbit-passhash", version, about)]
pub struct Args {
    /// Passwords to hash.
    #[arg(short, long = "passwords", num_args = 1..)]
    pub passwords: Vec<String>,

    /// Hash algorithm. md5 is broken and only kept for old artifacts.
    #[arg(short, long, value_enum)]
    pub algorithm: Option<Algorithm>,

    /// File with one password per line.
    #[arg(short, long, conflicts_with = "verify")]
    pub import: Option<PathBuf>,

    /// File to write the results to instead of stdout.
    #[arg(short, long, conflicts_with = "verify")]
    pub export: Option<PathBuf>,

    /// JSON config file (falls back to $RABBIT_PASSHASH_CONFIG).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Salt length in bytes.
    #[arg(short, long)]
    pub salt_length: Option<usize>,

    /// Check the single given password against this stored hash.
    #[arg(short, long, value_name = "ENCODED")]
    pub verify: Option<String>,
}

/// Flags merged over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub algorithm: Algorithm,
    pub salt_length: usize,
    pub export: Option<PathBuf>,
}

impl Args {
    pub fn settings(&self) -> Result<Settings> {
        let config = resolve_config(self.config.as_deref()).context("failed to load config")?;
        let salt_length = self.salt_length.unwrap_or(config.salt_length);
        validate_salt_length(salt_length)?;
        Ok(Settings {
            algorithm: self.algorithm.unwrap_or(config.algorithm),
            salt_length,
            export: self.export.clone().or(config.export),
        })
    }
}

fn build_hasher(settings: &Settings) -> SaltedHasher {
    if settings.algorithm.is_deprecated() {
        log::warn!(
            "{} is cryptographically broken; use it only to reproduce existing hashes",
            settings.algorithm
        );
    }
    SaltedHasher::with_salt_source(
        settings.algorithm.primitive(),
        Box::new(OsSaltSource),
        settings.salt_length,
    )
}

/// Runs the command, writing results to `out`.
pub fn run(args: &Args, out: &mut dyn Write) -> Result<()> {
    let settings = args.settings()?;
    let mut hasher = build_hasher(&settings);

    if let Some(encoded) = &args.verify {
        let [password] = args.passwords.as_slice() else {
            bail!("--verify needs exactly one --passwords value");
        };
        let matches = hasher.verify(password, encoded)?;
        writeln!(out, "{}", if matches { "match" } else { "no-match" })?;
        return Ok(());
    }

    let passwords = batch::collect_passwords(&args.passwords, args.import.as_deref())?;
    if passwords.is_empty() {
        bail!("no passwords given; use --passwords or --import");
    }

    let report = batch::hash_all(&mut hasher, &passwords);
    hasher.release();
    emit(&report, settings.export.as_deref(), out)?;

    if !report.is_complete() {
        bail!("{} passwords could not be hashed", report.failures.len());
    }
    Ok(())
}

fn emit(report: &BatchReport, export: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let rendered = batch::render(report)?;
    match export {
        Some(path) => batch::export(&rendered, path)
            .with_context(|| format!("failed to export to {}", path.display()))?,
        None => writeln!(out, "{rendered}")?,
    }
    Ok(())
}
