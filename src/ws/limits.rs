//! Process-wide cap on payload length.
//!
//! The frame-header parser checks each declared length with [`check_length`]
//! before it allocates anything. `PayloadData` never checks this itself.

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};

use super::consts::{DEFAULT_MAX_LENGTH, FRAGMENT_LENGTH, MAX_LENGTH_ENV};
use crate::error::{PayloadError, Result};

static MAX_LENGTH: AtomicU64 = AtomicU64::new(DEFAULT_MAX_LENGTH);

pub fn max_length() -> u64 {
    MAX_LENGTH.load(Ordering::Relaxed)
}

/// Accepts values in `FRAGMENT_LENGTH..=i64::MAX`.
pub fn validate_max_length(value: u64) -> Result<()> {
    if value < FRAGMENT_LENGTH || value > DEFAULT_MAX_LENGTH {
        return Err(PayloadError::invalid(format!(
            "max length {} is outside {}..={}",
            value, FRAGMENT_LENGTH, DEFAULT_MAX_LENGTH
        )));
    }
    Ok(())
}

pub fn set_max_length(value: u64) -> Result<()> {
    if let Err(e) = validate_max_length(value) {
        tracing::warn!("rejected max payload length {}", value);
        return Err(e);
    }
    let previous = MAX_LENGTH.swap(value, Ordering::Relaxed);
    tracing::debug!("max payload length changed from {} to {}", previous, value);
    Ok(())
}

pub fn reset_max_length() {
    MAX_LENGTH.store(DEFAULT_MAX_LENGTH, Ordering::Relaxed);
}

/// Reads `WS_PAYLOAD_MAX_LENGTH` and applies it.
///
/// Returns `Ok(None)` when the variable is unset, leaving the current limit alone.
pub fn load_from_env() -> Result<Option<u64>> {
    let raw = match env::var(MAX_LENGTH_ENV) {
        Ok(raw) => raw,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(e) => {
            return Err(PayloadError::invalid(format!(
                "{} is not readable: {}",
                MAX_LENGTH_ENV, e
            )))
        }
    };
    let value = raw.trim().parse::<u64>().map_err(|e| {
        tracing::warn!("{}={:?} is not a number", MAX_LENGTH_ENV, raw);
        PayloadError::invalid(format!("{} is not a valid length: {}", MAX_LENGTH_ENV, e))
    })?;
    set_max_length(value)?;
    Ok(Some(value))
}

pub fn check_length(declared: u64) -> Result<()> {
    let max = max_length();
    if declared > max {
        return Err(PayloadError::TooLarge {
            length: declared,
            max,
        });
    }
    Ok(())
}
