//! Token resolution against a directory snapshot

use super::DeviceInfo;
use thiserror::Error;

/// Why a device token failed to resolve
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Device name shouldn't be empty")]
    EmptyToken,
    #[error("Invalid device number {0}")]
    InvalidOrdinal(String),
    #[error("Device number {0:02} is not in device list range")]
    OutOfRange(usize),
    #[error("Can't find {0}")]
    NotFound(String),
    #[error("Found multiple devices with names started from {0}. Please provide an exact name.")]
    Ambiguous(String),
}

/// Resolve a user-supplied token against a snapshot.
///
/// A token starting with `#` is a zero-based ordinal into the snapshot;
/// anything else is a case-insensitive prefix match against display names,
/// which must be unique to succeed.
pub fn resolve<'a>(snapshot: &'a [DeviceInfo], token: &str) -> Result<&'a DeviceInfo, ResolveError> {
    if token.is_empty() {
        return Err(ResolveError::EmptyToken);
    }

    if let Some(rest) = token.strip_prefix('#') {
        let ordinal: usize = rest
            .parse()
            .map_err(|_| ResolveError::InvalidOrdinal(rest.to_string()))?;
        return snapshot
            .get(ordinal)
            .ok_or(ResolveError::OutOfRange(ordinal));
    }

    let needle = token.to_lowercase();
    let mut matches = snapshot
        .iter()
        .filter(|d| d.name.to_lowercase().starts_with(&needle));

    match (matches.next(), matches.next()) {
        (None, _) => Err(ResolveError::NotFound(token.to_string())),
        (Some(device), None) => Ok(device),
        (Some(_), Some(_)) => Err(ResolveError::Ambiguous(token.to_string())),
    }
}
