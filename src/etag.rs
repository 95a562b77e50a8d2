// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use sha3::{Digest, Sha3_256};

use crate::{ErrorKind, NetplaneError};

/// Hash an ETag source into its wire form.
///
/// The caller passes the fields covered by the precondition, in a fixed
/// order; any mutation of one of them yields a different tag. Config
/// maps are ordered (`BTreeMap`) so the JSON encoding is canonical.
pub fn etag_hash<T: Serialize>(parts: &T) -> Result<String, NetplaneError> {
    let encoded = serde_json::to_vec(parts).map_err(|e| {
        NetplaneError::new(
            ErrorKind::Bug,
            format!("Failed to serialize ETag source: {e}"),
        )
    })?;
    let mut hasher = Sha3_256::new();
    hasher.update(&encoded);
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}
