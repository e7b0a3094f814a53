use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a key in hex characters (full SHA-256 digest).
pub const KEY_LEN: usize = 64;

/// Stable identifier of a media file. Doubles as the public resource id and
/// as the name of the output directory under the HLS root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobKey(String);

impl JobKey {
    /// Accepts only well-formed keys, so a value taken from a URL can be joined
    /// onto a filesystem path safely.
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = raw.len() == KEY_LEN
            && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        well_formed.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the key for a filename.
pub fn resolve(filename: &str) -> JobKey {
    let digest = Sha256::digest(filename.as_bytes());
    JobKey(hex::encode(digest))
}
