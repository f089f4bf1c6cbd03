use std::fmt;

use sha2::Digest as _;

use crate::{
    foundation::error::{MemeError, MemeResult},
    identity::query::QueryParams,
};

/// Length of an [`ArtifactId`] in hex characters.
pub const ARTIFACT_ID_LEN: usize = 64;

/// Content address of a generated artifact: lowercase hex SHA-256 of the canonical query.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Parse an id received from outside (file names, URLs).
    pub fn parse(raw: &str) -> MemeResult<Self> {
        let valid = raw.len() == ARTIFACT_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(MemeError::invalid_request(format!(
                "'{raw}' is not a {ARTIFACT_ID_LEN}-char lowercase hex artifact id"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the artifact is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.gif", self.0)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stateless identity function mapping canonical query text to an [`ArtifactId`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Identity {
    /// Construct the identity function.
    pub fn new() -> Self {
        Self
    }

    /// Digest already canonical query text.
    pub fn derive(&self, canonical_query: &str) -> ArtifactId {
        ArtifactId(sha256_hex(canonical_query.as_bytes()))
    }

    /// Canonicalize `params` and digest them.
    pub fn for_params(&self, params: &QueryParams) -> ArtifactId {
        self.derive(&params.canonical())
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/identity/digest.rs"]
mod tests;
