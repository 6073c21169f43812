//! SHA-256 content fingerprints
//!
//! A fingerprint is the digest of a file's full byte stream, read in
//! fixed-size chunks. Its canonical text form is `sha256:<hex>`.

use sha2::digest::Output;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::{Error, Result};

/// Prefix of the canonical text form
const PREFIX: &str = "sha256:";

/// Read buffer size used while hashing.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Digest of a file's contents.
///
/// Equal fingerprints are treated as equal content.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Output<Sha256>);

impl Fingerprint {
    /// Fingerprint an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes))
    }

    /// Fingerprint everything a reader yields, `CHUNK_SIZE` bytes at a time.
    pub fn of_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(Self(hasher.finalize()))
    }

    /// Fingerprint a file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fingerprint`] if the file cannot be opened or read
    /// to the end.
    pub fn of_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::Fingerprint {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::of_reader(file).map_err(|e| Error::Fingerprint {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:x}", PREFIX, self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}
