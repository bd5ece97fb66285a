//! Whole-file integrity digests.
//!
//! Independent of the embed/extract bit path: these hash the stored stego
//! container so an audit log can detect later corruption or modification.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// Read buffer size for streaming digests.
const CHUNK_SIZE: usize = 4096;

/// SHA-256 of `bytes`.
pub fn digest(bytes: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(bytes).into()
}

/// SHA-256 of everything `reader` yields, read in 4 KiB chunks.
pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<[u8; DIGEST_LEN]> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().into())
}

/// SHA-256 of a file's contents.
pub fn digest_file<P: AsRef<Path>>(path: P) -> io::Result<[u8; DIGEST_LEN]> {
    digest_reader(File::open(path)?)
}

/// Lowercase hex rendering of a digest.
pub fn to_hex(digest: &[u8; DIGEST_LEN]) -> String {
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            to_hex(&digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_reader_matches_slice() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        assert_eq!(digest_reader(data.as_slice()).unwrap(), digest(&data));
    }

    #[test]
    fn test_file_digest_detects_change() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"stego container bytes").unwrap();
        let before = digest_file(file.path()).unwrap();

        file.write_all(b"!").unwrap();
        let after = digest_file(file.path()).unwrap();

        assert_eq!(before, digest(b"stego container bytes"));
        assert_ne!(before, after);
    }
}
