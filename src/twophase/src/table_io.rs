//! Persistence for the pruning tables: raw bytes plus a trailing rolling
//! checksum, read and hashed in 64 KiB chunks.

use log::{info, warn};
use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Chunk size for reading and hashing table files.
pub const TABLE_CHUNK: usize = 65536;

/// Errors that abort a run; recoverable file problems only warn.
#[derive(Debug, Error)]
pub enum TableIoError {
    #[error("cannot write pruning file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("integrity of pruning table compromised")]
    Integrity,
}

/// Roll `seed = 37 * seed + word` over the little-endian u32 words of
/// `bytes`, with 32-bit wrap-around.
#[must_use]
pub fn data_hash(bytes: &[u8], seed: u32) -> u32 {
    let mut seed = seed;
    for w in bytes.chunks_exact(4) {
        seed = seed
            .wrapping_mul(37)
            .wrapping_add(u32::from_le_bytes(w.try_into().unwrap()));
    }
    seed
}

/// Fill `mem` from `path` and verify the trailing checksum. Returns the
/// checksum on success; `None` (after a log line) when the file is
/// missing, truncated or corrupt, in which case the caller regenerates.
pub fn read_table(path: &Path, mem: &mut [u8]) -> Option<u32> {
    let mut f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} not found, will generate", path.display());
            return None;
        }
        Err(e) => {
            warn!("cannot open {}: {e}", path.display());
            return None;
        }
    };
    let mut seed = 0u32;
    let mut off = 0;
    while off < mem.len() {
        let take = TABLE_CHUNK.min(mem.len() - off);
        if f.read_exact(&mut mem[off..off + take]).is_err() {
            warn!("out of data in {}", path.display());
            return None;
        }
        seed = data_hash(&mem[off..off + take], seed);
        off += take;
    }
    let mut trailer = [0u8; 4];
    if f.read_exact(&mut trailer).is_err() {
        warn!("out of data in {}", path.display());
        return None;
    }
    let stored = u32::from_le_bytes(trailer);
    if stored != seed {
        warn!(
            "bad checksum in {}; expected {stored} but saw {seed}",
            path.display()
        );
        return None;
    }
    Some(seed)
}

/// Write `mem` followed by its checksum.
///
/// # Errors
///
/// Write failures are fatal to the caller, unlike read problems.
pub fn write_table(path: &Path, mem: &[u8], checksum: u32) -> Result<(), TableIoError> {
    let write = |path: &Path| -> io::Result<()> {
        let mut f = File::create(path)?;
        for chunk in mem.chunks(TABLE_CHUNK) {
            f.write_all(chunk)?;
        }
        f.write_all(&checksum.to_le_bytes())?;
        f.flush()
    };
    write(path).map_err(|source| TableIoError::Write {
        path: path.to_path_buf(),
        source,
    })
}
