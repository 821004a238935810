//! Versioned binary snapshot codec.
//!
//! Serializes the live set of an [`EngineCore`] to a byte stream and
//! restores it into an engine. The format is little-endian and byte-exact:
//!
//! | offset | field        | type          |
//! |--------|--------------|---------------|
//! | 0      | `version`    | u32           |
//! | 4      | `count`      | u32           |
//! | …      | repeated `count` times:      |
//! |        | `key_len`    | u32           |
//! |        | `key`        | u8 × key_len  |
//! |        | `value_len`  | u32           |
//! |        | `value`      | u8 × value_len|
//!
//! Per-entry timestamps and access counts are not serialized; restoring
//! creates fresh entries (access count 1, current instant).
//!
//! Entries are written least-recently-used first. The reader inserts each
//! record at the front of the recency order, so a clean round trip
//! reproduces the exact recency order of the saved cache, not just its
//! membership. Both sides of the codec assume this direction.

use std::io::{self, Read, Write};

use crate::engine::EngineCore;
use crate::error::SnapshotError;

/// Version written to, and accepted from, the stream header.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializes the engine's entries to `writer`.
///
/// The caller is responsible for holding the engine in shared mode for the
/// duration of the walk (see
/// [`CacheEngine::save_snapshot`](crate::engine::CacheEngine::save_snapshot)).
///
/// # Errors
///
/// [`SnapshotError::Io`] on any write failure, and
/// [`SnapshotError::LengthOverflow`] for a key, value, or entry count that
/// does not fit the u32-prefixed format.
pub fn write_entries<W: Write>(core: &EngineCore, mut writer: W) -> Result<(), SnapshotError> {
    let count =
        u32::try_from(core.len()).map_err(|_| SnapshotError::LengthOverflow { len: core.len() })?;

    writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
    writer.write_all(&count.to_le_bytes())?;

    for (key, value) in core.iter_lru_first() {
        write_chunk(&mut writer, key)?;
        write_chunk(&mut writer, value)?;
    }
    Ok(())
}

/// Empties `core` and repopulates it from `reader`.
///
/// The engine is cleared before the header is validated, so a version
/// mismatch leaves it empty. At most `capacity` records are materialized;
/// surplus records in the stream are ignored and the load still completes
/// cleanly. A stream that ends mid-record fails with
/// [`SnapshotError::Truncated`], keeping the records decoded so far.
pub fn read_entries<R: Read>(core: &mut EngineCore, mut reader: R) -> Result<(), SnapshotError> {
    core.clear();

    let version = read_u32(&mut reader)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: version,
            expected: SNAPSHOT_VERSION,
        });
    }

    let count = read_u32(&mut reader)? as usize;
    for _ in 0..count.min(core.capacity()) {
        let key = read_chunk(&mut reader)?;
        let value = read_chunk(&mut reader)?;
        core.put(&key, value.into());
    }
    Ok(())
}

fn write_chunk<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<(), SnapshotError> {
    let len =
        u32::try_from(bytes.len()).map_err(|_| SnapshotError::LengthOverflow { len: bytes.len() })?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(bytes)?;
    Ok(())
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, SnapshotError> {
    let mut buf = [0_u8; 4];
    reader.read_exact(&mut buf).map_err(map_read_err)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_chunk<R: Read>(reader: &mut R) -> Result<Vec<u8>, SnapshotError> {
    let len = read_u32(reader)? as usize;
    let mut buf = vec![0_u8; len];
    reader.read_exact(&mut buf).map_err(map_read_err)?;
    Ok(buf)
}

fn map_read_err(err: io::Error) -> SnapshotError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        SnapshotError::Truncated
    } else {
        SnapshotError::Io(err)
    }
}
