//! Binary snapshot layout
//!
//! ```text
//! offset 0   magic              u32
//! offset 4   format_version     u32
//! offset 8   statement_cancel   u64
//! offset 16  statement_timeout  u64
//! offset 24  lock_timeout       u64
//! offset 32  idle_in_tx_timeout u64
//! ```
//!
//! All integers are little-endian. The codec does no I/O; the persistence
//! manager decides what to do with a rejected record.

use thiserror::Error;

use crate::types::{CounterId, CounterValues};

/// Reserved magic number identifying a counter snapshot
pub const SNAPSHOT_MAGIC: u32 = 0xF000_0001;

pub const HEADER_LEN: usize = 8;
pub const SNAPSHOT_LEN: usize = HEADER_LEN + 4 * 8;

/// Errors that make a byte buffer unparseable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("snapshot is {actual} bytes, expected {expected}")]
    Length { expected: usize, actual: usize },
}

/// Snapshot header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub format_version: u32,
}

impl SnapshotHeader {
    pub fn current(format_version: u32) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            format_version,
        }
    }

    /// Both magic and version match what this build expects
    pub fn is_valid(&self, expected_version: u32) -> bool {
        self.magic == SNAPSHOT_MAGIC && self.format_version == expected_version
    }
}

/// A parsed snapshot; `counters` must not be trusted unless `valid`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub header: SnapshotHeader,
    pub counters: CounterValues,
    pub valid: bool,
}

/// Encoder/decoder bound to one format version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotCodec {
    format_version: u32,
}

impl SnapshotCodec {
    pub fn new(format_version: u32) -> Self {
        Self { format_version }
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    /// Serialize a header for this version plus `counters`
    pub fn encode(&self, counters: &CounterValues) -> [u8; SNAPSHOT_LEN] {
        let mut buf = [0u8; SNAPSHOT_LEN];
        buf[0..4].copy_from_slice(&SNAPSHOT_MAGIC.to_le_bytes());
        buf[4..8].copy_from_slice(&self.format_version.to_le_bytes());
        for (i, id) in CounterId::ALL.iter().enumerate() {
            let start = HEADER_LEN + i * 8;
            buf[start..start + 8].copy_from_slice(&counters.get(*id).to_le_bytes());
        }
        buf
    }

    /// Parse `bytes`, flagging (not failing) a header mismatch
    pub fn decode(&self, bytes: &[u8]) -> Result<Decoded, FormatError> {
        if bytes.len() != SNAPSHOT_LEN {
            return Err(FormatError::Length {
                expected: SNAPSHOT_LEN,
                actual: bytes.len(),
            });
        }

        let header = SnapshotHeader {
            magic: read_u32(bytes, 0),
            format_version: read_u32(bytes, 4),
        };
        let counters = CounterValues {
            statement_cancel: read_u64(bytes, HEADER_LEN),
            statement_timeout: read_u64(bytes, HEADER_LEN + 8),
            lock_timeout: read_u64(bytes, HEADER_LEN + 16),
            idle_in_tx_timeout: read_u64(bytes, HEADER_LEN + 24),
        };

        Ok(Decoded {
            header,
            counters,
            valid: header.is_valid(self.format_version),
        })
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(word)
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_layout() {
        let codec = SnapshotCodec::new(16);
        let bytes = codec.encode(&CounterValues::new(1, 2, 3, u64::MAX));

        assert_eq!(bytes.len(), 40);
        assert_eq!(&bytes[0..4], &[0x01, 0x00, 0x00, 0xF0]);
        assert_eq!(&bytes[4..8], &16u32.to_le_bytes());
        assert_eq!(&bytes[8..16], &1u64.to_le_bytes());
        assert_eq!(&bytes[24..32], &3u64.to_le_bytes());
        assert_eq!(&bytes[32..40], &[0xFF; 8]);
    }

    #[test]
    fn test_decode_wrong_length() {
        let codec = SnapshotCodec::new(1);
        assert_eq!(
            codec.decode(&[0u8; 39]),
            Err(FormatError::Length { expected: 40, actual: 39 })
        );
        assert!(codec.decode(&[0u8; 41]).is_err());
        assert!(codec.decode(&[]).is_err());
    }

    #[test]
    fn test_decode_flags_bad_magic() {
        let codec = SnapshotCodec::new(1);
        let mut bytes = codec.encode(&CounterValues::new(7, 0, 0, 0));
        bytes[0] ^= 0xFF;

        let decoded = codec.decode(&bytes).unwrap();
        assert!(!decoded.valid);
        assert_eq!(decoded.counters.statement_cancel, 7);
    }

    #[test]
    fn test_decode_flags_version_mismatch() {
        let written = SnapshotCodec::new(15).encode(&CounterValues::new(1, 1, 1, 1));
        let decoded = SnapshotCodec::new(16).decode(&written).unwrap();

        assert!(!decoded.valid);
        assert_eq!(decoded.header.magic, SNAPSHOT_MAGIC);
        assert_eq!(decoded.header.format_version, 15);
    }

    proptest! {
        #[test]
        fn prop_round_trip_is_bit_identical(
            a in prop_oneof![Just(0u64), Just(u64::MAX), any::<u64>()],
            b in prop_oneof![Just(0u64), Just(u64::MAX), any::<u64>()],
            c in prop_oneof![Just(0u64), Just(u64::MAX), any::<u64>()],
            d in prop_oneof![Just(0u64), Just(u64::MAX), any::<u64>()],
            version in any::<u32>(),
        ) {
            let codec = SnapshotCodec::new(version);
            let values = CounterValues::new(a, b, c, d);
            let decoded = codec.decode(&codec.encode(&values)).unwrap();

            prop_assert!(decoded.valid);
            prop_assert_eq!(decoded.header, SnapshotHeader::current(version));
            prop_assert_eq!(decoded.counters, values);
        }
    }
}
