//! Reader configuration

use crate::record::Endian;
use core::fmt;
use heapless::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Longest supported start sequence
pub const MAX_START_LEN: usize = 8;

pub type StartSequence = Vec<u8, MAX_START_LEN>;

/// What the reader does with the checksum of a received record
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChecksumPolicy {
    /// Hand the record over as received
    Ignore = 0,
    /// Reject records whose checksum doesn't match
    Verify = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    EmptyStartSequence,
    StartSequenceTooLong { len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyStartSequence => f.write_str("start sequence is empty"),
            ConfigError::StartSequenceTooLong { len } => write!(
                f,
                "start sequence of {} bytes exceeds {} bytes",
                len, MAX_START_LEN
            ),
        }
    }
}

/// Reader configuration.
///
/// The default reads little endian records, hands them over unverified and
/// expects no start sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    endian: Endian,
    checksum: ChecksumPolicy,
    start: Option<StartSequence>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderConfig {
    pub const fn new() -> Self {
        Self {
            endian: Endian::Little,
            checksum: ChecksumPolicy::Ignore,
            start: None,
        }
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn checksum(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum = policy;
        self
    }

    /// Bytes the peer sends once before its first record
    pub fn start_sequence(mut self, seq: &[u8]) -> Result<Self, ConfigError> {
        if seq.is_empty() {
            return Err(ConfigError::EmptyStartSequence);
        }

        let seq = Vec::from_slice(seq)
            .map_err(|_| ConfigError::StartSequenceTooLong { len: seq.len() })?;
        self.start = Some(seq);

        Ok(self)
    }

    pub fn endian_order(&self) -> Endian {
        self.endian
    }

    pub fn checksum_policy(&self) -> ChecksumPolicy {
        self.checksum
    }

    pub fn start_seq(&self) -> Option<&[u8]> {
        self.start.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ReaderConfig::default();
        assert_eq!(cfg.endian_order(), Endian::Little);
        assert_eq!(cfg.checksum_policy(), ChecksumPolicy::Ignore);
        assert_eq!(cfg.start_seq(), None);
    }

    #[test]
    fn builder() {
        let cfg = ReaderConfig::new()
            .endian(Endian::Big)
            .checksum(ChecksumPolicy::Verify)
            .start_sequence(&[192, 105])
            .unwrap();

        assert_eq!(cfg.endian_order(), Endian::Big);
        assert_eq!(cfg.checksum_policy(), ChecksumPolicy::Verify);
        assert_eq!(cfg.start_seq(), Some(&[192u8, 105][..]));
    }

    #[test]
    fn start_sequence_bounds() {
        assert_eq!(
            ReaderConfig::new().start_sequence(&[]),
            Err(ConfigError::EmptyStartSequence)
        );
        assert_eq!(
            ReaderConfig::new().start_sequence(&[0; 9]),
            Err(ConfigError::StartSequenceTooLong { len: 9 })
        );
        assert!(ReaderConfig::new().start_sequence(&[0; 8]).is_ok());
    }

    #[test]
    fn checksum_policy_primitive() {
        assert_eq!(ChecksumPolicy::try_from(1u8).ok(), Some(ChecksumPolicy::Verify));
        assert!(ChecksumPolicy::try_from(2u8).is_err());
        assert_eq!(u8::from(ChecksumPolicy::Ignore), 0);
    }
}
