//! Fixed-size records and their wire codec

use crate::checksum::checksum_skipping;
use core::fmt;
use num_enum::IntoPrimitive;
use sealed::sealed;

/// Byte order of multi-byte fields on the wire
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Endian {
    #[default]
    Little = 0,
    Big = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Buffer doesn't match the record size
    Length { expected: usize, found: usize },
    /// Embedded checksum differs from the one computed over the payload
    Checksum { received: u8, computed: u8 },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Length { expected, found } => {
                write!(f, "expected {} bytes, found {}", expected, found)
            }
            FrameError::Checksum { received, computed } => write!(
                f,
                "checksum mismatch: received {:#04x}, computed {:#04x}",
                received, computed
            ),
        }
    }
}

/// Scalar that can be placed in a record
#[sealed]
pub trait Field: Copy {
    /// Width on the wire in bytes
    const WIDTH: usize;

    /// Reads the value from the first `WIDTH` bytes of `bytes`
    fn read(bytes: &[u8], endian: Endian) -> Self;

    /// Writes the value into the first `WIDTH` bytes of `out`
    fn write(self, out: &mut [u8], endian: Endian);
}

macro_rules! field {
    ($($ty:ty),* $(,)?) => {
        $(
            #[sealed]
            impl Field for $ty {
                const WIDTH: usize = core::mem::size_of::<$ty>();

                fn read(bytes: &[u8], endian: Endian) -> Self {
                    let mut raw = [0; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::WIDTH]);

                    match endian {
                        Endian::Little => <$ty>::from_le_bytes(raw),
                        Endian::Big => <$ty>::from_be_bytes(raw),
                    }
                }

                fn write(self, out: &mut [u8], endian: Endian) {
                    let raw = match endian {
                        Endian::Little => self.to_le_bytes(),
                        Endian::Big => self.to_be_bytes(),
                    };

                    out[..Self::WIDTH].copy_from_slice(&raw);
                }
            }
        )*
    };
}

field!(u8, i8, u16, i16, u32, i32);

/// Whether fields at `offsets` with `widths` and a checksum byte at
/// `checksum` fit in `size` bytes without overlapping
#[doc(hidden)]
pub const fn layout_fits(size: usize, checksum: usize, offsets: &[usize], widths: &[usize]) -> bool {
    if checksum >= size || offsets.len() != widths.len() {
        return false;
    }

    let mut i = 0;
    while i < offsets.len() {
        let lo = offsets[i];
        let hi = lo + widths[i];
        if hi > size || (lo <= checksum && checksum < hi) {
            return false;
        }

        let mut j = i + 1;
        while j < offsets.len() {
            if lo < offsets[j] + widths[j] && offsets[j] < hi {
                return false;
            }
            j += 1;
        }

        i += 1;
    }

    true
}

/// A fixed-size record exchanged over the serial link.
///
/// Sealed, the records of this crate are the only implementors. `Bytes` is
/// always exactly `SIZE` long.
#[sealed]
pub trait Record: Sized + Copy {
    /// Byte array holding exactly one encoded record
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Encoded size in bytes
    const SIZE: usize;
    /// Position of the checksum byte in the encoding
    const CHECKSUM_OFFSET: usize;

    /// Decodes a record. `bytes` must be exactly `SIZE` long.
    fn decode(bytes: &[u8], endian: Endian) -> Result<Self, FrameError>;

    /// Encodes the record into the first `SIZE` bytes of `out`.
    fn encode(&self, out: &mut [u8], endian: Endian) -> Result<usize, FrameError>;

    /// Checksum as carried by the record
    fn checksum(&self) -> u8;

    fn with_checksum(self, checksum: u8) -> Self;

    fn to_bytes(&self, endian: Endian) -> Self::Bytes;

    /// Checksum over every byte of the encoding except the checksum itself
    fn compute_checksum(&self, endian: Endian) -> u8 {
        let bytes = self.to_bytes(endian);
        checksum_skipping(bytes.as_ref(), Self::CHECKSUM_OFFSET)
    }

    /// Returns a copy carrying the computed checksum
    fn seal(self, endian: Endian) -> Self {
        let checksum = self.compute_checksum(endian);
        self.with_checksum(checksum)
    }

    fn verify(&self, endian: Endian) -> Result<(), FrameError> {
        let computed = self.compute_checksum(endian);
        let received = self.checksum();

        if computed == received {
            Ok(())
        } else {
            Err(FrameError::Checksum { received, computed })
        }
    }
}

wire_record! {
    /// Control message sent by the host.
    ///
    /// Wire layout: `[value1, value1, checksum]`
    pub struct ControlRecord [size = 3, checksum = 2] {
        value1: u16 = 0,
    }
}

wire_record! {
    /// Answer to a [`ControlRecord`].
    ///
    /// Wire layout: `[checksum, value2, value2]`
    pub struct SensorRecord [size = 3, checksum = 0] {
        value2: u16 = 1,
    }
}

impl From<ControlRecord> for SensorRecord {
    /// Echoes the control value, keeping the received checksum
    fn from(c: ControlRecord) -> Self {
        Self {
            value2: c.value1,
            checksum: c.checksum,
        }
    }
}
