//! Byte sinks for the response path

use crate::record::{Endian, Record};
use core::fmt;
use embedded_hal_02::blocking::serial;

/// Output side of the serial link
pub trait ByteSink {
    type Error;

    /// Writes all of `bytes` or fails
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<K: ByteSink + ?Sized> ByteSink for &mut K {
    type Error = K::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(bytes)
    }
}

/// Not enough room left in the sink. Nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Overflow {
    pub requested: usize,
    pub remaining: usize,
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot write {} bytes, {} remaining",
            self.requested, self.remaining
        )
    }
}

impl<const N: usize> ByteSink for heapless::Vec<u8, N> {
    type Error = Overflow;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let overflow = Overflow {
            requested: bytes.len(),
            remaining: N - self.len(),
        };

        if bytes.len() > overflow.remaining {
            return Err(overflow);
        }

        self.extend_from_slice(bytes).map_err(|_| overflow)
    }
}

/// Blocking UART transmitter
pub struct SerialSink<W> {
    serial: W,
}

impl<W> SerialSink<W>
where
    W: serial::Write<u8>,
{
    pub fn new(serial: W) -> Self {
        Self { serial }
    }

    pub fn free(self) -> W {
        self.serial
    }
}

impl<W> ByteSink for SerialSink<W>
where
    W: serial::Write<u8>,
{
    type Error = W::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.serial.bwrite_all(bytes)?;
        self.serial.bflush()
    }
}

/// Encodes `record` and writes it in one piece
pub fn write_record<R, K>(sink: &mut K, record: &R, endian: Endian) -> Result<(), K::Error>
where
    R: Record,
    K: ByteSink + ?Sized,
{
    let bytes = record.to_bytes(endian);
    trace!("writing {} byte record", R::SIZE);
    sink.write_all(bytes.as_ref())
}
