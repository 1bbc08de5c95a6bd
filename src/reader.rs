//! Non-blocking record reader

use crate::config::{ChecksumPolicy, ReaderConfig};
use crate::record::{ControlRecord, Endian, Record};
use crate::source::ByteSource;
use crate::sync::StartSync;
use crate::Error;
use core::marker::PhantomData;

/// Reads one `R` once `source` holds at least `R::SIZE` bytes.
///
/// Returns `WouldBlock` without consuming anything otherwise. Doesn't call
/// [`ByteSource::fill`], buffered sources have to be filled by the caller.
pub fn read_record<R, S>(source: &mut S, endian: Endian) -> nb::Result<R, Error<S::Error>>
where
    R: Record,
    S: ByteSource + ?Sized,
{
    let available = source.available();
    if available < R::SIZE {
        trace!("waiting for record: {} of {} bytes", available, R::SIZE);
        return Err(nb::Error::WouldBlock);
    }

    let mut bytes = R::Bytes::default();
    source
        .read_exact(bytes.as_mut())
        .map_err(|e| nb::Error::Other(Error::Transport(e)))?;

    R::decode(bytes.as_ref(), endian).map_err(|e| nb::Error::Other(Error::Frame(e)))
}

/// Reads a little endian [`ControlRecord`] if one is buffered.
///
/// Either consumes nothing and returns `None`, or consumes exactly
/// `ControlRecord::SIZE` bytes. The checksum isn't verified.
pub fn try_read_record<S>(source: &mut S) -> Option<ControlRecord>
where
    S: ByteSource + ?Sized,
{
    match read_record(source, Endian::Little) {
        Ok(record) => Some(record),
        Err(nb::Error::WouldBlock) => None,
        Err(nb::Error::Other(_)) => {
            warn!("control record read failed");
            None
        }
    }
}

/// Polls records of type `R` out of a source
pub struct RecordReader<S, R = ControlRecord> {
    source: S,
    config: ReaderConfig,
    sync: Option<StartSync>,
    _record: PhantomData<R>,
}

impl<S, R> RecordReader<S, R>
where
    S: ByteSource,
    R: Record,
{
    pub fn new(source: S, config: ReaderConfig) -> Self {
        let sync = config.start_seq().map(|seq| {
            let mut pattern = crate::config::StartSequence::new();
            // `seq` was bounded by `ReaderConfig::start_sequence`
            pattern.extend_from_slice(seq).ok();
            StartSync::new(pattern)
        });

        Self {
            source,
            config,
            sync,
            _record: PhantomData,
        }
    }

    /// One poll step: fill, align to the start sequence, then read.
    ///
    /// A record rejected by [`ChecksumPolicy::Verify`] stays consumed, so
    /// the next poll starts at the following record.
    pub fn poll(&mut self) -> nb::Result<R, Error<S::Error>> {
        self.source
            .fill()
            .map_err(|e| nb::Error::Other(Error::Transport(e)))?;

        if let Some(sync) = self.sync.as_mut() {
            sync.scan(&mut self.source)
                .map_err(|e| e.map(Error::Transport))?;
        }

        let endian = self.config.endian_order();
        let record: R = read_record(&mut self.source, endian)?;

        if self.config.checksum_policy() == ChecksumPolicy::Verify {
            if let Err(e) = record.verify(endian) {
                warn!("dropping record with bad checksum");
                return Err(nb::Error::Other(Error::Frame(e)));
            }
        }

        Ok(record)
    }

    /// Scans for the start sequence again before the next record
    pub fn resync(&mut self) {
        if let Some(sync) = self.sync.as_mut() {
            sync.reset();
        }
    }

    /// Whether records are being read. Always true without a start sequence.
    pub fn is_synced(&self) -> bool {
        self.sync.as_ref().is_none_or(StartSync::is_locked)
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Releases the source
    pub fn release(self) -> S {
        self.source
    }
}
