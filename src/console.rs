//! Diagnostic text output and the control loop step

use crate::reader::try_read_record;
use crate::record::{ControlRecord, Endian, SensorRecord};
use crate::sink::{write_record, ByteSink};
use crate::source::ByteSource;
use core::fmt::{self, Write};

/// Prints the checksum, then `value1`, one decimal per line
pub fn report<W>(text: &mut W, record: &ControlRecord) -> fmt::Result
where
    W: Write + ?Sized,
{
    write!(text, "{}\r\n", record.checksum)?;
    write!(text, "{}\r\n", record.value1)
}

/// Polls one control record and reports it.
///
/// Returns `Ok(None)` when no complete record is buffered yet.
pub fn run_get<S, W>(source: &mut S, text: &mut W) -> Result<Option<ControlRecord>, fmt::Error>
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    match try_read_record(source) {
        Some(record) => {
            report(text, &record)?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

/// Answers `control` with a [`SensorRecord`] echoing its value and checksum
pub fn respond<K>(
    sink: &mut K,
    control: &ControlRecord,
    endian: Endian,
) -> Result<SensorRecord, K::Error>
where
    K: ByteSink + ?Sized,
{
    let response = SensorRecord::from(*control);
    write_record(sink, &response, endian)?;

    Ok(response)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::SliceSource;

    #[test]
    fn report_format() {
        let mut out = String::new();
        report(
            &mut out,
            &ControlRecord {
                value1: 4660,
                checksum: 38,
            },
        )
        .unwrap();

        assert_eq!(out, "38\r\n4660\r\n");
    }

    #[test]
    fn run_get_prints_once_ready() {
        let data = [0x34, 0x12, 0x26];
        let mut out: heapless::String<32> = heapless::String::new();

        let mut src = SliceSource::new(&data[..2]);
        assert_eq!(run_get(&mut src, &mut out), Ok(None));
        assert!(out.is_empty());

        let mut src = SliceSource::new(&data);
        let record = run_get(&mut src, &mut out).unwrap().unwrap();
        assert_eq!(record.value1, 0x1234);
        assert_eq!(out.as_str(), "38\r\n4660\r\n");
    }

    #[test]
    fn run_get_text_overflow() {
        let data = [0x34, 0x12, 0x26];
        let mut src = SliceSource::new(&data);
        let mut out: heapless::String<4> = heapless::String::new();

        assert_eq!(run_get(&mut src, &mut out), Err(fmt::Error));
        // The record was still consumed
        assert_eq!(src.available(), 0);
    }

    #[test]
    fn respond_writes_sensor_record() {
        let mut sink: heapless::Vec<u8, 3> = heapless::Vec::new();
        let control = ControlRecord {
            value1: 0x1234,
            checksum: 0x26,
        };

        let response = respond(&mut sink, &control, Endian::Little).unwrap();
        assert_eq!(response.value2, 0x1234);
        assert_eq!(&sink[..], &[0x26, 0x34, 0x12]);

        assert!(respond(&mut sink, &control, Endian::Little).is_err());
    }
}
