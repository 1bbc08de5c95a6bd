//! Byte sources the reader pulls records from

use core::fmt;
use embedded_hal_02::serial;
use heapless::spsc::Consumer;
use heapless::Deque;

/// More bytes were requested than are available. Nothing was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Underrun {
    pub requested: usize,
    pub available: usize,
}

impl fmt::Display for Underrun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested {} bytes, {} available",
            self.requested, self.available
        )
    }
}

/// Input side of the serial link
pub trait ByteSource {
    type Error;

    /// Pulls pending bytes from the hardware into the source. Must not block.
    fn fill(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Number of bytes that can be read without blocking
    fn available(&self) -> usize;

    /// Reads exactly `buf.len()` bytes.
    ///
    /// Callers check [`available`](Self::available) first. Sources consume
    /// nothing if they can't fill `buf` completely.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    type Error = S::Error;

    fn fill(&mut self) -> Result<(), Self::Error> {
        (**self).fill()
    }

    fn available(&self) -> usize {
        (**self).available()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_exact(buf)
    }
}

fn check(requested: usize, available: usize) -> Result<(), Underrun> {
    if requested > available {
        Err(Underrun {
            requested,
            available,
        })
    } else {
        Ok(())
    }
}

/// Cursor over a borrowed slice
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    type Error = Underrun;

    fn available(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        check(buf.len(), self.available())?;

        let end = self.pos + buf.len();
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;

        Ok(())
    }
}

/// Consumer half of an SPSC queue, typically fed from a UART RX interrupt
pub struct QueueSource<'a, const N: usize> {
    rx: Consumer<'a, u8, N>,
}

impl<'a, const N: usize> QueueSource<'a, N> {
    pub fn new(rx: Consumer<'a, u8, N>) -> Self {
        Self { rx }
    }

    pub fn free(self) -> Consumer<'a, u8, N> {
        self.rx
    }
}

impl<const N: usize> ByteSource for QueueSource<'_, N> {
    type Error = Underrun;

    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        // Only this consumer dequeues, so `len` can only grow from here
        let len = buf.len();
        check(len, self.rx.len())?;

        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.rx.dequeue().ok_or(Underrun {
                requested: len - i,
                available: 0,
            })?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError<E> {
    /// The UART reported an error (overrun, framing, noise, ...)
    Read(E),
    Underrun(Underrun),
}

impl<E> From<Underrun> for SerialError<E> {
    fn from(e: Underrun) -> Self {
        SerialError::Underrun(e)
    }
}

impl<E: fmt::Debug> fmt::Display for SerialError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::Read(e) => write!(f, "serial read failed: {:?}", e),
            SerialError::Underrun(e) => fmt::Display::fmt(e, f),
        }
    }
}

/// Buffers the bytes of a non-blocking UART receiver
pub struct BufferedSerial<S, const N: usize> {
    serial: S,
    buf: Deque<u8, N>,
}

impl<S, const N: usize> BufferedSerial<S, N>
where
    S: serial::Read<u8>,
{
    pub fn new(serial: S) -> Self {
        Self {
            serial,
            buf: Deque::new(),
        }
    }

    /// Releases the UART. Buffered bytes are dropped.
    pub fn free(self) -> S {
        self.serial
    }
}

impl<S, const N: usize> ByteSource for BufferedSerial<S, N>
where
    S: serial::Read<u8>,
{
    type Error = SerialError<S::Error>;

    /// Reads from the UART until it would block or the buffer is full
    fn fill(&mut self) -> Result<(), Self::Error> {
        while !self.buf.is_full() {
            let byte = match self.serial.read() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(SerialError::Read(e)),
            };

            // Can't fail, `buf` isn't full
            self.buf.push_back(byte).ok();
        }

        Ok(())
    }

    fn available(&self) -> usize {
        self.buf.len()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        check(buf.len(), self.buf.len())?;

        for byte in buf.iter_mut() {
            *byte = self.buf.pop_front().unwrap_or_default();
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use heapless::spsc::Queue;
    use std::collections::VecDeque;

    /// Scripted UART: `None` entries make `read` return `WouldBlock` once
    pub struct FakeUart {
        pub script: VecDeque<Option<Result<u8, u8>>>,
    }

    impl FakeUart {
        pub fn new(script: impl IntoIterator<Item = Option<Result<u8, u8>>>) -> Self {
            Self {
                script: script.into_iter().collect(),
            }
        }

        pub fn bytes(bytes: &[u8]) -> Self {
            Self::new(bytes.iter().map(|&b| Some(Ok(b))))
        }
    }

    impl serial::Read<u8> for FakeUart {
        type Error = u8;

        fn read(&mut self) -> nb::Result<u8, u8> {
            match self.script.pop_front() {
                Some(Some(Ok(b))) => Ok(b),
                Some(Some(Err(e))) => Err(nb::Error::Other(e)),
                Some(None) | None => Err(nb::Error::WouldBlock),
            }
        }
    }

    #[test]
    fn slice_source() {
        let mut src = SliceSource::new(&[1, 2, 3, 4]);
        assert_eq!(src.available(), 4);

        let mut buf = [0; 3];
        src.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(src.position(), 3);

        assert_eq!(
            src.read_exact(&mut buf),
            Err(Underrun {
                requested: 3,
                available: 1
            })
        );
        assert_eq!(src.remaining(), &[4]);
    }

    #[test]
    fn queue_source() {
        let mut q: Queue<u8, 8> = Queue::new();
        let (mut tx, rx) = q.split();
        let mut src = QueueSource::new(rx);

        tx.enqueue(0x10).unwrap();
        tx.enqueue(0x20).unwrap();
        assert_eq!(src.available(), 2);

        let mut buf = [0; 3];
        assert!(src.read_exact(&mut buf).is_err());
        assert_eq!(src.available(), 2);

        tx.enqueue(0x30).unwrap();
        src.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0x10, 0x20, 0x30]);
        assert_eq!(src.available(), 0);
    }

    #[test]
    fn buffered_serial_fill() {
        let uart = FakeUart::new([Some(Ok(1)), Some(Ok(2)), None, Some(Ok(3))]);
        let mut src: BufferedSerial<_, 4> = BufferedSerial::new(uart);

        assert_eq!(src.available(), 0);
        src.fill().unwrap();
        assert_eq!(src.available(), 2);
        src.fill().unwrap();
        assert_eq!(src.available(), 3);

        let mut buf = [0; 3];
        src.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn buffered_serial_stops_when_full() {
        let uart = FakeUart::bytes(&[1, 2, 3, 4, 5]);
        let mut src: BufferedSerial<_, 2> = BufferedSerial::new(uart);

        src.fill().unwrap();
        assert_eq!(src.available(), 2);

        let mut buf = [0; 2];
        src.read_exact(&mut buf).unwrap();
        src.fill().unwrap();
        src.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
        assert_eq!(src.free().script.len(), 1);
    }

    #[test]
    fn buffered_serial_read_error() {
        let uart = FakeUart::new([Some(Ok(1)), Some(Err(0xEE))]);
        let mut src: BufferedSerial<_, 4> = BufferedSerial::new(uart);

        assert_eq!(src.fill(), Err(SerialError::Read(0xEE)));
        assert_eq!(src.available(), 1);
    }
}
