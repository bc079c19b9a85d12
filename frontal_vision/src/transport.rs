//! The byte sink the encoded lines are written to.
//!
//! On the robot this is a UART at 115200 8N1. Anything that implements
//! `std::io::Write` can stand in for it: a device node, stdout, or a
//! `Vec<u8>` in tests.

use crate::error::Result;
use std::io::Write;

/// Fire-and-forget line sink. Errors are surfaced, never retried.
pub trait Transport {
    fn send(&mut self, bytes: &[u8]) -> Result<()>;
}

/// A transport over any `Write` implementation.
pub struct WriteTransport<W: Write> {
    writer: W,
}

impl<W: Write> WriteTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for WriteTransport<W> {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).send(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisionError;

    struct ClosedPort;

    impl Write for ClosedPort {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "port closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_lines_in_order() {
        let mut transport = WriteTransport::new(Vec::new());
        transport.send(b"0 0 0 0 0 0\n").unwrap();
        transport.send(b"1 2 3 4 5 6\n").unwrap();
        assert_eq!(transport.into_inner(), b"0 0 0 0 0 0\n1 2 3 4 5 6\n".to_vec());
    }

    #[test]
    fn write_failure_is_reported() {
        let mut transport = WriteTransport::new(ClosedPort);
        let err = transport.send(b"0 0 0 0 0 0\n").unwrap_err();
        assert!(matches!(err, VisionError::Transport(_)));
    }
}
