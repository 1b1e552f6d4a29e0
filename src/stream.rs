//! Byte sinks and sources used by the binary serialization of keys and
//! signatures.
//!
//! With the `std` feature every [`std::io::Write`] is a [`Sink`] and every
//! [`std::io::Read`] is a [`Source`]. Without it, `Vec<u8>` and `&[u8]` are
//! the only implementations.

use crate::errors::Result;

/// Destination of serialized bytes.
pub trait Sink {
    /// Writes all of `bytes`.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Origin of serialized bytes.
pub trait Source {
    /// Fills all of `buf`, failing with [`Error::TruncatedInput`] if the
    /// source ends first.
    ///
    /// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;
}

#[cfg(feature = "std")]
impl<W: std::io::Write + ?Sized> Sink for W {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.write_all(bytes)?)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read + ?Sized> Source for R {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        Ok(self.read_exact(buf)?)
    }
}

#[cfg(not(feature = "std"))]
impl Sink for alloc::vec::Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(not(feature = "std"))]
impl Source for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.len() < buf.len() {
            return Err(crate::errors::Error::TruncatedInput);
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

/// Writes the 16-bit length header used by variable-size values.
pub(crate) fn write_len_prefix<S: Sink + ?Sized>(sink: &mut S, len: u16) -> Result<()> {
    sink.write(&len.to_le_bytes())
}

/// Reads the 16-bit length header used by variable-size values.
pub(crate) fn read_len_prefix<S: Source + ?Sized>(source: &mut S) -> Result<u16> {
    let mut header = [0u8; 2];
    source.read(&mut header)?;
    Ok(u16::from_le_bytes(header))
}
