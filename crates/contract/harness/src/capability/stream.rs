//! Byte stream capability: readable, writable, seekable and resizable.
//!
//! The std and tokio I/O traits already cover everything except changing the
//! length, so [`SetLen`] and [`AsyncSetLen`] fill that gap.

use async_trait::async_trait;
use std::io::{self, Read, Seek, Write};
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite};

/// Truncate or extend a stream. Extension fills with zero bytes; the stream
/// position is left where it was.
pub trait SetLen {
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

/// Asynchronous counterpart of [`SetLen`].
#[async_trait]
pub trait AsyncSetLen {
    async fn set_len(&mut self, len: u64) -> io::Result<()>;
}

/// Synchronous byte stream under test.
pub trait ByteStream: Read + Write + Seek + SetLen {}

impl<T: Read + Write + Seek + SetLen + ?Sized> ByteStream for T {}

/// Asynchronous byte stream under test.
pub trait AsyncByteStream: AsyncRead + AsyncWrite + AsyncSeek + AsyncSetLen + Unpin + Send {}

impl<T> AsyncByteStream for T where
    T: AsyncRead + AsyncWrite + AsyncSeek + AsyncSetLen + Unpin + Send + ?Sized
{
}

fn resize_buffer(buffer: &mut Vec<u8>, len: u64) -> io::Result<()> {
    let len = usize::try_from(len).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "length exceeds address space")
    })?;
    buffer.resize(len, 0);
    Ok(())
}

impl SetLen for io::Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        resize_buffer(self.get_mut(), len)
    }
}

impl SetLen for std::fs::File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        std::fs::File::set_len(self, len)
    }
}

#[async_trait]
impl AsyncSetLen for io::Cursor<Vec<u8>> {
    async fn set_len(&mut self, len: u64) -> io::Result<()> {
        resize_buffer(self.get_mut(), len)
    }
}

#[async_trait]
impl AsyncSetLen for tokio::fs::File {
    async fn set_len(&mut self, len: u64) -> io::Result<()> {
        tokio::fs::File::set_len(self, len).await
    }
}
