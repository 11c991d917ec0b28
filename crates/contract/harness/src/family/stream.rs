//! Byte stream script.
//!
//! Layout written by the script, with `P` the payload length:
//!
//! ```text
//! offset 0        1            P + 1          2P + 1
//!        sentinel | payload    | payload      |
//! ```
//!
//! After the bounded copy the stream is truncated back to `P + 1` bytes.

use crate::assert::{ensure, ensure_eq};
use crate::capability::{AsyncByteStream, ByteStream};
use crate::config::StreamConfig;
use crate::error::{HarnessError, HarnessResult};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::{self, Read, SeekFrom};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

fn io_error(step: &'static str) -> impl Fn(io::Error) -> HarnessError {
    move |err| HarnessError::io(step, &err)
}

/// Runs the byte stream contract with one random payload.
#[derive(Debug, Clone)]
pub struct StreamHarness {
    payload: Vec<u8>,
    sentinel: u8,
}

impl Default for StreamHarness {
    fn default() -> Self {
        Self::new(&StreamConfig::default())
    }
}

impl StreamHarness {
    /// Generate the payload. A configured seed makes it reproducible.
    pub fn new(config: &StreamConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut payload = vec![0u8; config.payload_len];
        rng.fill_bytes(&mut payload);
        Self {
            payload,
            sentinel: config.sentinel,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }

    fn len(&self) -> u64 {
        self.payload.len() as u64
    }

    fn check_round_trip(&self, data: &[u8]) -> HarnessResult<()> {
        ensure_eq(
            "stream.copy",
            self.payload.len() + 1,
            data.len(),
            "Copied length mismatch",
        )?;
        ensure_eq("stream.copy", self.sentinel, data[0], "Sentinel mismatch")?;
        ensure(
            data[1..] == self.payload[..],
            "stream.copy",
            "Payload mismatch",
        )
    }

    fn check_bounded(&self, data: &[u8], copied: u64, position: u64) -> HarnessResult<()> {
        ensure_eq("stream.copy_exact", self.len(), copied, "Bounded copy length")?;
        ensure(
            data == self.payload.as_slice(),
            "stream.copy_exact",
            "Payload mismatch",
        )?;
        ensure_eq(
            "stream.copy_exact",
            2 * self.len() + 1,
            position,
            "Position after bounded copy",
        )
    }

    fn check_truncated(&self, end: u64) -> HarnessResult<()> {
        ensure_eq("stream.set_len", self.len() + 1, end, "Length after truncation")
    }

    fn check_read(&self, data: &[u8], read: usize) -> HarnessResult<()> {
        ensure_eq("stream.read", self.payload.len(), read, "Read length")?;
        ensure(
            data == self.payload.as_slice(),
            "stream.read",
            "Payload mismatch",
        )
    }

    pub fn run<S: ByteStream>(&self, stream: &mut S) -> HarnessResult<()> {
        tracing::debug!(payload_len = self.payload.len(), "writing payload");
        stream
            .write_all(&[self.sentinel])
            .map_err(io_error("stream.write"))?;
        stream.write_all(&self.payload).map_err(io_error("stream.write"))?;
        stream.flush().map_err(io_error("stream.write"))?;

        stream.rewind().map_err(io_error("stream.seek"))?;
        let mut side = Vec::new();
        io::copy(&mut *stream, &mut side).map_err(io_error("stream.copy"))?;
        self.check_round_trip(&side)?;

        stream.write_all(&self.payload).map_err(io_error("stream.write"))?;
        stream.flush().map_err(io_error("stream.write"))?;
        stream
            .seek(SeekFrom::Start(self.len() + 1))
            .map_err(io_error("stream.seek"))?;
        side.clear();
        let copied = io::copy(&mut Read::take(&mut *stream, self.len()), &mut side)
            .map_err(io_error("stream.copy_exact"))?;
        let position = stream.stream_position().map_err(io_error("stream.seek"))?;
        self.check_bounded(&side, copied, position)?;

        stream
            .set_len(self.len() + 1)
            .map_err(io_error("stream.set_len"))?;
        let end = stream.seek(SeekFrom::End(0)).map_err(io_error("stream.seek"))?;
        self.check_truncated(end)?;
        stream.seek(SeekFrom::Start(1)).map_err(io_error("stream.seek"))?;
        let mut data = vec![0u8; self.payload.len()];
        let read = stream.read(&mut data).map_err(io_error("stream.read"))?;
        self.check_read(&data, read)?;

        stream.rewind().map_err(io_error("stream.seek"))?;
        let mut first = [0u8; 1];
        let read = stream.read(&mut first).map_err(io_error("stream.read"))?;
        ensure_eq("stream.read_byte", 1, read, "Single byte read")?;
        ensure_eq("stream.read_byte", self.sentinel, first[0], "Sentinel mismatch")
    }

    pub async fn run_async<S: AsyncByteStream>(&self, stream: &mut S) -> HarnessResult<()> {
        tracing::debug!(payload_len = self.payload.len(), "writing payload");
        stream
            .write_all(&[self.sentinel])
            .await
            .map_err(io_error("stream.write"))?;
        stream
            .write_all(&self.payload)
            .await
            .map_err(io_error("stream.write"))?;
        stream.flush().await.map_err(io_error("stream.write"))?;

        stream
            .seek(SeekFrom::Start(0))
            .await
            .map_err(io_error("stream.seek"))?;
        let mut side = Vec::new();
        tokio::io::copy(&mut *stream, &mut side)
            .await
            .map_err(io_error("stream.copy"))?;
        self.check_round_trip(&side)?;

        stream
            .write_all(&self.payload)
            .await
            .map_err(io_error("stream.write"))?;
        stream.flush().await.map_err(io_error("stream.write"))?;
        stream
            .seek(SeekFrom::Start(self.len() + 1))
            .await
            .map_err(io_error("stream.seek"))?;
        side.clear();
        let copied = tokio::io::copy(&mut (&mut *stream).take(self.len()), &mut side)
            .await
            .map_err(io_error("stream.copy_exact"))?;
        let position = stream
            .stream_position()
            .await
            .map_err(io_error("stream.seek"))?;
        self.check_bounded(&side, copied, position)?;

        stream
            .set_len(self.len() + 1)
            .await
            .map_err(io_error("stream.set_len"))?;
        let end = stream
            .seek(SeekFrom::End(0))
            .await
            .map_err(io_error("stream.seek"))?;
        self.check_truncated(end)?;
        stream
            .seek(SeekFrom::Start(1))
            .await
            .map_err(io_error("stream.seek"))?;
        let mut data = vec![0u8; self.payload.len()];
        let read = stream
            .read(&mut data)
            .await
            .map_err(io_error("stream.read"))?;
        self.check_read(&data, read)?;

        stream
            .seek(SeekFrom::Start(0))
            .await
            .map_err(io_error("stream.seek"))?;
        let mut first = [0u8; 1];
        let read = stream
            .read(&mut first)
            .await
            .map_err(io_error("stream.read"))?;
        ensure_eq("stream.read_byte", 1, read, "Single byte read")?;
        ensure_eq("stream.read_byte", self.sentinel, first[0], "Sentinel mismatch")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::SetLen;
    use std::io::{Cursor, Seek, Write};

    fn quick() -> StreamHarness {
        StreamHarness::new(&StreamConfig {
            payload_len: 512,
            seed: Some(1),
            sentinel: 0,
        })
    }

    #[test]
    fn test_seeded_payload_is_reproducible() {
        assert_eq!(quick().payload(), quick().payload());
        assert_eq!(quick().payload().len(), 512);
    }

    #[test]
    fn test_memory_stream_passes() {
        let mut stream = Cursor::new(Vec::new());
        quick().run(&mut stream).unwrap();
        assert_eq!(stream.get_ref().len(), 513);
    }

    #[test]
    fn test_file_stream_passes() {
        let mut file = tempfile::tempfile().unwrap();
        quick().run(&mut file).unwrap();
    }

    /// Ignores `set_len`.
    struct NoTruncate(Cursor<Vec<u8>>);

    impl Read for NoTruncate {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            Read::read(&mut self.0, buf)
        }
    }

    impl Write for NoTruncate {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Write::write(&mut self.0, buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for NoTruncate {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            Seek::seek(&mut self.0, pos)
        }
    }

    impl SetLen for NoTruncate {
        fn set_len(&mut self, _len: u64) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_set_len_noop_rejected() {
        let mut stream = NoTruncate(Cursor::new(Vec::new()));
        let err = quick().run(&mut stream).unwrap_err();
        assert_eq!(err.step(), Some("stream.set_len"));
    }

    #[tokio::test]
    async fn test_async_memory_stream_passes() {
        let mut stream = Cursor::new(Vec::new());
        quick().run_async(&mut stream).await.unwrap();
    }

    #[tokio::test]
    async fn test_async_file_stream_passes() {
        let mut file = tokio::fs::File::from_std(tempfile::tempfile().unwrap());
        quick().run_async(&mut file).await.unwrap();
    }
}
