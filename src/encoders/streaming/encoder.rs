use crate::core::dictionary::Dictionary;
use crate::encoders::algorithms::chunked::encode_chunked;
use crate::encoders::algorithms::errors::StreamError;
use std::fmt;
use std::io::{self, Read, Write};

use super::{Fault, StreamState};

const CHUNK_SIZE: usize = 4096; // 4KB chunks
const OUTPUT_SIZE: usize = 1024;

/// Streaming encoder for processing large amounts of data efficiently.
///
/// A `Write` adapter: bytes written to it are encoded and passed on to the
/// wrapped writer. Up to two bytes that do not yet make a full 3-byte block
/// are held back until more input arrives or the stream is finished.
///
/// Call [`finish`](Self::finish) (or [`into_inner`](Self::into_inner)) to
/// emit the final, possibly padded, quantum. Dropping the encoder finishes
/// it too, but any error is lost.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use glyph64::{StreamingEncoder, STANDARD};
///
/// let mut encoder = StreamingEncoder::new(&STANDARD, Vec::new());
/// encoder.write_all(b"foo").unwrap();
/// encoder.write_all(b"bar").unwrap();
/// let encoded = encoder.into_inner().unwrap();
///
/// assert_eq!(String::from_utf8(encoded).unwrap(), "はらぶげのらかじ");
/// ```
pub struct StreamingEncoder<'a, W: Write> {
    dictionary: &'a Dictionary,
    writer: Option<W>,
    // Bytes from the last write that did not fill a block
    fringe: [u8; 3],
    fringe_len: usize,
    output: [u8; OUTPUT_SIZE],
    output_len: usize,
    state: StreamState,
}

impl<W: Write> fmt::Debug for StreamingEncoder<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingEncoder")
            .field("fringe", &&self.fringe[..self.fringe_len])
            .field("output_len", &self.output_len)
            .field("state", &self.state)
            .finish()
    }
}

impl<'a, W: Write> StreamingEncoder<'a, W> {
    /// Creates a new streaming encoder.
    ///
    /// # Arguments
    ///
    /// * `dictionary` - The dictionary to use for encoding
    /// * `writer` - The destination for encoded output
    pub fn new(dictionary: &'a Dictionary, writer: W) -> Self {
        StreamingEncoder {
            dictionary,
            writer: Some(writer),
            fringe: [0; 3],
            fringe_len: 0,
            output: [0; OUTPUT_SIZE],
            output_len: 0,
            state: StreamState::Open,
        }
    }

    /// Encodes everything `reader` yields, then finishes the stream.
    ///
    /// Returns the number of input bytes consumed.
    pub fn encode<R: Read>(&mut self, reader: &mut R) -> io::Result<u64> {
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut total = 0u64;

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.write_all(&buffer[..bytes_read])?;
            total += bytes_read as u64;
        }

        self.finish()?;
        Ok(total)
    }

    /// Writes out the held-back bytes as the final quantum and flushes the
    /// wrapped writer.
    ///
    /// No more data can be written afterwards. Calling this again does
    /// nothing.
    pub fn finish(&mut self) -> io::Result<()> {
        match &self.state {
            StreamState::Open => {}
            StreamState::Closed => return Ok(()),
            StreamState::Poisoned(fault) => return Err(fault.to_io_error()),
        }

        if self.fringe_len > 0 {
            let fringe = self.fringe;
            let len = self.fringe_len;
            self.fringe_len = 0;
            self.buffer_encoded(&fringe[..len])?;
        }
        self.drain_output()?;
        self.flush_writer()?;

        self.state = StreamState::Closed;
        Ok(())
    }

    /// Finishes the stream and returns the wrapped writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.finish()?;
        self.writer
            .take()
            .ok_or_else(|| io::Error::other(StreamError::Closed))
    }

    fn check_open(&self) -> io::Result<()> {
        match &self.state {
            StreamState::Open => Ok(()),
            StreamState::Poisoned(fault) => Err(fault.to_io_error()),
            StreamState::Closed => Err(io::Error::other(StreamError::Closed)),
        }
    }

    /// Largest input slice whose encoding always fits the output buffer.
    fn chunk_size(&self) -> usize {
        OUTPUT_SIZE / self.dictionary.max_symbol_width() / 4 * 3
    }

    /// Encodes `data` (at most one chunk) into the output buffer, first
    /// draining the buffer to the writer if it would overflow.
    fn buffer_encoded(&mut self, data: &[u8]) -> io::Result<()> {
        let needed = data.len().div_ceil(3) * 4 * self.dictionary.max_symbol_width();
        if self.output_len + needed > OUTPUT_SIZE {
            self.drain_output()?;
        }
        self.output_len += encode_chunked(
            data,
            self.dictionary,
            &mut self.output[self.output_len..],
        );
        Ok(())
    }

    fn drain_output(&mut self) -> io::Result<()> {
        if self.output_len == 0 {
            return Ok(());
        }
        let Some(writer) = self.writer.as_mut() else {
            return Err(io::Error::other(StreamError::Closed));
        };
        match writer.write_all(&self.output[..self.output_len]) {
            Ok(()) => {
                self.output_len = 0;
                Ok(())
            }
            Err(e) => Err(self.poison(e)),
        }
    }

    fn flush_writer(&mut self) -> io::Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        match writer.flush() {
            Ok(()) => Ok(()),
            Err(e) => Err(self.poison(e)),
        }
    }

    fn poison(&mut self, err: io::Error) -> io::Error {
        self.state = StreamState::Poisoned(Fault::from_io(&err));
        err
    }
}

impl<W: Write> Write for StreamingEncoder<'_, W> {
    fn write(&mut self, input: &[u8]) -> io::Result<usize> {
        self.check_open()?;
        if input.is_empty() {
            return Ok(0);
        }

        let mut rest = input;

        // complete the block left over from the last write
        if self.fringe_len > 0 {
            let take = (3 - self.fringe_len).min(rest.len());
            self.fringe[self.fringe_len..self.fringe_len + take].copy_from_slice(&rest[..take]);
            self.fringe_len += take;
            rest = &rest[take..];

            if self.fringe_len < 3 {
                return Ok(input.len());
            }
            let block = self.fringe;
            self.fringe_len = 0;
            self.buffer_encoded(&block)?;
        }

        let whole = rest.len() - rest.len() % 3;
        let chunk_size = self.chunk_size();
        for chunk in rest[..whole].chunks(chunk_size) {
            self.buffer_encoded(chunk)?;
        }

        let tail = &rest[whole..];
        self.fringe[..tail.len()].copy_from_slice(tail);
        self.fringe_len = tail.len();

        Ok(input.len())
    }

    /// Pushes encoded output to the wrapped writer and flushes it.
    ///
    /// Held-back bytes stay held back; only [`finish`](StreamingEncoder::finish)
    /// can write a partial quantum.
    fn flush(&mut self) -> io::Result<()> {
        match &self.state {
            StreamState::Open => {}
            StreamState::Closed => return Ok(()),
            StreamState::Poisoned(fault) => return Err(fault.to_io_error()),
        }
        self.drain_output()?;
        self.flush_writer()
    }
}

impl<W: Write> Drop for StreamingEncoder<'_, W> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            let _ = self.finish();
        }
    }
}
