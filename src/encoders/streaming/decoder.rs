use crate::core::dictionary::Dictionary;
use crate::encoders::algorithms::block::Block;
use crate::encoders::algorithms::chunked::QuantumCursor;
use std::fmt;
use std::io::{self, Read};

use super::{Fault, StreamState};

const WINDOW_SIZE: usize = 4096; // 4KB window

/// Streaming decoder for processing large amounts of encoded data efficiently.
///
/// A `Read` adapter: encoded text is pulled from the wrapped reader and
/// decoded bytes are handed to the caller. Symbols may be split across reads
/// of the underlying source. CR and LF between symbols are ignored, as in
/// [`Dictionary::decode`], and errors carry the same byte offsets.
///
/// Malformed input is reported as an [`io::ErrorKind::InvalidData`] error
/// wrapping a [`DecodeError`](crate::DecodeError). Once an error has been
/// returned every later read returns it again.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use glyph64::{StreamingDecoder, STANDARD};
///
/// let mut decoder = StreamingDecoder::new(&STANDARD, "はらぶげ\nのらかじ\n".as_bytes());
/// let mut decoded = Vec::new();
/// decoder.read_to_end(&mut decoded).unwrap();
///
/// assert_eq!(decoded, b"foobar");
/// ```
pub struct StreamingDecoder<'a, R: Read> {
    reader: R,
    cursor: QuantumCursor<'a>,
    max_width: usize,
    window: Box<[u8]>,
    // unread part of the window is window[pos..end]
    pos: usize,
    end: usize,
    source_done: bool,
    // source failure held back until the window it cut short is decoded
    pending: Option<Fault>,
    // Decoded bytes that did not fit the caller's buffer
    carry: [u8; 3],
    carry_pos: usize,
    carry_len: usize,
    state: StreamState,
}

impl<R: Read> fmt::Debug for StreamingDecoder<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingDecoder")
            .field("offset", &self.cursor.offset())
            .field("buffered", &(self.end - self.pos))
            .field("carry", &&self.carry[self.carry_pos..self.carry_len])
            .field("state", &self.state)
            .finish()
    }
}

impl<'a, R: Read> StreamingDecoder<'a, R> {
    /// Creates a new streaming decoder.
    ///
    /// # Arguments
    ///
    /// * `dictionary` - The dictionary used for encoding
    /// * `reader` - The source of encoded input
    pub fn new(dictionary: &'a Dictionary, reader: R) -> Self {
        StreamingDecoder {
            reader,
            cursor: QuantumCursor::new(dictionary),
            max_width: dictionary.max_symbol_width(),
            window: vec![0u8; WINDOW_SIZE].into_boxed_slice(),
            pos: 0,
            end: 0,
            source_done: false,
            pending: None,
            carry: [0; 3],
            carry_pos: 0,
            carry_len: 0,
            state: StreamState::Open,
        }
    }

    /// Encoded bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.cursor.offset()
    }

    /// Returns the wrapped reader. Buffered input is discarded.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn drain_carry(&mut self, buf: &mut [u8]) -> usize {
        let n = (self.carry_len - self.carry_pos).min(buf.len());
        buf[..n].copy_from_slice(&self.carry[self.carry_pos..self.carry_pos + n]);
        self.carry_pos += n;
        if self.carry_pos == self.carry_len {
            self.carry_pos = 0;
            self.carry_len = 0;
        }
        n
    }

    /// Copies a decoded block into `buf`, keeping whatever does not fit.
    fn deliver(&mut self, block: &Block, buf: &mut [u8]) -> usize {
        let bytes = block.as_bytes();
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);

        let rest = &bytes[n..];
        self.carry[..rest.len()].copy_from_slice(rest);
        self.carry_pos = 0;
        self.carry_len = rest.len();
        n
    }

    /// Refills the empty window with enough input for `wanted` decoded
    /// bytes, reading until it holds a full quantum of the widest symbols or
    /// the source is exhausted.
    ///
    /// A source failure after some input has arrived is held in `pending`,
    /// so the bytes read before it are still decoded.
    fn fill_window(&mut self, wanted: usize) -> io::Result<()> {
        debug_assert_eq!(self.pos, self.end);

        let quantum = 4 * self.max_width;
        let request = (wanted / 3)
            .saturating_mul(quantum)
            .clamp(quantum, WINDOW_SIZE);
        self.pos = 0;
        self.end = 0;

        while self.end < quantum {
            match self.reader.read(&mut self.window[self.end..request]) {
                Ok(0) => {
                    self.source_done = true;
                    break;
                }
                Ok(n) => self.end += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // decode what has arrived; the source is asked again later
                Err(e) if e.kind() == io::ErrorKind::WouldBlock && self.end > 0 => break,
                Err(e) if self.end > 0 => {
                    self.pending = Some(Fault::from_io(&e));
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for StreamingDecoder<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut written = self.drain_carry(buf);

        while written < buf.len() {
            match &self.state {
                StreamState::Open => {}
                StreamState::Closed => break,
                // hand over what is already decoded; the error follows
                StreamState::Poisoned(_) if written > 0 => break,
                StreamState::Poisoned(fault) => return Err(fault.to_io_error()),
            }

            if self.pos == self.end {
                if let Some(fault) = self.pending.take() {
                    self.state = StreamState::Poisoned(fault);
                    continue;
                }
            }

            if self.pos == self.end && !self.source_done {
                if let Err(e) = self.fill_window(buf.len() - written) {
                    if e.kind() == io::ErrorKind::WouldBlock {
                        if written > 0 {
                            break;
                        }
                        return Err(e);
                    }
                    self.state = StreamState::Poisoned(Fault::from_io(&e));
                    continue;
                }
            }

            if self.pos == self.end {
                if !self.source_done {
                    continue;
                }
                self.state = match self.cursor.finish() {
                    Ok(Some(block)) => {
                        written += self.deliver(&block, &mut buf[written..]);
                        StreamState::Closed
                    }
                    Ok(None) => StreamState::Closed,
                    Err(e) => StreamState::Poisoned(Fault::Corrupt(e)),
                };
                continue;
            }

            while self.pos < self.end && written < buf.len() {
                let byte = self.window[self.pos];
                self.pos += 1;
                match self.cursor.push(byte) {
                    Ok(Some(block)) => written += self.deliver(&block, &mut buf[written..]),
                    Ok(None) => {}
                    Err(e) => {
                        self.state = StreamState::Poisoned(Fault::Corrupt(e));
                        break;
                    }
                }
            }
        }

        Ok(written)
    }
}
