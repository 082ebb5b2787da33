use crate::core::dictionary::Dictionary;
use crate::core::recognizer::{Match, Recognizer, StateId};

use super::block::{Block, decode_quantum, encode_block};
use super::errors::DecodeError;

/// Encodes `data` into `output`, returning the number of bytes written.
///
/// `output` must hold at least `dictionary.encoded_len(data.len())` bytes.
pub fn encode_chunked(data: &[u8], dictionary: &Dictionary, output: &mut [u8]) -> usize {
    let alphabet = dictionary.alphabet();
    let padding = dictionary.padding();

    let mut written = 0;
    for block in data.chunks(3) {
        written += encode_block(alphabet, padding, block, &mut output[written..]);
    }
    written
}

/// Decodes `encoded` into `output`, returning the number of bytes written.
///
/// `output` must hold at least `dictionary.decoded_len(encoded.len())` bytes.
pub fn decode_chunked(
    encoded: &[u8],
    dictionary: &Dictionary,
    output: &mut [u8],
) -> Result<usize, DecodeError> {
    let mut cursor = QuantumCursor::new(dictionary);
    let mut written = 0;

    for &byte in encoded {
        if let Some(block) = cursor.push(byte)? {
            written += copy_block(&block, &mut output[written..]);
        }
    }
    if let Some(block) = cursor.finish()? {
        written += copy_block(&block, &mut output[written..]);
    }

    Ok(written)
}

fn copy_block(block: &Block, output: &mut [u8]) -> usize {
    let bytes = block.as_bytes();
    output[..bytes.len()].copy_from_slice(bytes);
    bytes.len()
}

/// Incremental decoder state, fed one encoded byte at a time.
///
/// Drives the recognizer, gathers resolved values into 4-slot quanta and
/// tracks the offsets used in error reports. Both the one-shot decoder and
/// the streaming decoder run on this, so they agree on every offset.
#[derive(Debug, Clone)]
pub(crate) struct QuantumCursor<'a> {
    recognizer: &'a Recognizer,
    padded: bool,
    strict: bool,
    state: StateId,
    quantum: [u8; 4],
    filled: usize,
    pad_count: usize,
    // bytes consumed so far
    offset: u64,
    // end of the last complete quantum
    last_block: u64,
    // end of the last alphabet symbol
    last_symbol: u64,
    // a padded quantum ended the data; only CR/LF may follow
    terminated: bool,
}

impl<'a> QuantumCursor<'a> {
    pub(crate) fn new(dictionary: &'a Dictionary) -> Self {
        QuantumCursor {
            recognizer: dictionary.recognizer(),
            padded: dictionary.padding().is_some(),
            strict: dictionary.is_strict(),
            state: Recognizer::ROOT,
            quantum: [0; 4],
            filled: 0,
            pad_count: 0,
            offset: 0,
            last_block: 0,
            last_symbol: 0,
            terminated: false,
        }
    }

    /// Absolute number of encoded bytes consumed.
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Consumes one byte, returning a block whenever a quantum completes.
    pub(crate) fn push(&mut self, byte: u8) -> Result<Option<Block>, DecodeError> {
        if self.terminated {
            if byte == b'\n' || byte == b'\r' {
                self.offset += 1;
                return Ok(None);
            }
            return Err(DecodeError::corrupt(self.offset));
        }

        let next = self
            .recognizer
            .step(self.state, byte)
            .ok_or(DecodeError::corrupt(self.last_symbol))?;
        self.state = next;
        self.offset += 1;

        let (value, is_symbol) = match self.recognizer.kind(next) {
            Match::Root | Match::Partial => return Ok(None),
            Match::Value(v) => (v, true),
            Match::Padding => {
                // Padding cannot open a quantum or sit in its second slot.
                if self.filled < 2 {
                    return Err(DecodeError::corrupt(self.last_symbol));
                }
                self.pad_count += 1;
                (0, false)
            }
        };

        self.quantum[self.filled] = value;
        self.filled += 1;

        let mut out = None;
        if self.filled == 4 {
            self.last_block = self.offset;
            // padding in the first two slots was rejected above
            debug_assert!(self.pad_count <= 2);
            let filled = 4 - self.pad_count;
            let block = decode_quantum(self.quantum, filled, self.strict)
                .map_err(|_| DecodeError::corrupt(self.last_symbol))?;
            self.terminated = self.pad_count > 0;
            self.quantum = [0; 4];
            self.filled = 0;
            out = Some(block);
        }

        if is_symbol {
            self.last_symbol = self.offset;
        }
        Ok(out)
    }

    /// Resolves whatever is pending once the input has ended.
    pub(crate) fn finish(&mut self) -> Result<Option<Block>, DecodeError> {
        if self.terminated {
            return Ok(None);
        }
        if self.recognizer.kind(self.state) == Match::Partial {
            // input stops inside a symbol
            return Err(DecodeError::corrupt(self.offset));
        }
        if self.filled == 0 {
            return Ok(None);
        }

        if self.padded {
            return Err(if self.pad_count == 0 {
                DecodeError::corrupt(self.last_block)
            } else {
                DecodeError::corrupt(self.offset)
            });
        }
        if self.filled == 1 {
            // six bits cannot make a byte
            return Err(DecodeError::corrupt(self.offset));
        }

        let block = decode_quantum(self.quantum, self.filled, self.strict)
            .map_err(|_| DecodeError::corrupt(self.last_symbol))?;
        self.terminated = true;
        self.filled = 0;
        Ok(Some(block))
    }
}
