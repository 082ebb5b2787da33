use crate::encoders::algorithms::errors::DictionaryError;

/// Number of symbols in every alphabet: one per 6-bit value.
pub const ALPHABET_SIZE: usize = 64;

/// One encode symbol stored as its UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Symbol {
    bytes: [u8; 4],
    width: u8,
}

impl Symbol {
    fn new(c: char) -> Self {
        let mut bytes = [0u8; 4];
        let width = c.encode_utf8(&mut bytes).len() as u8;
        Symbol { bytes, width }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.width as usize]
    }
}

/// The 64-symbol table behind a dictionary.
///
/// Maps each 6-bit value to a single Unicode code point (1 to 4 bytes in
/// UTF-8), and back. The table is immutable once built.
///
/// # Example
///
/// ```
/// use glyph64::Alphabet;
///
/// let alphabet = Alphabet::new(
///     "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/",
/// )
/// .unwrap();
///
/// assert_eq!(alphabet.symbol(0), "A");
/// assert_eq!(alphabet.value_of('/'), Some(63));
/// assert_eq!(alphabet.max_width(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: [Symbol; ALPHABET_SIZE],
    chars: [char; ALPHABET_SIZE],
    // (code point, value) pairs sorted by code point
    decode_index: [(char, u8); ALPHABET_SIZE],
    max_width: usize,
}

impl Alphabet {
    /// Builds an alphabet from a string of exactly 64 distinct code points.
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::InvalidAlphabet` if:
    /// - The string does not hold exactly 64 code points
    /// - It contains U+FFFD, CR or LF
    /// - Any code point appears twice
    pub fn new(alphabet: &str) -> Result<Self, DictionaryError> {
        let count = alphabet.chars().count();
        if count != ALPHABET_SIZE {
            return Err(DictionaryError::invalid_alphabet(format!(
                "expected {} symbols, got {}",
                ALPHABET_SIZE, count
            )));
        }

        let mut chars = ['\0'; ALPHABET_SIZE];
        let mut symbols = [Symbol::new('\0'); ALPHABET_SIZE];
        let mut decode_index = [('\0', 0u8); ALPHABET_SIZE];
        let mut max_width = 1;

        for (i, c) in alphabet.chars().enumerate() {
            match c {
                char::REPLACEMENT_CHARACTER => {
                    return Err(DictionaryError::invalid_alphabet(format!(
                        "symbol {} is U+FFFD, which marks an invalid UTF-8 sequence",
                        i
                    )));
                }
                '\r' | '\n' => {
                    return Err(DictionaryError::invalid_alphabet(format!(
                        "symbol {} is a newline; CR and LF are reserved as separators",
                        i
                    )));
                }
                _ => {}
            }

            chars[i] = c;
            symbols[i] = Symbol::new(c);
            decode_index[i] = (c, i as u8);
            max_width = max_width.max(c.len_utf8());
        }

        decode_index.sort_unstable_by_key(|&(c, _)| c);
        if let Some(pair) = decode_index.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            let (c, a) = pair[0];
            let b = pair[1].1;
            return Err(DictionaryError::invalid_alphabet(format!(
                "duplicate symbol {:?} at positions {} and {}",
                c,
                a.min(b),
                a.max(b)
            )));
        }

        Ok(Alphabet {
            symbols,
            chars,
            decode_index,
            max_width,
        })
    }

    /// Builds an alphabet from raw bytes, which must be valid UTF-8.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self, DictionaryError> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            DictionaryError::invalid_alphabet(format!(
                "alphabet is not valid UTF-8 (error at byte {})",
                e.valid_up_to()
            ))
        })?;
        Self::new(text)
    }

    /// Returns the encode symbol for a 6-bit value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is 64 or more.
    pub fn symbol(&self, value: u8) -> &str {
        let bytes = self.symbol_bytes(value);
        // Each entry came from a `char`, so it is always valid UTF-8.
        std::str::from_utf8(bytes).unwrap_or_default()
    }

    /// Returns the UTF-8 bytes of the encode symbol for a 6-bit value.
    #[inline]
    pub fn symbol_bytes(&self, value: u8) -> &[u8] {
        self.symbols[value as usize].as_bytes()
    }

    /// Returns the code point that encodes `value`.
    pub fn char_at(&self, value: u8) -> Option<char> {
        self.chars.get(value as usize).copied()
    }

    /// Looks up the 6-bit value of a code point.
    ///
    /// Returns `None` for anything outside the alphabet, including the
    /// padding character.
    pub fn value_of(&self, c: char) -> Option<u8> {
        self.decode_index
            .binary_search_by_key(&c, |&(k, _)| k)
            .ok()
            .map(|i| self.decode_index[i].1)
    }

    /// Returns `true` if `c` is one of the 64 symbols.
    pub fn contains(&self, c: char) -> bool {
        self.value_of(c).is_some()
    }

    /// Largest UTF-8 width, in bytes, across the 64 symbols.
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Iterates over the symbols in value order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}
