use std::sync::{Arc, OnceLock};

use super::alphabet::Alphabet;
use super::recognizer::Recognizer;
use crate::encoders::algorithms::chunked::{decode_chunked, encode_chunked};
use crate::encoders::algorithms::errors::{DecodeError, DictionaryError};

/// Padding character used by the built-in dictionaries and by
/// [`Dictionary::new`].
pub const STANDARD_PADDING: char = '・';

/// A complete codec configuration: a 64-symbol alphabet, an optional
/// padding character and the strict-decoding flag.
///
/// Dictionaries are immutable values. [`with_padding`](Self::with_padding)
/// and [`with_strict`](Self::with_strict) return modified copies. The byte
/// recognizer used for decoding is built on first use and shared by copies
/// that decode identically, so a dictionary can be used from many threads at
/// once.
///
/// # Example
///
/// ```
/// use glyph64::Dictionary;
///
/// let dict = Dictionary::builder()
///     .alphabet("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/")
///     .padding(Some('='))
///     .build()
///     .unwrap();
///
/// assert_eq!(dict.encode(b"foobar"), "Zm9vYmFy");
/// assert_eq!(dict.decode("Zm9vYmE=").unwrap(), b"fooba");
/// ```
#[derive(Debug, Clone)]
pub struct Dictionary {
    alphabet: Arc<Alphabet>,
    padding: Option<char>,
    strict: bool,
    max_width: usize,
    recognizer: Arc<OnceLock<Recognizer>>,
}

impl Dictionary {
    /// Creates a padded dictionary from 64 code points, using
    /// [`STANDARD_PADDING`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidAlphabet` for a malformed alphabet and
    /// `InvalidPadding` if the alphabet itself contains `'・'`.
    pub fn new(alphabet: &str) -> Result<Self, DictionaryError> {
        Self::builder()
            .alphabet(alphabet)
            .padding(Some(STANDARD_PADDING))
            .build()
    }

    /// Creates a new DictionaryBuilder for constructing a Dictionary.
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::new()
    }

    fn from_parts(
        alphabet: Arc<Alphabet>,
        padding: Option<char>,
        strict: bool,
    ) -> Result<Self, DictionaryError> {
        if let Some(pad) = padding {
            if pad == '\r' || pad == '\n' {
                return Err(DictionaryError::invalid_padding(
                    pad,
                    "padding cannot be CR or LF; newlines are always skipped",
                ));
            }
            if let Some(value) = alphabet.value_of(pad) {
                return Err(DictionaryError::invalid_padding(
                    pad,
                    format!("padding is already alphabet symbol {}", value),
                ));
            }
        }

        let max_width = alphabet
            .max_width()
            .max(padding.map_or(0, char::len_utf8));

        Ok(Dictionary {
            alphabet,
            padding,
            strict,
            max_width,
            recognizer: Arc::new(OnceLock::new()),
        })
    }

    /// Returns a copy using `padding`, or no padding for `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPadding` if the character is CR, LF, or a member of
    /// the alphabet.
    pub fn with_padding(&self, padding: Option<char>) -> Result<Self, DictionaryError> {
        if padding == self.padding {
            return Ok(self.clone());
        }
        Self::from_parts(Arc::clone(&self.alphabet), padding, self.strict)
    }

    /// Returns a copy that rejects non-zero trailing bits when decoding.
    ///
    /// Newlines are still skipped, so strict input is not fully canonical.
    pub fn with_strict(&self) -> Self {
        Dictionary {
            strict: true,
            ..self.clone()
        }
    }

    /// Returns the alphabet table.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the padding character, if any.
    pub fn padding(&self) -> Option<char> {
        self.padding
    }

    /// Returns whether strict decoding is enabled.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Widest symbol in bytes, counting the padding character.
    pub fn max_symbol_width(&self) -> usize {
        self.max_width
    }

    /// Encodes a 6-bit value as its symbol.
    ///
    /// Returns `None` if the value is out of range.
    pub fn symbol(&self, value: u8) -> Option<&str> {
        (value < 64).then(|| self.alphabet.symbol(value))
    }

    /// Decodes a symbol back to its 6-bit value.
    ///
    /// Returns `None` if the character is not in the alphabet.
    pub fn value_of(&self, c: char) -> Option<u8> {
        self.alphabet.value_of(c)
    }

    pub(crate) fn recognizer(&self) -> &Recognizer {
        self.recognizer
            .get_or_init(|| Recognizer::build(&self.alphabet, self.padding))
    }

    /// Upper bound on the encoded size, in bytes, of `n` input bytes.
    ///
    /// Every symbol is counted at the widest width, so mixed-width alphabets
    /// usually encode to less. Returns `None` if the size overflows `usize`.
    pub fn encoded_len(&self, n: usize) -> Option<usize> {
        let symbols = if self.padding.is_some() {
            n.div_ceil(3).checked_mul(4)?
        } else {
            // ceil(n * 8 / 6) without overflowing on n * 8
            let full = (n / 3).checked_mul(4)?;
            full.checked_add(match n % 3 {
                0 => 0,
                1 => 2,
                _ => 3,
            })?
        };
        symbols.checked_mul(self.max_width)
    }

    /// Upper bound on the decoded size of `n` bytes of encoded input.
    pub fn decoded_len(&self, n: usize) -> usize {
        if self.padding.is_some() {
            // padded input always comes in 4-symbol quanta
            n / 4 * 3
        } else {
            // n * 6 / 8 without overflow
            n / 4 * 3 + (n % 4) * 6 / 8
        }
    }

    /// Encodes into `output`, returning the number of bytes written.
    ///
    /// # Panics
    ///
    /// Panics if `output` is shorter than the encoded data; size it with
    /// [`encoded_len`](Self::encoded_len).
    pub fn encode_slice(&self, input: impl AsRef<[u8]>, output: &mut [u8]) -> usize {
        encode_chunked(input.as_ref(), self, output)
    }

    /// Encodes into a new `String`.
    pub fn encode(&self, input: impl AsRef<[u8]>) -> String {
        let mut out = String::new();
        self.encode_string(input, &mut out);
        out
    }

    /// Encodes and appends to `output`.
    pub fn encode_string(&self, input: impl AsRef<[u8]>, output: &mut String) {
        let input = input.as_ref();
        let len = self
            .encoded_len(input.len())
            .expect("usize overflow when calculating buffer size");
        let mut buf = vec![0u8; len];
        let written = self.encode_slice(input, &mut buf);
        buf.truncate(written);
        output.push_str(&String::from_utf8(buf).expect("symbols are whole UTF-8 sequences"));
    }

    /// Decodes into `output`, returning the number of bytes written.
    ///
    /// CR and LF between symbols are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `output` is shorter than the decoded data; size it with
    /// [`decoded_len`](Self::decoded_len).
    pub fn decode_slice(
        &self,
        input: impl AsRef<[u8]>,
        output: &mut [u8],
    ) -> Result<usize, DecodeError> {
        decode_chunked(input.as_ref(), self, output)
    }

    /// Decodes into a new `Vec<u8>`.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::CorruptInput` with the byte offset of the first
    /// problem.
    pub fn decode(&self, input: impl AsRef<[u8]>) -> Result<Vec<u8>, DecodeError> {
        let input = input.as_ref();
        let mut out = vec![0u8; self.decoded_len(input.len())];
        let written = self.decode_slice(input, &mut out)?;
        out.truncate(written);
        Ok(out)
    }
}

/// Builder for constructing a Dictionary with flexible configuration.
///
/// Padding defaults to none and strict mode to off.
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    alphabet: Option<String>,
    padding: Option<char>,
    strict: bool,
}

impl DictionaryBuilder {
    /// Creates a new DictionaryBuilder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 64 alphabet symbols.
    pub fn alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = Some(alphabet.into());
        self
    }

    /// Sets the padding character, or `None` for unpadded output.
    pub fn padding(mut self, padding: Option<char>) -> Self {
        self.padding = padding;
        self
    }

    /// Sets strict decoding.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builds the Dictionary with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No alphabet was provided, or it is not 64 distinct usable symbols
    /// - The padding is CR, LF, or one of the symbols
    pub fn build(self) -> Result<Dictionary, DictionaryError> {
        let alphabet = self
            .alphabet
            .ok_or_else(|| DictionaryError::invalid_alphabet("no alphabet provided"))?;
        let alphabet = Alphabet::new(&alphabet)?;
        Dictionary::from_parts(Arc::new(alphabet), self.padding, self.strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    #[test]
    fn test_new_uses_standard_padding() {
        let dict = Dictionary::new(ASCII).unwrap();
        assert_eq!(dict.padding(), Some('・'));
        assert!(!dict.is_strict());
        // '・' is three bytes wide
        assert_eq!(dict.max_symbol_width(), 3);
    }

    #[test]
    fn test_new_rejects_alphabet_containing_standard_padding() {
        let alphabet = ASCII.replacen('/', "・", 1);
        assert!(matches!(
            Dictionary::new(&alphabet),
            Err(DictionaryError::InvalidPadding { padding: '・', .. })
        ));
        assert!(Dictionary::builder().alphabet(alphabet).build().is_ok());
    }

    #[test]
    fn test_builder_requires_alphabet() {
        assert!(matches!(
            Dictionary::builder().build(),
            Err(DictionaryError::InvalidAlphabet { .. })
        ));
    }

    #[test]
    fn test_with_padding_validation() {
        let dict = Dictionary::builder().alphabet(ASCII).build().unwrap();
        for bad in ['\n', '\r', 'A', '/'] {
            assert!(matches!(
                dict.with_padding(Some(bad)),
                Err(DictionaryError::InvalidPadding { padding, .. }) if padding == bad
            ));
        }
        let padded = dict.with_padding(Some('=')).unwrap();
        assert_eq!(padded.padding(), Some('='));
        assert_eq!(padded.max_symbol_width(), 1);
        assert_eq!(padded.with_padding(None).unwrap().padding(), None);
    }

    #[test]
    fn test_max_width_follows_current_padding() {
        let dict = Dictionary::builder()
            .alphabet(ASCII)
            .padding(Some('😀'))
            .build()
            .unwrap();
        assert_eq!(dict.max_symbol_width(), 4);
        assert_eq!(dict.with_padding(None).unwrap().max_symbol_width(), 1);
    }

    #[test]
    fn test_with_strict_shares_recognizer() {
        let dict = Dictionary::new(ASCII).unwrap();
        let strict = dict.with_strict();
        assert!(strict.is_strict());
        assert!(Arc::ptr_eq(&dict.recognizer, &strict.recognizer));

        let raw = dict.with_padding(None).unwrap();
        assert!(!Arc::ptr_eq(&dict.recognizer, &raw.recognizer));
    }

    #[test]
    fn test_recognizer_built_once() {
        let dict = Dictionary::new(ASCII).unwrap();
        assert!(dict.recognizer.get().is_none());
        let first = dict.recognizer() as *const Recognizer;
        let second = dict.with_strict().recognizer() as *const Recognizer;
        assert_eq!(first, second);
    }

    #[test]
    fn test_symbol_lookup() {
        let dict = Dictionary::new(ASCII).unwrap();
        assert_eq!(dict.symbol(0), Some("A"));
        assert_eq!(dict.symbol(64), None);
        assert_eq!(dict.value_of('z'), Some(51));
        assert_eq!(dict.value_of('・'), None);
    }

    #[test]
    fn test_encoded_len() {
        let padded = Dictionary::builder()
            .alphabet(ASCII)
            .padding(Some('='))
            .build()
            .unwrap();
        let raw = padded.with_padding(None).unwrap();
        for (n, want_padded, want_raw) in [(0, 0, 0), (1, 4, 2), (2, 4, 3), (3, 4, 4), (7, 12, 10)] {
            assert_eq!(padded.encoded_len(n), Some(want_padded));
            assert_eq!(raw.encoded_len(n), Some(want_raw));
        }
        assert_eq!(padded.encoded_len(usize::MAX), None);
    }

    #[test]
    fn test_decoded_len() {
        let padded = Dictionary::builder()
            .alphabet(ASCII)
            .padding(Some('='))
            .build()
            .unwrap();
        let raw = padded.with_padding(None).unwrap();
        assert_eq!(padded.decoded_len(8), 6);
        assert_eq!(padded.decoded_len(7), 3);
        assert_eq!(raw.decoded_len(7), 5);
        assert_eq!(raw.decoded_len(3), 2);
        assert_eq!(raw.decoded_len(usize::MAX), usize::MAX / 4 * 3 + 2);
    }

    #[test]
    fn test_encode_string_appends() {
        let dict = Dictionary::builder().alphabet(ASCII).build().unwrap();
        let mut out = String::from("prefix:");
        dict.encode_string(b"foo", &mut out);
        assert_eq!(out, "prefix:Zm9v");
    }
}
