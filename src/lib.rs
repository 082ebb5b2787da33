//! Base64 over arbitrary Unicode alphabets.
//!
//! A [`Dictionary`] maps the 64 six-bit values to 64 distinct code points,
//! each 1 to 4 bytes wide in UTF-8, with an optional padding character. The
//! bit packing is exactly that of RFC 4648 base64; only the symbols change.
//! The built-in dictionaries use hiragana:
//!
//! ```
//! use glyph64::STANDARD;
//!
//! let encoded = STANDARD.encode(b"foobar");
//! assert_eq!(encoded, "はらぶげのらかじ");
//! assert_eq!(STANDARD.decode(&encoded).unwrap(), b"foobar");
//! ```
//!
//! Decoding works on raw bytes and never needs the input to be valid UTF-8
//! up front. CR and LF between symbols are skipped. Errors report the byte
//! offset of the first problem.
//!
//! Large inputs can be processed through [`StreamingEncoder`] and
//! [`StreamingDecoder`]; named dictionaries can be loaded from TOML with
//! [`DictionaryRegistry`].

use std::sync::LazyLock;

mod core;
mod encoders;

pub mod prelude;

pub use crate::core::alphabet::{ALPHABET_SIZE, Alphabet};
pub use crate::core::config::{DictionaryConfig, DictionaryRegistry, Settings};
pub use crate::core::dictionary::{Dictionary, DictionaryBuilder, STANDARD_PADDING};
pub use encoders::algorithms::{
    DecodeError, DictionaryError, DictionaryNotFoundError, StreamError, find_closest_dictionary,
};
pub use encoders::streaming::{StreamingDecoder, StreamingEncoder};

/// Alphabet of the [`STANDARD`] dictionary: the 64 hiragana used by
/// "revival password" save systems.
pub const STANDARD_ALPHABET: &str =
    "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわがぎぐげござじずぜぞだぢづでどばびぶべぼ";

/// Alphabet of the [`NAME`] dictionary: full-width digits, kana, sound marks
/// and the ideographic space, as used for player names.
pub const NAME_ALPHABET: &str =
    "０１２３４５６７８９あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわをんっゃゅょ゛゜ー　";

/// Hiragana dictionary padded with `'・'`.
pub static STANDARD: LazyLock<Dictionary> = LazyLock::new(|| builtin(STANDARD_ALPHABET));

/// Name dictionary padded with `'・'`.
pub static NAME: LazyLock<Dictionary> = LazyLock::new(|| builtin(NAME_ALPHABET));

/// [`STANDARD`] without padding.
pub static STANDARD_NO_PAD: LazyLock<Dictionary> = LazyLock::new(|| unpadded(&STANDARD));

/// [`NAME`] without padding.
pub static NAME_NO_PAD: LazyLock<Dictionary> = LazyLock::new(|| unpadded(&NAME));

fn builtin(alphabet: &str) -> Dictionary {
    match Dictionary::new(alphabet) {
        Ok(dictionary) => dictionary,
        // The built-in alphabets are constants checked by the test suite.
        Err(e) => panic!("built-in alphabet rejected: {}", e),
    }
}

fn unpadded(dictionary: &Dictionary) -> Dictionary {
    match dictionary.with_padding(None) {
        Ok(dictionary) => dictionary,
        Err(e) => panic!("built-in dictionary cannot drop its padding: {}", e),
    }
}

/// Encodes binary data with the given dictionary.
///
/// Same as [`Dictionary::encode`].
pub fn encode(data: &[u8], dictionary: &Dictionary) -> String {
    dictionary.encode(data)
}

/// Decodes text produced by [`encode`] with the same dictionary.
///
/// # Errors
///
/// Returns `DecodeError::CorruptInput` carrying the byte offset of the first
/// problem in `encoded`.
pub fn decode(encoded: impl AsRef<[u8]>, dictionary: &Dictionary) -> Result<Vec<u8>, DecodeError> {
    dictionary.decode(encoded)
}

#[cfg(test)]
mod tests;
