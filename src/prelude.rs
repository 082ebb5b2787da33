//! Convenient re-exports for common usage.
//!
//! This module provides a single import for the most commonly used types
//! and functions in glyph64.
//!
//! # Example
//!
//! ```
//! use glyph64::prelude::*;
//!
//! let registry = DictionaryRegistry::load_default().unwrap();
//! let dictionary = registry.dictionary("standard").unwrap();
//! println!("{}", encode(b"Hello", &dictionary));
//! ```

pub use crate::{
    // Errors
    DecodeError,
    // Core types
    Dictionary,
    DictionaryError,
    // Config
    DictionaryRegistry,
    // Built-in dictionaries
    NAME,
    NAME_NO_PAD,
    STANDARD,
    STANDARD_NO_PAD,
    // Streaming
    StreamingDecoder,
    StreamingEncoder,
    // Core encoding/decoding
    decode,
    encode,
};
