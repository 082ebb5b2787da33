pub(crate) mod block;
pub mod chunked;
pub mod errors;

// Re-export error types for public API
pub use errors::{
    DecodeError, DictionaryError, DictionaryNotFoundError, StreamError, find_closest_dictionary,
};
