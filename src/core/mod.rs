pub mod alphabet;
pub mod config;
pub mod dictionary;
pub(crate) mod recognizer;
