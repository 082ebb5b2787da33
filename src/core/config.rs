use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::alphabet::ALPHABET_SIZE;
use super::dictionary::Dictionary;
use crate::encoders::algorithms::errors::{
    DictionaryError, DictionaryNotFoundError, find_closest_dictionary,
};

/// Configuration for a single dictionary loaded from TOML.
///
/// The alphabet is given either as an explicit `chars` string or as a
/// sequential Unicode range with `start` + `length`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DictionaryConfig {
    /// The 64 characters of the alphabet (explicit list)
    #[serde(default)]
    pub chars: String,
    /// Starting character for range-based dictionary definition
    /// Use with `length` to define sequential Unicode ranges
    #[serde(default)]
    pub start: Option<String>,
    /// Number of characters in range-based dictionary; must be 64
    #[serde(default)]
    pub length: Option<usize>,
    /// Optional padding character (e.g., "・" or "="); absent means unpadded
    #[serde(default)]
    pub padding: Option<String>,
    /// Reject non-zero trailing bits when decoding
    #[serde(default)]
    pub strict: bool,
    /// One-line description shown by `--list`
    #[serde(default)]
    pub description: Option<String>,
}

impl DictionaryConfig {
    /// Returns the effective character set, generating from range if needed.
    ///
    /// Priority:
    /// 1. If `chars` is non-empty, use it directly
    /// 2. If `start` + `length` are set, generate sequential range
    /// 3. Otherwise the dictionary has no alphabet, which is an error
    pub fn effective_chars(&self) -> Result<String, String> {
        // Explicit chars take priority
        if !self.chars.is_empty() {
            return Ok(self.chars.clone());
        }

        // Generate from start + length range
        if let (Some(start_str), Some(length)) = (&self.start, self.length) {
            let start_char = start_str
                .chars()
                .next()
                .ok_or("start must contain at least one character")?;
            if length != ALPHABET_SIZE {
                return Err(format!(
                    "length must be {}, got {}",
                    ALPHABET_SIZE, length
                ));
            }

            return Self::generate_range(start_char as u32, length);
        }

        Err("either chars or start + length must be set".to_string())
    }

    /// Generate a string of sequential Unicode characters from a range.
    fn generate_range(start: u32, length: usize) -> Result<String, String> {
        const MAX_UNICODE: u32 = 0x10FFFF;
        const SURROGATE_START: u32 = 0xD800;
        const SURROGATE_END: u32 = 0xDFFF;

        if length == 0 {
            return Err("length must be greater than 0".to_string());
        }

        let end = u32::try_from(length - 1)
            .ok()
            .and_then(|span| start.checked_add(span))
            .ok_or("range exceeds maximum Unicode codepoint")?;

        if end > MAX_UNICODE {
            return Err(format!(
                "range end U+{:X} exceeds maximum Unicode codepoint U+{:X}",
                end, MAX_UNICODE
            ));
        }

        // Check for surrogate gap crossing
        let crosses_surrogates = start <= SURROGATE_END && end >= SURROGATE_START;
        if crosses_surrogates {
            return Err(format!(
                "range U+{:X}..U+{:X} crosses surrogate gap (U+D800..U+DFFF)",
                start, end
            ));
        }

        (start..=end)
            .map(|codepoint| {
                char::from_u32(codepoint)
                    .ok_or_else(|| format!("invalid codepoint U+{:X}", codepoint))
            })
            .collect()
    }

    /// Returns the padding character, or `None` for an unpadded dictionary.
    ///
    /// An empty string counts as no padding.
    pub fn padding_char(&self) -> Result<Option<char>, DictionaryError> {
        let Some(padding) = &self.padding else {
            return Ok(None);
        };
        let mut chars = padding.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(None),
            (Some(c), None) => Ok(Some(c)),
            (Some(c), Some(_)) => Err(DictionaryError::invalid_padding(
                c,
                format!(
                    "padding must be a single character, got {:?}",
                    padding
                ),
            )),
        }
    }

    /// Builds the configured dictionary.
    pub fn build(&self) -> Result<Dictionary, DictionaryError> {
        let chars = self
            .effective_chars()
            .map_err(DictionaryError::invalid_alphabet)?;
        Dictionary::builder()
            .alphabet(chars)
            .padding(self.padding_char()?)
            .strict(self.strict)
            .build()
    }
}

/// Collection of dictionary configurations loaded from TOML files.
#[derive(Debug, Deserialize, Default)]
pub struct DictionaryRegistry {
    /// Map of dictionary names to their configurations
    #[serde(default)]
    pub dictionaries: HashMap<String, DictionaryConfig>,
    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global settings for glyph64.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// Dictionary used when none is named on the command line
    #[serde(default)]
    pub default_dictionary: Option<String>,
}

impl DictionaryRegistry {
    /// Parses dictionary configurations from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the built-in dictionary configurations.
    ///
    /// Returns the default dictionaries bundled with the library.
    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        let content = include_str!("../../dictionaries.toml");
        Ok(Self::from_toml(content)?)
    }

    /// Loads configuration from a custom file path.
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    /// Loads configuration with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in dictionaries (from library)
    /// 2. `~/.config/glyph64/dictionaries.toml` (user overrides)
    /// 3. `./dictionaries.toml` (project-local overrides)
    ///
    /// Later configurations override earlier ones for matching dictionary names.
    /// Override files that fail to load are skipped with a warning on stderr.
    pub fn load_with_overrides() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_layered(false)
    }

    /// Same as [`load_with_overrides`](Self::load_with_overrides), but
    /// skips broken override files silently when `quiet` is set.
    pub fn load_layered(quiet: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::load_default()?;

        // Try to load user config from ~/.config/glyph64/dictionaries.toml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config_path = config_dir.join("glyph64").join("dictionaries.toml");
            config.merge_file(&user_config_path, "user", quiet);
        }

        // Try to load local config from ./dictionaries.toml
        config.merge_file(Path::new("dictionaries.toml"), "local", quiet);

        Ok(config)
    }

    fn merge_file(&mut self, path: &Path, label: &str, quiet: bool) {
        if !path.exists() {
            return;
        }
        match Self::load_from_file(path) {
            Ok(other) => self.merge(other),
            Err(e) => {
                if !quiet {
                    eprintln!(
                        "Warning: Failed to load {} config from {:?}: {}",
                        label, path, e
                    );
                }
            }
        }
    }

    /// Merges another configuration into this one.
    ///
    /// Dictionaries from `other` override dictionaries with the same name in
    /// `self`, and a default dictionary set in `other` wins.
    pub fn merge(&mut self, other: DictionaryRegistry) {
        for (name, dictionary) in other.dictionaries {
            self.dictionaries.insert(name, dictionary);
        }
        if other.settings.default_dictionary.is_some() {
            self.settings.default_dictionary = other.settings.default_dictionary;
        }
    }

    /// Retrieves a dictionary configuration by name.
    pub fn get_dictionary(&self, name: &str) -> Option<&DictionaryConfig> {
        self.dictionaries.get(name)
    }

    /// Dictionary names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dictionaries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Builds the named dictionary.
    ///
    /// # Errors
    ///
    /// Returns `DictionaryNotFoundError`, with the closest known name as a
    /// suggestion, for an unknown name, or the `DictionaryError` from
    /// building a misconfigured entry.
    pub fn dictionary(&self, name: &str) -> Result<Dictionary, Box<dyn std::error::Error>> {
        let config = self.get_dictionary(name).ok_or_else(|| {
            let suggestion = find_closest_dictionary(name, &self.names());
            DictionaryNotFoundError::new(name, suggestion)
        })?;
        Ok(config.build()?)
    }

    /// Name of the dictionary to use when none is given.
    pub fn default_name(&self) -> &str {
        self.settings
            .default_dictionary
            .as_deref()
            .unwrap_or("standard")
    }
}
