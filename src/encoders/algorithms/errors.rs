use std::fmt;

/// Errors that can occur during decoding.
///
/// There is a single failure mode: the encoded text is not valid for the
/// dictionary. The offset is always a raw byte position into the encoded
/// input, never a symbol count, since symbols are variable-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input is malformed; `offset` is where the first irrecoverable
    /// problem was detected.
    CorruptInput { offset: u64 },
}

impl DecodeError {
    pub(crate) fn corrupt(offset: u64) -> Self {
        DecodeError::CorruptInput { offset }
    }

    /// Byte offset into the encoded input where decoding failed.
    pub fn offset(&self) -> u64 {
        match self {
            DecodeError::CorruptInput { offset } => *offset,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();

        match self {
            DecodeError::CorruptInput { offset } => {
                if use_color {
                    writeln!(
                        f,
                        "\x1b[1;31merror:\x1b[0m illegal encoded data at input byte {}",
                        offset
                    )?;
                    write!(
                        f,
                        "\n\x1b[1;36mhint:\x1b[0m check for symbols outside the dictionary, misplaced padding, or a truncated final group"
                    )?;
                } else {
                    writeln!(f, "error: illegal encoded data at input byte {}", offset)?;
                    write!(
                        f,
                        "\nhint: check for symbols outside the dictionary, misplaced padding, or a truncated final group"
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors raised while building a dictionary.
///
/// These are programmer errors: they are reported when the dictionary is
/// constructed, never deferred to encode or decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    /// The alphabet is not 64 distinct, usable code points
    InvalidAlphabet { reason: String },
    /// The padding character cannot be used with this alphabet
    InvalidPadding { padding: char, reason: String },
}

impl DictionaryError {
    pub(crate) fn invalid_alphabet(reason: impl Into<String>) -> Self {
        DictionaryError::InvalidAlphabet {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_padding(padding: char, reason: impl Into<String>) -> Self {
        DictionaryError::InvalidPadding {
            padding,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (header, detail) = match self {
            DictionaryError::InvalidAlphabet { reason } => {
                ("invalid alphabet".to_string(), reason.as_str())
            }
            DictionaryError::InvalidPadding { padding, reason } => (
                format!("invalid padding {:?} (U+{:04X})", padding, *padding as u32),
                reason.as_str(),
            ),
        };

        if should_use_color() {
            writeln!(f, "\x1b[1;31merror:\x1b[0m {}", header)?;
            write!(f, "\n\x1b[1;36mhint:\x1b[0m {}", detail)
        } else {
            writeln!(f, "error: {}", header)?;
            write!(f, "\nhint: {}", detail)
        }
    }
}

impl std::error::Error for DictionaryError {}

/// Errors specific to the stream wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// The encoder was already finished
    Closed,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Closed => write!(f, "cannot write to a finished encoder"),
        }
    }
}

impl std::error::Error for StreamError {}

/// Check if colored output should be used
fn should_use_color() -> bool {
    // Respect NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stderr is a terminal
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

/// Error when a dictionary is not found
#[derive(Debug)]
pub struct DictionaryNotFoundError {
    pub name: String,
    pub suggestion: Option<String>,
}

impl DictionaryNotFoundError {
    pub fn new(name: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            name: name.into(),
            suggestion,
        }
    }
}

impl fmt::Display for DictionaryNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();

        if use_color {
            writeln!(
                f,
                "\x1b[1;31merror:\x1b[0m dictionary '{}' not found",
                self.name
            )?;
        } else {
            writeln!(f, "error: dictionary '{}' not found", self.name)?;
        }

        writeln!(f)?;

        if let Some(suggestion) = &self.suggestion {
            if use_color {
                writeln!(f, "\x1b[1;36mhint:\x1b[0m did you mean '{}'?", suggestion)?;
            } else {
                writeln!(f, "hint: did you mean '{}'?", suggestion)?;
            }
        }

        if use_color {
            write!(
                f,
                "      run \x1b[1m`glyph64 --list`\x1b[0m to see all dictionaries"
            )?;
        } else {
            write!(f, "      run `glyph64 --list` to see all dictionaries")?;
        }

        Ok(())
    }
}

impl std::error::Error for DictionaryNotFoundError {}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for (i, c1) in s1.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, c2) in s2.chars().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Find the closest matching dictionary name
pub fn find_closest_dictionary(name: &str, available: &[String]) -> Option<String> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    // Short names tolerate fewer typos
    let threshold = if name.len() < 5 { 2 } else { 3 };

    for dict_name in available {
        let distance = levenshtein_distance(name, dict_name);

        if distance < best_distance && distance <= threshold {
            best_distance = distance;
            best_match = Some(dict_name.clone());
        }
    }

    best_match
}
