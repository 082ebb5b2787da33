use glyph64::{Dictionary, DictionaryRegistry};
use std::error::Error;
use std::path::Path;

/// Loads the layered registry, plus `--config` when given.
///
/// A broken override in the standard locations only warns; a file named on
/// the command line must load.
pub fn load_registry(
    extra: Option<&str>,
    quiet: bool,
) -> Result<DictionaryRegistry, Box<dyn Error>> {
    let mut registry = DictionaryRegistry::load_layered(quiet)?;

    if let Some(path) = extra {
        let expanded = shellexpand::tilde(path);
        let other = DictionaryRegistry::load_from_file(Path::new(expanded.as_ref()))
            .map_err(|e| format!("cannot load config '{}': {}", path, e))?;
        registry.merge(other);
    }

    Ok(registry)
}

/// Builds the dictionary selected by the command line.
///
/// `--alphabet` takes the place of a named dictionary and is padded with
/// `'・'` like [`Dictionary::new`]. Padding and strictness flags are applied
/// on top of either.
pub fn resolve_dictionary(
    registry: &DictionaryRegistry,
    name: Option<&str>,
    alphabet: Option<&str>,
    padding: Option<char>,
    no_padding: bool,
    strict: bool,
) -> Result<Dictionary, Box<dyn Error>> {
    let mut dictionary = match alphabet {
        Some(chars) => Dictionary::new(chars)?,
        None => registry.dictionary(name.unwrap_or_else(|| registry.default_name()))?,
    };

    if no_padding {
        dictionary = dictionary.with_padding(None)?;
    } else if let Some(pad) = padding {
        dictionary = dictionary.with_padding(Some(pad))?;
    }
    if strict {
        dictionary = dictionary.with_strict();
    }

    Ok(dictionary)
}
