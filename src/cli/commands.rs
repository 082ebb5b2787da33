use glyph64::{Dictionary, DictionaryRegistry, StreamingDecoder, StreamingEncoder};
use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

const PREVIEW_LEN: usize = 16;

/// Opens FILE, or stdin when no file is given.
pub fn open_input(file: Option<&Path>) -> Result<Box<dyn Read>, Box<dyn Error>> {
    match file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot open '{}': {}", path.display(), e))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Encodes `input` to stdout, ending the output with a newline.
pub fn encode_stream(dictionary: &Dictionary, mut input: impl Read) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut encoder = StreamingEncoder::new(dictionary, &mut out);
    encoder.encode(&mut input)?;
    drop(encoder);

    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Decodes `input` to stdout.
pub fn decode_stream(dictionary: &Dictionary, input: impl Read) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut decoder = StreamingDecoder::new(dictionary, input);
    io::copy(&mut decoder, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Prints every dictionary with its padding and a preview of the alphabet.
pub fn list_dictionaries(registry: &DictionaryRegistry) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let default = registry.default_name();

    writeln!(out, "Available dictionaries:\n")?;
    for name in registry.names() {
        let Some(config) = registry.get_dictionary(&name) else {
            continue;
        };
        let marker = if name == default { "*" } else { " " };

        let (preview, padding) = match config.build() {
            Ok(dictionary) => {
                let preview: String = dictionary.alphabet().chars().take(PREVIEW_LEN).collect();
                let padding = match dictionary.padding() {
                    Some(pad) => format!("pad {}", pad),
                    None => "no pad".to_string(),
                };
                (format!("{}...", preview), padding)
            }
            Err(_) => ("(invalid)".to_string(), String::new()),
        };

        writeln!(
            out,
            "{} {:<14} {:<8} {}  {}",
            marker,
            name,
            padding,
            preview,
            config.description.as_deref().unwrap_or("")
        )?;
    }

    Ok(())
}
