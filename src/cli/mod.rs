mod commands;
mod config;

use clap::Parser;
use glyph64::{DecodeError, DictionaryError, DictionaryNotFoundError};
use std::error::Error;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use config::{load_registry, resolve_dictionary};

#[derive(Parser)]
#[command(name = "glyph64")]
#[command(version)]
#[command(
    about = "Base64 over arbitrary Unicode alphabets: hiragana revival passwords, kana, emoji and more",
    long_about = None
)]
struct Cli {
    /// File to process (if not provided, reads from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Decode instead of encode
    #[arg(short, long)]
    decode: bool,

    /// Dictionary to use (default: settings.default_dictionary, else "standard")
    #[arg(short = 'D', long, value_name = "NAME", conflicts_with = "alphabet")]
    dictionary: Option<String>,

    /// Use an ad-hoc alphabet of 64 characters instead of a named dictionary
    #[arg(long, value_name = "CHARS")]
    alphabet: Option<String>,

    /// Override the padding character
    #[arg(long, value_name = "CHAR", conflicts_with = "no_padding")]
    padding: Option<char>,

    /// Disable padding
    #[arg(long)]
    no_padding: bool,

    /// Reject non-zero trailing bits when decoding
    #[arg(long)]
    strict: bool,

    /// Load extra dictionaries from this TOML file
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// List available dictionaries
    #[arg(short, long)]
    list: bool,

    /// Suppress warnings
    #[arg(short, long)]
    quiet: bool,
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let registry = load_registry(cli.config.as_deref(), cli.quiet)?;

    if cli.list {
        return commands::list_dictionaries(&registry);
    }

    let dictionary = resolve_dictionary(
        &registry,
        cli.dictionary.as_deref(),
        cli.alphabet.as_deref(),
        cli.padding,
        cli.no_padding,
        cli.strict,
    )?;

    let input = commands::open_input(cli.file.as_deref())?;
    if cli.decode {
        commands::decode_stream(&dictionary, input)
    } else {
        commands::encode_stream(&dictionary, input)
    }
}

/// Prints an error from [`run`] to stderr.
///
/// The library's own error types render their `error:`/`hint:` lines
/// themselves; anything else gets a plain `error:` prefix.
pub fn report(err: &(dyn Error + 'static)) {
    // decode failures arrive wrapped in io::Error from the stream reader
    let target: &(dyn Error + 'static) = match err
        .downcast_ref::<io::Error>()
        .and_then(|e| e.get_ref())
    {
        Some(inner) if inner.is::<DecodeError>() => inner,
        _ => err,
    };

    if target.is::<DecodeError>()
        || target.is::<DictionaryError>()
        || target.is::<DictionaryNotFoundError>()
    {
        eprintln!("{}", target);
    } else if use_color() {
        eprintln!("\x1b[1;31merror:\x1b[0m {}", target);
    } else {
        eprintln!("error: {}", target);
    }
}

fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err() && io::stderr().is_terminal()
}
