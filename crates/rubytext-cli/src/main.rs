use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::{env, process};

use anyhow::{Context, Result};
use rubytext_config::Config;
use rubytext_engine::{
    DictionaryTokenizer, NullTokenizer, Patterns, Tokenizer, render,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let file = match args.as_slice() {
        [_, file] => PathBuf::from(file),
        _ => {
            eprintln!("Usage: {} <markdown-file>", args[0]);
            eprintln!();
            eprintln!("Annotates Japanese text in the file with HTML ruby markup");
            eprintln!("and writes the result to stdout.");
            eprintln!();
            eprintln!("Configuration is read from {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let config = Config::load()?.unwrap_or_default();

    let doc = {
        let mut text = String::new();
        File::open(&file)
            .and_then(|mut f| f.read_to_string(&mut text))
            .with_context(|| format!("failed to read {}", file.display()))?;
        text
    };

    if config.is_skipped(&file.to_string_lossy()) || !config.reading_mode {
        print!("{doc}");
        return Ok(());
    }

    let tokenizer: Box<dyn Tokenizer> = match &config.dictionary_path {
        Some(path) => {
            let reader = BufReader::new(
                File::open(path)
                    .with_context(|| format!("failed to open dictionary {}", path.display()))?,
            );
            Box::new(
                DictionaryTokenizer::from_reader(reader)
                    .with_context(|| format!("failed to load dictionary {}", path.display()))?,
            )
        }
        // No dictionary: automatic matches degrade to plain text and only
        // manual notation is annotated.
        None => Box::new(NullTokenizer),
    };

    let patterns = Patterns::compile(config.notation_style);
    print!(
        "{}",
        render::annotate_markdown(&doc, patterns.as_ref(), tokenizer.as_ref())
    );
    Ok(())
}
