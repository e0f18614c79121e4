use crossterm::style::Stylize;
use lexicon_core::{Dictionary, DictionaryConfig};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: lexicon_prep <pronunciations.txt> <output_dir> [config.json]";

fn main() -> ExitCode {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(output) => {
            println!("{} artifacts written to '{}'", "Done:".green().bold(), output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<String, Box<dyn Error>> {
    let input = PathBuf::from(&args[0]);
    let output = PathBuf::from(&args[1]);

    // The positional output directory overrides any value in the file.
    let mut config = match args.get(2) {
        Some(path) => DictionaryConfig::from_json_file(&PathBuf::from(path))?,
        None => DictionaryConfig::default(),
    };
    config.output_directory = output.clone();

    println!("{} {}", "Reading".cyan().bold(), input.display());
    let dictionary = Dictionary::new(&input, config)?;
    println!(
        "{} {} words, {} phone symbols",
        "Built".cyan().bold(),
        dictionary.words().len(),
        dictionary.phone_table().len()
    );
    dictionary.write()?;
    Ok(output.display().to_string())
}
