use clap::Parser;
use std::path::PathBuf;

use webmangle::error::MangleResult;
use webmangle::{ExpressionCategory, MangleConfig, Mangler, loader};

/// Default pattern for class names when no config file is given
const DEFAULT_CLASS_PATTERN: &str = "cls-[a-zA-Z-_]+";

#[derive(Parser)]
#[command(
    name = "webmangle",
    version,
    about = "Consistently rename recurring identifier-like substrings across CSS, HTML, and JS sources"
)]
struct Cli {
    /// Input files (.css, .html, .js)
    files: Vec<PathBuf>,

    /// JSON file of mangle configuration blocks
    #[arg(long)]
    config: Option<PathBuf>,

    /// Class name pattern; repeatable, used when no config file is given
    #[arg(long = "pattern")]
    patterns: Vec<String>,

    /// Prefix prepended to every generated name
    #[arg(long, default_value = "")]
    prefix: String,

    /// Name the generator must never produce; repeatable
    #[arg(long = "reserved")]
    reserved_names: Vec<String>,

    /// Rewrite files in place instead of printing to stdout
    #[arg(long)]
    write: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> MangleResult<()> {
    let configs = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => {
            let patterns = if cli.patterns.is_empty() {
                vec![DEFAULT_CLASS_PATTERN.to_string()]
            } else {
                cli.patterns.clone()
            };
            let mut config = MangleConfig::new(ExpressionCategory::Classes, &patterns);
            config.mangle_prefix = cli.prefix.clone();
            config.reserved_names = cli.reserved_names.clone();
            vec![config]
        }
    };

    let entries = loader::read_source_files(&cli.files)?;
    let (paths, files): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
    let sizes_before: Vec<usize> = files.iter().map(|file| file.content.len()).collect();

    let mut mangler = Mangler::with_default_plugins();
    for config in configs {
        mangler.with_config(config);
    }
    let mangled = mangler.run(files)?;

    for ((path, file), before) in paths.iter().zip(&mangled).zip(&sizes_before) {
        eprintln!(
            "{}: {} -> {} bytes",
            path.display(),
            before,
            file.content.len()
        );
    }

    if cli.write {
        let entries: Vec<_> = paths.into_iter().zip(mangled).collect();
        loader::write_source_files(&entries)?;
    } else {
        for file in &mangled {
            print!("{}", file.content);
        }
    }
    Ok(())
}
