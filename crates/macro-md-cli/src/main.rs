use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use macro_md_config::Config;
use macro_md_engine::{MacroProcessor, ParseOptions, io};

mod builtins;
mod loader;

#[derive(Parser, Debug)]
#[command(name = "macro-md")]
#[command(author, version, about = "Expand macros in markdown and render it to HTML", long_about = None)]
struct Cli {
    /// Markdown document to process
    #[arg(required_unless_present = "list_macros")]
    document: Option<PathBuf>,

    /// Macro library (TOML) loaded on top of the built-in macros
    #[arg(short, long)]
    macros: Option<PathBuf>,

    /// Text that starts a macro header
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Give headings GitHub-style id anchors
    #[arg(long)]
    github_ids: bool,

    /// Disable tables, strikethrough and task lists
    #[arg(long)]
    no_gfm: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to ~/.config/macro-md/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the available macro identifiers and exit
    #[arg(long)]
    list_macros: bool,
}

/// Config file values with command-line overrides applied.
#[derive(Debug, PartialEq)]
struct Settings {
    options: ParseOptions,
    macros_path: Option<PathBuf>,
}

impl Cli {
    fn settings(&self, config: Config) -> Settings {
        Settings {
            options: ParseOptions {
                delimiter: self.delimiter.clone().unwrap_or(config.delimiter),
                github_style_ids: self.github_ids || config.github_style_ids,
                gfm: config.gfm && !self.no_gfm,
            },
            macros_path: self.macros.clone().or(config.macros_path),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli, &mut std::io::stdout().lock())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => match Config::load_from_path(path)? {
            Some(config) => config,
            None => bail!("Config file not found: {}", path.display()),
        },
        None => Config::load()?.unwrap_or_default(),
    };
    log::debug!("Using config: {config:?}");
    Ok(config)
}

fn run(cli: &Cli, stdout: &mut impl Write) -> Result<()> {
    let settings = cli.settings(load_config(cli.config.as_deref())?);

    // A missing library fails here, before any document is read
    let library = settings
        .macros_path
        .as_deref()
        .map(loader::load_library)
        .transpose()?;
    let registry = loader::build_registry(library.as_ref())?;

    if cli.list_macros {
        for identifier in registry.identifiers() {
            writeln!(stdout, "{identifier}")?;
        }
        return Ok(());
    }

    let Some(document) = cli.document.as_deref() else {
        bail!("No document given");
    };

    let processor = MacroProcessor::new(&registry, &settings.options)?;
    let html = processor
        .parse_file(document)
        .with_context(|| format!("Failed to process {}", document.display()))?;

    match &cli.output {
        Some(path) => {
            io::write_document(path, &html)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => stdout.write_all(html.as_bytes())?,
    }
    Ok(())
}
