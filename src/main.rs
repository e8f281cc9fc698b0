use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use toolbox_db::{LoadMode, ToolboxFile};
use toolbox_tagger::{DEFAULT_CHUNK_SIZE, WhitespaceTagger};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use toolbox_dict::Dictionary;

const DEFAULT_INPUT: &str = "dictionary.toolbox";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!(
        "reading {} (mode: {:?})",
        config.input.display(),
        config.load_mode
    );

    let start = Instant::now();
    let file = ToolboxFile::load_with_mode(&config.input, config.load_mode)?;
    let built = file
        .entries()
        .with_context(|| format!("building entries from {}", config.input.display()))?;
    let mut dictionary = Dictionary::from_entries(built);
    info!(
        "dictionary built in {} ms ({} entries, {} index nodes, {} warnings)",
        start.elapsed().as_millis(),
        dictionary.entries().len(),
        dictionary.index().node_count(),
        dictionary.warnings().len()
    );

    if config.whitespace_tagger {
        info!("tagging senses (chunk size {})", config.chunk_size);
        dictionary = dictionary.tag_with(&WhitespaceTagger, config.chunk_size)?;
    }

    let tree = dictionary.headings();
    match &config.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut out, &tree)?;
            out.flush()?;
            info!("wrote {} headings to {}", tree.headings.len(), path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &tree)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct Config {
    input: PathBuf,
    output: Option<PathBuf>,
    load_mode: LoadMode,
    chunk_size: usize,
    whitespace_tagger: bool,
}

fn load_config() -> Config {
    parse_config(env::args().skip(1), |key| env::var(key).ok())
}

fn parse_config<I, E>(args: I, var: E) -> Config
where
    I: IntoIterator<Item = String>,
    E: Fn(&str) -> Option<String>,
{
    let mut cli_input: Option<PathBuf> = None;
    let mut cli_output: Option<PathBuf> = None;
    let mut cli_mode: Option<LoadMode> = None;
    let mut cli_chunk: Option<usize> = None;
    let mut whitespace_tagger = false;
    for arg in args {
        match arg.as_str() {
            "--whitespace-tagger" => whitespace_tagger = true,
            _ => {
                if let Some(path) = arg.strip_prefix("--input=") {
                    cli_input = Some(PathBuf::from(path));
                } else if let Some(path) = arg.strip_prefix("--output=") {
                    cli_output = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--load-mode=") {
                    cli_mode = parse_load_mode(mode);
                } else if let Some(size) = arg.strip_prefix("--chunk-size=") {
                    cli_chunk = parse_chunk_size(size);
                } else if !arg.starts_with("--") {
                    cli_input = Some(PathBuf::from(arg));
                }
            }
        }
    }

    let input = cli_input
        .or_else(|| var("TOOLBOX_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = cli_output.or_else(|| var("TOOLBOX_OUTPUT").map(PathBuf::from));
    let load_mode = cli_mode
        .or_else(|| var("TOOLBOX_LOAD_MODE").as_deref().and_then(parse_load_mode))
        .unwrap_or(LoadMode::Owned);
    let chunk_size = cli_chunk
        .or_else(|| var("TAGGER_CHUNK_SIZE").as_deref().and_then(parse_chunk_size))
        .unwrap_or(DEFAULT_CHUNK_SIZE);

    Config {
        input,
        output,
        load_mode,
        chunk_size,
        whitespace_tagger,
    }
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn parse_chunk_size(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok().filter(|v| *v > 0)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
}
