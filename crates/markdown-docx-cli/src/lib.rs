use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use markdown_docx_config::{Config, LoadOptions, OutputFormat};
use markdown_docx_scan::{scan_from_path, scan_from_reader, Block, BlockKind};
use markdown_docx_sink::{build_document, convert_file, write_document};

const STDIN_PATH: &str = "-";

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = LoadOptions {
        override_path: cli.config,
        working_dir: None,
    };
    let config = Config::load(options)?;

    match cli.command {
        Command::Convert(args) => handle_convert(&config, args),
        Command::Blocks(args) => handle_blocks(&config, args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn handle_convert(config: &Config, args: ConvertArgs) -> Result<i32> {
    let ConvertArgs {
        input,
        output,
        format,
    } = args;

    let format = format.map(OutputFormat::from).unwrap_or(config.conversion.format);

    let input = resolve_input(input, config)?;
    let from_stdin = input == Path::new(STDIN_PATH);
    let output = match output.or_else(|| config.conversion.output.clone()) {
        Some(path) => path,
        None if from_stdin => bail!("an output path is required when reading from stdin"),
        None => input.with_extension(default_extension(format)),
    };
    if !from_stdin && is_same_file(&input, &output) {
        bail!(
            "refusing to overwrite input {} with the converted document; pass -o OUTPUT",
            input.display()
        );
    }

    let summary = if from_stdin {
        let blocks = read_blocks(&input)?;
        let (model, summary) = build_document(&blocks, &config.style)?;
        write_document(&model, &config.style, format, &output)
            .with_context(|| format!("Unable to create document at {}", output.display()))?;
        summary
    } else {
        convert_file(&input, &output, format, &config.style).with_context(|| {
            format!(
                "Unable to convert {} into {}",
                input.display(),
                output.display()
            )
        })?
    };

    for kind in BlockKind::ALL {
        log::info!("{kind}: {}", summary.count(*kind));
    }

    emit(&format!("Successfully created: {}", output.display()))?;
    Ok(0)
}

fn handle_blocks(config: &Config, args: BlocksArgs) -> Result<i32> {
    let input = resolve_input(args.input, config)?;
    let blocks = read_blocks(&input)?;
    let rendered = serde_json::to_string_pretty(&blocks).context("failed to encode blocks")?;
    emit(&rendered)?;
    Ok(0)
}

fn resolve_input(input: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match input.or_else(|| config.conversion.input.clone()) {
        Some(path) => Ok(path),
        None => bail!("no input given; pass INPUT or set conversion.input in .markdown-docx.toml"),
    }
}

fn read_blocks(input: &Path) -> Result<Vec<Block>> {
    if input == Path::new(STDIN_PATH) {
        let stdin = io::stdin();
        let mut reader = BufReader::new(stdin.lock());
        return scan_from_reader(&mut reader).context("failed to read markdown from stdin");
    }

    scan_from_path(input).with_context(|| format!("failed to read {}", input.display()))
}

/// Only an existing output can alias the input.
fn is_same_file(input: &Path, output: &Path) -> bool {
    match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(input), Ok(output)) => input == output,
        _ => input == output,
    }
}

fn default_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::WordXml => "xml",
        OutputFormat::Json => "json",
    }
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert markdown into Word documents",
    propagate_version = true
)]
struct Cli {
    /// Configuration file applied over the discovered layers
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a markdown file into a document
    Convert(ConvertArgs),
    /// Print the scanned block sequence as JSON
    Blocks(BlocksArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Markdown input (`-` for stdin); defaults to conversion.input
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Destination file; defaults to conversion.output or INPUT with a new extension
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum)]
    format: Option<FormatValue>,
}

#[derive(Args)]
struct BlocksArgs {
    /// Markdown input (`-` for stdin); defaults to conversion.input
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatValue {
    WordXml,
    Json,
}

impl From<FormatValue> for OutputFormat {
    fn from(value: FormatValue) -> Self {
        match value {
            FormatValue::WordXml => OutputFormat::WordXml,
            FormatValue::Json => OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert_arguments() {
        let cli = Cli::try_parse_from([
            "markdown-docx",
            "-vv",
            "convert",
            "doc.md",
            "--format",
            "json",
            "-o",
            "out.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.input, Some(PathBuf::from("doc.md")));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(matches!(args.format, Some(FormatValue::Json)));
    }

    #[test]
    fn format_values_map_onto_output_formats() {
        assert_eq!(OutputFormat::from(FormatValue::WordXml), OutputFormat::WordXml);
        assert_eq!(OutputFormat::from(FormatValue::Json), OutputFormat::Json);
    }

    #[test]
    fn detects_output_aliasing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.xml");
        fs::write(&input, "# Notes\n").unwrap();

        assert!(is_same_file(&input, &input.with_extension("xml")));
        assert!(is_same_file(&input, &dir.path().join("./notes.xml")));
        assert!(!is_same_file(&input, &input.with_extension("json")));
    }

    #[test]
    fn default_extension_follows_format() {
        assert_eq!(default_extension(OutputFormat::WordXml), "xml");
        assert_eq!(default_extension(OutputFormat::Json), "json");
    }
}
