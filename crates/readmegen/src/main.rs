//! Command-line entry point for `readmegen`.

use std::{
    fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use libreadmegen::{
    DEFAULT_TOOL, DocSource, ReadmeError, ReadmeGen, highlight_markdown, parse_overrides,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line options.
struct Cli {
    /// Module entry point to document
    #[arg(default_value = "mod.ts")]
    entry: PathBuf,

    /// File to write the README to
    #[arg(short, long, default_value = "README.md")]
    output: PathBuf,

    /// URL prefix for links into source files, e.g. https://github.com/org/repo/blob/main/
    #[arg(long, default_value = "")]
    base_url: String,

    /// Document title (defaults to the entry point's file stem)
    #[arg(long)]
    title: Option<String>,

    /// Badge or metadata line shown under the title
    #[arg(long = "badge")]
    badges: Vec<String>,

    /// File whose contents are inserted verbatim into the usage section
    #[arg(long = "usage")]
    usage: Vec<PathBuf>,

    /// Export location override as SYMBOL=PATH
    #[arg(long = "override")]
    overrides: Vec<String>,

    /// Read documentation JSON from a file instead of running the documentation tool
    #[arg(long)]
    doc_json: Option<PathBuf>,

    /// Documentation tool executable
    #[arg(long, default_value = DEFAULT_TOOL)]
    tool: String,

    /// Extra arguments passed to the documentation tool
    #[arg(long, allow_hyphen_values = true)]
    tool_args: Option<String>,

    /// Print the README instead of writing it
    #[arg(long, default_value_t = false)]
    stdout: bool,

    /// Print the parsed documentation items as JSON
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// Colorize output printed with --stdout
    #[arg(long, default_value = "auto", value_parser = ["auto", "always", "never"], env = "READMEGEN_COLOR")]
    color: String,

    /// Only log errors
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the defaults.
fn init_tracing(quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        "readmegen=info,libreadmegen=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build the generator from command-line options.
fn generator(cli: &Cli) -> Result<ReadmeGen, Box<dyn std::error::Error>> {
    let source = match &cli.doc_json {
        Some(path) => DocSource::File(path.clone()),
        None => DocSource::Tool {
            program: cli.tool.clone(),
            args: match &cli.tool_args {
                Some(args) => shell_words::split(args)?,
                None => Vec::new(),
            },
        },
    };

    let usage = cli
        .usage
        .iter()
        .map(fs::read_to_string)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ReadmeError::from)?;

    let mut readme = ReadmeGen::new(&cli.entry)
        .with_base_url(cli.base_url.clone())
        .with_badges(cli.badges.clone())
        .with_usage(usage)
        .with_overrides(parse_overrides(&cli.overrides)?)
        .with_doc_source(source);
    if let Some(title) = &cli.title {
        readme = readme.with_title(title.clone());
    }
    Ok(readme)
}

/// Print `text`, highlighting it when colour is enabled.
fn print_document(text: &str, color: &str) -> Result<(), ReadmeError> {
    let should_highlight = match color {
        "never" => false,
        "always" => true,
        _ => io::stdout().is_terminal(),
    };
    if should_highlight {
        println!("{}", highlight_markdown(text)?);
    } else {
        println!("{text}");
    }
    Ok(())
}

/// Execute the selected mode.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let readme = generator(cli)?;

    if cli.raw {
        println!("{}", readme.raw_json()?);
    } else if cli.stdout {
        print_document(&readme.render()?, &cli.color)?;
    } else {
        readme.write(Path::new(&cli.output))?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("{e}");
        let code = e
            .downcast_ref::<ReadmeError>()
            .map_or(1, ReadmeError::exit_code);
        process::exit(code);
    }
}
