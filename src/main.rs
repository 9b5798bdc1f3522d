use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use linediff::commands::diff::DiffPrinter;
use linediff::commands::input::read_lines;
use linediff::{LinesDiffComputerOptions, compute_diff};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "linediff",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Compare two files line by line",
    long_about = "This command compares two text files and prints the changed lines as hunks. \
    Changed characters inside a line are highlighted, and blocks of lines that moved \
    can be reported separately.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(index = 1, help = "The original file")]
    original: PathBuf,
    #[arg(index = 2, help = "The modified file")]
    modified: PathBuf,
    #[arg(long, help = "Ignore whitespace at the start and end of lines")]
    ignore_trim_whitespace: bool,
    #[arg(long, help = "Report blocks of lines that moved")]
    moves: bool,
    #[arg(
        long,
        default_value_t = 5000,
        help = "Time budget in milliseconds, 0 for no limit"
    )]
    timeout_ms: u64,
    #[arg(long, help = "Extend changes to whole sub-words, such as `Bar` in `fooBar`")]
    extend_to_subwords: bool,
    #[arg(long, help = "Never color the output")]
    no_color: bool,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Log more details to stderr")]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let original = read_lines(&cli.original)?;
    let modified = read_lines(&cli.modified)?;
    let options = LinesDiffComputerOptions::new(
        cli.ignore_trim_whitespace,
        cli.timeout_ms,
        cli.moves,
        cli.extend_to_subwords,
    );

    let diff = compute_diff(&original, &modified, &options);
    DiffPrinter::new(&original, &modified, Box::new(std::io::stdout())).print(
        &cli.original,
        &cli.modified,
        &diff,
    )?;

    Ok(())
}

fn init_tracing(verbosity: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install the logger: {err}"))
}

fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
