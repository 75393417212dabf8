use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use dirtscan_core::{
    render_json_for_receipt, render_markdown_for_receipt, run_analysis, AnalysisPlan,
};
use dirtscan_types::{BatchReceipt, GameKind, LoadOrderDoc, LOAD_ORDER_SCHEMA_V1};

#[derive(Parser)]
#[command(name = "dirtscan")]
#[command(about = "Load-order cleanliness scanner", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a load-order document and report per-plugin counters.
    Check(CheckArgs),

    /// Print the JSON schema for the receipt or the input document.
    Schema(SchemaArgs),

    /// List supported game identifiers.
    Games,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Load-order document to analyze (JSON), or '-' for stdin.
    #[arg(long, value_name = "PATH", default_value = "-")]
    input: PathBuf,

    /// Where to write the JSON receipt. Omit to print it to stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Write a Markdown summary.
    #[arg(long, value_name = "PATH")]
    md: Option<PathBuf>,

    /// Analyze only this plugin. Repeatable; default is every plugin.
    #[arg(long, action = clap::ArgAction::Append, value_name = "NAME")]
    plugin: Vec<String>,

    /// Fail policy.
    #[arg(long, value_enum, default_value_t = FailOnArg::Error)]
    fail_on: FailOnArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FailOnArg {
    /// Exit 2 when any plugin's analysis failed.
    Error,
    /// Like error, and additionally exit 3 when any counter is nonzero.
    Dirty,
    /// Always exit 0.
    Never,
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    #[arg(value_enum, default_value_t = SchemaKind::Report)]
    kind: SchemaKind,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaKind {
    /// The batch receipt written by `check`.
    Report,
    /// The load-order input document consumed by `check`.
    LoadOrder,
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Check(args) => cmd_check(args),
        Commands::Schema(args) => {
            cmd_schema(args)?;
            Ok(0)
        }
        Commands::Games => {
            cmd_games();
            Ok(0)
        }
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_check(args: CheckArgs) -> Result<i32> {
    let doc = load_doc(&args.input)?;

    let plan = AnalysisPlan {
        plugins: args.plugin.clone(),
    };
    let run = run_analysis(&doc, &plan).context("analyze load order")?;

    let json = render_json_for_receipt(&run.receipt).context("serialize receipt")?;
    match &args.out {
        Some(path) => write_text(path, &json)?,
        None => println!("{json}"),
    }

    if let Some(path) = &args.md {
        write_text(path, &render_markdown_for_receipt(&run.receipt))?;
    }

    Ok(exit_code_for(args.fail_on, &run.receipt, run.dirty_plugins))
}

/// Maps the fail policy onto an exit code.
///
/// Failures dominate dirtiness: a batch with both failed and dirty
/// plugins exits 2 under `--fail-on dirty`.
fn exit_code_for(fail_on: FailOnArg, receipt: &BatchReceipt, dirty_plugins: usize) -> i32 {
    match fail_on {
        FailOnArg::Never => 0,
        FailOnArg::Error if !receipt.failures.is_empty() => 2,
        FailOnArg::Error => 0,
        FailOnArg::Dirty if !receipt.failures.is_empty() => 2,
        FailOnArg::Dirty if dirty_plugins > 0 => 3,
        FailOnArg::Dirty => 0,
    }
}

fn cmd_schema(args: SchemaArgs) -> Result<()> {
    let schema = match args.kind {
        SchemaKind::Report => schemars::schema_for!(BatchReceipt),
        SchemaKind::LoadOrder => schemars::schema_for!(LoadOrderDoc),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn cmd_games() {
    for game in GameKind::ALL {
        println!("{}", game.as_str());
    }
}

fn load_doc(input: &Path) -> Result<LoadOrderDoc> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read load order from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("read load order {}", input.display()))?
    };

    let doc: LoadOrderDoc = serde_json::from_str(&text)
        .with_context(|| format!("parse load order {}", input.display()))?;
    if doc.schema != LOAD_ORDER_SCHEMA_V1 {
        bail!(
            "unsupported load order schema '{}'; expected '{}'",
            doc.schema,
            LOAD_ORDER_SCHEMA_V1
        );
    }
    Ok(doc)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }

    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
