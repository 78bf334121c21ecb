use anyhow::{anyhow, bail, Context as _, Result};
use clap::{Parser, Subcommand};
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::catalog::Catalog;
use crate::codec;
use crate::config::Config;
use crate::host::{Execution, RunStatus};
use crate::interpreter::TICK_SECONDS;
use crate::tree::Program;

#[derive(Parser)]
#[command(name = "blockrun")]
#[command(about = "Blockrun - run block programs one tick at a time", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a program's start sequence and print its transcript
    Run {
        /// Program file
        file: PathBuf,

        /// Read the file as plain JSON instead of the packed format
        #[arg(long)]
        json: bool,

        /// Answer for an input prompt, used in order before reading stdin
        #[arg(short = 'i', long = "input")]
        input: Vec<String>,

        /// Stop the run after this many ticks
        #[arg(long)]
        max_ticks: Option<u64>,

        /// Pace ticks at 60 per second
        #[arg(long)]
        realtime: bool,
    },

    /// Show a decoded program and its fingerprint
    Inspect {
        /// Program file
        file: PathBuf,

        /// Read the file as plain JSON instead of the packed format
        #[arg(long)]
        json: bool,
    },

    /// Compress a plain JSON program
    Pack {
        /// JSON program
        json: PathBuf,

        /// Output file
        out: PathBuf,
    },

    /// Expand a packed program to plain JSON
    Unpack {
        /// Packed program
        file: PathBuf,

        /// Output file
        out: PathBuf,
    },

    /// List every block definition by category
    Catalog,

    /// Print the effective configuration
    Config,
}

/// Run the CLI by parsing process arguments
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli).await
}

/// Run the CLI with provided arguments
pub async fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli).await
}

async fn run_cli_with_args(cli: Cli) -> Result<()> {
    let (max_ticks, realtime) = match &cli.command {
        Commands::Run {
            max_ticks,
            realtime,
            ..
        } => (*max_ticks, realtime.then_some(true)),
        _ => (None, None),
    };

    // Load config before any command output so errors show first
    let config = Config::builder()
        .config_path(cli.config)
        .max_ticks(max_ticks)
        .realtime(realtime)
        .build()?;
    init_logging(&config);

    match cli.command {
        Commands::Run {
            file, json, input, ..
        } => {
            let program = read_program(&file, json)?;
            let status = run_program(&program, input, &config).await?;
            if let Some(RunStatus::Faulted(_)) = status {
                std::process::exit(1);
            }
        }

        Commands::Inspect { file, json } => {
            let program = read_program(&file, json)?;
            println!("Fingerprint: {}", codec::fingerprint(&program)?);
            println!("Sequences: {}", program.sequences.len());
            for (i, seq) in program.sequences.iter().enumerate() {
                let head = seq.blocks.first().map(|n| n.id()).unwrap_or("(empty)");
                let vars: Vec<String> = seq.variables().into_iter().collect();
                println!(
                    "  [{}] {} block(s), starts with '{}', variables: [{}]",
                    i,
                    seq.blocks.len(),
                    head,
                    vars.join(", ")
                );
            }
            let globals: Vec<&str> = program.globals.iter().map(String::as_str).collect();
            println!("Globals: [{}]", globals.join(", "));
            println!();
            println!("{}", codec::to_json(&program)?);
        }

        Commands::Pack { json, out } => {
            let program = read_program(&json, true)?;
            codec::save(&program, &out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("✓ Packed {} into {}", json.display(), out.display());
        }

        Commands::Unpack { file, out } => {
            let program = read_program(&file, false)?;
            std::fs::write(&out, codec::to_json(&program)?)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("✓ Unpacked {} into {}", file.display(), out.display());
        }

        Commands::Catalog => {
            for (category, defs) in Catalog::global().categories() {
                println!("{} - {}", category.name, category.description);
                for def in defs {
                    println!("  {:<14} {}", def.id, def);
                }
                println!();
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` wins over the config filter
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_program(path: &Path, json: bool) -> Result<Program> {
    let program = if json {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        codec::from_json(&text)
    } else {
        codec::load(path)
    };
    program.with_context(|| format!("Failed to load program from {}", path.display()))
}

/// Drive a run to completion, printing the transcript as it grows
///
/// Returns `None` when the tick budget ran out first.
async fn run_program(
    program: &Program,
    answers: Vec<String>,
    config: &Config,
) -> Result<Option<RunStatus>> {
    let start = program
        .start_sequence()
        .ok_or_else(|| anyhow!("program has no sequence beginning with a start block"))?;

    let mut exec = Execution::start(start);
    let mut answers: VecDeque<String> = answers.into();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut pacing = config
        .runner
        .realtime
        .then(|| tokio::time::interval(Duration::from_secs_f64(TICK_SECONDS)));
    let mut printed = 0;

    let status = loop {
        if config.runner.max_ticks.is_some_and(|limit| exec.ticks() >= limit) {
            break None;
        }
        if let Some(interval) = pacing.as_mut() {
            interval.tick().await;
        }

        let status = exec.step();
        printed = print_lines(exec.console().lines(), printed);
        if status.is_terminal() {
            break Some(status);
        }

        if let Some(prompt) = exec.pending_prompt().map(str::to_string) {
            let answer = match answers.pop_front() {
                Some(answer) => answer,
                None => {
                    print!("{}", prompt);
                    std::io::stdout().flush()?;
                    match stdin.next_line().await? {
                        Some(line) => line,
                        None => bail!("input requested but stdin is closed"),
                    }
                }
            };
            exec.supply_input(answer);
        }
    };

    if status.is_none() {
        let ticks = exec.ticks();
        let console = exec.cancel();
        print_lines(console.lines(), printed);
        eprintln!("Tick budget exhausted after {} ticks", ticks);
    }

    Ok(status)
}

fn print_lines(lines: &[String], printed: usize) -> usize {
    for line in lines.iter().skip(printed) {
        println!("{}", line);
    }
    lines.len()
}
