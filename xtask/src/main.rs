use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for gridscene")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc in sequence
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the layout generator benchmark in release mode
    Bench,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [FMT, CLIPPY, TEST, DOC] {
                cargo(step)?;
            }
        }
        Commands::Fmt => cargo(FMT)?,
        Commands::Clippy => cargo(CLIPPY)?,
        Commands::Test => cargo(TEST)?,
        Commands::Doc => cargo(DOC)?,
        Commands::Build => cargo(BUILD)?,
        Commands::Bench => cargo(BENCH)?,
    }

    Ok(())
}

const FMT: &[&str] = &["fmt", "--all", "--", "--check"];
const CLIPPY: &[&str] = &[
    "clippy",
    "--workspace",
    "--all-targets",
    "--",
    "-D",
    "warnings",
];
const TEST: &[&str] = &["test", "--workspace"];
const DOC: &[&str] = &["doc", "--workspace", "--no-deps"];
const BUILD: &[&str] = &["build", "--workspace"];
const BENCH: &[&str] = &["bench", "-p", "gridscene-layout", "--bench", "bench_layout"];

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args[0]);
    }
    Ok(())
}
