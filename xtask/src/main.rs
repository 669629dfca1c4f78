use clap::{Parser, Subcommand};

use crate::test::Test;

mod build;
mod doc;
mod fuzz;
mod run;

#[derive(Parser)]
#[command(about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build all UEFI crates in workspace
    Build {
        /// Build with release profile
        #[arg(short, long, default_value_t = false)]
        release: bool,

        /// Build with target architecture
        #[arg(short, long, default_value = "x86_64-unknown-uefi")]
        target: String,
    },

    /// Build docs for bootvar-rs-core crate
    Doc {
        /// Document private items in crate
        #[arg(short, long, default_value_t = false)]
        private: bool,

        /// Open in web browser after documenting
        #[arg(short, long, default_value_t = false)]
        open: bool,
    },

    /// Run bootvar-rs-cli in VM with uefi-run
    Run {
        /// Path to the OVMF code file
        #[arg(long)]
        ovmf_code: Option<String>,

        /// Build with release profile
        #[arg(short, long, default_value_t = false)]
        release: bool,
    },

    /// Run unit tests and clippy on host, or the integration tests in a VM
    Test {
        #[command(subcommand)]
        command: Option<Test>,
    },

    /// Fuzz the load option decoder
    Fuzz,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Build { release, target } => build::build_all_crates(release, &target)?,
        Commands::Doc { private, open } => doc::doc_crate(private, open)?,
        Commands::Run { ovmf_code, release } => run::run_cli(ovmf_code.as_deref(), release)?,
        Commands::Test { command } => test::test_crate(command)?,
        Commands::Fuzz => fuzz::fuzz_decoder()?,
    }
    Ok(())
}
