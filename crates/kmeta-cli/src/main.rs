//! kmeta CLI - reflection metadata generator for C++ headers
//!
//! Commands:
//! - `kmeta generate` - Scan headers and write the generated registration file
//! - `kmeta check` - Parse headers and report diagnostics without writing

use clap::{Parser, Subcommand};

mod check;
mod generate;

#[derive(Parser)]
#[command(name = "kmeta")]
#[command(author, version, about = "Reflection metadata generator for C++ headers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan headers and write the generated registration file
    Generate {
        /// Root folder searched for **/*.h headers
        #[arg(short, long)]
        root: String,

        /// Parse exactly this file and gather all members of structures
        /// declared in it
        #[arg(short, long)]
        file: Option<String>,

        /// Output path for the generated file, relative to the root folder
        #[arg(short, long, default_value = kmeta_core::GENERATED_RELATIVE_PATH)]
        output: String,
    },

    /// Parse headers and report diagnostics without writing output
    Check {
        /// Root folder searched for **/*.h headers
        #[arg(short, long)]
        root: String,

        /// Parse exactly this file
        #[arg(short, long)]
        file: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { root, file, output } => {
            generate::run(&root, file.as_deref(), &output)?;
        }
        Commands::Check { root, file } => {
            check::run(&root, file.as_deref())?;
        }
    }

    Ok(())
}
