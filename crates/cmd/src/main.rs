// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands;
use cmd::common::ProfileChoice;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "docsplit")]
/// Split an XML document into a directory tree for version control
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML naming profile (defaults to the built-in exchange-rules profile)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document into a directory tree
    Split {
        /// Source XML document
        source: PathBuf,
        /// Output directory; must be empty or absent
        output: PathBuf,
        /// Afterwards, rename identifier-named directories using the
        /// profile's reference rules
        #[arg(long)]
        relink: bool,
    },
    /// Rename identifier-named directories in an existing output tree
    Relink {
        /// Output directory of a previous split
        output: PathBuf,
    },
    /// Print the effective naming profile as YAML
    Profile,
}

fn main() -> Result<()> {
    diagnostics::init_diagnostics();

    let cli = Cli::parse();
    let profile = ProfileChoice::new(cli.config).load()?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Split {
            source,
            output,
            relink,
        } => {
            let reports = commands::split_command(&source, &output, relink, &profile)?;
            writeln!(stdout, "Split {} into {}", source.display(), output.display())?;
            for line in commands::format_reports(&profile.references, &reports) {
                writeln!(stdout, "{line}")?;
            }
        }
        Commands::Relink { output } => {
            let reports = commands::relink_command(&output, &profile)?;
            for line in commands::format_reports(&profile.references, &reports) {
                writeln!(stdout, "{line}")?;
            }
        }
        Commands::Profile => {
            write!(stdout, "{}", commands::profile_command(&profile)?)?;
        }
    }

    Ok(())
}
