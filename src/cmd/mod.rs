//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`probe`], [`init`], or [`validate`]. Each
//! handler lives in its own submodule.

pub mod init;
pub mod probe;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::LoadmarkError;

pub async fn dispatch(cli: Cli) -> Result<(), LoadmarkError> {
    match cli.command {
        Some(Commands::Probe(args)) => probe::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  loadmark v{version} \u{2014} trace-context tagging for load-test traffic\n\n  \
         No command provided. To get started:\n\n    \
         loadmark init                    Generate a starter scenario\n    \
         loadmark validate                Check ./loadmark.yaml\n    \
         loadmark probe -c shop.yaml      Fire each task once, tagged\n    \
         loadmark --help                  See all commands and options\n"
    );
}
