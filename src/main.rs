//! bazel-deps CLI entry point
//!
//! Parses the command line, runs the resolution and prints the generated
//! declarations. Errors are rendered by [`user_friendly_error`] on stderr and
//! exit with status 1.

use anyhow::Result;
use bazel_deps::cli;
use bazel_deps::core::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
