mod cli;
mod client;
mod intake;
mod logging;
mod metrics;
mod model;
mod orchestrator;
mod storage;
#[cfg(test)]
mod test_support;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;
mod view;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = args.json || args.text;

    match cli::run(args).await {
        Ok(()) => {
            // Exit explicitly so lingering request tasks don't hold the runtime open.
            if is_non_tui {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}
