use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    wikindex::logging::init().context("init logging")?;

    let cli = wikindex::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        wikindex::cli::Command::Crawl(args) => {
            wikindex::crawl::run(args).await.context("crawl")?;
        }
        wikindex::cli::Command::Index(args) => {
            wikindex::index::run(args).await.context("index")?;
        }
        wikindex::cli::Command::Search(args) => {
            wikindex::search::run(args).await.context("search")?;
        }
    }

    Ok(())
}
