//! Bidscope CLI - stream construction cost estimates for an RFP document.

use bidscope_cli::{logging, CliError, Cli, Config};
use bidscope_llm::OpenAiProvider;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> bidscope_cli::Result<i32> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    config.validate()?;

    let api_key = cli
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::MissingApiKey)?;

    let document = bidscope_cli::load_document(&cli)?;

    let backend = OpenAiProvider::with_timeout(
        config.backend.endpoint.clone(),
        api_key,
        config.extractor.model_id.clone(),
        config.backend.request_timeout(),
    )?
    .with_max_retries(config.backend.max_retries);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current chunk");
            on_interrupt.cancel();
        }
    });

    let stdout = std::io::stdout().lock();
    let outcome =
        bidscope_cli::execute(&cli, &config, &document, backend, stdout, &cancel).await?;

    Ok(outcome.exit_code())
}
