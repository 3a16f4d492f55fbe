mod app;
mod cli;
mod config;
mod llm;
mod logging;
#[cfg(test)]
mod testing;
mod transcript;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use logging::LogTarget;
use tracing::Instrument;
use transcript::{Role, TranscriptController};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env(&cli.overrides())?;

    match cli.command {
        Some(Commands::Ask { message }) => {
            logging::init(LogTarget::Stderr)?;
            let provider = llm::create_provider(&config)?;
            let prompt = message.join(" ");

            let span = logging::session_span();
            let mut transcript = TranscriptController::new();
            let bot = transcript
                .exchange(provider.as_ref(), &prompt)
                .instrument(span)
                .await;
            if bot.is_none() {
                anyhow::bail!("Message must not be blank");
            }

            if let Some(reply) = transcript
                .messages()
                .last()
                .filter(|message| message.role() == Role::Bot)
            {
                println!("{}", reply.text());
            }
        }
        None => {
            logging::init(LogTarget::File(config.log_file.clone()))?;
            let provider = llm::create_provider(&config)?;

            let span = logging::session_span();
            tui::run(app::ChatState::new(config.theme), provider)
                .instrument(span)
                .await?;
        }
    }

    Ok(())
}
