use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::app::Theme;
use crate::config::Overrides;
use crate::llm::ProviderKind;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional command to run; the chat screen opens when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Reply service to use
    #[arg(long, global = true, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Model name for the selected reply service
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Colour theme to start with
    #[arg(long, global = true, value_enum)]
    pub theme: Option<Theme>,

    /// Where the chat screen writes its log
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a one-off message and print the reply
    Ask {
        /// The message to send
        #[arg(required = true)]
        message: Vec<String>,
    },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            provider: self.provider,
            model: self.model.clone(),
            theme: self.theme,
            log_file: self.log_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_opens_chat() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["chatpane"])?;
        assert!(cli.command.is_none());
        assert!(cli.provider.is_none());
        Ok(())
    }

    #[test]
    fn test_ask_collects_words_and_global_flags() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "chatpane", "ask", "what", "is", "rust", "--provider", "ollama", "-m", "mistral",
        ])?;

        match &cli.command {
            Some(Commands::Ask { message }) => assert_eq!(message.join(" "), "what is rust"),
            None => panic!("expected ask subcommand"),
        }

        let overrides = cli.overrides();
        assert_eq!(overrides.provider, Some(ProviderKind::Ollama));
        assert_eq!(overrides.model.as_deref(), Some("mistral"));
        Ok(())
    }

    #[test]
    fn test_ask_requires_a_message() {
        assert!(Cli::try_parse_from(["chatpane", "ask"]).is_err());
    }

    #[test]
    fn test_theme_flag() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["chatpane", "--theme", "dark"])?;
        assert_eq!(cli.theme, Some(Theme::Dark));
        assert!(Cli::try_parse_from(["chatpane", "--theme", "sepia"]).is_err());
        Ok(())
    }
}
