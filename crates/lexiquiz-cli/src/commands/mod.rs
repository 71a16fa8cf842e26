pub mod explain;
pub mod init;
pub mod list_models;
pub mod quiz;
pub mod tutor;
pub mod write;

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use tracing::info;

use lexiquiz_core::LlmContentGenerator;
use lexiquiz_providers::config::load_config_from;
use lexiquiz_providers::create_provider;

/// Build the content generator for the configured default provider.
pub(crate) fn connect(config_path: Option<&Path>) -> Result<LlmContentGenerator> {
    let config = load_config_from(config_path)?;
    let (name, provider_config) = config.provider(None)?;
    anyhow::ensure!(
        !provider_config.api_key().is_empty(),
        "API key for provider '{name}' is empty; set it in lexiquiz.toml or export LEXIQUIZ_{}_KEY",
        name.to_uppercase()
    );
    let provider = create_provider(provider_config)?;
    info!(provider = name, model = %config.default_model, "provider ready");
    Ok(LlmContentGenerator::new(provider, config.default_model.clone())
        .with_temperature(config.default_temperature))
}

/// Line-oriented terminal I/O. Generic so the interactive loops can be
/// driven from a buffer in tests.
pub(crate) struct Console<R, W> {
    input: R,
    output: W,
}

pub(crate) fn stdio() -> Console<io::StdinLock<'static>, io::Stdout> {
    Console::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Print `prompt` and read one line. `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    /// Ask a yes/no question; anything but "y"/"yes" (or end of input) is no.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask(&format!("{prompt} [y/N] "))?;
        Ok(matches!(
            answer.as_deref().map(|a| a.trim().to_lowercase()).as_deref(),
            Some("y" | "yes")
        ))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{console, output};

    #[test]
    fn ask_strips_line_endings_and_reports_eof() {
        let mut c = console("first\r\nsecond\n");
        assert_eq!(c.ask("> ").unwrap().as_deref(), Some("first"));
        assert_eq!(c.ask("> ").unwrap().as_deref(), Some("second"));
        assert_eq!(c.ask("> ").unwrap(), None);
        assert_eq!(output(c), "> > > ");
    }

    #[test]
    fn confirm_accepts_only_yes() {
        let mut c = console("Y\nno\n yes \n");
        assert!(c.confirm("Again?").unwrap());
        assert!(!c.confirm("Again?").unwrap());
        assert!(c.confirm("Again?").unwrap());
        assert!(!c.confirm("Again?").unwrap());
    }
}
