//! The `lexiquiz explain` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use lexiquiz_core::generator::EXPLANATION_FALLBACK;
use lexiquiz_core::ContentGenerator;

use super::{connect, stdio, Console};

pub async fn execute(topic: String, config_path: Option<PathBuf>) -> Result<()> {
    let client = connect(config_path.as_deref())?;
    run(&topic, &client, &mut stdio()).await
}

pub(crate) async fn run<R: BufRead, W: Write>(
    topic: &str,
    client: &dyn ContentGenerator,
    console: &mut Console<R, W>,
) -> Result<()> {
    let topic = topic.trim();
    anyhow::ensure!(!topic.is_empty(), "topic must not be empty");

    match client.fetch_explanation(topic).await {
        Ok(text) => {
            console.say(format!("# {topic}\n"))?;
            console.say(text)
        }
        Err(e) => {
            console.say(EXPLANATION_FALLBACK)?;
            Err(e).with_context(|| format!("explanation of '{topic}' failed"))
        }
    }
}
