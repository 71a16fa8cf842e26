//! The `lexiquiz write` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lexiquiz_core::model::{Difficulty, WritingFeedback, WritingLength};
use lexiquiz_core::writing::MIN_WORDS;
use lexiquiz_core::{ActionRejected, ContentGenerator, WritingSession, WritingState};

use super::{connect, stdio, Console};

pub async fn execute(
    difficulty: Difficulty,
    length: WritingLength,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let client = connect(config_path.as_deref())?;
    let mut session = WritingSession::new();
    session.set_difficulty(difficulty)?;
    session.set_length(length)?;
    run(&mut session, &client, &mut stdio()).await
}

/// Drive a session from topic to feedback, offering a new topic afterwards.
pub(crate) async fn run<R: BufRead, W: Write>(
    session: &mut WritingSession,
    client: &dyn ContentGenerator,
    console: &mut Console<R, W>,
) -> Result<()> {
    loop {
        session.start(client).await?;
        if session.state() != WritingState::Compose {
            let error = session.last_error().unwrap_or("unknown error").to_string();
            console.say(format!("Could not get a writing topic: {error}"))?;
            if !console.confirm("Try again?")? {
                anyhow::bail!("could not get a writing topic: {error}");
            }
            continue;
        }

        console.say(format!(
            "Topic: {}\nTarget: {}",
            session.topic().unwrap_or_default(),
            session.length()
        ))?;

        if !compose(session, client, console).await? {
            return Ok(());
        }
        if !console.confirm("\nWrite on a new topic?")? {
            return Ok(());
        }
        session.retry()?;
    }
}

/// Read and submit drafts until feedback arrives. `false` if the learner stopped.
async fn compose<R: BufRead, W: Write>(
    session: &mut WritingSession,
    client: &dyn ContentGenerator,
    console: &mut Console<R, W>,
) -> Result<bool> {
    let mut need_draft = true;
    loop {
        if need_draft {
            console.say(format!(
                "\nWrite at least {MIN_WORDS} words. Finish with an empty line."
            ))?;
            let Some(draft) = read_draft(console)? else {
                console.say("Nothing submitted.")?;
                return Ok(false);
            };
            session.set_draft(draft)?;
        }

        console.say("Evaluating...")?;
        match session.submit(client).await {
            Ok(()) => {}
            Err(ActionRejected::DraftTooShort { words, min }) => {
                console.say(format!("Your text has {words} words; write at least {min}."))?;
                need_draft = true;
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(feedback) = session.feedback() {
            print_feedback(feedback, console)?;
            return Ok(true);
        }

        let error = session.last_error().unwrap_or("unknown error").to_string();
        console.say(format!("Evaluation failed: {error}"))?;
        if !console.confirm("Submit the same text again?")? {
            anyhow::bail!("writing evaluation failed: {error}");
        }
        need_draft = false;
    }
}

/// Read lines until an empty one. `None` if input ends before any text.
fn read_draft<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Option<String>> {
    let mut lines = Vec::new();
    while let Some(line) = console.ask("")? {
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    if lines.is_empty() {
        return Ok(None);
    }
    Ok(Some(lines.join("\n")))
}

fn print_feedback<R: BufRead, W: Write>(
    feedback: &WritingFeedback,
    console: &mut Console<R, W>,
) -> Result<()> {
    let mut scores = Table::new();
    scores.set_header(vec!["Overall", "Grammar", "Vocabulary", "Relevance"]);
    scores.add_row(vec![
        Cell::new(feedback.overall_score),
        Cell::new(feedback.grammar_score),
        Cell::new(feedback.vocabulary_score),
        Cell::new(feedback.relevance_score),
    ]);
    console.say(format!("\n{scores}"))?;
    console.say(format!("\n{}", feedback.general_feedback))?;

    if feedback.corrections.is_empty() {
        console.say("\nNo corrections.")?;
        return Ok(());
    }

    let mut corrections = Table::new();
    corrections.set_header(vec!["Original", "Correction", "Why"]);
    for c in &feedback.corrections {
        corrections.add_row(vec![
            Cell::new(&c.original),
            Cell::new(&c.correction),
            Cell::new(&c.explanation),
        ]);
    }
    console.say(format!("\n{corrections}"))?;
    Ok(())
}
