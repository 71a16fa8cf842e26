//! The `lexiquiz tutor` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use lexiquiz_core::{ActionRejected, ContentGenerator, TutorSession};

use super::{connect, stdio, Console};

const HELP: &str = "Type a question. /clear starts over, /quit leaves.";

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let client = connect(config_path.as_deref())?;
    run(&mut TutorSession::default(), &client, &mut stdio()).await
}

pub(crate) async fn run<R: BufRead, W: Write>(
    session: &mut TutorSession,
    client: &dyn ContentGenerator,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say(HELP)?;
    print_last(session, console)?;

    while let Some(line) = console.ask("\nyou> ")? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear()?;
                print_last(session, console)?;
            }
            text => match session.send(client, text).await {
                Ok(reply) => {
                    let text = reply.text.clone();
                    console.say(format!("tutor> {text}"))?;
                }
                Err(ActionRejected::EmptyAnswer) => {}
                Err(e) => return Err(e.into()),
            },
        }
    }
    Ok(())
}

fn print_last<R: BufRead, W: Write>(
    session: &TutorSession,
    console: &mut Console<R, W>,
) -> Result<()> {
    if let Some(message) = session.messages().last() {
        console.say(format!("tutor> {}", message.text))?;
    }
    Ok(())
}
