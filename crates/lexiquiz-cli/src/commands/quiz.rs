//! The `lexiquiz quiz` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lexiquiz_core::model::{
    Difficulty, PracticeMode, Question, QuestionCount, QuestionKind, VocabDirection,
};
use lexiquiz_core::{
    ActionRejected, Answer, ContentGenerator, QuizSession, QuizState, Verdict, VerdictDetail,
};

use super::{connect, stdio, Console};

pub struct QuizOptions {
    pub mode: PracticeMode,
    pub topic: Option<String>,
    pub direction: Option<VocabDirection>,
    pub difficulty: Difficulty,
    pub count: QuestionCount,
}

pub async fn execute(options: QuizOptions, config_path: Option<PathBuf>) -> Result<()> {
    let client = connect(config_path.as_deref())?;
    let mut session = build_session(options)?;
    run(&mut session, &client, &mut stdio()).await
}

fn build_session(options: QuizOptions) -> Result<QuizSession> {
    let mut session = match options.mode {
        PracticeMode::Grammar => QuizSession::grammar(options.topic.as_deref()),
        PracticeMode::Vocabulary => {
            let mut session = QuizSession::vocabulary(VocabDirection::default());
            if let Some(topic) = options.topic {
                session.set_topic(topic)?;
            }
            session
        }
    };
    if let Some(direction) = options.direction {
        session.set_direction(direction)?;
    }
    session.set_difficulty(options.difficulty)?;
    session.set_question_count(options.count)?;
    Ok(session)
}

/// Drive a session from generation to the final score.
pub(crate) async fn run<R: BufRead, W: Write>(
    session: &mut QuizSession,
    client: &dyn ContentGenerator,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say(format!("Generating {}...", describe(session)))?;
    session.start(client).await?;

    loop {
        match session.state().clone() {
            QuizState::Answering { index } => {
                let Some(question) = session.questions().get(index).cloned() else {
                    anyhow::bail!("question {index} is missing");
                };
                console.say(format!(
                    "\nQuestion {}/{}",
                    index + 1,
                    session.questions().len()
                ))?;
                let Some(answer) = read_answer(&question, console)? else {
                    console.say("\nQuiz abandoned.")?;
                    return Ok(());
                };
                match session.answer(answer) {
                    Ok(verdict) => {
                        let verdict = verdict.clone();
                        show_verdict(&question, &verdict, console)?;
                    }
                    Err(rejected @ (ActionRejected::EmptyAnswer
                    | ActionRejected::OptionOutOfRange { .. })) => {
                        console.say(format!("  {rejected}, try again."))?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            QuizState::Graded { .. } => session.advance()?,
            QuizState::Completed => {
                print_summary(session, console)?;
                if !console.confirm("\nPlay again with new questions?")? {
                    return Ok(());
                }
                console.say(format!("Generating {}...", describe(session)))?;
                session.retry(client).await?;
            }
            QuizState::Error { message } => {
                console.say(format!("Could not generate the quiz: {message}"))?;
                if !console.confirm("Try again?")? {
                    anyhow::bail!("quiz generation failed: {message}");
                }
                session.retry(client).await?;
            }
            state @ (QuizState::Setup | QuizState::Generating) => {
                anyhow::bail!("quiz stopped while {}", state.name());
            }
        }
    }
}

fn describe(session: &QuizSession) -> String {
    let config = session.config();
    match session.mode() {
        PracticeMode::Grammar => format!(
            "{} {} grammar questions on \"{}\"",
            config.question_count, config.difficulty, config.topic
        ),
        PracticeMode::Vocabulary => format!(
            "{} {} vocabulary questions ({})",
            config.question_count, config.difficulty, config.direction
        ),
    }
}

/// Show the question and read an answer of the matching kind.
fn read_answer<R: BufRead, W: Write>(
    question: &Question,
    console: &mut Console<R, W>,
) -> Result<Option<Answer>> {
    console.say(&question.text)?;
    match &question.kind {
        QuestionKind::MultipleChoice { options, .. } => {
            for (i, option) in options.iter().enumerate() {
                console.say(format!("  {}) {option}", i + 1))?;
            }
            loop {
                let Some(line) = console.ask("Your choice: ")? else {
                    return Ok(None);
                };
                match line.trim().parse::<usize>() {
                    Ok(n) if n >= 1 => return Ok(Some(Answer::Choice(n - 1))),
                    _ => console.say(format!("  Enter a number from 1 to {}.", options.len()))?,
                }
            }
        }
        QuestionKind::TextInput { .. } => {
            Ok(console.ask("Translation: ")?.map(Answer::Text))
        }
        QuestionKind::VerbForms { .. } => {
            let mut forms: [String; 3] = Default::default();
            for (slot, label) in forms
                .iter_mut()
                .zip(["Base form: ", "Past simple: ", "Past participle: "])
            {
                let Some(line) = console.ask(label)? else {
                    return Ok(None);
                };
                *slot = line;
            }
            Ok(Some(Answer::VerbForms(forms)))
        }
    }
}

fn show_verdict<R: BufRead, W: Write>(
    question: &Question,
    verdict: &Verdict,
    console: &mut Console<R, W>,
) -> Result<()> {
    if verdict.correct {
        console.say("  Correct!")?;
    } else {
        console.say(format!(
            "  Incorrect. Answer: {}",
            question.canonical_answer()
        ))?;
    }
    if let VerdictDetail::VerbForms { matches } = &verdict.detail {
        let marks: Vec<&str> = matches.iter().map(|m| if *m { "ok" } else { "x" }).collect();
        console.say(format!(
            "  Forms: {} ({}/3)",
            marks.join(" | "),
            verdict.partial_matches().unwrap_or(0)
        ))?;
    }
    if !question.explanation.is_empty() {
        console.say(format!("  {}", question.explanation))?;
    }
    Ok(())
}

fn print_summary<R: BufRead, W: Write>(
    session: &QuizSession,
    console: &mut Console<R, W>,
) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Result", "Answer"]);
    for (i, (question, verdict)) in session
        .questions()
        .iter()
        .zip(session.verdicts())
        .enumerate()
    {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&question.text),
            Cell::new(if verdict.correct { "correct" } else { "wrong" }),
            Cell::new(question.canonical_answer()),
        ]);
    }
    console.say(format!("\n{table}"))?;

    if let Some(summary) = session.summary() {
        console.say(format!(
            "Score: {}/{} ({}%)",
            summary.score, summary.total, summary.percentage
        ))?;
    }
    Ok(())
}
