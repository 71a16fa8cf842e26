//! Answer grading.
//!
//! Grading compares a captured answer against the question's answer key.
//! Free-text comparisons go through [`normalize`]: surrounding whitespace is
//! trimmed and the string is lower-cased. Nothing else is folded, so inner
//! spaces and punctuation must match exactly.

use serde::{Deserialize, Serialize};

use crate::error::ActionRejected;
use crate::model::{Question, QuestionKind};

/// The learner's raw input for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    /// Index of the selected option.
    Choice(usize),
    Text(String),
    /// Base form, simple past, past participle.
    VerbForms([String; 3]),
}

impl Answer {
    fn tag(&self) -> &'static str {
        match self {
            Answer::Choice(_) => "choice",
            Answer::Text(_) => "text",
            Answer::VerbForms(_) => "verb-forms",
        }
    }
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the question counts towards the score.
    pub correct: bool,
    pub detail: VerdictDetail,
}

/// Per-kind information shown alongside a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictDetail {
    Choice { selected: usize, correct_index: usize },
    Text,
    /// Match flags for base, past and participle.
    VerbForms { matches: [bool; 3] },
}

impl Verdict {
    /// Number of verb forms that matched. Display only; scoring ignores it.
    pub fn partial_matches(&self) -> Option<usize> {
        match &self.detail {
            VerdictDetail::VerbForms { matches } => Some(matches.iter().filter(|m| **m).count()),
            _ => None,
        }
    }
}

/// Trim surrounding whitespace and lower-case.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Correct iff `selected` equals the answer key's index.
pub fn grade_multiple_choice(selected: usize, correct_answer_index: usize) -> bool {
    selected == correct_answer_index
}

/// Correct iff the normalized input equals the normalized main answer or any
/// normalized acceptable answer.
pub fn grade_text_input(input: &str, correct_answer: &str, acceptable_answers: &[String]) -> bool {
    let input = normalize(input);
    input == normalize(correct_answer) || acceptable_answers.iter().any(|a| normalize(a) == input)
}

/// Per-field matches of three verb forms.
pub fn match_verb_forms(inputs: &[String; 3], expected: &[String; 3]) -> [bool; 3] {
    std::array::from_fn(|i| normalize(&inputs[i]) == normalize(&expected[i]))
}

/// Grade `answer` against `question`.
///
/// Refuses answers whose kind does not fit the question, choices outside the
/// option list, and blank text fields.
pub fn grade(question: &Question, answer: &Answer) -> Result<Verdict, ActionRejected> {
    match (&question.kind, answer) {
        (
            QuestionKind::MultipleChoice {
                options,
                correct_answer_index,
            },
            Answer::Choice(selected),
        ) => {
            if *selected >= options.len() {
                return Err(ActionRejected::OptionOutOfRange {
                    index: *selected,
                    len: options.len(),
                });
            }
            Ok(Verdict {
                correct: grade_multiple_choice(*selected, *correct_answer_index),
                detail: VerdictDetail::Choice {
                    selected: *selected,
                    correct_index: *correct_answer_index,
                },
            })
        }
        (
            QuestionKind::TextInput {
                correct_answer,
                acceptable_answers,
            },
            Answer::Text(input),
        ) => {
            if input.trim().is_empty() {
                return Err(ActionRejected::EmptyAnswer);
            }
            Ok(Verdict {
                correct: grade_text_input(input, correct_answer, acceptable_answers),
                detail: VerdictDetail::Text,
            })
        }
        (QuestionKind::VerbForms { forms }, Answer::VerbForms(inputs)) => {
            if inputs.iter().any(|i| i.trim().is_empty()) {
                return Err(ActionRejected::EmptyAnswer);
            }
            let matches = match_verb_forms(inputs, forms);
            Ok(Verdict {
                correct: matches.iter().all(|m| *m),
                detail: VerdictDetail::VerbForms { matches },
            })
        }
        (kind, answer) => Err(ActionRejected::AnswerKindMismatch {
            answer: answer.tag(),
            question: kind.tag(),
        }),
    }
}
