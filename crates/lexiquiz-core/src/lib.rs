//! lexiquiz-core: Quiz engine, grading rules, and the generative-content contract.
//!
//! This crate owns the practice sessions (quiz, writing, tutor chat), the
//! rules that grade answers, and the typed boundary to the language model.
//! HTTP backends live in `lexiquiz-providers`.

pub mod error;
pub mod generator;
pub mod grading;
pub mod model;
pub mod prompts;
pub mod quiz;
pub mod schema;
pub mod traits;
pub mod tutor;
pub mod writing;

#[cfg(test)]
mod testing;

pub use error::{ActionRejected, GenerationError, ProviderError};
pub use generator::LlmContentGenerator;
pub use grading::{Answer, Verdict, VerdictDetail};
pub use quiz::{QuizSession, QuizState, QuizSummary};
pub use traits::{ContentGenerator, LlmProvider};
pub use tutor::TutorSession;
pub use writing::{WritingSession, WritingState};
