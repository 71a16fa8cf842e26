//! End-to-end tests: the `lexiquiz` binary against a mock Gemini endpoint.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn lexiquiz() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lexiquiz").unwrap();
    cmd.env_remove("LEXIQUIZ_GEMINI_KEY")
        .env_remove("LEXIQUIZ_OPENAI_KEY");
    cmd
}

fn write_config(dir: &TempDir, base_url: &str) -> std::path::PathBuf {
    let path = dir.path().join("lexiquiz.toml");
    std::fs::write(
        &path,
        format!(
            "default_provider = \"gemini\"\n\
             [providers.gemini]\n\
             type = \"gemini\"\n\
             api_key = \"test-key\"\n\
             base_url = \"{base_url}\"\n"
        ),
    )
    .unwrap();
    path
}

fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}],
        "modelVersion": "gemini-2.5-flash"
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn grammar_quiz_round_trip() {
    let server = MockServer::start().await;
    let quiz = json!({
        "questions": [
            {
                "id": 1,
                "type": "multiple-choice",
                "text": "He ___ finished his homework.",
                "options": ["have", "has", "had been"],
                "correctAnswerIndex": 1,
                "explanation": "Third person singular uses 'has'."
            },
            {
                "id": 2,
                "type": "multiple-choice",
                "text": "They ___ in London since 2010.",
                "options": ["live", "have lived"],
                "correctAnswerIndex": 1,
                "explanation": "Present perfect with 'since'."
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("Present Perfect"))
        .and(body_string_contains("\"responseMimeType\":\"application/json\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text(&quiz.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.uri());

    lexiquiz()
        .current_dir(dir.path())
        .args(["quiz", "--topic", "Present Perfect", "--count", "5", "--config"])
        .arg(&config)
        .write_stdin("2\n1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/2"))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Incorrect. Answer: have lived"))
        .stdout(predicate::str::contains("Score: 1/2 (50%)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn explain_prints_model_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_text("Articles: use 'a' before consonant sounds.")),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.uri());

    lexiquiz()
        .args(["explain", "Articles", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Articles"))
        .stdout(predicate::str::contains("consonant sounds"));
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_leaves_quiz_in_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.uri());

    lexiquiz()
        .args(["quiz", "--mode", "vocabulary", "--direction", "en-pl", "--config"])
        .arg(&config)
        .write_stdin("y\nn\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Could not generate the quiz"))
        .stderr(predicate::str::contains("backend exploded"));
}

#[tokio::test(flavor = "multi_thread")]
async fn writing_flow_prints_scores() {
    let server = MockServer::start().await;
    let feedback = json!({
        "overallScore": 64,
        "grammarScore": 60,
        "vocabularyScore": 70,
        "relevanceScore": 75,
        "generalFeedback": "Clear ideas, some tense errors.",
        "corrections": []
    });

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Student Text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text(&feedback.to_string())))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("writing topic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("\"A day at the sea\"")))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.uri());

    lexiquiz()
        .args(["write", "--length", "short", "--config"])
        .arg(&config)
        .write_stdin("Last summer we goes to the sea with friends.\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Topic: A day at the sea"))
        .stdout(predicate::str::contains("Clear ideas"))
        .stdout(predicate::str::contains("No corrections."));
}
