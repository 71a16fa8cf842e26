//! JSON response schemas sent with structured requests.
//!
//! Written in plain JSON Schema (lower-case type names). Providers that need
//! a different dialect translate it on the way out.

use serde_json::{json, Value};

pub fn grammar_quiz() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "type": { "type": "string", "enum": ["multiple-choice"] },
                        "text": { "type": "string" },
                        "options": { "type": "array", "items": { "type": "string" } },
                        "correctAnswerIndex": { "type": "integer" },
                        "explanation": { "type": "string" }
                    },
                    "required": ["id", "type", "text", "options", "correctAnswerIndex", "explanation"]
                }
            }
        },
        "required": ["questions"]
    })
}

pub fn vocabulary_quiz() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "type": { "type": "string", "enum": ["text-input", "verb-forms"] },
                        "text": { "type": "string", "description": "The word to translate" },
                        "correctAnswer": { "type": "string" },
                        "acceptableAnswers": { "type": "array", "items": { "type": "string" } },
                        "verbForms": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Only for English verbs: [Base, Past, Participle]"
                        },
                        "explanation": { "type": "string", "description": "Example usage sentence" }
                    },
                    "required": ["id", "type", "text", "correctAnswer", "explanation"]
                }
            }
        },
        "required": ["questions"]
    })
}

pub fn writing_feedback() -> Value {
    json!({
        "type": "object",
        "properties": {
            "overallScore": { "type": "integer" },
            "grammarScore": { "type": "integer" },
            "vocabularyScore": { "type": "integer" },
            "relevanceScore": { "type": "integer" },
            "generalFeedback": { "type": "string" },
            "corrections": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "original": { "type": "string" },
                        "correction": { "type": "string" },
                        "explanation": { "type": "string" }
                    },
                    "required": ["original", "correction", "explanation"]
                }
            }
        },
        "required": [
            "overallScore",
            "grammarScore",
            "vocabularyScore",
            "relevanceScore",
            "generalFeedback",
            "corrections"
        ]
    })
}
