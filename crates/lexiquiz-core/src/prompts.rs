//! Prompt text for each generative operation.

use crate::model::{Difficulty, QuestionCount, VocabDirection, WritingLength};

/// System instruction for the tutor chat.
pub const TUTOR_SYSTEM_PROMPT: &str = "You are an expert English grammar tutor named 'Prof. Gemini'. You explain concepts clearly, provide examples, and correct user mistakes gently. Keep responses concise but helpful. Use Markdown for formatting.";

/// System instruction for every structured (JSON) request.
pub const JSON_SYSTEM_PROMPT: &str =
    "You are an English-learning content generator. Respond ONLY with JSON matching the requested schema.";

pub fn grammar_quiz(topic: &str, difficulty: Difficulty, count: QuestionCount) -> String {
    format!(
        "Generate a multiple-choice quiz with {count} questions about English Grammar specifically focusing on: {topic}.\n\
         Difficulty level: {difficulty}.\n\
         Return valid JSON with questions, options, correct answer index (0-3), and a brief explanation.\n\
         Each question must be of type 'multiple-choice'."
    )
}

pub fn vocabulary_quiz(
    direction: VocabDirection,
    difficulty: Difficulty,
    count: QuestionCount,
) -> String {
    let source = direction.source_language();
    let target = direction.target_language();
    format!(
        "Generate a vocabulary practice list with {count} words/phrases to translate from {source} to {target}.\n\
         Difficulty: {difficulty}.\n\
         Include a mix of verbs, nouns, and adjectives.\n\
         \n\
         CRITICAL RULES:\n\
         1. If the TARGET word is an English VERB (direction PL->EN), set type to 'verb-forms' and provide [Base, Past, Participle] in 'verbForms'.\n\
         2. Otherwise, set type to 'text-input'.\n\
         3. 'correctAnswer' should be the main translation.\n\
         4. 'acceptableAnswers' should be a list of valid synonyms."
    )
}

pub fn writing_evaluation(topic: &str, text: &str, length: WritingLength) -> String {
    format!(
        "Evaluate the following English text written by a student.\n\
         \n\
         Topic: \"{topic}\"\n\
         Target Length: {length}\n\
         Student Text: \"{text}\"\n\
         \n\
         Analyze the text for:\n\
         1. Grammar accuracy\n\
         2. Vocabulary variety and appropriateness\n\
         3. Relevance to the topic and adherence to length\n\
         \n\
         Provide a JSON response with scores (0-100), feedback, and specific corrections.",
        length = length.label()
    )
}

pub fn explanation(topic_name: &str) -> String {
    format!(
        "Provide a concise but comprehensive explanation of '{topic_name}' in English Grammar. \
         Include: 1. When to use it (Rules). 2. Common structures/patterns. 3. Two varied examples. \
         Return as plain text with simple markdown formatting."
    )
}

pub fn writing_topic(difficulty: Difficulty) -> String {
    format!(
        "Generate a creative and engaging writing topic for an English student at {difficulty} level.\n\
         The topic should be interesting, open-ended, and suitable for a short essay or paragraph.\n\
         Examples: \"Describe your ideal weekend\", \"Discuss the advantages of living in a city\", \
         \"What would you do if you found a wallet?\".\n\
         Return ONLY the topic string, no other text."
    )
}
