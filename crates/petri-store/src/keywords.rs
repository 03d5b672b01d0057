//! Prompt keyword extraction for audit rows.
//!
//! Lower-cased alphanumeric tokens, stop-words removed, minimum length 3,
//! de-duplicated in first-seen order.

use petri_core::constants::MIN_KEYWORD_LENGTH;

/// Common English stop-words dropped from prompt keywords.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "you", "your", "are", "was", "were", "has",
    "have", "had", "can", "could", "will", "would", "should", "but", "not", "all", "any", "its",
    "into", "from", "make", "made", "use", "using", "used", "when", "where", "which", "what",
    "how", "why", "them", "then", "than", "some", "more", "most", "also", "just", "like", "very",
    "want", "need", "please", "add", "get",
];

/// Extract keywords from a prompt.
pub fn extract_keywords(prompt: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for raw in prompt.split(|c: char| !c.is_alphanumeric()) {
        if raw.len() < MIN_KEYWORD_LENGTH {
            continue;
        }
        let token = raw.to_lowercase();
        if STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        if !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen
}
