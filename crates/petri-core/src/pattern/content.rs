use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::PetriResult;

/// The renderable body of a pattern. `html` is the only mandatory part;
/// `css`/`js` may live inline inside `html` or in their own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PatternContent {
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
    /// Free-text usage context ("hero section hover card", ...).
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl PatternContent {
    /// Content with only an html body.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }

    /// True when the html body is empty or whitespace.
    pub fn html_is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }

    /// blake3 hash of the serialized content. Keys the embedding cache and
    /// the deduplicated embedding rows, so any content change produces a
    /// new hash and forces a re-embed.
    pub fn compute_hash(&self) -> PetriResult<String> {
        let serialized = serde_json::to_string(self)?;
        Ok(blake3::hash(serialized.as_bytes()).to_hex().to_string())
    }

    /// The text handed to the embedding provider: html plus the separate
    /// css/js blocks and the usage context, concatenated.
    pub fn embedding_text(&self) -> String {
        let mut text = String::with_capacity(
            self.html.len() + self.css.len() + self.js.len() + self.context.len() + 3,
        );
        text.push_str(&self.html);
        if !self.css.is_empty() {
            text.push('\n');
            text.push_str(&self.css);
        }
        if !self.js.is_empty() {
            text.push('\n');
            text.push_str(&self.js);
        }
        if !self.context.is_empty() {
            text.push('\n');
            text.push_str(&self.context);
        }
        text
    }
}
