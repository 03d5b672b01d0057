//! Deterministic structural feature extraction.
//!
//! A cheap pre-filter used before the embedding similarity path and as the
//! coverage factor in evolution fitness. Pure string/regex counting; never
//! touches the network and never suspends.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structural summary of a pattern's html body (including inline blocks).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternFeatures {
    /// Opening tags, any element.
    pub element_count: usize,
    /// CSS rule bodies (`{ ... }` pairs) across inline `<style>` blocks.
    pub style_rule_count: usize,
    /// Function definitions (declarations and arrow functions) across
    /// inline `<script>` blocks.
    pub script_function_count: usize,
    /// `addEventListener` / `on*=` hooks.
    pub event_hook_count: usize,
    /// `@keyframes` blocks.
    pub keyframe_count: usize,
    /// `transition` properties.
    pub transition_count: usize,
}

fn element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[a-zA-Z][a-zA-Z0-9-]*").unwrap())
}

fn style_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").unwrap())
}

fn script_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script[^>]*>(.*?)</script>").unwrap())
}

fn function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"function\s+\w+|=>\s*\{|=>\s*[a-zA-Z(]").unwrap())
}

fn event_hook_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"addEventListener\s*\(|\son[a-z]+\s*="#).unwrap())
}

/// Extract the structural summary from an html string.
///
/// Deterministic: identical input always yields identical features.
pub fn extract_pattern_features(html: &str) -> PatternFeatures {
    let mut style_text = String::new();
    for cap in style_block_re().captures_iter(html) {
        style_text.push_str(&cap[1]);
    }

    let mut script_text = String::new();
    for cap in script_block_re().captures_iter(html) {
        script_text.push_str(&cap[1]);
    }

    PatternFeatures {
        element_count: element_re().find_iter(html).count(),
        style_rule_count: style_text.matches('{').count(),
        script_function_count: function_re().find_iter(&script_text).count(),
        event_hook_count: event_hook_re().find_iter(html).count(),
        keyframe_count: style_text.matches("@keyframes").count(),
        transition_count: style_text.matches("transition").count(),
    }
}

impl PatternFeatures {
    /// How much of `reference`'s structure this summary covers, in [0, 1].
    ///
    /// Per dimension where the reference is non-zero: `min(self, ref) / ref`,
    /// averaged. A reference with no structure at all is trivially covered.
    /// Monotone: raising any own count never lowers coverage.
    pub fn coverage_of(&self, reference: &PatternFeatures) -> f64 {
        let pairs = [
            (self.element_count, reference.element_count),
            (self.style_rule_count, reference.style_rule_count),
            (self.script_function_count, reference.script_function_count),
            (self.event_hook_count, reference.event_hook_count),
            (self.keyframe_count, reference.keyframe_count),
            (self.transition_count, reference.transition_count),
        ];

        let mut sum = 0.0;
        let mut dims = 0usize;
        for (own, reference) in pairs {
            if reference > 0 {
                sum += own.min(reference) as f64 / reference as f64;
                dims += 1;
            }
        }

        if dims == 0 {
            1.0
        } else {
            sum / dims as f64
        }
    }
}
