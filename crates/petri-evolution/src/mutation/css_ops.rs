//! CSS mutation operators. Each one appends or rewrites a small,
//! self-contained rule; none of them touch the html body.

use rand::Rng;

use petri_core::pattern::PatternContent;

const TIMING_FUNCTIONS: [&str; 4] = ["ease", "ease-in-out", "linear", "cubic-bezier(0.4, 0, 0.2, 1)"];
const TRANSITION_PROPS: [&str; 4] = ["opacity", "transform", "background-color", "all"];
const COLORS: [&str; 6] = ["#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c"];
const FONT_STACKS: [&str; 3] = [
    "system-ui, sans-serif",
    "Georgia, serif",
    "'Courier New', monospace",
];

fn append_rule(css: &mut String, rule: &str) {
    if !css.is_empty() && !css.ends_with('\n') {
        css.push('\n');
    }
    css.push_str(rule);
}

pub fn add_transition<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let prop = TRANSITION_PROPS[rng.gen_range(0..TRANSITION_PROPS.len())];
    let timing = TIMING_FUNCTIONS[rng.gen_range(0..TIMING_FUNCTIONS.len())];
    let duration = 0.1 + rng.gen_range(0..8) as f64 * 0.1;
    append_rule(
        &mut content.css,
        &format!(".evolved {{ transition: {prop} {duration:.1}s {timing}; }}"),
    );
}

pub fn add_keyframe<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let name = format!("evo-fade-{}", rng.gen_range(0..1000));
    let from = rng.gen_range(0..5) as f64 * 0.1;
    append_rule(
        &mut content.css,
        &format!(
            "@keyframes {name} {{ from {{ opacity: {from:.1}; }} to {{ opacity: 1; }} }}\n\
             .evolved {{ animation: {name} 0.6s ease both; }}"
        ),
    );
}

/// Rewrite the first duration literal in place when one exists, otherwise
/// introduce a timed transition.
pub fn modify_timing<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let replacement = format!("{:.1}s", 0.1 + rng.gen_range(0..10) as f64 * 0.1);
    if let Some((start, end)) = first_duration(&content.css) {
        content.css.replace_range(start..end, &replacement);
        return;
    }
    let timing = TIMING_FUNCTIONS[rng.gen_range(0..TIMING_FUNCTIONS.len())];
    append_rule(
        &mut content.css,
        &format!(".evolved {{ transition: all {replacement} {timing}; }}"),
    );
}

pub fn adjust_grid<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let columns = rng.gen_range(2..=6);
    let gap = rng.gen_range(1..=4) * 4;
    append_rule(
        &mut content.css,
        &format!(
            ".evolved {{ display: grid; grid-template-columns: repeat({columns}, 1fr); gap: {gap}px; }}"
        ),
    );
}

pub fn modify_flexbox<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let justify = ["flex-start", "center", "space-between", "space-around"]
        [rng.gen_range(0..4)];
    let align = ["stretch", "center", "flex-end"][rng.gen_range(0..3)];
    append_rule(
        &mut content.css,
        &format!(".evolved {{ display: flex; justify-content: {justify}; align-items: {align}; }}"),
    );
}

pub fn update_positioning<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let offset = rng.gen_range(0..=24);
    append_rule(
        &mut content.css,
        &format!(".evolved {{ position: relative; top: {offset}px; }}"),
    );
}

pub fn update_colors<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let fg = COLORS[rng.gen_range(0..COLORS.len())];
    let bg = COLORS[rng.gen_range(0..COLORS.len())];
    append_rule(
        &mut content.css,
        &format!(".evolved {{ color: {fg}; background-color: {bg}; }}"),
    );
}

pub fn modify_typography<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let stack = FONT_STACKS[rng.gen_range(0..FONT_STACKS.len())];
    let size = 12 + rng.gen_range(0..6) * 2;
    append_rule(
        &mut content.css,
        &format!(".evolved {{ font-family: {stack}; font-size: {size}px; }}"),
    );
}

pub fn enhance_visuals<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let radius = rng.gen_range(2..=16);
    let blur = rng.gen_range(4..=20);
    append_rule(
        &mut content.css,
        &format!(
            ".evolved {{ border-radius: {radius}px; box-shadow: 0 2px {blur}px rgba(0, 0, 0, 0.2); }}"
        ),
    );
}

/// Byte range of the first `<digits>[.<digits>]s` duration literal.
fn first_duration(css: &str) -> Option<(usize, usize)> {
    let bytes = css.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            if i < bytes.len()
                && bytes[i] == b's'
                && (i + 1 == bytes.len() || !bytes[i + 1].is_ascii_alphanumeric())
            {
                return Some((start, i + 1));
            }
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn content(css: &str) -> PatternContent {
        PatternContent {
            html: "<div></div>".to_string(),
            css: css.to_string(),
            js: String::new(),
            context: String::new(),
            metadata: Default::default(),
        }
    }

    #[test]
    fn first_duration_finds_the_literal() {
        let (s, e) = first_duration(".a { transition: all 0.3s ease; }").unwrap();
        assert_eq!(&".a { transition: all 0.3s ease; }"[s..e], "0.3s");
    }

    #[test]
    fn first_duration_skips_pixel_values() {
        assert!(first_duration(".a { width: 30px; }").is_none());
    }

    #[test]
    fn modify_timing_rewrites_existing_durations() {
        let mut c = content(".a { transition: all 0.3s ease; }");
        let mut rng = StdRng::seed_from_u64(2);
        modify_timing(&mut c, &mut rng);
        assert!(c.css.contains("transition: all"));
        assert!(c.css.contains("ease"));
    }

    #[test]
    fn append_rule_keeps_rules_on_separate_lines() {
        let mut css = ".a {}".to_string();
        append_rule(&mut css, ".b {}");
        assert_eq!(css, ".a {}\n.b {}");
    }

    #[test]
    fn add_keyframe_declares_and_uses_an_animation() {
        let mut c = content("");
        let mut rng = StdRng::seed_from_u64(4);
        add_keyframe(&mut c, &mut rng);
        assert!(c.css.contains("@keyframes"));
        assert!(c.css.contains("animation:"));
    }
}
