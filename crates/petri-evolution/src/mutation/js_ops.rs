//! JS mutation operators. Each appends a small self-contained snippet;
//! names are suffixed so repeated application never redeclares a binding.

use rand::Rng;

use petri_core::pattern::PatternContent;

const EVENTS: [&str; 4] = ["click", "mouseover", "keydown", "touchstart"];
const KEYS: [&str; 4] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];

fn append_snippet(js: &mut String, snippet: &str) {
    if !js.is_empty() && !js.ends_with('\n') {
        js.push('\n');
    }
    js.push_str(snippet);
}

/// Counter derived from current length so successive edits get distinct
/// identifiers without threading extra state.
fn suffix(js: &str) -> usize {
    js.len()
}

pub fn add_event_listener<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let event = EVENTS[rng.gen_range(0..EVENTS.len())];
    let n = suffix(&content.js);
    append_snippet(
        &mut content.js,
        &format!(
            "document.addEventListener('{event}', (e{n}) => {{\n  \
             e{n}.target.classList.toggle('active');\n}});"
        ),
    );
}

pub fn enhance_controls<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let key = KEYS[rng.gen_range(0..KEYS.len())];
    let n = suffix(&content.js);
    append_snippet(
        &mut content.js,
        &format!(
            "document.addEventListener('keydown', (e{n}) => {{\n  \
             if (e{n}.key === '{key}') {{ e{n}.preventDefault(); }}\n}});"
        ),
    );
}

pub fn add_feedback<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let duration = 100 + rng.gen_range(0..5) * 50;
    let n = suffix(&content.js);
    append_snippet(
        &mut content.js,
        &format!(
            "function pulse{n}(el) {{\n  \
             el.classList.add('pulse');\n  \
             setTimeout(() => el.classList.remove('pulse'), {duration});\n}}"
        ),
    );
}

pub fn add_scoring(content: &mut PatternContent) {
    let n = suffix(&content.js);
    append_snippet(
        &mut content.js,
        &format!(
            "let score{n} = 0;\n\
             function addScore{n}(points) {{\n  \
             score{n} += points;\n}}"
        ),
    );
}

pub fn enhance_collision(content: &mut PatternContent) {
    let n = suffix(&content.js);
    append_snippet(
        &mut content.js,
        &format!(
            "function collides{n}(a, b) {{\n  \
             return a.x < b.x + b.w && a.x + a.w > b.x &&\n         \
             a.y < b.y + b.h && a.y + a.h > b.y;\n}}"
        ),
    );
}

pub fn add_powerup<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let boost = rng.gen_range(2..=5);
    let n = suffix(&content.js);
    append_snippet(
        &mut content.js,
        &format!(
            "const powerup{n} = {{ active: false, multiplier: {boost} }};\n\
             function activatePowerup{n}() {{\n  \
             powerup{n}.active = true;\n}}"
        ),
    );
}

pub fn add_obstacle<R: Rng>(content: &mut PatternContent, rng: &mut R) {
    let speed = rng.gen_range(1..=4);
    let n = suffix(&content.js);
    append_snippet(
        &mut content.js,
        &format!(
            "const obstacle{n} = {{ x: 0, y: 0, w: 16, h: 16, vx: {speed} }};\n\
             function moveObstacle{n}() {{\n  \
             obstacle{n}.x += obstacle{n}.vx;\n}}"
        ),
    );
}
