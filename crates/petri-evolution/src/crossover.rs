//! Block crossover: two parents exchange one randomly chosen
//! HTML/CSS/JS sub-block.

use rand::Rng;

use petri_core::pattern::PatternContent;

/// Which sub-block a crossover exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Css,
    Js,
    StyleTag,
}

/// Combine two parents by swapping one block, returning the offspring
/// content (first parent's perspective). The html body always stays
/// non-empty: block swaps never remove the body itself.
pub fn crossover<R: Rng>(a: &PatternContent, b: &PatternContent, rng: &mut R) -> PatternContent {
    let block = match rng.gen_range(0..3) {
        0 => Block::Css,
        1 => Block::Js,
        _ => Block::StyleTag,
    };

    let mut child = a.clone();
    match block {
        Block::Css => child.css = b.css.clone(),
        Block::Js => child.js = b.js.clone(),
        Block::StyleTag => {
            match (style_tag_inner(&a.html), style_tag_inner(&b.html)) {
                (Some((start, end)), Some((b_start, b_end))) => {
                    let donor = b.html[b_start..b_end].to_string();
                    child.html.replace_range(start..end, &donor);
                }
                // No inline <style> on one side: fall back to the css field.
                _ => child.css = b.css.clone(),
            }
        }
    }
    child
}

/// Byte range of the first `<style>` tag's inner content, if any.
fn style_tag_inner(html: &str) -> Option<(usize, usize)> {
    let open = html.find("<style")?;
    let open_end = html[open..].find('>')? + open + 1;
    let close = html[open_end..].find("</style>")? + open_end;
    Some((open_end, close))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn content(html: &str, css: &str, js: &str) -> PatternContent {
        PatternContent {
            html: html.to_string(),
            css: css.to_string(),
            js: js.to_string(),
            context: String::new(),
            metadata: Default::default(),
        }
    }

    #[test]
    fn offspring_html_is_never_empty() {
        let a = content("<div>a</div>", ".a {}", "fa();");
        let b = content("<div>b</div>", ".b {}", "fb();");
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let child = crossover(&a, &b, &mut rng);
            assert!(!child.html.trim().is_empty());
        }
    }

    #[test]
    fn offspring_takes_one_block_from_the_donor() {
        let a = content("<div>a</div>", ".a {}", "fa();");
        let b = content("<div>b</div>", ".b {}", "fb();");
        let mut rng = StdRng::seed_from_u64(3);
        let mut saw_donor_block = false;
        for _ in 0..50 {
            let child = crossover(&a, &b, &mut rng);
            if child.css == b.css || child.js == b.js {
                saw_donor_block = true;
            }
            // The html body itself stays the recipient's.
            assert!(child.html.contains("<div>a</div>"));
        }
        assert!(saw_donor_block);
    }

    #[test]
    fn style_tag_contents_are_swapped_when_both_have_one() {
        let a = content(
            "<div><style>.a { color: red; }</style>a</div>",
            "",
            "",
        );
        let b = content(
            "<div><style>.b { color: blue; }</style>b</div>",
            "",
            "",
        );
        let mut rng = StdRng::seed_from_u64(1);
        let mut saw_swap = false;
        for _ in 0..50 {
            let child = crossover(&a, &b, &mut rng);
            if child.html.contains("color: blue") {
                saw_swap = true;
                assert!(child.html.contains("a</div>"));
            }
        }
        assert!(saw_swap);
    }

    #[test]
    fn style_tag_inner_finds_the_body() {
        let html = "<div><style>.x {}</style></div>";
        let (start, end) = style_tag_inner(html).unwrap();
        assert_eq!(&html[start..end], ".x {}");
    }
}
