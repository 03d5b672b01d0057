//! Type-dispatched mutation operators.
//!
//! The operator set for a pattern is a pure function of its type: one
//! static table, no branching scattered through the engine. New pattern
//! types get a new table entry, nothing else.

mod css_ops;
mod js_ops;

use rand::Rng;
use tracing::trace;

use petri_core::models::{MutationOperator, OperatorKind};
use petri_core::pattern::{PatternContent, PatternType};

static ANIMATION_OPS: [MutationOperator; 3] = [
    MutationOperator {
        name: "add_transition",
        kind: OperatorKind::Css,
        weight: 1.0,
    },
    MutationOperator {
        name: "add_keyframe",
        kind: OperatorKind::Css,
        weight: 1.0,
    },
    MutationOperator {
        name: "modify_timing",
        kind: OperatorKind::Css,
        weight: 0.8,
    },
];

static LAYOUT_OPS: [MutationOperator; 3] = [
    MutationOperator {
        name: "adjust_grid",
        kind: OperatorKind::Css,
        weight: 1.0,
    },
    MutationOperator {
        name: "modify_flexbox",
        kind: OperatorKind::Css,
        weight: 1.0,
    },
    MutationOperator {
        name: "update_positioning",
        kind: OperatorKind::Css,
        weight: 0.6,
    },
];

static INTERACTION_OPS: [MutationOperator; 3] = [
    MutationOperator {
        name: "add_event_listener",
        kind: OperatorKind::Js,
        weight: 1.0,
    },
    MutationOperator {
        name: "enhance_controls",
        kind: OperatorKind::Js,
        weight: 0.8,
    },
    MutationOperator {
        name: "add_feedback",
        kind: OperatorKind::Js,
        weight: 1.0,
    },
];

static STYLE_OPS: [MutationOperator; 3] = [
    MutationOperator {
        name: "update_colors",
        kind: OperatorKind::Css,
        weight: 1.0,
    },
    MutationOperator {
        name: "modify_typography",
        kind: OperatorKind::Css,
        weight: 0.8,
    },
    MutationOperator {
        name: "enhance_visuals",
        kind: OperatorKind::Css,
        weight: 1.0,
    },
];

static GAME_MECHANIC_OPS: [MutationOperator; 4] = [
    MutationOperator {
        name: "add_scoring",
        kind: OperatorKind::Js,
        weight: 1.0,
    },
    MutationOperator {
        name: "enhance_collision",
        kind: OperatorKind::Js,
        weight: 1.0,
    },
    MutationOperator {
        name: "add_powerup",
        kind: OperatorKind::Js,
        weight: 0.7,
    },
    MutationOperator {
        name: "add_obstacle",
        kind: OperatorKind::Js,
        weight: 0.7,
    },
];

/// The operator set for a pattern type.
pub fn operators_for(pattern_type: PatternType) -> &'static [MutationOperator] {
    match pattern_type {
        PatternType::Animation => &ANIMATION_OPS,
        PatternType::Layout => &LAYOUT_OPS,
        PatternType::Interaction => &INTERACTION_OPS,
        PatternType::Style => &STYLE_OPS,
        PatternType::GameMechanic => &GAME_MECHANIC_OPS,
    }
}

/// Draw one operator, weighted, from a set.
pub fn draw_operator<R: Rng>(
    operators: &'static [MutationOperator],
    rng: &mut R,
) -> &'static MutationOperator {
    let total: f64 = operators.iter().map(|o| o.weight).sum();
    let mut roll = rng.gen_range(0.0..total.max(f64::MIN_POSITIVE));
    for op in operators {
        if roll < op.weight {
            return op;
        }
        roll -= op.weight;
    }
    &operators[operators.len() - 1]
}

/// Apply one mutation operator to a content copy.
///
/// Every operator performs a localized, syntactically scoped edit to its
/// block. Returns `None` when the edit would leave the html body empty;
/// the caller keeps the pre-mutation individual in that case.
pub fn apply<R: Rng>(
    operator: &MutationOperator,
    content: &PatternContent,
    rng: &mut R,
) -> Option<PatternContent> {
    let mut mutated = content.clone();
    match operator.name {
        "add_transition" => css_ops::add_transition(&mut mutated, rng),
        "add_keyframe" => css_ops::add_keyframe(&mut mutated, rng),
        "modify_timing" => css_ops::modify_timing(&mut mutated, rng),
        "adjust_grid" => css_ops::adjust_grid(&mut mutated, rng),
        "modify_flexbox" => css_ops::modify_flexbox(&mut mutated, rng),
        "update_positioning" => css_ops::update_positioning(&mut mutated, rng),
        "update_colors" => css_ops::update_colors(&mut mutated, rng),
        "modify_typography" => css_ops::modify_typography(&mut mutated, rng),
        "enhance_visuals" => css_ops::enhance_visuals(&mut mutated, rng),
        "add_event_listener" => js_ops::add_event_listener(&mut mutated, rng),
        "enhance_controls" => js_ops::enhance_controls(&mut mutated, rng),
        "add_feedback" => js_ops::add_feedback(&mut mutated, rng),
        "add_scoring" => js_ops::add_scoring(&mut mutated),
        "enhance_collision" => js_ops::enhance_collision(&mut mutated),
        "add_powerup" => js_ops::add_powerup(&mut mutated, rng),
        "add_obstacle" => js_ops::add_obstacle(&mut mutated, rng),
        other => {
            trace!(operator = other, "unknown operator, skipping");
            return None;
        }
    }

    if mutated.html.trim().is_empty() {
        return None;
    }
    Some(mutated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_type_has_operators() {
        for ty in PatternType::ALL {
            assert!(!operators_for(ty).is_empty());
        }
    }

    #[test]
    fn animation_operators_are_css() {
        assert!(operators_for(PatternType::Animation)
            .iter()
            .all(|o| o.kind == OperatorKind::Css));
    }

    #[test]
    fn game_mechanic_operators_are_js() {
        let ops = operators_for(PatternType::GameMechanic);
        assert_eq!(ops.len(), 4);
        assert!(ops.iter().all(|o| o.kind == OperatorKind::Js));
    }

    #[test]
    fn draw_respects_the_operator_set() {
        let mut rng = StdRng::seed_from_u64(11);
        let ops = operators_for(PatternType::Layout);
        for _ in 0..100 {
            let drawn = draw_operator(ops, &mut rng);
            assert!(ops.iter().any(|o| o.name == drawn.name));
        }
    }

    #[test]
    fn all_operators_preserve_nonempty_html() {
        let content = PatternContent {
            html: "<div class=\"target\">x</div>".to_string(),
            css: ".target { color: red; transition: all 0.3s; }".to_string(),
            js: "let n = 0;".to_string(),
            context: String::new(),
            metadata: Default::default(),
        };
        let mut rng = StdRng::seed_from_u64(5);
        for ty in PatternType::ALL {
            for op in operators_for(ty) {
                let mutated = apply(op, &content, &mut rng)
                    .unwrap_or_else(|| panic!("{} produced empty output", op.name));
                assert!(!mutated.html.trim().is_empty(), "{}", op.name);
            }
        }
    }

    #[test]
    fn css_operators_change_the_css_block() {
        let content = PatternContent {
            html: "<div>x</div>".to_string(),
            css: ".x { color: red; }".to_string(),
            js: String::new(),
            context: String::new(),
            metadata: Default::default(),
        };
        let mut rng = StdRng::seed_from_u64(9);
        for op in operators_for(PatternType::Style) {
            let mutated = apply(op, &content, &mut rng).unwrap();
            assert_ne!(mutated.css, content.css, "{}", op.name);
            assert_eq!(mutated.html, content.html, "{}", op.name);
        }
    }

    #[test]
    fn js_operators_change_the_js_block() {
        let content = PatternContent {
            html: "<canvas></canvas>".to_string(),
            css: String::new(),
            js: "let score = 0;".to_string(),
            context: String::new(),
            metadata: Default::default(),
        };
        let mut rng = StdRng::seed_from_u64(9);
        for op in operators_for(PatternType::GameMechanic) {
            let mutated = apply(op, &content, &mut rng).unwrap();
            assert_ne!(mutated.js, content.js, "{}", op.name);
        }
    }
}
