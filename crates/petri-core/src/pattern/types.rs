use std::fmt;

use serde::{Deserialize, Serialize};

/// The five pattern families. Fixed at creation; drives which mutation
/// operators apply during evolution (static lookup, no scattered branching).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Animation,
    Layout,
    Interaction,
    Style,
    GameMechanic,
}

impl PatternType {
    /// All recognized types, in declaration order.
    pub const ALL: [PatternType; 5] = [
        PatternType::Animation,
        PatternType::Layout,
        PatternType::Interaction,
        PatternType::Style,
        PatternType::GameMechanic,
    ];

    /// Parse the snake_case wire form. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "animation" => Some(PatternType::Animation),
            "layout" => Some(PatternType::Layout),
            "interaction" => Some(PatternType::Interaction),
            "style" => Some(PatternType::Style),
            "game_mechanic" => Some(PatternType::GameMechanic),
            _ => None,
        }
    }

    /// The snake_case wire form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Animation => "animation",
            PatternType::Layout => "layout",
            PatternType::Interaction => "interaction",
            PatternType::Style => "style",
            PatternType::GameMechanic => "game_mechanic",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_all_variants() {
        for ty in PatternType::ALL {
            assert_eq!(PatternType::parse(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(PatternType::parse("hologram"), None);
        assert_eq!(PatternType::parse(""), None);
        assert_eq!(PatternType::parse("Animation"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&PatternType::GameMechanic).unwrap();
        assert_eq!(json, "\"game_mechanic\"");
    }
}
