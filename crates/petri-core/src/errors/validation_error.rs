/// Staging-gate rejections for candidate patterns.
///
/// Not retried; surfaced to the caller with the offending field(s).
/// A rejected candidate is never partially stored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unrecognized pattern type: {given}")]
    UnknownType { given: String },

    #[error("candidate pattern invalid: missing or empty field(s) [{}]", fields.join(", "))]
    InvalidFields { fields: Vec<String> },

    #[error("effectiveness score {value} outside [0, 1]")]
    ScoreOutOfRange { value: f64 },
}
