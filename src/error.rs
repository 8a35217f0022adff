use std::fmt;

/// Errors surfaced by the generator core. Recoverable random-retry failures
/// (packing, room placement) are absorbed internally up to a fixed retry
/// bound before they ever reach this enum.
#[derive(Debug)]
pub enum GeneratorError {
    /// A dice expression could not be parsed.
    DiceParse(String),
    /// A theme referenced an id the `ThemeStore` doesn't know about.
    ThemeResolution { id: String },
    /// Generator invariants could not be satisfied (empty walkable set,
    /// impossible size window).
    DegenerateGeneration,
    /// `DungeonGenerator` found no connection back to the previous zone.
    MissingReturnDoor,
    /// `BlocksGenerator` placed zero rectangles after its retry bound, with
    /// `n >= 1` requested. Not fatal — callers may retry with relaxed
    /// constraints.
    QuotaExhausted,
    /// Theme XML failed to parse.
    ThemeXml(String),
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::DiceParse(expr) => write!(f, "malformed dice expression: {expr}"),
            GeneratorError::ThemeResolution { id } => write!(f, "unresolved theme id: {id}"),
            GeneratorError::DegenerateGeneration => {
                write!(f, "generator invariants could not be satisfied")
            }
            GeneratorError::MissingReturnDoor => {
                write!(f, "no connection back to the previous zone")
            }
            GeneratorError::QuotaExhausted => {
                write!(f, "rectangle placement exhausted its retry budget")
            }
            GeneratorError::ThemeXml(msg) => write!(f, "theme XML error: {msg}"),
        }
    }
}

impl std::error::Error for GeneratorError {}

pub type Result<T> = std::result::Result<T, GeneratorError>;
