pub mod markers;
pub mod similarity;
pub mod speaker_rules;

pub use markers::*;
pub use similarity::*;
pub use speaker_rules::*;

/// Context windows used when judging person mentions
#[derive(Debug, Clone)]
pub struct BoundaryConfig {
    /// Characters after a name searched for a party/constituency annotation
    pub context_window_chars: usize,
    /// Characters after a name searched when capturing the party annotation
    pub party_window_chars: usize,
    /// Characters kept before the name in a mark's diagnostic context
    pub context_before_chars: usize,
    /// Characters kept after the name in a mark's diagnostic context
    pub context_after_chars: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            context_window_chars: 30,
            party_window_chars: 15,
            context_before_chars: 10,
            context_after_chars: 15,
        }
    }
}
