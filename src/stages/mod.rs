pub mod stage0_normalize;
pub mod stage1_boundaries;
pub mod stage2_segments;
pub mod stage3_aggregate;
pub mod stage_roster;
pub mod stage_speaker_match;

pub use stage0_normalize::*;
pub use stage1_boundaries::*;
pub use stage2_segments::*;
pub use stage3_aggregate::*;
pub use stage_roster::*;
pub use stage_speaker_match::*;
