pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod ner;
pub mod pipeline;
pub mod stages;

pub use error::{MarkerKind, PipelineError, ValidationIssue};
pub use heuristics::BoundaryConfig;
pub use io::{
    HumanSummary, SessionMetadata, SessionOutput, list_protocol_files, load_protocol_file,
    load_roster_file,
};
pub use models::{ActiveRosterEntry, EntitySpan, ProtocolRecord, RosterTables, SpeakerAggregate};
pub use ner::{
    AnthropicClient, AnthropicConfig, EntityRecognizer, LlmRecognizer, LlmRecognizerConfig,
    PatternRecognizer,
};
pub use pipeline::{BatchSummary, OutputOptions, Pipeline, PipelineConfig, SegmentationResult};
pub use stages::{
    AggregateConfig, ColonPolicy, MatchConfig, NormalizeConfig, RosterCache, UnresolvedPolicy,
    join_roster,
};
