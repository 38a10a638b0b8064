use std::collections::HashMap;

use tracing::{debug, info};

use crate::models::{ResolvedSegment, SpeakerAggregate};

/// What to keep of a speaker's text when it contains colons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColonPolicy {
    /// Keep only the text between the first and second colon. Anything after
    /// a second colon is lost; this matches the established output.
    #[default]
    SecondFieldOnly,
    /// Keep everything after the first colon
    DropFirstField,
}

/// What to do with segments no roster name matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// One aggregate per raw label, flagged `resolved: false`
    #[default]
    Retain,
    Drop,
}

/// Configuration for Stage 3 aggregation
#[derive(Debug, Clone, Default)]
pub struct AggregateConfig {
    pub colon_policy: ColonPolicy,
    pub unresolved: UnresolvedPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Legislator(String),
    RawLabel(String),
}

#[derive(Debug)]
struct Accumulator<'a> {
    speaker_id: String,
    speaker_name: String,
    resolved: bool,
    texts: Vec<&'a str>,
    party: Option<String>,
}

/// Execute Stage 3: per-speaker aggregation
///
/// Groups segments by legislator (or by raw label when unresolved), keeping
/// document order both across groups (by first appearance) and within them.
pub fn aggregate(segments: &[ResolvedSegment], config: &AggregateConfig) -> Vec<SpeakerAggregate> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Accumulator> = Vec::new();
    let mut dropped = 0usize;

    for resolved in segments {
        let segment = &resolved.segment;
        let key = match &resolved.matched_legislator_id {
            Some(id) => GroupKey::Legislator(id.clone()),
            None if config.unresolved == UnresolvedPolicy::Drop => {
                dropped += 1;
                continue;
            }
            None => GroupKey::RawLabel(segment.raw_speaker_label.clone()),
        };

        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Accumulator {
                speaker_id: resolved
                    .matched_legislator_id
                    .clone()
                    .unwrap_or_else(|| segment.raw_speaker_label.clone()),
                speaker_name: resolved
                    .matched_name
                    .clone()
                    .unwrap_or_else(|| segment.raw_speaker_label.clone()),
                resolved: resolved.is_resolved(),
                texts: Vec::new(),
                party: None,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.texts.push(&segment.text);
        if group.party.is_none() {
            group.party = segment.party.clone();
        }
    }

    if dropped > 0 {
        info!("Dropped {} unresolved segments", dropped);
    }

    let aggregates: Vec<SpeakerAggregate> = groups
        .into_iter()
        .map(|group| {
            let joined = group.texts.join(" ");
            SpeakerAggregate {
                word_count: word_count(&joined),
                full_text: strip_salutation(&joined, config.colon_policy),
                speaker_id: group.speaker_id,
                speaker_name: group.speaker_name,
                resolved: group.resolved,
                segment_count: group.texts.len(),
                party: group.party,
            }
        })
        .collect();

    debug!("Aggregated {} segments into {} speakers", segments.len(), aggregates.len());
    aggregates
}

/// Number of whitespace-delimited tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Remove what precedes the first colon, a leftover salutation or
/// self-introduction. Text without a colon is kept whole.
pub fn strip_salutation(text: &str, policy: ColonPolicy) -> String {
    let Some((_, rest)) = text.split_once(':') else {
        return text.trim().to_string();
    };
    let kept = match policy {
        ColonPolicy::SecondFieldOnly => rest.split(':').next().unwrap_or(rest),
        ColonPolicy::DropFirstField => rest,
    };
    kept.trim().to_string()
}
