use std::collections::HashMap;

use tracing::{debug, warn};

use crate::heuristics::similarity_ratio;
use crate::models::{ActiveRosterEntry, ResolvedSegment, SpeechSegment};

/// Configuration for roster matching
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum similarity ratio for a roster name to count as a match
    pub cutoff: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { cutoff: 0.5 }
    }
}

/// The roster entry a label was matched to
#[derive(Debug, Clone, PartialEq)]
pub struct RosterMatch {
    pub legislator_id: String,
    pub canonical_full_name: String,
    pub score: f64,
}

/// Best-scoring roster entry with a similarity of at least `cutoff`.
///
/// Ties go to the entry that comes first in the roster.
pub fn match_speaker(raw_label: &str, roster: &[ActiveRosterEntry], cutoff: f64) -> Option<RosterMatch> {
    let mut best: Option<(f64, &ActiveRosterEntry)> = None;

    for entry in roster {
        let score = similarity_ratio(raw_label, &entry.canonical_full_name);
        if score < cutoff {
            continue;
        }
        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, entry));
        }
    }

    best.map(|(score, entry)| RosterMatch {
        legislator_id: entry.legislator_id.clone(),
        canonical_full_name: entry.canonical_full_name.clone(),
        score,
    })
}

/// Attach a roster identity to every segment.
///
/// Labels are matched once per call; each label without a match is
/// reported once.
pub fn resolve_segments(
    segments: Vec<SpeechSegment>,
    roster: &[ActiveRosterEntry],
    config: &MatchConfig,
) -> Vec<ResolvedSegment> {
    let mut matches: HashMap<String, Option<RosterMatch>> = HashMap::new();

    segments
        .into_iter()
        .map(|segment| {
            let found = matches
                .entry(segment.raw_speaker_label.clone())
                .or_insert_with(|| {
                    let found = match_speaker(&segment.raw_speaker_label, roster, config.cutoff);
                    match &found {
                        Some(m) => debug!(
                            "Matched {:?} -> {} ({:.2})",
                            segment.raw_speaker_label, m.canonical_full_name, m.score
                        ),
                        None => warn!(
                            "Unresolved speaker {:?}: no roster name at or above cutoff {:.2}",
                            segment.raw_speaker_label, config.cutoff
                        ),
                    }
                    found
                })
                .clone();

            ResolvedSegment {
                segment,
                matched_legislator_id: found.as_ref().map(|m| m.legislator_id.clone()),
                matched_name: found.map(|m| m.canonical_full_name),
            }
        })
        .collect()
}
