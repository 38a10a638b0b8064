use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::heuristics::BoundaryConfig;
use crate::io::{HumanSummary, SessionMetadata, SessionOutput, load_protocol_file};
use crate::models::{ActiveRosterEntry, BoundaryMark, ProtocolRecord, SpeechSegment};
use crate::ner::EntityRecognizer;
use crate::stages::{
    AggregateConfig, MatchConfig, NormalizationResult, NormalizeConfig, RosterCache, aggregate,
    detect_boundaries, extract_segments, normalize, resolve_segments,
};

/// Configuration for every stage of the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub normalize: NormalizeConfig,
    pub boundary: BoundaryConfig,
    pub matching: MatchConfig,
    pub aggregate: AggregateConfig,
}

/// Text-side result for one transcript: stages 0 to 2
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    pub normalized: NormalizationResult,
    /// Person spans reported by the recognizer
    pub person_spans: usize,
    pub marks: Vec<BoundaryMark>,
    pub segments: Vec<SpeechSegment>,
}

/// A transcript left out of a batch, and why
#[derive(Debug, Clone)]
pub struct SkippedTranscript {
    pub source: PathBuf,
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Written output files
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedTranscript>,
}

/// Where batch output goes
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub dir: PathBuf,
    /// Also write a `.txt` rendering next to each JSON file
    pub human_readable: bool,
}

/// The transcript pipeline with its recognizer, configured once per run
pub struct Pipeline {
    recognizer: Arc<dyn EntityRecognizer>,
    config: PipelineConfig,
    run_id: String,
}

impl Pipeline {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, config: PipelineConfig) -> Self {
        Self {
            recognizer,
            config,
            run_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalize, recognize, detect boundaries and extract segments
    pub async fn segment(&self, raw: &str) -> Result<SegmentationResult> {
        let normalized = normalize(raw, &self.config.normalize)?;

        let entities = self
            .recognizer
            .recognize(&normalized.text)
            .await
            .with_context(|| format!("Entity recognition ({}) failed", self.recognizer.name()))?;
        let person_spans = entities.iter().filter(|e| e.is_person()).count();

        let marks = detect_boundaries(&normalized.text, &entities, &self.config.boundary)?;
        let segments = extract_segments(&normalized.text, &marks);

        Ok(SegmentationResult {
            normalized,
            person_spans,
            marks,
            segments,
        })
    }

    /// Run the full pipeline for one session against its active roster
    pub async fn process(
        &self,
        record: &ProtocolRecord,
        roster: &[ActiveRosterEntry],
    ) -> Result<SessionOutput> {
        let segmentation = self.segment(&record.text).await?;
        let boundary_count = segmentation.marks.len();
        let segment_count = segmentation.segments.len();

        let resolved = resolve_segments(segmentation.segments, roster, &self.config.matching);
        let unresolved_segments = resolved.iter().filter(|s| !s.is_resolved()).count();
        let speakers = aggregate(&resolved, &self.config.aggregate);

        info!(
            "Protocol {}: {} boundaries, {} segments ({} unresolved), {} speakers",
            record.protocol_number,
            boundary_count,
            segment_count,
            unresolved_segments,
            speakers.len()
        );

        Ok(SessionOutput {
            metadata: SessionMetadata {
                protocol_number: record.protocol_number.clone(),
                date: record.date,
                run_id: self.run_id.clone(),
                recognizer: self.recognizer.name().to_string(),
                end_marker: segmentation.normalized.end_marker,
                interjections_removed: segmentation.normalized.interjections.len(),
                boundary_count,
                segment_count,
                unresolved_segments,
            },
            speakers,
        })
    }

    /// Process protocol files one after another.
    ///
    /// A transcript that fails (unreadable, malformed markers, invalid
    /// entity spans, recognizer failure) is logged and skipped; the batch
    /// continues. Only failing to write output aborts the batch.
    pub async fn run_batch(
        &self,
        files: &[PathBuf],
        rosters: &mut RosterCache,
        output: &OutputOptions,
    ) -> Result<BatchSummary> {
        std::fs::create_dir_all(&output.dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output.dir))?;

        let mut summary = BatchSummary::default();
        let mut used_stems: HashSet<String> = HashSet::new();

        for path in files {
            let (record, session) = match self.process_file(path, rosters).await {
                Ok(processed) => processed,
                Err(err) => {
                    let reason = skip_reason(&err);
                    warn!("Skipping {:?}: {}", path, reason);
                    summary.skipped.push(SkippedTranscript {
                        source: path.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let stem = unique_stem(&record.file_stem(), &mut used_stems);
            let json_path = SessionOutput::path_for(&output.dir, &stem);
            session.write_json(&json_path)?;
            if output.human_readable {
                HumanSummary::new(&session).write_file(&json_path.with_extension("txt"))?;
            }
            summary.written.push(json_path);
        }

        info!(
            "Batch {}: {} written, {} skipped, {} roster dates",
            self.run_id,
            summary.written.len(),
            summary.skipped.len(),
            rosters.cached_dates()
        );

        Ok(summary)
    }

    async fn process_file(
        &self,
        path: &Path,
        rosters: &mut RosterCache,
    ) -> Result<(ProtocolRecord, SessionOutput)> {
        let record = load_protocol_file(path)?;
        let roster = rosters.get(record.date);
        let session = self.process(&record, roster).await?;
        Ok((record, session))
    }
}

/// Short reason for a skipped transcript; stage errors are reported by kind
fn skip_reason(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PipelineError>() {
        Some(stage_err) => stage_err.to_string(),
        None => format!("{:#}", err),
    }
}

/// Avoid overwriting an earlier session's output within one batch
fn unique_stem(stem: &str, used: &mut HashSet<String>) -> String {
    if used.insert(stem.to_string()) {
        return stem.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", stem, n);
        if used.insert(candidate.clone()) {
            warn!("Duplicate protocol {}, writing {}", stem, candidate);
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntitySpan, Legislator, RosterTables, TermRecord};
    use crate::ner::PatternRecognizer;
    use crate::stages::join_roster;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    const SESSION_TEXT: &str = "\nBeginn: 9.00 Uhr\nHans Müller (CDU): Hallo Leute.\n(Beifall)\nHans Müller: Danke.\n(Schluß der Sitzung: 10.00 Uhr)";

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(PatternRecognizer::new()), PipelineConfig::default())
    }

    fn roster_cache() -> RosterCache {
        let tables = RosterTables {
            legislators: vec![
                Legislator {
                    legislator_id: "11000002".to_string(),
                    title: None,
                    given_name: "Hans".to_string(),
                    family_name: "Müller".to_string(),
                },
                Legislator {
                    legislator_id: "11000003".to_string(),
                    title: None,
                    given_name: "Anna".to_string(),
                    family_name: "Weber".to_string(),
                },
            ],
            terms: vec![
                TermRecord {
                    legislator_id: "11000002".to_string(),
                    term_id: "12".to_string(),
                    term_start: NaiveDate::from_ymd_opt(1990, 12, 20).unwrap(),
                    term_end: Some(NaiveDate::from_ymd_opt(1994, 11, 10).unwrap()),
                },
                TermRecord {
                    legislator_id: "11000003".to_string(),
                    term_id: "12".to_string(),
                    term_start: NaiveDate::from_ymd_opt(1990, 12, 20).unwrap(),
                    term_end: Some(NaiveDate::from_ymd_opt(1994, 11, 10).unwrap()),
                },
            ],
        };
        RosterCache::new(join_roster(&tables))
    }

    fn record(text: &str) -> ProtocolRecord {
        ProtocolRecord {
            text: text.to_string(),
            protocol_number: "12/1".to_string(),
            date: NaiveDate::from_ymd_opt(1990, 12, 20).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_single_speaker_session() {
        let pipeline = pipeline();
        let mut rosters = roster_cache();
        let record = record(SESSION_TEXT);

        let segmentation = pipeline.segment(&record.text).await.unwrap();
        assert_eq!(segmentation.marks.len(), 2);
        assert_eq!(segmentation.segments.len(), 2);

        let output = pipeline.process(&record, rosters.get(record.date)).await.unwrap();

        assert_eq!(output.speakers.len(), 1);
        let speaker = &output.speakers[0];
        assert_eq!(speaker.speaker_id, "11000002");
        assert!(speaker.full_text.contains("Hallo Leute."));
        assert!(speaker.full_text.contains("Danke."));
        assert!(!speaker.full_text.contains("Beifall"));
        assert_eq!(speaker.word_count, 3);
        assert_eq!(output.metadata.interjections_removed, 1);
    }

    #[tokio::test]
    async fn test_mentioned_name_is_not_a_speaker() {
        let text = "\nBeginn: 9.00 Uhr\nAnna Weber (SPD): Es ist so, wie Kollege Schmidt sagte.\n(Ende: 10.00 Uhr)";
        let segmentation = pipeline().segment(text).await.unwrap();

        let labels: Vec<_> = segmentation.marks.iter().map(|m| m.speaker_label.as_str()).collect();
        assert_eq!(labels, vec!["Anna Weber"]);
        assert!(segmentation.segments[0].text.contains("Kollege Schmidt sagte"));
    }

    struct OverlappingRecognizer;

    #[async_trait]
    impl EntityRecognizer for OverlappingRecognizer {
        fn name(&self) -> &str {
            "overlapping"
        }

        async fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            Ok(vec![
                EntitySpan::person("Hans Müller", 1, 13),
                EntitySpan::person("Müller", 6, 13),
            ])
        }
    }

    #[tokio::test]
    async fn test_overlapping_spans_abort_the_transcript() {
        let pipeline = Pipeline::new(Arc::new(OverlappingRecognizer), PipelineConfig::default());
        let err = pipeline.segment(SESSION_TEXT).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_skips_malformed_transcripts() {
        let input = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();

        let good = serde_json::json!({"text": SESSION_TEXT, "protocol_number": "12/1", "date": "20.12.1990"});
        let bad = serde_json::json!({
            "text": "\nBeginn: 9.00 Uhr\nHans Müller: Danke.\n",
            "protocol_number": "12/2",
            "date": "21.12.1990"
        });
        let dup = serde_json::json!({"text": SESSION_TEXT, "protocol_number": "12/1", "date": "20.12.1990"});
        std::fs::write(input.path().join("a.json"), bad.to_string()).unwrap();
        std::fs::write(input.path().join("b.json"), good.to_string()).unwrap();
        std::fs::write(input.path().join("c.json"), dup.to_string()).unwrap();
        std::fs::write(input.path().join("d.json"), "not json").unwrap();

        let files = crate::io::list_protocol_files(input.path()).unwrap();
        let mut rosters = roster_cache();
        let options = OutputOptions {
            dir: output_dir.path().to_path_buf(),
            human_readable: true,
        };

        let summary = pipeline().run_batch(&files, &mut rosters, &options).await.unwrap();

        assert_eq!(summary.written.len(), 2);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.skipped[0].reason, "malformed transcript: no_end_marker");
        assert!(output_dir.path().join("12_1.json").exists());
        assert!(output_dir.path().join("12_1-2.json").exists());
        assert!(output_dir.path().join("12_1.txt").exists());
        assert_eq!(rosters.cached_dates(), 2);
    }

    #[test]
    fn test_unique_stem() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem("12_1", &mut used), "12_1");
        assert_eq!(unique_stem("12_1", &mut used), "12_1-2");
        assert_eq!(unique_stem("12_1", &mut used), "12_1-3");
    }
}
