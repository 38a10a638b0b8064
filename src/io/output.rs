use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{SpeakerAggregate, day_first};

/// Per-session processing metadata
#[derive(Debug, Clone, Serialize)]
pub struct SessionMetadata {
    pub protocol_number: String,
    #[serde(with = "day_first")]
    pub date: NaiveDate,
    /// Identifier shared by all sessions of one batch run
    pub run_id: String,
    pub recognizer: String,
    pub end_marker: String,
    pub interjections_removed: usize,
    pub boundary_count: usize,
    pub segment_count: usize,
    pub unresolved_segments: usize,
}

/// Machine-readable output for one session: one row per speaker
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutput {
    pub metadata: SessionMetadata,
    pub speakers: Vec<SpeakerAggregate>,
}

impl SessionOutput {
    /// Output path for this session inside `dir`, one file per protocol
    pub fn path_for(dir: &Path, file_stem: &str) -> PathBuf {
        dir.join(format!("{}.json", file_stem))
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable rendering of a session's speakers
pub struct HumanSummary<'a> {
    output: &'a SessionOutput,
}

impl<'a> HumanSummary<'a> {
    pub fn new(output: &'a SessionOutput) -> Self {
        Self { output }
    }

    /// Format the session as text, one block per speaker
    pub fn format(&self) -> String {
        let meta = &self.output.metadata;
        let mut output = String::new();

        output.push_str(&format!(
            "Plenarprotokoll {} vom {}\n",
            meta.protocol_number,
            meta.date.format("%d.%m.%Y")
        ));
        output.push_str(&format!(
            "{} speakers, {} segments, {} interjections removed\n\n",
            self.output.speakers.len(),
            meta.segment_count,
            meta.interjections_removed
        ));

        for speaker in &self.output.speakers {
            let marker = if speaker.resolved { "" } else { " [unresolved]" };
            let party = speaker
                .party
                .as_deref()
                .map(|p| format!(" {}", p))
                .unwrap_or_default();
            output.push_str(&format!(
                "{} ({}){}{} - {} words:\n",
                speaker.speaker_name, speaker.speaker_id, party, marker, speaker.word_count
            ));
            output.push_str(&wrap_text(&speaker.full_text, 80));
            output.push_str("\n\n");
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionOutput {
        SessionOutput {
            metadata: SessionMetadata {
                protocol_number: "12/1".to_string(),
                date: NaiveDate::from_ymd_opt(1990, 12, 20).unwrap(),
                run_id: "run".to_string(),
                recognizer: "pattern".to_string(),
                end_marker: "(Schluß der Sitzung:".to_string(),
                interjections_removed: 1,
                boundary_count: 2,
                segment_count: 2,
                unresolved_segments: 0,
            },
            speakers: vec![SpeakerAggregate {
                speaker_id: "2".to_string(),
                speaker_name: "Hans Müller".to_string(),
                resolved: true,
                full_text: "Hallo Leute. Danke.".to_string(),
                word_count: 3,
                segment_count: 2,
                party: Some("(CDU)".to_string()),
            }],
        }
    }

    #[test]
    fn test_wrap_text() {
        let text = "Dies ist ein Test der Umbruchfunktion, die nach zwanzig Zeichen umbrechen soll";
        let wrapped = wrap_text(text, 20);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 25); // Allow some slack for long words
        }
    }

    #[test]
    fn test_human_summary_format() {
        let output = sample();
        let text = HumanSummary::new(&output).format();
        assert!(text.starts_with("Plenarprotokoll 12/1 vom 20.12.1990\n"));
        assert!(text.contains("Hans Müller (2) (CDU) - 3 words:\nHallo Leute. Danke."));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let output = sample();
        let path = SessionOutput::path_for(dir.path(), "12_1");
        output.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["metadata"]["date"], "20.12.1990");
        assert_eq!(value["speakers"][0]["speaker_id"], "2");
        assert_eq!(value["speakers"][0]["word_count"], 3);
    }
}
