use std::borrow::Cow;

use tracing::debug;

use crate::error::{MarkerKind, PipelineError};
use crate::heuristics::{END_MARKERS, INTERJECTION, PAGE_HEADER, PAGE_MARKERS, START_MARKER, first_unique};

/// Configuration for Stage 0 normalization
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Remove line-initial parentheticals (applause, heckling, procedural notes)
    pub remove_interjections: bool,
    /// Remove column markers and running page headers
    pub remove_page_boilerplate: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            remove_interjections: true,
            remove_page_boilerplate: true,
        }
    }
}

/// Result of Stage 0 normalization
#[derive(Debug, Clone)]
pub struct NormalizationResult {
    /// Floor speech only
    pub text: String,
    /// Removed interjections in document order, without the leading newline
    pub interjections: Vec<String>,
    /// The closing marker that delimited the session
    pub end_marker: String,
}

/// Perform Stage 0: strip everything that is not floor speech
///
/// This stage:
/// 1. Cuts the text at the session's closing marker
/// 2. Drops everything up to and including the `Beginn:` line
/// 3. Removes interjections
/// 4. Removes page layout boilerplate
///
/// Marker trimming runs first so that boilerplate removal cannot create or
/// destroy a marker.
pub fn normalize(raw: &str, config: &NormalizeConfig) -> Result<NormalizationResult, PipelineError> {
    let (body, end_marker) = trim_end(raw)?;
    let body = trim_start(body)?;

    let (text, interjections) = if config.remove_interjections {
        let interjections = collect_interjections(body);
        (INTERJECTION.replace_all(body, "").into_owned(), interjections)
    } else {
        (body.to_string(), Vec::new())
    };

    let text = if config.remove_page_boilerplate {
        replace_boilerplate(&text).into_owned()
    } else {
        text
    };

    debug!(
        "Normalized {} -> {} bytes, {} interjections removed",
        raw.len(),
        text.len(),
        interjections.len()
    );

    Ok(NormalizationResult {
        text,
        interjections,
        end_marker,
    })
}

/// Keep the text before the first closing marker that occurs exactly once
fn trim_end(raw: &str) -> Result<(&str, String), PipelineError> {
    let (rule, range) = first_unique(&END_MARKERS, raw)
        .ok_or(PipelineError::MalformedTranscript(MarkerKind::NoEndMarker))?;
    Ok((&raw[..range.start], rule.describe().to_string()))
}

/// Keep the text after the `Beginn:` line, which must occur exactly once
fn trim_start(body: &str) -> Result<&str, PipelineError> {
    let range = START_MARKER
        .unique_match(body)
        .ok_or(PipelineError::MalformedTranscript(MarkerKind::NoStartMarker))?;
    Ok(&body[range.end..])
}

/// Interjections as they appear, e.g. `(Beifall bei der SPD)`
pub fn collect_interjections(text: &str) -> Vec<String> {
    INTERJECTION
        .find_iter(text)
        .map(|m| m.as_str().trim_start_matches('\n').to_string())
        .collect()
}

/// Remove column markers and page headers.
///
/// Applied until nothing changes, so running it on its own output is a no-op.
pub fn replace_boilerplate(text: &str) -> Cow<'_, str> {
    let mut current: Cow<'_, str> = Cow::Borrowed(text);
    loop {
        let mut next = current.to_string();
        for marker in PAGE_MARKERS {
            next = next.replace(marker, "");
        }
        let next = PAGE_HEADER.replace_all(&next, "").into_owned();
        if next == current {
            return current;
        }
        current = Cow::Owned(next);
    }
}
