use thiserror::Error;

/// Which session marker could not be located exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    NoStartMarker,
    NoEndMarker,
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerKind::NoStartMarker => write!(f, "no_start_marker"),
            MarkerKind::NoEndMarker => write!(f, "no_end_marker"),
        }
    }
}

/// Problems with entity spans handed to the boundary detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Two spans share characters (or are duplicates)
    OverlappingSpans { first: (usize, usize), second: (usize, usize) },
    /// A span lies outside the text or splits a UTF-8 character
    SpanOutOfBounds { start: usize, end: usize, text_len: usize },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::OverlappingSpans { first, second } => write!(
                f,
                "overlapping_spans: {}..{} and {}..{}",
                first.0, first.1, second.0, second.1
            ),
            ValidationIssue::SpanOutOfBounds {
                start,
                end,
                text_len,
            } => write!(
                f,
                "span_out_of_bounds: {}..{} (text length {})",
                start, end, text_len
            ),
        }
    }
}

/// Errors that abort processing of a single transcript
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("malformed transcript: {0}")]
    MalformedTranscript(MarkerKind),

    #[error("invalid entity spans: {0}")]
    Validation(ValidationIssue),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::MalformedTranscript(MarkerKind::NoEndMarker);
        assert_eq!(err.to_string(), "malformed transcript: no_end_marker");

        let err = PipelineError::Validation(ValidationIssue::OverlappingSpans {
            first: (0, 5),
            second: (3, 8),
        });
        assert_eq!(
            err.to_string(),
            "invalid entity spans: overlapping_spans: 0..5 and 3..8"
        );
    }
}
