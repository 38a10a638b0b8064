use tracing::debug;

use crate::error::{PipelineError, ValidationIssue};
use crate::heuristics::{
    BoundaryConfig, char_window, char_window_before, classify_speaker_change,
    party_annotation_matches,
};
use crate::models::{BoundaryMark, EntitySpan};

/// Execute Stage 1: speaker boundary detection
///
/// Every person span is judged on its own by the text right after it. A name
/// followed by a colon, or by a party annotation and a colon, introduces a
/// speaker; any other person span is a mention inside someone's speech.
///
/// Marks come back in document order, each knowing where the next one starts.
pub fn detect_boundaries(
    text: &str,
    entities: &[EntitySpan],
    config: &BoundaryConfig,
) -> Result<Vec<BoundaryMark>, PipelineError> {
    let persons = validated_person_spans(text, entities)?;

    let mut marks: Vec<BoundaryMark> = Vec::new();
    for span in persons {
        let Some(rule) = classify_speaker_change(text, span.end, config.context_window_chars) else {
            continue;
        };

        let trailing_context = format!(
            "{}{}{}",
            char_window_before(text, span.start, config.context_before_chars),
            &text[span.start..span.end],
            char_window(text, span.end, config.context_after_chars)
        );

        debug!("Speaker change at {}: {:?} ({:?})", span.start, span.text, rule);

        marks.push(BoundaryMark {
            speaker_label: span.text.clone(),
            start: span.start,
            introduction_end: span.end,
            next_boundary: text.len(),
            trailing_context,
            rule,
            party_annotation_matches: party_annotation_matches(
                text,
                span.end,
                config.party_window_chars,
            ),
        });
    }

    for i in 1..marks.len() {
        marks[i - 1].next_boundary = marks[i].start;
    }

    Ok(marks)
}

/// Person spans sorted by position, rejecting spans that overlap or do not
/// fit the text
fn validated_person_spans<'a>(
    text: &str,
    entities: &'a [EntitySpan],
) -> Result<Vec<&'a EntitySpan>, PipelineError> {
    let mut persons: Vec<&EntitySpan> = entities.iter().filter(|e| e.is_person()).collect();

    for span in &persons {
        let fits = span.start < span.end
            && span.end <= text.len()
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end);
        if !fits {
            return Err(PipelineError::Validation(ValidationIssue::SpanOutOfBounds {
                start: span.start,
                end: span.end,
                text_len: text.len(),
            }));
        }
    }

    persons.sort_by_key(|s| (s.start, s.end));

    for pair in persons.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(PipelineError::Validation(ValidationIssue::OverlappingSpans {
                first: (pair[0].start, pair[0].end),
                second: (pair[1].start, pair[1].end),
            }));
        }
    }

    Ok(persons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundaryRule, EntityLabel};

    fn span_of(text: &str, name: &str, nth: usize) -> EntitySpan {
        let start = text.match_indices(name).nth(nth).unwrap().0;
        EntitySpan::person(name, start, start + name.len())
    }

    #[test]
    fn test_detect_party_then_colon() {
        let text = "\nHans Müller (CDU): Hallo Leute.\nHans Müller: Danke.\n";
        let entities = vec![span_of(text, "Hans Müller", 0), span_of(text, "Hans Müller", 1)];

        let marks = detect_boundaries(text, &entities, &BoundaryConfig::default()).unwrap();

        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].rule, BoundaryRule::Party);
        assert_eq!(marks[0].party_annotation_matches, vec![" (CDU):".to_string()]);
        assert_eq!(marks[0].next_boundary, marks[1].start);
        assert_eq!(marks[1].rule, BoundaryRule::Colon);
        assert!(marks[1].party_annotation_matches.is_empty());
        assert_eq!(marks[1].next_boundary, text.len());
        assert_eq!(marks[1].trailing_context, "lo Leute.\nHans Müller: Danke.\n");
    }

    #[test]
    fn test_mentions_do_not_open_segments() {
        let text = "\nAnna Weber (SPD): Wie Kollege Schmidt sagte, reicht das nicht.\n";
        let entities = vec![span_of(text, "Anna Weber", 0), span_of(text, "Kollege Schmidt", 0)];

        let marks = detect_boundaries(text, &entities, &BoundaryConfig::default()).unwrap();

        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].speaker_label, "Anna Weber");
    }

    #[test]
    fn test_non_person_spans_are_ignored() {
        let text = "\nBerlin: Hauptstadt.\n";
        let entities = vec![EntitySpan {
            text: "Berlin".to_string(),
            start: 1,
            end: 7,
            label: EntityLabel::Other,
        }];
        let marks = detect_boundaries(text, &entities, &BoundaryConfig::default()).unwrap();
        assert!(marks.is_empty());
    }

    #[test]
    fn test_unsorted_input_is_ordered() {
        let text = "\nA Eins: x\nB Zwei: y\n";
        let entities = vec![span_of(text, "B Zwei", 0), span_of(text, "A Eins", 0)];
        let marks = detect_boundaries(text, &entities, &BoundaryConfig::default()).unwrap();
        let labels: Vec<_> = marks.iter().map(|m| m.speaker_label.as_str()).collect();
        assert_eq!(labels, vec!["A Eins", "B Zwei"]);
    }

    #[test]
    fn test_span_at_end_of_text() {
        let text = "Dank an Hans Müller";
        let entities = vec![span_of(text, "Hans Müller", 0)];
        let marks = detect_boundaries(text, &entities, &BoundaryConfig::default()).unwrap();
        assert!(marks.is_empty());
    }

    #[test]
    fn test_overlapping_spans_are_rejected() {
        let text = "\nHans Müller: Danke.\n";
        let entities = vec![
            EntitySpan::person("Hans Müller", 1, 13),
            EntitySpan::person("Müller", 6, 13),
        ];
        let err = detect_boundaries(text, &entities, &BoundaryConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationIssue::OverlappingSpans { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_span_is_rejected() {
        let text = "Müller";
        // byte 2 lies inside the two-byte 'ü'
        let entities = vec![EntitySpan::person("M", 0, 2)];
        let err = detect_boundaries(text, &entities, &BoundaryConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationIssue::SpanOutOfBounds { .. })
        ));
    }
}
