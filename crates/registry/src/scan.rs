//! Clause text extraction.
//!
//! Clauses are opaque symbolic expressions; the core recognizes exactly two
//! sub-forms and extracts them structurally, never semantically:
//!
//! - tag markers: `tag(key, value)` with tolerant whitespace and quoting
//! - qualified references: dotted `alias.symbol` names
//!
//! Tag marker spans are masked before reference scanning so an unquoted tag
//! argument (e.g. `tag(note, some.thing)`) is never mistaken for a reference.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// A `tag(key, value)` marker found in clause text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TagMarker {
    pub key: String,
    pub value: String,
}

/// A dotted `alias.symbol` qualified reference found in clause text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub alias: String,
    pub symbol: String,
}

static TAG_CALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btag\s*\(([^()]*)\)").unwrap());

static REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)\b").unwrap());

/// Extract every tag marker from a clause.
///
/// Tolerant of surrounding whitespace, single/double/absent quotes around
/// either argument, and trailing clause text or comments after the marker.
/// Fragments that do not carry both a key and a value are ignored, not
/// errors; scanning never fails.
#[must_use]
pub fn tags(clause: &str) -> Vec<TagMarker> {
    tags_with_spans(clause)
        .into_iter()
        .map(|(marker, _)| marker)
        .collect()
}

/// Extract every qualified reference from a clause, skipping anything that
/// falls inside a tag marker span.
#[must_use]
pub fn references(clause: &str) -> Vec<QualifiedName> {
    let masked: Vec<Range<usize>> = tags_with_spans(clause)
        .into_iter()
        .map(|(_, span)| span)
        .collect();

    let mut refs = Vec::new();
    for cap in REF_RE.captures_iter(clause) {
        let Some(whole) = cap.get(0) else { continue };
        if masked
            .iter()
            .any(|span| span.start <= whole.start() && whole.end() <= span.end)
        {
            continue;
        }
        refs.push(QualifiedName {
            alias: cap[1].to_string(),
            symbol: cap[2].to_string(),
        });
    }
    refs
}

fn tags_with_spans(clause: &str) -> Vec<(TagMarker, Range<usize>)> {
    TAG_CALL_RE
        .captures_iter(clause)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let args = cap.get(1)?.as_str();
            let (key, value) = args.split_once(',')?;
            let key = unquote(key);
            let value = unquote(value);
            if key.is_empty() || value.is_empty() {
                return None;
            }
            Some((
                TagMarker {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                whole.range(),
            ))
        })
        .collect()
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '\'' || c == '"').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(key: &str, value: &str) -> TagMarker {
        TagMarker {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn qref(alias: &str, symbol: &str) -> QualifiedName {
        QualifiedName {
            alias: alias.to_string(),
            symbol: symbol.to_string(),
        }
    }

    #[test]
    fn test_tag_quoting_variants_all_match() {
        for clause in [
            "tag('sutra','IV.21')",
            "tag(\"sutra\", \"IV.21\")",
            "tag( sutra , IV.21 )",
            "cessation := tag('sutra', 'IV.21') // revisit wording",
        ] {
            assert_eq!(tags(clause), vec![tag("sutra", "IV.21")], "clause: {clause}");
        }
    }

    #[test]
    fn test_multiple_tags_in_one_clause() {
        let clause = "tag('sutra','I.41') and tag('method','witness')";
        assert_eq!(
            tags(clause),
            vec![tag("sutra", "I.41"), tag("method", "witness")]
        );
    }

    #[test]
    fn test_malformed_tag_fragments_are_ignored() {
        assert!(tags("tag('sutra')").is_empty());
        assert!(tags("tag(, 'x')").is_empty());
        assert!(tags("montage('a','b')").is_empty());
        assert!(tags("no markers here").is_empty());
    }

    #[test]
    fn test_reference_extraction() {
        let clause = "essence := reflection(lecture1.absoluteKnowing, seer.purusha)";
        assert_eq!(
            references(clause),
            vec![qref("lecture1", "absoluteKnowing"), qref("seer", "purusha")]
        );
    }

    #[test]
    fn test_tag_spans_are_masked_for_references() {
        // The unquoted tag value looks exactly like a qualified name
        let clause = "tag(note, some.thing) and vision.clarity";
        assert_eq!(references(clause), vec![qref("vision", "clarity")]);
    }

    #[test]
    fn test_numeric_segments_are_not_references() {
        // Sutra numbering is dotted but the segment after the dot is numeric
        assert!(references("compare IV.21 with IV.15").is_empty());
    }
}
