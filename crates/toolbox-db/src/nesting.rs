//! Bracket-depth annotation and depth-aware splitting.
//!
//! Brackets are never checked for balance; a stray closing bracket simply
//! pushes everything after it below depth 0. An opening bracket carries the
//! depth it opens and a closing bracket the depth it closes, so an aside is
//! dropped whole by [`canonicalize`], brackets included.

use toolbox_types::{Definition, DepthChar, Segment, Sense};

const OPENERS: [char; 2] = ['(', '['];
const CLOSERS: [char; 2] = [')', ']'];

/// Sense delimiter inside a definition.
pub const SENSE_DELIMITER: char = ';';
/// Subsense delimiter inside a sense.
pub const SUBSENSE_DELIMITER: char = ',';

pub fn annotate(text: &str) -> Vec<DepthChar> {
    let mut depth = 0i32;
    text.chars()
        .map(|ch| {
            if OPENERS.contains(&ch) {
                depth += 1;
                DepthChar::new(depth, ch)
            } else if CLOSERS.contains(&ch) {
                let at = depth;
                depth -= 1;
                DepthChar::new(at, ch)
            } else {
                DepthChar::new(depth, ch)
            }
        })
        .collect()
}

/// Split wherever `delimiter` occurs at exactly `level`.
///
/// Always yields at least one segment; the delimiters themselves are dropped.
pub fn split(annotated: &[DepthChar], delimiter: char, level: i32) -> Vec<&[DepthChar]> {
    annotated
        .split(|c| c.ch == delimiter && c.depth == level)
        .collect()
}

/// Characters at depth 0 only.
pub fn canonicalize(annotated: &[DepthChar]) -> String {
    annotated
        .iter()
        .filter(|c| c.depth == 0)
        .map(|c| c.ch)
        .collect()
}

/// Every character, asides included.
pub fn flatten(annotated: &[DepthChar]) -> String {
    annotated.iter().map(|c| c.ch).collect()
}

pub fn segment(annotated: &[DepthChar]) -> Segment {
    Segment {
        annotated: annotated.to_vec(),
        flattened: flatten(annotated),
        canonical: canonicalize(annotated).trim().to_string(),
    }
}

/// Break a `\def` value into senses (`;`) and subsenses (`,`) at depth 0.
pub fn segment_definition(text: &str) -> Definition {
    let annotated = annotate(text);
    let senses = split(&annotated, SENSE_DELIMITER, 0)
        .into_iter()
        .map(|sense| Sense {
            text: segment(sense),
            subsenses: split(sense, SUBSENSE_DELIMITER, 0)
                .into_iter()
                .map(segment)
                .collect(),
        })
        .collect();
    Definition {
        text: segment(&annotated),
        senses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "s/he plucks s.o. (e.g. bird), s/he defeathers s.o.",
        "very, really (i.e. intensively, fully); quite; much, a lot",
        "a canine (domestic)",
        "unbalanced ) close, then (open; never closed",
        "[x, y] (a; (b, c)), d",
        ") ) ( ( a",
        "",
    ];

    #[test]
    fn tracks_depth_without_balancing() {
        let depths: Vec<i32> = annotate("a(b)c)d").iter().map(|c| c.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 1, 0, 0, -1]);
    }

    #[test]
    fn split_ignores_nested_delimiters() {
        let annotated = annotate("inside, indoors (here, there), out");
        let parts: Vec<String> = split(&annotated, ',', 0).into_iter().map(flatten).collect();
        assert_eq!(parts, vec!["inside", " indoors (here, there)", " out"]);
    }

    #[test]
    fn split_without_delimiter_yields_whole_input() {
        let annotated = annotate("no delimiter (here, at all)");
        let parts = split(&annotated, ',', 0);
        assert_eq!(parts.len(), 1);
        assert_eq!(flatten(parts[0]), "no delimiter (here, at all)");
    }

    #[test]
    fn split_then_join_reconstructs_input() {
        for sample in SAMPLES {
            let annotated = annotate(sample);
            let joined = split(&annotated, ',', 0)
                .into_iter()
                .map(flatten)
                .collect::<Vec<_>>()
                .join(",");
            assert_eq!(&joined, sample);
        }
    }

    #[test]
    fn canonical_drops_asides_entirely() {
        assert_eq!(canonicalize(&annotate("a canine (domestic)")), "a canine ");
        assert_eq!(canonicalize(&annotate("[x] y")), " y");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for sample in SAMPLES {
            let once = canonicalize(&annotate(sample));
            let twice = canonicalize(&annotate(&once));
            assert_eq!(once, twice, "sample {sample:?}");
        }
    }

    #[test]
    fn canonical_is_subsequence_of_flattened() {
        for sample in SAMPLES {
            let annotated = annotate(sample);
            let flat = flatten(&annotated);
            let mut rest = flat.chars();
            for ch in canonicalize(&annotated).chars() {
                assert!(rest.any(|c| c == ch), "sample {sample:?}");
            }
        }
    }

    #[test]
    fn segments_definition_into_senses_and_subsenses() {
        let def = segment_definition("very, really (i.e. intensively, fully); quite");
        assert_eq!(def.senses.len(), 2);
        assert_eq!(def.senses[0].subsenses.len(), 2);
        assert_eq!(def.senses[0].subsenses[1].canonical, "really");
        assert_eq!(
            def.senses[0].subsenses[1].flattened,
            " really (i.e. intensively, fully)"
        );
        assert_eq!(def.senses[1].text.canonical, "quite");
        assert_eq!(def.text.flattened, "very, really (i.e. intensively, fully); quite");
    }
}
