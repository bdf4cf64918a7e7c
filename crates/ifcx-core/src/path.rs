// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Head/tail reference addressing.
//!
//! A reference is `head` or `head/tail...`: `head` names a canonical node,
//! `tail` descends into that node's expansion by child name.

/// Separator between head and tail segments.
pub const SEPARATOR: char = '/';

/// Text before the first separator (the whole reference when there is none).
pub fn head(reference: &str) -> &str {
    reference
        .split_once(SEPARATOR)
        .map_or(reference, |(head, _)| head)
}

/// Text after the first separator; empty when there is none.
pub fn tail(reference: &str) -> &str {
    reference.split_once(SEPARATOR).map_or("", |(_, tail)| tail)
}

/// Last separator-delimited segment, used as a node's default name.
pub fn last_segment(path: &str) -> &str {
    path.rsplit_once(SEPARATOR).map_or(path, |(_, last)| last)
}

/// True when `path` can never be a root candidate.
pub fn is_compound(path: &str) -> bool {
    path.contains(SEPARATOR)
}

/// Non-empty segments of a tail path.
pub fn segments(tail: &str) -> impl Iterator<Item = &str> {
    tail.split(SEPARATOR).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_separator() {
        assert_eq!(head("site/storey/wall"), "site");
        assert_eq!(tail("site/storey/wall"), "storey/wall");
        assert_eq!(head("wall"), "wall");
        assert_eq!(tail("wall"), "");
        assert_eq!(tail("wall/"), "");
    }

    #[test]
    fn last_segment_of_plain_and_compound() {
        assert_eq!(last_segment("a/b/c"), "c");
        assert_eq!(last_segment("abc"), "abc");
    }

    #[test]
    fn empty_segments_skipped() {
        let segs: Vec<_> = segments("a//b/").collect();
        assert_eq!(segs, vec!["a", "b"]);
    }
}
