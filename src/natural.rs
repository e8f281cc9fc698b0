//! Natural ordering for headings and sense fragments.
//!
//! Digit runs compare as numbers (`abc2` < `abc10`), letters compare without
//! regard to case, and text sorts ahead of numbers at the same position.
//! Strings that are equal under those rules fall back to putting lowercase
//! before uppercase at the first differing letter.

use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Chunk<'a> {
    Text(&'a str),
    Num(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut digits = None;
    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match digits {
            Some(prev) if prev != is_digit => {
                out.push(chunk(&s[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        digits = Some(is_digit);
    }
    if let Some(prev) = digits {
        out.push(chunk(&s[start..], prev));
    }
    out
}

fn chunk(text: &str, digits: bool) -> Chunk<'_> {
    if digits { Chunk::Num(text) } else { Chunk::Text(text) }
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn cmp_primary(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);
    for (x, y) in left.iter().zip(right.iter()) {
        let ord = match (x, y) {
            (Chunk::Text(x), Chunk::Text(y)) => cmp_folded(x, y),
            (Chunk::Num(x), Chunk::Num(y)) => cmp_numeric(x, y),
            (Chunk::Text(_), Chunk::Num(_)) => Ordering::Less,
            (Chunk::Num(_), Chunk::Text(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

fn cmp_case(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }
    a.chars().count().cmp(&b.chars().count())
}

/// Total natural order over strings.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    cmp_primary(a, b)
        .then_with(|| cmp_case(a, b))
        .then_with(|| a.cmp(b))
}

/// Stable natural sort by a string key.
pub fn sort_natural_by_key<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}
