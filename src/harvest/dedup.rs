//! Frequency-based sentence deduplication
//!
//! Boilerplate that survives tag stripping (cookie banners, repeated slogans)
//! shows up as the same sentence on many pages. Any sentence whose count
//! across the whole corpus exceeds the threshold is dropped everywhere,
//! including its first occurrence.

use std::collections::HashMap;

/// Splits text into sentences after `.`, `!` or `?` followed by whitespace
///
/// Sentences are trimmed; empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(next_index, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        push_trimmed(&mut sentences, &text[start..i + c.len_utf8()]);
        start = next_index;
        while let Some(&(_, ws)) = chars.peek() {
            if !ws.is_whitespace() {
                break;
            }
            chars.next();
        }
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece);
    }
}

fn count_sentences<'a, I>(texts: I) -> HashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = HashMap::new();
    for text in texts {
        for sentence in split_sentences(text) {
            *counts.entry(sentence).or_insert(0) += 1;
        }
    }
    counts
}

fn keep_sentences(text: &str, counts: &HashMap<&str, usize>, threshold: usize) -> String {
    split_sentences(text)
        .into_iter()
        .filter(|s| counts.get(s).copied().unwrap_or(0) <= threshold)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drops every sentence occurring more than `threshold` times in `text`
///
/// Surviving sentences keep their original relative order and are joined by
/// a single space.
///
/// # Example
///
/// ```
/// use site_harvest::harvest::remove_repeated_sentences;
///
/// let text = "Accept cookies. We build ships. Accept cookies. Accept cookies.";
/// assert_eq!(remove_repeated_sentences(text, 2), "We build ships.");
/// ```
pub fn remove_repeated_sentences(text: &str, threshold: usize) -> String {
    let counts = count_sentences([text]);
    keep_sentences(text, &counts, threshold)
}

/// Applies [`remove_repeated_sentences`] with one count across all blocks
///
/// Blocks left empty are removed; the rest keep their input order.
pub fn dedupe_blocks<S: AsRef<str>>(blocks: &[S], threshold: usize) -> Vec<String> {
    let counts = count_sentences(blocks.iter().map(|b| b.as_ref()));

    blocks
        .iter()
        .map(|block| keep_sentences(block.as_ref(), &counts, threshold))
        .filter(|block| !block.is_empty())
        .collect()
}
