//! Sentence segmentation.
//!
//! Text is split after `.`, `!` or `?` whenever the next character is
//! whitespace. This is a plain punctuation heuristic: abbreviations such as
//! `Dr. Smith`, a decimal like `3. 5`, or punctuation inside quotes followed
//! by a space all count as sentence boundaries.

/// Returns `true` for characters that can end a sentence.
const fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Splits `text` into trimmed, non-empty sentences in their original order.
///
/// Terminal punctuation stays attached to the sentence it ends. Every
/// returned slice borrows from `text`.
///
/// ```
/// use gloss_tl::segment::segment;
///
/// assert_eq!(segment("Hello. World!"), vec!["Hello.", "World!"]);
/// assert!(segment("   ").is_empty());
/// ```
pub fn segment(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut after_terminal = false;

    for (idx, ch) in text.char_indices() {
        if after_terminal && ch.is_whitespace() {
            push_trimmed(&mut sentences, &text[start..idx]);
            start = idx;
        }
        after_terminal = is_terminal(ch);
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}
