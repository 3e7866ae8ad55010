//! # Word-Bounded Chunking
//!
//! Splits extracted document text into fixed-size word runs and bounds the
//! total amount of text that gets embedded into a prompt. Chunks are never
//! processed independently; [`bounded_text`] keeps whole leading chunks up to
//! a word budget and rejoins them, so an over-long document loses its tail
//! rather than overflowing the model's input limit.

use tracing::warn;

/// The chunk granularity used by [`bounded_text`].
pub const DEFAULT_WORDS_PER_CHUNK: usize = 400;

/// Splits `text` into runs of at most `words_per_chunk` whitespace-delimited
/// words, each rejoined with single spaces. The last run may be shorter.
/// Coverage is total: no word is lost or duplicated.
pub fn chunk_words(text: &str, words_per_chunk: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    if words_per_chunk == 0 {
        // A zero chunk size is a caller bug; degrade to a single chunk.
        warn!("chunk_words called with words_per_chunk = 0");
        return vec![words.join(" ")];
    }
    words
        .chunks(words_per_chunk)
        .map(|run| run.join(" "))
        .collect()
}

/// Estimates the size of `text` in words. Used both for prompt budgeting and
/// for the token estimate carried on log records.
pub fn estimate_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Bounds `text` to roughly `max_words` words by keeping only whole leading
/// chunks of [`DEFAULT_WORDS_PER_CHUNK`] words. When even the first chunk
/// exceeds the budget, falls back to a word-level cut so the result is never
/// empty for non-empty input.
pub fn bounded_text(text: &str, max_words: usize) -> String {
    let chunks = chunk_words(text, DEFAULT_WORDS_PER_CHUNK);
    if chunks.is_empty() {
        return String::new();
    }

    let mut budget = max_words;
    let mut kept: Vec<&str> = Vec::new();
    for chunk in &chunks {
        let words = estimate_words(chunk);
        if words > budget {
            break;
        }
        budget -= words;
        kept.push(chunk.as_str());
    }

    if kept.is_empty() {
        let cut: Vec<&str> = text.split_whitespace().take(max_words).collect();
        warn!(
            max_words,
            "Prompt budget is smaller than one chunk; cutting at the word level."
        );
        return cut.join(" ");
    }

    if kept.len() < chunks.len() {
        warn!(
            kept = kept.len(),
            dropped = chunks.len() - kept.len(),
            max_words,
            "Document text exceeds the prompt budget; dropping trailing chunks."
        );
    }
    kept.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_covers_all_words_without_loss_or_duplication() {
        let text = "  one two\tthree\nfour five six seven ";
        let chunks = chunk_words(text, 3);
        assert_eq!(chunks, vec!["one two three", "four five six", "seven"]);

        let rejoined = chunks.join(" ");
        let normalized: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, normalized.join(" "));
    }

    #[test]
    fn chunking_is_idempotent_under_whitespace_normalization() {
        let text = "alpha   beta\n\ngamma";
        let once = chunk_words(text, 10).join(" ");
        let twice = chunk_words(&once, 10).join(" ");
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_chunk_size_degrades_to_single_chunk() {
        let chunks = chunk_words("a b c", 0);
        assert_eq!(chunks, vec!["a b c"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_words("   ", 4).is_empty());
        assert_eq!(bounded_text("", 100), "");
    }

    #[test]
    fn bounded_text_keeps_whole_leading_chunks() {
        let words: Vec<String> = (0..1000).map(|i| format!("w{i}")).collect();
        let text = words.join(" ");
        let bounded = bounded_text(&text, 800);
        // Two whole 400-word chunks fit; the rest is dropped.
        assert_eq!(estimate_words(&bounded), 800);
        assert!(bounded.starts_with("w0 "));
        assert!(bounded.ends_with(" w799"));
    }

    #[test]
    fn bounded_text_is_a_noop_within_budget() {
        let text = "just a few words";
        assert_eq!(bounded_text(text, 100), "just a few words");
    }

    #[test]
    fn bounded_text_cuts_words_when_budget_is_below_one_chunk() {
        let words: Vec<String> = (0..500).map(|i| format!("w{i}")).collect();
        let bounded = bounded_text(&words.join(" "), 10);
        assert_eq!(estimate_words(&bounded), 10);
    }
}
