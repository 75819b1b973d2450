//! Text segmentation under a length limit
//!
//! The synthesis endpoint only accepts short spans, so answers are split
//! into sentence-packed spans before per-chunk resolution. Lengths are
//! counted in characters, not bytes.

/// Default maximum span length used for per-chunk resolution
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 180;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split text into ordered spans of at most `max_len` characters
///
/// Sentences are packed greedily; a sentence that is too long on its own is
/// packed word by word. Words are never split, so a single word longer than
/// `max_len` becomes its own over-long span. Spans are never empty.
///
/// # Examples
///
/// ```
/// use learnify::speech::segmenter::segment;
///
/// let spans = segment("One. Two! Three?", 9);
/// assert_eq!(spans, vec!["One. Two!", "Three?"]);
/// ```
pub fn segment(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut spans = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        if joined_len(&current, sentence) <= max_len {
            append_with_space(&mut current, sentence);
            continue;
        }

        if !current.is_empty() {
            spans.push(std::mem::take(&mut current));
        }

        if char_len(sentence) <= max_len {
            current.push_str(sentence);
            continue;
        }

        for word in sentence.split_whitespace() {
            if joined_len(&current, word) <= max_len {
                append_with_space(&mut current, word);
            } else {
                if !current.is_empty() {
                    spans.push(std::mem::take(&mut current));
                }
                current.push_str(word);
            }
        }
    }

    if !current.is_empty() {
        spans.push(current);
    }

    spans
}

/// Split into sentence-like units, keeping each run of terminal punctuation
/// with the sentence it ends
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut in_terminator_run = false;

    for (idx, ch) in text.char_indices() {
        let is_terminator = SENTENCE_TERMINATORS.contains(&ch);
        if in_terminator_run && !is_terminator {
            sentences.push(&text[start..idx]);
            start = idx;
        }
        in_terminator_run = is_terminator;
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn joined_len(current: &str, next: &str) -> usize {
    if current.is_empty() {
        char_len(next)
    } else {
        char_len(current) + 1 + char_len(next)
    }
}

fn append_with_space(current: &mut String, next: &str) {
    if !current.is_empty() {
        current.push(' ');
    }
    current.push_str(next);
}
