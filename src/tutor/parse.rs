//! Extraction of a summary and an example from the follow-up completion
//!
//! Models do not reliably follow the requested layout, so extraction tries
//! an ordered list of strategies and the first one that applies wins.

use regex::Regex;
use std::sync::OnceLock;

/// Summary and example pulled out of a follow-up completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Simplified {
    /// Short restatement of the answer
    pub summary: Option<String>,
    /// One real-world example
    pub example: Option<String>,
}

type Strategy = fn(&str) -> Option<Simplified>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("blank_line", split_on_blank_line),
    ("line_pairs", split_on_lines),
    ("example_keyword", split_on_example_keyword),
];

fn blank_line() -> &'static Regex {
    static BLANK_LINE: OnceLock<Regex> = OnceLock::new();
    BLANK_LINE.get_or_init(|| Regex::new(r"\n\s*\n").expect("blank line pattern is valid"))
}

fn example_keyword() -> &'static Regex {
    static EXAMPLE: OnceLock<Regex> = OnceLock::new();
    EXAMPLE.get_or_init(|| Regex::new(r"(?i)example").expect("example pattern is valid"))
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Split a follow-up completion into summary and example
///
/// # Examples
///
/// ```
/// use learnify::tutor::parse::parse_simplified;
///
/// let parsed = parse_simplified("Summary sentence.\n\nExample sentence.");
/// assert_eq!(parsed.summary.as_deref(), Some("Summary sentence."));
/// assert_eq!(parsed.example.as_deref(), Some("Example sentence."));
/// ```
pub fn parse_simplified(text: &str) -> Simplified {
    let text = text.trim();
    if text.is_empty() {
        return Simplified::default();
    }

    for (name, strategy) in STRATEGIES {
        if let Some(parsed) = strategy(text) {
            tracing::debug!("Follow-up parsed with {} strategy", name);
            return parsed;
        }
    }

    Simplified {
        summary: Some(text.to_string()),
        example: None,
    }
}

fn split_on_blank_line(text: &str) -> Option<Simplified> {
    let blocks: Vec<&str> = blank_line().split(text).collect();
    if blocks.len() < 2 {
        return None;
    }

    Some(Simplified {
        summary: non_empty(blocks[0].trim().to_string()),
        example: non_empty(blocks[1..].join("\n\n").trim().to_string()),
    })
}

fn split_on_lines(text: &str) -> Option<Simplified> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < 2 {
        return None;
    }

    Some(Simplified {
        summary: non_empty(lines[..2].join(" ")),
        example: non_empty(lines[2..].join(" ")),
    })
}

fn split_on_example_keyword(text: &str) -> Option<Simplified> {
    let found = example_keyword().find(text)?;

    Some(Simplified {
        summary: non_empty(text[..found.start()].trim().to_string()),
        example: non_empty(text[found.start()..].trim().to_string()),
    })
}
