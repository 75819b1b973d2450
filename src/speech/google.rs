//! Google Translate text-to-speech URL provider
//!
//! Builds `translate_tts` URLs for text spans. The endpoint rejects spans
//! longer than 200 characters, so the bulk variant splits text at
//! whitespace or punctuation before building one URL per piece.

use crate::error::{LearnifyError, Result};
use crate::speech::resolver::SpeechSynthesizer;
use async_trait::async_trait;
use url::Url;

/// Longest span the endpoint accepts
pub const MAX_SPAN_CHARS: usize = 200;

/// Punctuation the bulk splitter may break after, including CJK forms
const SPLIT_PUNCTUATION: &[char] = &[
    ',', '.', '!', '?', ';', ':', '，', '。', '！', '？', '；', '：', '、',
];

/// translate_tts URL builder
#[derive(Debug, Clone)]
pub struct GoogleTranslateTts {
    host: String,
    slow: bool,
}

impl GoogleTranslateTts {
    /// Create a URL provider for the given host (e.g. `https://translate.google.com`)
    pub fn new(host: impl Into<String>, slow: bool) -> Self {
        Self {
            host: host.into(),
            slow,
        }
    }

    /// Build the URL for a single span
    ///
    /// # Errors
    ///
    /// Returns `LearnifyError::Speech` if the text is empty, longer than
    /// `MAX_SPAN_CHARS`, or the host is not a valid URL
    ///
    /// # Examples
    ///
    /// ```
    /// use learnify::speech::google::GoogleTranslateTts;
    ///
    /// let tts = GoogleTranslateTts::new("https://translate.google.com", false);
    /// let url = tts.span_url("Hello world", "en").unwrap();
    /// assert!(url.starts_with("https://translate.google.com/translate_tts?"));
    /// assert!(url.contains("tl=en"));
    /// ```
    pub fn span_url(&self, text: &str, language_code: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(LearnifyError::Speech("text should be a non-empty string".to_string()).into());
        }

        let text_len = text.chars().count();
        if text_len > MAX_SPAN_CHARS {
            return Err(LearnifyError::Speech(format!(
                "text length ({}) should be at most {} characters",
                text_len, MAX_SPAN_CHARS
            ))
            .into());
        }

        let base = format!("{}/translate_tts", self.host.trim_end_matches('/'));
        let mut url = Url::parse(&base)
            .map_err(|e| LearnifyError::Speech(format!("Invalid TTS host {}: {}", self.host, e)))?;
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("q", text)
            .append_pair("tl", language_code)
            .append_pair("total", "1")
            .append_pair("idx", "0")
            .append_pair("textlen", &text_len.to_string())
            .append_pair("client", "tw-ob")
            .append_pair("prompt", "input")
            .append_pair("ttsspeed", if self.slow { "0.24" } else { "1" });

        Ok(url.into())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn audio_urls(&self, text: &str, language_code: &str) -> Result<Vec<String>> {
        split_long_text(text, MAX_SPAN_CHARS)?
            .iter()
            .map(|piece| self.span_url(piece, language_code))
            .collect()
    }

    async fn audio_url(&self, text: &str, language_code: &str) -> Result<String> {
        self.span_url(text, language_code)
    }
}

fn is_split_point(ch: char) -> bool {
    ch.is_whitespace() || SPLIT_PUNCTUATION.contains(&ch)
}

/// Split text into pieces of at most `max_len` characters, cutting after
/// whitespace or punctuation
///
/// # Errors
///
/// Returns `LearnifyError::Speech` if a run of `max_len` characters has no
/// split point
fn split_long_text(text: &str, max_len: usize) -> Result<Vec<String>> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        if chars.len() - start <= max_len {
            pieces.push(chars[start..].iter().collect::<String>());
            break;
        }

        let mut end = start + max_len - 1;
        let fits_exactly =
            is_split_point(chars[end]) || chars.get(end + 1).is_some_and(|c| is_split_point(*c));

        if !fits_exactly {
            end = (start..=end)
                .rev()
                .find(|&i| is_split_point(chars[i]))
                .ok_or_else(|| {
                    LearnifyError::Speech(format!(
                        "a word is too long to split into {} character pieces",
                        max_len
                    ))
                })?;
        }

        pieces.push(chars[start..=end].iter().collect::<String>());
        start = end + 1;
    }

    Ok(pieces
        .into_iter()
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tts() -> GoogleTranslateTts {
        GoogleTranslateTts::new("https://translate.google.com", false)
    }

    fn query(url: &str, key: &str) -> Option<String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_span_url_parameters() {
        let url = tts().span_url("Gravity pulls apples down.", "hi").unwrap();
        assert_eq!(query(&url, "q").as_deref(), Some("Gravity pulls apples down."));
        assert_eq!(query(&url, "tl").as_deref(), Some("hi"));
        assert_eq!(query(&url, "textlen").as_deref(), Some("26"));
        assert_eq!(query(&url, "client").as_deref(), Some("tw-ob"));
        assert_eq!(query(&url, "ttsspeed").as_deref(), Some("1"));
        assert_eq!(Url::parse(&url).unwrap().host_str(), Some("translate.google.com"));
    }

    #[test]
    fn test_span_url_slow_speed() {
        let slow = GoogleTranslateTts::new("https://translate.google.com/", true);
        let url = slow.span_url("hello", "en").unwrap();
        assert!(url.starts_with("https://translate.google.com/translate_tts?"));
        assert_eq!(query(&url, "ttsspeed").as_deref(), Some("0.24"));
    }

    #[test]
    fn test_span_url_rejects_empty_and_long_text() {
        assert!(tts().span_url("  ", "en").is_err());
        assert!(tts().span_url(&"a".repeat(201), "en").is_err());
        assert!(tts().span_url(&"a".repeat(200), "en").is_ok());
    }

    #[test]
    fn test_split_long_text_short_input_is_single_piece() {
        assert_eq!(split_long_text("Hello there.", 200).unwrap(), vec!["Hello there."]);
    }

    #[test]
    fn test_split_long_text_cuts_at_last_space() {
        let pieces = split_long_text("aaaa bbbb cccc", 7).unwrap();
        assert_eq!(pieces, vec!["aaaa", "bbbb", "cccc"]);
    }

    #[test]
    fn test_split_long_text_cuts_after_punctuation() {
        let pieces = split_long_text("abc,defgh", 5).unwrap();
        assert_eq!(pieces, vec!["abc,", "defgh"]);
    }

    #[test]
    fn test_split_long_text_rejects_unsplittable_word() {
        assert!(split_long_text(&"x".repeat(250), 200).is_err());
    }

    #[tokio::test]
    async fn test_audio_urls_one_per_piece() {
        let text = "word ".repeat(100);
        let urls = tts().audio_urls(&text, "en").await.unwrap();
        assert_eq!(urls.len(), 3);
        for url in &urls {
            let len: usize = query(url, "textlen").unwrap().parse().unwrap();
            assert!(len <= MAX_SPAN_CHARS);
        }
    }

    #[tokio::test]
    async fn test_audio_urls_fails_on_long_word() {
        assert!(tts().audio_urls(&"x".repeat(300), "en").await.is_err());
    }
}
