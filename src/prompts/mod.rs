//! Prompts sent to the language model
//!
//! The tutor persona is fixed; only the target language varies. The
//! summary prompt asks for a layout the summary parser understands: a
//! short summary, a blank line, then a one-sentence example.

/// Builds the tutor system prompt for a target language
///
/// # Arguments
///
/// * `language` - Human-readable language the answer should be written in
///
/// # Examples
///
/// ```
/// use learnify::prompts::build_system_prompt;
///
/// let prompt = build_system_prompt("Spanish");
/// assert!(prompt.contains("Learnify's AI Student Companion"));
/// assert!(prompt.contains("Spanish"));
/// ```
pub fn build_system_prompt(language: &str) -> String {
    format!(
        "You are Learnify's AI Student Companion, a friendly, patient and clear tutor. \
         Always explain in {language}. Give step-by-step answers with examples, \
         and if possible a simpler summary in {language}."
    )
}

/// Builds the follow-up request asking for a summary and an example
///
/// The primary answer is embedded verbatim after the instructions.
pub fn build_simplify_prompt(language: &str, answer: &str) -> String {
    format!(
        "In {language}, provide a very short (2-3 sentence) summary of the following answer, \
         followed by a one-sentence real-world example. Separate the summary and the example \
         with a blank line. Answer: {answer}"
    )
}
