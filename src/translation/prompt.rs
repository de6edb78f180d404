use super::language::language_name;

pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are a translator. Translate the following sentence from {source_language} to {target_language}. \
     Output only the translated sentence without any explanations, quotes, or notes. \
     Keep names, numbers, and punctuation intact.";

/// Builds the system prompt, using full language names where the code is known.
#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(source_language: &str, target_language: &str) -> String {
    // {source_language} and {target_language} are placeholders, not format arguments
    SYSTEM_PROMPT_TEMPLATE
        .replace(
            "{source_language}",
            language_name(source_language).unwrap_or(source_language),
        )
        .replace(
            "{target_language}",
            language_name(target_language).unwrap_or(target_language),
        )
}
