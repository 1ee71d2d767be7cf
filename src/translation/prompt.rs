//! Prompt construction
//!
//! Plain concatenation: the caller is responsible for any quoting the
//! input needs.

/// Default target language
pub const DEFAULT_TARGET_LANGUAGE: &str = "de";

/// Append `instruction` after `input`
pub fn build_prompt(input: &str, instruction: &str) -> String {
    let mut prompt = String::with_capacity(input.len() + instruction.len());
    prompt.push_str(input);
    prompt.push_str(instruction);
    prompt
}

/// Instruction asking the model to translate the quoted strings of the
/// preceding text into `target_language`
pub fn translation_instruction(target_language: &str) -> String {
    format!(
        "\n\nTranslate the quoted strings above to {}. Preserve the format as is. \
         No introduction or conclusion is needed.\n\n\t\t\n",
        target_language
    )
}

/// Full translation prompt for `input`
pub fn translation_prompt(input: &str, target_language: &str) -> String {
    build_prompt(input, &translation_instruction(target_language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_is_concatenation() {
        assert_eq!(build_prompt("a: \"b\"", " c"), "a: \"b\" c");
        assert_eq!(build_prompt("", "only"), "only");
    }

    #[test]
    fn test_no_escaping() {
        let input = "quote: \"{{name}}\" \\n";
        assert!(build_prompt(input, "!").starts_with(input));
    }

    #[test]
    fn test_translation_prompt() {
        let prompt = translation_prompt("one: \"Translation\"", "fr");

        assert!(prompt.starts_with("one: \"Translation\"\n\n"));
        assert!(prompt.contains(
            "Translate the quoted strings above to fr. Preserve the format as is. \
             No introduction or conclusion is needed."
        ));
        assert!(prompt.ends_with("\n\n\t\t\n"));
    }
}
