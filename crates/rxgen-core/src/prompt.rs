//! Prompt construction for regex generation.
//!
//! The prompt is a pure function of its inputs: the fixed system
//! instruction, the user's intent, an optional numbered list of examples
//! and a closing directive describing the JSON reply shape.

use crate::types::resolve_language;

pub const SYSTEM_PROMPT: &str = "You are a senior regular-expression engineer. Design clean, robust and well-explained regular expressions that satisfy the user's intent.
Rules:
- Favor clarity and maintainability. Use grouping and inline flags where they make the pattern easier to read.
- Avoid catastrophic backtracking. Prefer possessive quantifiers or atomic groups where the flavor supports them, and offer a safe alternative where it does not.
- Always provide the final pattern, its flags, a short explanation, sample matches and sample non-matches, and notes.
- Target the flavor named in the reply's \"language\" field. When none is requested, target JavaScript (ECMAScript).
- When the intent involves phrases in a specific locale (for example Filipino/Tagalog phrases such as \"pagbabayad ng utang\"), account for inflections, spacing and punctuation variants, common misspellings and code-switching, and describe them in the notes.";

/// Render the full prompt sent to the generation backend.
pub fn build_prompt(instruction: &str, examples: &[String], language: Option<&str>) -> String {
    let language = resolve_language(language);

    let mut prompt = String::with_capacity(SYSTEM_PROMPT.len() + instruction.len() + 512);
    prompt.push_str(SYSTEM_PROMPT);

    prompt.push_str("\n\nUser Intent:\n");
    prompt.push_str(instruction);

    if !examples.is_empty() {
        prompt.push_str("\n\nUser Examples:");
        for (index, example) in examples.iter().enumerate() {
            prompt.push_str(&format!("\n{}. {}", index + 1, example));
        }
    }

    prompt.push_str(
        "\n\nAnswer with exactly one fenced ```json code block containing a single JSON object with this structure:\n\n",
    );
    prompt.push_str(&format!(
        r#"{{
  "regex": "<pattern without surrounding slashes>",
  "flags": "<flags such as gim>",
  "explanation": "<short explanation>",
  "sampleMatches": ["..."],
  "sampleNonMatches": ["..."],
  "notes": "<edge cases and locale-specific variants>",
  "language": "{language}"
}}
"#
    ));

    prompt
}
