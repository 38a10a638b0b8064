use super::Tool;

/// Name of the tool the model must call
pub const PERSON_NAMES_TOOL: &str = "submit_person_names";

/// System prompt for person-name extraction
pub const NER_SYSTEM_PROMPT: &str = r#"You extract person names from German parliamentary transcripts.

RULES:
1. Return every person name that occurs in the text, copied EXACTLY as written, character for character.
2. Include titles and offices that are written directly in front of the name when a speaker is introduced, e.g. "Präsidentin Dr. Rita Süssmuth" or "Bundesminister Dr. Theodor Waigel".
3. Include names that are only mentioned, e.g. "Kollege Schmidt".
4. Do NOT include party names, constituencies, institutions or places.
5. Do NOT normalize spelling, umlauts or hyphenation.
6. List each distinct spelling once.

Use the submit_person_names tool to return the names."#;

/// Build the user prompt for one chunk of transcript text
pub fn build_ner_user_prompt(chunk: &str, chunk_index: usize, chunk_count: usize) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("# Transcript excerpt {} of {}\n\n", chunk_index + 1, chunk_count));
    prompt.push_str("```\n");
    prompt.push_str(chunk);
    if !chunk.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str("```\n\n");
    prompt.push_str("List all person names in this excerpt.\n");
    prompt
}

/// Tool schema for person-name extraction
pub fn person_names_tool() -> Tool {
    Tool {
        name: PERSON_NAMES_TOOL.to_string(),
        description: "Submit the person names found in the transcript excerpt".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "names": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Person names exactly as they appear in the text"
                }
            },
            "required": ["names"]
        }),
    }
}
