use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::{
    AnthropicClient, EntityRecognizer, NER_SYSTEM_PROMPT, build_ner_user_prompt, locate_names,
    person_names_tool,
};
use crate::models::EntitySpan;

/// Configuration for LLM-backed recognition
#[derive(Debug, Clone)]
pub struct LlmRecognizerConfig {
    /// Upper bound on bytes of transcript sent per request
    pub max_chunk_bytes: usize,
}

impl Default for LlmRecognizerConfig {
    fn default() -> Self {
        Self {
            max_chunk_bytes: 12_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersonNames {
    names: Vec<String>,
}

/// Recognizer that asks Claude for the person names in each chunk of the
/// transcript and then locates every occurrence in the full text
pub struct LlmRecognizer {
    client: AnthropicClient,
    config: LlmRecognizerConfig,
}

impl LlmRecognizer {
    pub fn new(client: AnthropicClient, config: LlmRecognizerConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl EntityRecognizer for LlmRecognizer {
    fn name(&self) -> &str {
        "llm"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let chunks = chunk_text(text, self.config.max_chunk_bytes);
        let tool = person_names_tool();
        let mut names: Vec<String> = Vec::new();

        info!(
            "Requesting person names for {} chunks from {}",
            chunks.len(),
            self.client.model()
        );

        for (i, chunk) in chunks.iter().enumerate() {
            let user_prompt = build_ner_user_prompt(chunk, i, chunks.len());
            let input = self
                .client
                .send_with_tool(NER_SYSTEM_PROMPT, &user_prompt, &tool)
                .await
                .with_context(|| format!("Name extraction failed for chunk {}", i))?;
            let found: PersonNames =
                serde_json::from_value(input).context("Failed to parse tool input as person names")?;

            debug!("Chunk {}: {} names", i, found.names.len());
            for name in found.names {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        Ok(locate_names(text, &names))
    }
}

/// Split `text` at line breaks into chunks of at most `max_bytes`.
///
/// A single line longer than `max_bytes` becomes a chunk of its own, so
/// speaker lines are never cut in half.
pub fn chunk_text(text: &str, max_bytes: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut chunk_start = 0usize;
    let mut last_break = 0usize;

    for (i, _) in text.match_indices('\n') {
        let line_end = i + 1;
        if line_end - chunk_start > max_bytes && last_break > chunk_start {
            chunks.push(&text[chunk_start..last_break]);
            chunk_start = last_break;
        }
        last_break = line_end;
    }

    if text.len() - chunk_start > max_bytes && last_break > chunk_start {
        chunks.push(&text[chunk_start..last_break]);
        chunk_start = last_break;
    }
    if chunk_start < text.len() {
        chunks.push(&text[chunk_start..]);
    }

    chunks
}
