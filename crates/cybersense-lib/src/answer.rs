use rusqlite::Connection;
use tracing::debug;

use crate::config::{EMPTY_QUESTION_MESSAGE, MAX_PROMPT_CHARS, NO_CONTEXT_MESSAGE};
use crate::embedding::embedder::Embedder;
use crate::error::GenerationError;
use crate::generate::AnswerGenerator;
use crate::history::{format_history, Turn};
use crate::prompt::build_prompt;
use crate::retrieve::{retrieve_top_k, Hit};

/// The orchestrator's result: the answer text plus the hits it was
/// grounded on, for citation display by the caller.
#[derive(Debug)]
pub struct Answer {
    pub response: String,
    pub hits: Vec<Hit>,
}

/// Answer a question over the indexed corpus.
///
/// Sequence: reject empty questions with a fixed guidance message (no
/// retrieval attempted); retrieve top-k hits; with no hits, return a fixed
/// fallback (no model call); otherwise build the prompt, append the
/// flattened history, enforce the prompt budget, and call the generator.
///
/// Generator failures propagate to the caller (downcastable to
/// [`GenerationError`]); there is no retry. The two local recoveries above
/// are the only cases handled here.
pub fn answer_question(
    conn: &Connection,
    embedder: &mut Embedder,
    generator: &dyn AnswerGenerator,
    question: &str,
    history: &[Turn],
    k: usize,
) -> anyhow::Result<Answer> {
    if question.trim().is_empty() {
        return Ok(Answer {
            response: EMPTY_QUESTION_MESSAGE.to_string(),
            hits: Vec::new(),
        });
    }

    let hits = retrieve_top_k(conn, embedder, question, k)?;
    if hits.is_empty() {
        debug!("no chunks retrieved, skipping generation");
        return Ok(Answer {
            response: NO_CONTEXT_MESSAGE.to_string(),
            hits,
        });
    }

    let mut prompt = build_prompt(question, &hits);
    prompt.push_str(&format_history(history));

    let chars = prompt.chars().count();
    if chars > MAX_PROMPT_CHARS {
        return Err(GenerationError::PromptTooLarge {
            chars,
            limit: MAX_PROMPT_CHARS,
        }
        .into());
    }

    let response = generator.generate(&prompt)?;
    Ok(Answer { response, hits })
}
