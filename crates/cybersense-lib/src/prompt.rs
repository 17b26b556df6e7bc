use crate::retrieve::Hit;

/// Fixed system instruction for the cyber-law advisor.
pub const SYSTEM_INSTRUCTIONS: &str = "You are CyberSense, a reliable cyber law advisor \
for India, providing clear, professional guidance with empathy and precision. Use formal, \
straightforward language that stays accessible and reassuring. Analyze the user's query \
first and tailor the response to its intent: for a direct legal question, lead with a \
concise assessment and the relevant risks; for a request for advice, prioritize an action \
plan of two to four steps; for a vague or broad query, start with one or two clarifying \
questions before offering preliminary guidance. Use markdown sparingly, only where it \
improves readability. Target 150 to 250 words. Rely solely on the provided CONTEXT, with \
no assumptions or external knowledge; if the context is insufficient, note it politely \
and suggest consulting a qualified lawyer. Include a natural disclaimer that this is \
general information, not legal advice.";

/// Visible separator between context chunks.
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Assemble the generation prompt from the question and retrieved hits.
///
/// Pure function: the same `(question, hits)` always yields byte-identical
/// output. Hit order is preserved as retrieved; there is no re-ranking, no
/// dedup of near-identical chunks, and no truncation. The caller enforces
/// the prompt length budget.
#[must_use]
pub fn build_prompt(question: &str, hits: &[Hit]) -> String {
    let context_block = hits
        .iter()
        .map(|hit| hit.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    format!(
        "{SYSTEM_INSTRUCTIONS}\n\n\
         CONTEXT:\n{context_block}\n\n\
         USER QUESTION: {question}\n\n\
         Ground the answer in the CONTEXT above and format it as markdown."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(text: &str) -> Hit {
        Hit {
            text: text.to_string(),
            source: "law.pdf".to_string(),
            chunk_index: 0,
            score: 0.1,
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let hits = vec![hit("chunk one"), hit("chunk two")];
        let a = build_prompt("Is this legal?", &hits);
        let b = build_prompt("Is this legal?", &hits);
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_contains_question_and_hits_in_order() {
        let hits = vec![hit("first context chunk"), hit("second context chunk")];
        let prompt = build_prompt("What is Section 66E?", &hits);

        assert!(prompt.contains("USER QUESTION: What is Section 66E?"));
        let first = prompt.find("first context chunk").unwrap();
        let second = prompt.find("second context chunk").unwrap();
        assert!(first < second);
    }

    #[test]
    fn hits_are_joined_with_visible_separator() {
        let hits = vec![hit("one"), hit("two")];
        let prompt = build_prompt("q", &hits);
        assert!(prompt.contains("one\n\n---\n\ntwo"));
    }

    #[test]
    fn prompt_starts_with_system_instructions() {
        let prompt = build_prompt("q", &[hit("ctx")]);
        assert!(prompt.starts_with(SYSTEM_INSTRUCTIONS));
    }

    #[test]
    fn duplicate_hits_are_not_deduplicated() {
        let hits = vec![hit("repeated"), hit("repeated")];
        let prompt = build_prompt("q", &hits);
        assert_eq!(prompt.matches("repeated").count(), 2);
    }
}
