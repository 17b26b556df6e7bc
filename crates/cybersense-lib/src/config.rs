/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIMENSION: usize = 384;

/// Name of the sentence-embedding model.
///
/// The same model must embed both document chunks at ingest time and the
/// query at retrieval time; a mismatch degrades retrieval quality without
/// any error signal. The name is persisted in `index_meta` at ingest time
/// and checked (with a warning) at query time.
pub const EMBEDDING_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Target chunk size in characters for document splitting.
pub const CHUNK_SIZE_CHARS: usize = 800;

/// Overlap in characters between adjacent chunks of the same document.
pub const CHUNK_OVERLAP_CHARS: usize = 100;

/// Default number of top-k results for vector similarity search.
pub const DEFAULT_TOP_K: usize = 5;

/// Maximum length in characters of an assembled prompt.
///
/// Prompts over this budget are rejected with an explicit error rather
/// than silently truncated.
pub const MAX_PROMPT_CHARS: usize = 30_000;

/// Default hosted generation model.
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";

/// Default base URL of the generation API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the generation API credential.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable overriding the generation model.
pub const GEMINI_MODEL_VAR: &str = "GEMINI_MODEL";

/// Environment variable overriding the generation API base URL.
pub const GEMINI_BASE_URL_VAR: &str = "GEMINI_BASE_URL";

/// Upper bound on generated output length, in tokens.
pub const GENERATION_MAX_OUTPUT_TOKENS: u32 = 600;

/// Sampling temperature. Low, to favor grounded answers over variation.
pub const GENERATION_TEMPERATURE: f64 = 0.3;

/// Nucleus sampling bound.
pub const GENERATION_TOP_P: f64 = 0.8;

/// Top-k sampling bound.
pub const GENERATION_TOP_K: u32 = 40;

/// Wait bound on a single generation call, in seconds.
pub const GENERATION_TIMEOUT_SECS: u64 = 60;

/// Response for an empty or whitespace-only question. No retrieval or
/// generation is attempted.
pub const EMPTY_QUESTION_MESSAGE: &str = "Please provide a question for advice.";

/// Response when retrieval finds no matching chunks. No model call is made.
pub const NO_CONTEXT_MESSAGE: &str = "Sorry, I couldn't find relevant information in the \
reference corpus. For case-specific guidance, please consult a qualified lawyer.";

/// Fallback returned by the generator for an empty prompt, instead of
/// calling the model.
pub const EMPTY_PROMPT_FALLBACK: &str = "I'm sorry, but I couldn't process that query. \
Please try rephrasing your question.";
