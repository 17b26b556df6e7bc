use cybersense_lib::context::CyberSenseContext;
use cybersense_lib::db::driver::DatabaseDriver;
use cybersense_lib::db::queries::upsert_chunk;
use cybersense_lib::embedding::embedder::Embedder;
use cybersense_lib::error::GenerationError;
use cybersense_lib::generate::AnswerGenerator;
use cybersense_lib::runtime::Runtime;

/// Build a runtime over a named in-memory database and a temp directory,
/// with the stub embedder forced so tests never touch the network.
pub fn runtime_in_memory(name: &str) -> (tempfile::TempDir, Runtime) {
    std::env::set_var("CYBERSENSE_EMBED_STUB", "1");
    let tmp = tempfile::tempdir().unwrap();
    let context = CyberSenseContext::new(tmp.path().to_path_buf());
    let db = DatabaseDriver::in_memory(name).unwrap();
    (tmp, Runtime { context, db })
}

/// Insert one chunk of `seed.txt` into the runtime's index.
pub fn seed_chunk(db: &DatabaseDriver, embedder: &mut Embedder, index: usize, text: &str) {
    let conn = db.open().unwrap();
    let embeddings = embedder.embed_batch(&[text]).unwrap();
    upsert_chunk(
        &conn,
        &format!("seed.txt_{index}"),
        "seed.txt",
        index,
        text,
        &embeddings[0],
    )
    .unwrap();
}

/// Generator that returns its prompt verbatim.
pub struct EchoGenerator;

impl AnswerGenerator for EchoGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        Ok(prompt.to_string())
    }
}

/// Generator that always fails like a remote outage.
pub struct FailingGenerator;

impl AnswerGenerator for FailingGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Api {
            status: 503,
            message: "upstream unavailable".to_string(),
        })
    }
}
