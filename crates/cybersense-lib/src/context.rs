use std::path::{Path, PathBuf};

/// Environment and path conventions for a CyberSense workspace.
#[derive(Clone, Debug)]
pub struct CyberSenseContext {
    /// Root directory the assistant operates in.
    root: PathBuf,
    log_dir: Option<PathBuf>,
}

impl CyberSenseContext {
    /// Create a new context rooted at the given path (no log directory).
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            log_dir: None,
        }
    }

    /// Create a new context with an explicit log directory.
    #[must_use]
    pub fn with_log_dir(root: PathBuf, log_dir: Option<PathBuf>) -> Self {
        Self { root, log_dir }
    }

    /// Create a context from the current working directory (no log directory).
    pub fn from_cwd() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(cwd))
    }

    /// Root directory of the workspace.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Optional parent directory for log file output.
    /// When set, operational logs are written to JSONL files under this path.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    /// Path to the `.cybersense/` state directory.
    /// Default: `<root>/.cybersense/`
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(".cybersense")
    }

    /// Path to the vector index database file.
    /// Default: `<root>/.cybersense/cybersense.db`
    pub fn db_path(&self) -> PathBuf {
        self.state_dir().join("cybersense.db")
    }

    /// Default directory holding the reference document corpus.
    /// Default: `<root>/data`
    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("data")
    }
}
