use crate::context::CyberSenseContext;
use crate::db::driver::DatabaseDriver;

/// Immutable dependency bundle for CLI commands.
///
/// Bundles the workspace context and database driver so that all command
/// handlers receive a single `&Runtime` parameter instead of individual
/// dependencies.
pub struct Runtime {
    pub context: CyberSenseContext,
    pub db: DatabaseDriver,
}
