//! Bootstrap errors.

use quill_config::ConfigError;
use quill_renderer::RegistryError;

/// Error raised while assembling an [`Engine`](crate::Engine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Registry(#[from] RegistryError),
}
