use thiserror::Error;

/// Errors reported by [Container](crate::container::Container) registration
/// and lookup operations.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ContainerError {
    #[error("nothing registered under key: {0}")]
    NotRegistered(String),
    #[error("invalid registration for key '{key}': {reason}")]
    InvalidRegistration { key: String, reason: String },
    #[error("dependency cycle detected while constructing key: {0}")]
    DependencyCycle(String),
}
