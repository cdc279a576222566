use springy_container::error::ContainerError;
use springy_container::instance::ErrorPtr;
use thiserror::Error;

/// Errors raised while dispatching events or resolving name-based handler
/// references.
#[derive(Error, Clone, Debug)]
pub enum DispatchError {
    #[error("cannot resolve event service '{0}': {1}")]
    ServiceResolution(String, ContainerError),
    #[error("'{0}' does not resolve to an event service")]
    NotAnEventService(String),
    #[error("'{0}' does not resolve to a subscriber")]
    NotASubscriber(String),
    #[error("handler for event '{0}' failed: {1}")]
    HandlerFailed(String, ErrorPtr),
}
