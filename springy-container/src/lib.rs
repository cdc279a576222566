//! Keyed service registry for the Springy framework core.
//!
//! A [Container](container::Container) maps string keys to one of three
//! registration kinds: plain parameters, factories producing a fresh value on
//! every [make](container::Container::make), and shared instances returned by
//! identity on every [shared](container::Container::shared) lookup. Shared
//! instances can be registered as deferred callables, which are realized
//! exactly once on first lookup.
//!
//! ```
//! use springy_container::container::Container;
//! use springy_container::instance::{Binding, Value};
//!
//! struct Mailer;
//!
//! let mut container = Container::new();
//! container.raw("mail.sender", Binding::param("noreply@example.com"))?;
//! container.instance("mailer", Binding::deferred(|_, _| Ok(Value::object(Mailer))))?;
//!
//! let mailer = container.shared("mailer")?;
//! assert!(std::rc::Rc::ptr_eq(&mailer, &container.shared("mailer")?));
//! # Ok::<(), springy_container::error::ContainerError>(())
//! ```
//!
//! The container is designed for a single request lifecycle: lookups are
//! re-entrant (a factory may resolve other keys from the container it is
//! given), but nothing is thread-safe.

pub mod container;
pub mod error;
pub mod instance;

pub use container::Container;
pub use error::ContainerError;
