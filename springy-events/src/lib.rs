//! Event mediator for the Springy framework core.
//!
//! A [Mediator](mediator::Mediator) dispatches named events to registered
//! handlers in descending priority order, with ties running in registration
//! order. Handlers are either direct callbacks or `"service@method"`
//! references resolved through a [Container](springy_container::Container) at
//! dispatch time. Wildcard registrations (`"order.*"`) install master
//! handlers which run after the exact-name handlers of every matching event.
//!
//! ```
//! use springy_container::container::Container;
//! use springy_events::handler::HandlerRef;
//! use springy_events::mediator::Mediator;
//! use springy_container::instance::Value;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let container = Rc::new(RefCell::new(Container::new()));
//! let mut mediator = Mediator::new(container);
//!
//! mediator.on(
//!     "order.created",
//!     HandlerRef::callback(|_| Ok(Value::param("notified"))),
//!     0,
//! );
//!
//! let responses = mediator.fire("order.created", ())?.unwrap_or_default();
//! assert_eq!(responses, vec![Value::param("notified")]);
//! # Ok::<(), springy_events::error::DispatchError>(())
//! ```
//!
//! A handler answering a literal `false` stops the remaining chain; a failing
//! handler aborts dispatch with an error. Events with no exact-name handlers
//! are not dispatched at all, even when matching master handlers exist.

pub mod error;
pub mod handler;
pub mod mediator;

pub use error::DispatchError;
pub use mediator::Mediator;
