//! The event mediator: publish/subscribe dispatch with priority ordering,
//! wildcard master handlers and container-resolved service handlers.

use crate::error::DispatchError;
use crate::handler::{
    downcast_service, downcast_subscriber, EventArgs, EventNames, EventServicePtr, HandlerRef,
    SubscriberPtr,
};
use fxhash::FxHashMap;
use itertools::Itertools;
use serde_json::Value as JsonValue;
use springy_container::instance::{ContainerPtr, Value};
use std::cmp::Reverse;
use tracing::{debug, trace};

/// Reference to a subscriber handed to [Mediator::subscribe]: either the
/// subscriber itself, or a container key resolved on the spot.
pub enum SubscriberRef {
    Direct(SubscriberPtr),
    Service(String),
}

#[derive(Debug)]
struct MasterHandlers {
    prefix: String,
    handlers: Vec<HandlerRef>,
}

/// Publish/subscribe dispatcher for named events.
///
/// Exact-name handlers run in descending priority order, with ties running in
/// registration order; the flattened order is cached per event and rebuilt
/// after any registration change. Master handlers registered for wildcard
/// names (`"order.*"`) run after the exact handlers of every event matching
/// their prefix. Dispatch only happens for events with at least one
/// exact-name handler - master handlers alone never trigger it.
#[derive(Debug)]
pub struct Mediator {
    container: ContainerPtr,
    handlers: FxHashMap<String, FxHashMap<i32, Vec<HandlerRef>>>,
    ordered: FxHashMap<String, Vec<HandlerRef>>,
    masters: Vec<MasterHandlers>,
    current_event: Option<String>,
}

impl Mediator {
    /// Creates an empty mediator resolving name-based handlers through
    /// `container`.
    pub fn new(container: ContainerPtr) -> Self {
        Self {
            container,
            handlers: Default::default(),
            ordered: Default::default(),
            masters: Default::default(),
            current_event: None,
        }
    }

    /// Registers `handler` for each of `events` at `priority` (higher runs
    /// first). Names containing a `".*"` wildcard register master handlers
    /// matched by prefix instead; their priority is their registration order.
    pub fn on<E: EventNames>(&mut self, events: E, handler: HandlerRef, priority: i32) {
        for event in events.into_names() {
            match wildcard_prefix(&event) {
                Some(prefix) => self.register_master(prefix, handler.clone()),
                None => {
                    trace!(%event, priority, "registering handler");
                    self.handlers
                        .entry(event.clone())
                        .or_default()
                        .entry(priority)
                        .or_default()
                        .push(handler.clone());
                    self.ordered.remove(&event);
                }
            }
        }
    }

    /// Removes every exact-name handler for `event`. Master handlers are
    /// unaffected.
    pub fn off(&mut self, event: &str) {
        if self.handlers.remove(event).is_some() {
            trace!(%event, "removed handlers");
        }
        self.ordered.remove(event);
    }

    /// True iff at least one exact-name handler is registered for `event`.
    /// Master handlers do not count.
    pub fn has_handlers_for(&self, event: &str) -> bool {
        self.handlers
            .get(event)
            .map(|buckets| buckets.values().any(|handlers| !handlers.is_empty()))
            .unwrap_or(false)
    }

    /// Fires `event`, invoking its exact-name handlers in descending priority
    /// order with the given arguments, followed by every master handler whose
    /// prefix matches the event name.
    ///
    /// Returns `None` when no exact-name handler is registered - matching
    /// master handlers alone never trigger a dispatch. Otherwise returns the
    /// responses collected from the chain: a handler answering a literal
    /// `false` stops the chain early (its response is not collected), and a
    /// failing handler aborts dispatch with an error.
    pub fn fire<D: Into<EventArgs>>(
        &mut self,
        event: &str,
        data: D,
    ) -> Result<Option<Vec<Value>>, DispatchError> {
        if !self.has_handlers_for(event) {
            trace!(%event, "no handlers registered, skipping dispatch");
            return Ok(None);
        }

        let EventArgs(args) = data.into();
        let handlers = self.handlers_in_order(event);

        debug!(%event, handlers = handlers.len(), "dispatching event");
        self.current_event = Some(event.to_string());

        let mut responses = Vec::new();
        let mut failure = None;

        for handler in &handlers {
            match self.invoke(event, handler, &args) {
                Ok(response) if is_halt(&response) => {
                    trace!(%event, "handler halted dispatch");
                    break;
                }
                Ok(response) => responses.push(response),
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }

        self.current_event = None;

        match failure {
            Some(error) => Err(error),
            None => Ok(Some(responses)),
        }
    }

    /// Name of the event currently dispatching, if any.
    pub fn current(&self) -> Option<&str> {
        self.current_event.as_deref()
    }

    /// Registers a subscriber's handlers: container-referenced subscribers
    /// are resolved on the spot, then the subscriber registers itself.
    pub fn subscribe(&mut self, subscriber: SubscriberRef) -> Result<(), DispatchError> {
        let subscriber = match subscriber {
            SubscriberRef::Direct(subscriber) => subscriber,
            SubscriberRef::Service(key) => {
                let value = self
                    .container
                    .borrow_mut()
                    .resolve(&key)
                    .map_err(|error| DispatchError::ServiceResolution(key.clone(), error))?;

                value
                    .into_object()
                    .and_then(downcast_subscriber)
                    .ok_or(DispatchError::NotASubscriber(key))?
            }
        };

        debug!("registering subscriber handlers");
        subscriber.subscribes(self);
        Ok(())
    }

    /// Replaces the container used to resolve name-based handlers.
    pub fn set_container(&mut self, container: ContainerPtr) {
        self.container = container;
    }

    /// The container used to resolve name-based handlers.
    pub fn container(&self) -> ContainerPtr {
        self.container.clone()
    }

    fn register_master(&mut self, prefix: String, handler: HandlerRef) {
        trace!(%prefix, "registering master handler");
        if let Some(master) = self
            .masters
            .iter_mut()
            .find(|master| master.prefix == prefix)
        {
            master.handlers.push(handler);
            return;
        }

        self.masters.push(MasterHandlers {
            prefix,
            handlers: vec![handler],
        });
    }

    // Masters are appended fresh on every dispatch instead of being cached,
    // so registering a master never has to invalidate other events' orders.
    fn handlers_in_order(&mut self, event: &str) -> Vec<HandlerRef> {
        if !self.ordered.contains_key(event) {
            let flattened = self
                .handlers
                .get(event)
                .map(|buckets| {
                    buckets
                        .iter()
                        .sorted_by_key(|(priority, _)| Reverse(**priority))
                        .flat_map(|(_, handlers)| handlers.iter().cloned())
                        .collect_vec()
                })
                .unwrap_or_default();
            self.ordered.insert(event.to_string(), flattened);
        }

        let mut handlers = self.ordered.get(event).cloned().unwrap_or_default();
        for master in &self.masters {
            if event.starts_with(&master.prefix) {
                handlers.extend(master.handlers.iter().cloned());
            }
        }

        handlers
    }

    fn invoke(
        &self,
        event: &str,
        handler: &HandlerRef,
        args: &[Value],
    ) -> Result<Value, DispatchError> {
        match handler {
            HandlerRef::Callback(callback) => callback(args)
                .map_err(|error| DispatchError::HandlerFailed(event.to_string(), error)),
            HandlerRef::Service(target) => {
                let service = self.resolve_service(&target.service)?;
                service
                    .call(&target.method, args)
                    .map_err(|error| DispatchError::HandlerFailed(event.to_string(), error))
            }
        }
    }

    fn resolve_service(&self, key: &str) -> Result<EventServicePtr, DispatchError> {
        let value = self
            .container
            .borrow_mut()
            .resolve(key)
            .map_err(|error| DispatchError::ServiceResolution(key.to_string(), error))?;

        value
            .into_object()
            .and_then(downcast_service)
            .ok_or_else(|| DispatchError::NotAnEventService(key.to_string()))
    }
}

/// Extracts the master-handler prefix from a wildcard event name: the portion
/// up to and including the dot preceding `*`.
fn wildcard_prefix(event: &str) -> Option<String> {
    event.find(".*").map(|position| event[..=position].to_string())
}

/// A literal `false` response is the short-circuit marker.
fn is_halt(response: &Value) -> bool {
    matches!(response, Value::Param(JsonValue::Bool(false)))
}
