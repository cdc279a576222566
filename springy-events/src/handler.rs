//! Handler references, event services and the fan-in conversions used by
//! [Mediator](crate::mediator::Mediator) registration and dispatch.

use crate::mediator::Mediator;
use derivative::Derivative;
use derive_more::Constructor;
#[cfg(test)]
use mockall::automock;
use springy_container::instance::{Binding, ErrorPtr, InstanceAnyPtr, InstancePtr, Value};
use std::rc::Rc;

/// Method name used when a service reference omits one.
pub const DEFAULT_HANDLER_METHOD: &str = "handle";

/// Result of a single handler invocation. A `false` parameter response
/// short-circuits the remaining dispatch chain.
pub type HandlerResult = Result<Value, ErrorPtr>;

/// Direct event handler callable, invoked with the fired event's positional
/// arguments.
pub type HandlerFn = Rc<dyn Fn(&[Value]) -> HandlerResult>;

/// Container-managed service receiving events through named methods.
///
/// Name-based handler references (`"mailer@deliver"`) resolve the service
/// from the container at dispatch time and invoke [EventService::call] with
/// the method name and the event arguments. Register implementations with
/// [service_binding] so the dispatch-time downcast can recover them.
#[cfg_attr(test, automock)]
pub trait EventService {
    fn call(&self, method: &str, args: &[Value]) -> HandlerResult;
}

pub type EventServicePtr = InstancePtr<dyn EventService>;

/// A service which registers its own event handlers on the mediator.
#[cfg_attr(test, automock)]
pub trait Subscriber {
    fn subscribes(&self, mediator: &mut Mediator);
}

pub type SubscriberPtr = InstancePtr<dyn Subscriber>;

/// Target of a name-based handler reference: a container service key plus the
/// method to invoke on it.
#[derive(Clone, Constructor, Debug, Eq, PartialEq)]
pub struct ServiceMethod {
    pub service: String,
    pub method: String,
}

impl ServiceMethod {
    /// Parses a `"service@method"` reference; the method defaults to
    /// [DEFAULT_HANDLER_METHOD] when omitted.
    pub fn parse(reference: &str) -> Self {
        match reference.split_once('@') {
            Some((service, method)) => Self::new(service.to_string(), method.to_string()),
            None => Self::new(reference.to_string(), DEFAULT_HANDLER_METHOD.to_string()),
        }
    }
}

/// Reference to an event handler: a direct callback used as-is, or a service
/// name resolved through the container at invocation time. Registration is
/// unchecked - an unregistered service key only surfaces when the event
/// fires.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum HandlerRef {
    Callback(#[derivative(Debug = "ignore")] HandlerFn),
    Service(ServiceMethod),
}

impl HandlerRef {
    pub fn callback<F>(handler: F) -> Self
    where
        F: Fn(&[Value]) -> HandlerResult + 'static,
    {
        Self::Callback(Rc::new(handler))
    }

    /// A `"service@method"` reference, resolved lazily at dispatch time.
    pub fn service(reference: &str) -> Self {
        Self::Service(ServiceMethod::parse(reference))
    }
}

/// Wraps an event service for container registration so name-based handler
/// references can recover it at dispatch time.
pub fn service_binding(service: EventServicePtr) -> Binding {
    Binding::from_instance(Rc::new(service) as InstanceAnyPtr)
}

/// Wraps a subscriber for container registration so
/// [subscribe](crate::mediator::Mediator::subscribe) can recover it.
pub fn subscriber_binding(subscriber: SubscriberPtr) -> Binding {
    Binding::from_instance(Rc::new(subscriber) as InstanceAnyPtr)
}

pub(crate) fn downcast_service(instance: InstanceAnyPtr) -> Option<EventServicePtr> {
    instance
        .downcast::<EventServicePtr>()
        .ok()
        .map(|service| (*service).clone())
}

pub(crate) fn downcast_subscriber(instance: InstanceAnyPtr) -> Option<SubscriberPtr> {
    instance
        .downcast::<SubscriberPtr>()
        .ok()
        .map(|subscriber| (*subscriber).clone())
}

/// Conversion into the list of event names a single
/// [on](crate::mediator::Mediator::on) call registers for.
pub trait EventNames {
    fn into_names(self) -> Vec<String>;
}

impl EventNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl EventNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl EventNames for &[&str] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|name| name.to_string()).collect()
    }
}

impl<const N: usize> EventNames for [&str; N] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|name| name.to_string()).collect()
    }
}

impl EventNames for Vec<String> {
    fn into_names(self) -> Vec<String> {
        self
    }
}

impl EventNames for Vec<&str> {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|name| name.to_string()).collect()
    }
}

/// Positional arguments delivered to handlers when an event fires. A single
/// value is wrapped as a one-element sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventArgs(pub Vec<Value>);

impl From<()> for EventArgs {
    fn from(_: ()) -> Self {
        Self(Vec::new())
    }
}

impl From<Value> for EventArgs {
    fn from(value: Value) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<Value>> for EventArgs {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<&[Value]> for EventArgs {
    fn from(values: &[Value]) -> Self {
        Self(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use crate::handler::{
        downcast_service, service_binding, EventArgs, EventNames, EventService, HandlerResult,
        ServiceMethod,
    };
    use springy_container::instance::{Binding, InstanceAnyPtr, Value};
    use std::rc::Rc;

    struct NullService;

    impl EventService for NullService {
        fn call(&self, _method: &str, _args: &[Value]) -> HandlerResult {
            Ok(Value::param(serde_json::Value::Null))
        }
    }

    #[test]
    fn should_parse_service_and_method() {
        assert_eq!(
            ServiceMethod::parse("mailer@deliver"),
            ServiceMethod::new("mailer".to_string(), "deliver".to_string())
        );
    }

    #[test]
    fn should_default_the_method_to_handle() {
        assert_eq!(
            ServiceMethod::parse("mailer"),
            ServiceMethod::new("mailer".to_string(), "handle".to_string())
        );
    }

    #[test]
    fn should_split_on_the_first_separator() {
        assert_eq!(
            ServiceMethod::parse("mailer@deliver@now"),
            ServiceMethod::new("mailer".to_string(), "deliver@now".to_string())
        );
    }

    #[test]
    fn should_round_trip_service_bindings() {
        let binding = service_binding(Rc::new(NullService));

        let instance = match binding {
            Binding::Instance(instance) => instance,
            _ => panic!("expected an instance binding"),
        };

        assert!(downcast_service(instance).is_some());
        assert!(downcast_service(Rc::new(NullService) as InstanceAnyPtr).is_none());
    }

    #[test]
    fn should_convert_event_name_lists() {
        assert_eq!("a".into_names(), vec!["a".to_string()]);
        assert_eq!(["a", "b"].into_names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            vec!["a".to_string(), "b".to_string()].into_names(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn should_wrap_single_values_as_argument_lists() {
        assert_eq!(EventArgs::from(()), EventArgs(Vec::new()));
        assert_eq!(
            EventArgs::from(Value::param(1)),
            EventArgs(vec![Value::param(1)])
        );
        assert_eq!(
            EventArgs::from(vec![Value::param(1), Value::param(2)]),
            EventArgs(vec![Value::param(1), Value::param(2)])
        );
    }
}
