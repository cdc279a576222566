//! Pointer aliases and the value model shared by registrations, factories and
//! lookups.
//!
//! Everything a [Container](crate::container::Container) hands out is either
//! plain parameter data ([Value::Param]) or a type-erased object instance
//! ([Value::Object]). Registrations enter through [Binding], whose variant
//! selects the registration kind up front instead of inspecting values at
//! runtime.

use crate::container::Container;
use crate::error::ContainerError;
use derivative::Derivative;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

/// Shared pointer to a container-managed object instance.
pub type InstancePtr<T> = Rc<T>;

/// Type-erased [InstancePtr].
pub type InstanceAnyPtr = InstancePtr<dyn Any>;

/// Shared handle to a [Container], for collaborators which resolve services
/// on demand while the container stays open for registration.
pub type ContainerPtr = Rc<RefCell<Container>>;

/// Type-erased error produced by user-supplied callables.
pub type ErrorPtr = Rc<dyn Error>;

/// Deferred-computation callable registered with
/// [bind](crate::container::Container::bind) or as a pending shared instance.
/// Factories receive the owning container and the positional arguments of the
/// current [make](crate::container::Container::make) call (empty when resolving
/// without explicit arguments).
pub type FactoryFn = Rc<dyn Fn(&mut Container, &[Value]) -> Result<Value, ContainerError>>;

/// Post-construction hook registered with
/// [extend](crate::container::Container::extend), applied to factory results
/// in registration order.
pub type ExtensionFn = Rc<dyn Fn(Value, &mut Container) -> Result<Value, ContainerError>>;

/// A value resolvable from a [Container]: plain parameter data or a live
/// object instance.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum Value {
    /// Plain data: null, primitives, arrays, maps. Never a live object.
    Param(JsonValue),
    /// A realized object instance.
    Object(#[derivative(Debug = "ignore")] InstanceAnyPtr),
}

impl Value {
    pub fn param(value: impl Into<JsonValue>) -> Self {
        Self::Param(value.into())
    }

    /// Wraps an owned object into a fresh [InstancePtr].
    pub fn object<T: Any>(value: T) -> Self {
        Self::Object(Rc::new(value))
    }

    pub fn from_instance(instance: InstanceAnyPtr) -> Self {
        Self::Object(instance)
    }

    pub fn as_param(&self) -> Option<&JsonValue> {
        match self {
            Self::Param(value) => Some(value),
            Self::Object(_) => None,
        }
    }

    pub fn into_object(self) -> Option<InstanceAnyPtr> {
        match self {
            Self::Object(instance) => Some(instance),
            Self::Param(_) => None,
        }
    }

    /// Downcasts an object value to a concrete type.
    pub fn downcast<T: Any>(&self) -> Option<InstancePtr<T>> {
        match self {
            Self::Object(instance) => instance.clone().downcast::<T>().ok(),
            Self::Param(_) => None,
        }
    }
}

impl PartialEq for Value {
    /// Params compare structurally, objects by pointer identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Param(lhs), Self::Param(rhs)) => lhs == rhs,
            (Self::Object(lhs), Self::Object(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

/// Registration input for [Container] write operations. The variant selects
/// the registration kind: plain data becomes a parameter, a deferred callable
/// becomes a factory (or a pending shared instance), a realized object
/// becomes a shared instance.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum Binding {
    Param(JsonValue),
    Deferred(#[derivative(Debug = "ignore")] FactoryFn),
    Instance(#[derivative(Debug = "ignore")] InstanceAnyPtr),
}

impl Binding {
    pub fn param(value: impl Into<JsonValue>) -> Self {
        Self::Param(value.into())
    }

    pub fn deferred<F>(factory: F) -> Self
    where
        F: Fn(&mut Container, &[Value]) -> Result<Value, ContainerError> + 'static,
    {
        Self::Deferred(Rc::new(factory))
    }

    /// Wraps an owned object into a fresh [InstancePtr].
    pub fn instance<T: Any>(value: T) -> Self {
        Self::Instance(Rc::new(value))
    }

    pub fn from_instance(instance: InstanceAnyPtr) -> Self {
        Self::Instance(instance)
    }
}
