//! The registry container: a keyed store of parameters, factories and shared
//! instances, resolved through a uniform lookup protocol.
//!
//! Each key is registered under exactly one [Kind]. Parameters are plain data
//! returned by value; factories produce a fresh result on every
//! [make](Container::make), optionally post-processed by
//! [extensions](Container::extend); shared instances are returned by identity,
//! with deferred registrations realized exactly once on first
//! [shared](Container::shared) lookup. [resolve](Container::resolve) is the
//! generic entry point dispatching on the registered kind.

use crate::error::ContainerError;
use crate::instance::{Binding, ExtensionFn, FactoryFn, InstanceAnyPtr, Value};
use derivative::Derivative;
use fxhash::{FxHashMap, FxHashSet};
use serde_json::Value as JsonValue;
use std::rc::Rc;
use tracing::{debug, trace};

/// Discriminator recording how a registered key is resolved.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    Param,
    Factory,
    Shared,
}

#[derive(Derivative)]
#[derivative(Debug)]
enum Registration {
    Param(JsonValue),
    Factory {
        #[derivative(Debug = "ignore")]
        factory: FactoryFn,
        #[derivative(Debug = "ignore")]
        extensions: Vec<ExtensionFn>,
    },
    Shared(SharedEntry),
}

impl Registration {
    fn kind(&self) -> Kind {
        match self {
            Self::Param(_) => Kind::Param,
            Self::Factory { .. } => Kind::Factory,
            Self::Shared(_) => Kind::Shared,
        }
    }
}

/// State of a shared registration. A pending construction collapses into a
/// realized instance exactly once; further lookups never re-invoke the
/// factory.
#[derive(Derivative)]
#[derivative(Debug)]
enum SharedEntry {
    Pending(#[derivative(Debug = "ignore")] FactoryFn),
    Realized(#[derivative(Debug = "ignore")] InstanceAnyPtr),
}

/// Keyed registry of parameters, factories and shared instances.
///
/// Designed for a single request lifecycle: factories may re-enter the
/// container they are given to resolve other keys, but nothing is
/// thread-safe. Same-key re-entry during construction is reported as a
/// [DependencyCycle](ContainerError::DependencyCycle) instead of recursing
/// unboundedly.
#[derive(Debug, Default)]
pub struct Container {
    registrations: FxHashMap<String, Registration>,
    keys_under_construction: FxHashSet<String>,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` as a plain parameter and returns the stored value. A
    /// deferred binding is invoked immediately with the container; object
    /// instances are rejected - register those with [Container::instance].
    pub fn raw(
        &mut self,
        key: impl Into<String>,
        value: Binding,
    ) -> Result<JsonValue, ContainerError> {
        let key = key.into();
        let param = match value {
            Binding::Param(param) => param,
            Binding::Deferred(factory) => match self.construct(&key, &factory, &[])? {
                Value::Param(param) => param,
                Value::Object(_) => {
                    return Err(ContainerError::InvalidRegistration {
                        key,
                        reason: "deferred parameter produced an object instance".to_string(),
                    })
                }
            },
            Binding::Instance(_) => {
                return Err(ContainerError::InvalidRegistration {
                    key,
                    reason: "object instances must be registered with `instance`".to_string(),
                })
            }
        };

        trace!(%key, "registering parameter");
        self.registrations
            .insert(key, Registration::Param(param.clone()));

        Ok(param)
    }

    /// Returns the parameter stored under `key`.
    pub fn param(&self, key: &str) -> Result<JsonValue, ContainerError> {
        match self.registrations.get(key) {
            Some(Registration::Param(param)) => Ok(param.clone()),
            _ => Err(ContainerError::NotRegistered(key.to_string())),
        }
    }

    /// Registers `key` as a factory, replacing any previous registration.
    pub fn bind<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn(&mut Container, &[Value]) -> Result<Value, ContainerError> + 'static,
    {
        let key = key.into();
        trace!(%key, "registering factory");
        self.registrations.insert(
            key,
            Registration::Factory {
                factory: Rc::new(factory),
                extensions: Vec::new(),
            },
        );
    }

    /// Invokes the factory registered under `key` with the given positional
    /// arguments and applies its extensions in registration order. Every call
    /// produces a fresh result.
    pub fn make(&mut self, key: &str, args: &[Value]) -> Result<Value, ContainerError> {
        let (factory, extensions) = match self.registrations.get(key) {
            Some(Registration::Factory {
                factory,
                extensions,
            }) => (factory.clone(), extensions.clone()),
            _ => return Err(ContainerError::NotRegistered(key.to_string())),
        };

        let mut result = self.construct(key, &factory, args)?;
        for extension in &extensions {
            result = extension(result, self)?;
        }

        Ok(result)
    }

    /// Appends a post-construction extension to the factory registered under
    /// `key`. Extensions apply to factories only, never to parameters or
    /// shared instances.
    pub fn extend<F>(&mut self, key: &str, extension: F) -> Result<(), ContainerError>
    where
        F: Fn(Value, &mut Container) -> Result<Value, ContainerError> + 'static,
    {
        match self.registrations.get_mut(key) {
            Some(Registration::Factory { extensions, .. }) => {
                extensions.push(Rc::new(extension));
                Ok(())
            }
            _ => Err(ContainerError::NotRegistered(key.to_string())),
        }
    }

    /// Registers `key` as a shared instance. A deferred binding is stored for
    /// lazy construction on the first [Container::shared] lookup and `None`
    /// is returned; a realized object is stored and returned directly. Plain
    /// data is rejected - register parameters with [Container::raw].
    pub fn instance(
        &mut self,
        key: impl Into<String>,
        value: Binding,
    ) -> Result<Option<InstanceAnyPtr>, ContainerError> {
        let key = key.into();
        match value {
            Binding::Instance(instance) => {
                trace!(%key, "registering shared instance");
                self.registrations.insert(
                    key,
                    Registration::Shared(SharedEntry::Realized(instance.clone())),
                );
                Ok(Some(instance))
            }
            Binding::Deferred(factory) => {
                trace!(%key, "registering deferred shared instance");
                self.registrations
                    .insert(key, Registration::Shared(SharedEntry::Pending(factory)));
                Ok(None)
            }
            Binding::Param(_) => Err(ContainerError::InvalidRegistration {
                key,
                reason: "plain data must be registered with `raw`".to_string(),
            }),
        }
    }

    /// Returns the shared instance registered under `key`, constructing and
    /// caching it first if the registration is still pending.
    pub fn shared(&mut self, key: &str) -> Result<InstanceAnyPtr, ContainerError> {
        let factory = match self.registrations.get(key) {
            Some(Registration::Shared(SharedEntry::Realized(instance))) => {
                return Ok(instance.clone())
            }
            Some(Registration::Shared(SharedEntry::Pending(factory))) => factory.clone(),
            _ => return Err(ContainerError::NotRegistered(key.to_string())),
        };

        debug!(%key, "realizing deferred shared instance");

        let instance = match self.construct(key, &factory, &[])? {
            Value::Object(instance) => instance,
            Value::Param(_) => {
                return Err(ContainerError::InvalidRegistration {
                    key: key.to_string(),
                    reason: "deferred shared instance produced plain data".to_string(),
                })
            }
        };

        self.registrations.insert(
            key.to_string(),
            Registration::Shared(SharedEntry::Realized(instance.clone())),
        );

        Ok(instance)
    }

    /// True iff `key` is registered, regardless of kind.
    pub fn has(&self, key: &str) -> bool {
        self.registrations.contains_key(key)
    }

    /// Returns the registration kind for `key`, if any.
    pub fn kind(&self, key: &str) -> Option<Kind> {
        self.registrations.get(key).map(Registration::kind)
    }

    /// Generic lookup: dispatches to [Container::make], [Container::shared]
    /// or [Container::param] according to the registered kind.
    pub fn resolve(&mut self, key: &str) -> Result<Value, ContainerError> {
        match self.kind(key) {
            Some(Kind::Param) => self.param(key).map(Value::Param),
            Some(Kind::Factory) => self.make(key, &[]),
            Some(Kind::Shared) => self.shared(key).map(Value::Object),
            None => Err(ContainerError::NotRegistered(key.to_string())),
        }
    }

    /// Removes every trace of `key`. Safe to call for unregistered keys.
    pub fn forget(&mut self, key: &str) {
        if self.registrations.remove(key).is_some() {
            trace!(%key, "forgot registration");
        }
    }

    /// Assignment-style registration: any previous registration for `key` is
    /// forgotten, then the binding registers under the kind its variant
    /// selects - deferred callables as factories, objects as shared
    /// instances, plain data as parameters.
    pub fn set(&mut self, key: impl Into<String>, value: Binding) {
        let key = key.into();
        self.forget(&key);

        let registration = match value {
            Binding::Param(param) => Registration::Param(param),
            Binding::Deferred(factory) => Registration::Factory {
                factory,
                extensions: Vec::new(),
            },
            Binding::Instance(instance) => {
                Registration::Shared(SharedEntry::Realized(instance))
            }
        };

        trace!(%key, kind = ?registration.kind(), "registering by inferred kind");
        self.registrations.insert(key, registration);
    }

    fn construct(
        &mut self,
        key: &str,
        factory: &FactoryFn,
        args: &[Value],
    ) -> Result<Value, ContainerError> {
        if self.keys_under_construction.contains(key) {
            return Err(ContainerError::DependencyCycle(key.to_string()));
        }

        self.keys_under_construction.insert(key.to_string());
        let result = factory(self, args);
        self.keys_under_construction.remove(key);

        result
    }
}
