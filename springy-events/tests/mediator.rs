use springy_container::container::Container;
use springy_container::instance::{Binding, Value};
use springy_events::handler::{
    service_binding, subscriber_binding, EventService, HandlerRef, HandlerResult, Subscriber,
};
use springy_events::mediator::{Mediator, SubscriberRef};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct AuditLog {
    entries: RefCell<Vec<String>>,
}

struct Mailer {
    audit: Rc<AuditLog>,
}

impl EventService for Mailer {
    fn call(&self, method: &str, args: &[Value]) -> HandlerResult {
        let order = args
            .first()
            .and_then(Value::as_param)
            .and_then(|param| param.as_str())
            .unwrap_or_default()
            .to_string();
        self.audit.entries.borrow_mut().push(format!("mailer.{method}: {order}"));
        Ok(Value::param("mailed"))
    }
}

struct AuditSubscriber {
    audit: Rc<AuditLog>,
}

impl Subscriber for AuditSubscriber {
    fn subscribes(&self, mediator: &mut Mediator) {
        let audit = self.audit.clone();
        mediator.on(
            "order.*",
            HandlerRef::callback(move |_| {
                audit.entries.borrow_mut().push("audit".to_string());
                Ok(Value::param(serde_json::Value::Null))
            }),
            0,
        );
    }
}

fn build_mediator(audit: &Rc<AuditLog>) -> Mediator {
    let mut container = Container::new();
    container
        .instance(
            "mailer",
            service_binding(Rc::new(Mailer {
                audit: audit.clone(),
            })),
        )
        .unwrap();
    container
        .instance(
            "audit.subscriber",
            subscriber_binding(Rc::new(AuditSubscriber {
                audit: audit.clone(),
            })),
        )
        .unwrap();
    container
        .raw("orders.flagged", Binding::param(serde_json::json!(["order-13"])))
        .unwrap();

    Mediator::new(Rc::new(RefCell::new(container)))
}

#[test]
fn dispatches_an_order_flow_through_container_resolved_services() {
    let audit = Rc::new(AuditLog::default());
    let mut mediator = build_mediator(&audit);

    mediator
        .subscribe(SubscriberRef::Service("audit.subscriber".to_string()))
        .unwrap();

    // validation outranks the mailer and vetoes flagged orders
    mediator.on(
        "order.created",
        {
            let container = mediator.container();
            HandlerRef::callback(move |args| {
                let order = args
                    .first()
                    .and_then(Value::as_param)
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);
                let flagged = container
                    .borrow()
                    .param("orders.flagged")
                    .map_err(|error| Rc::new(error) as springy_container::instance::ErrorPtr)?;
                let vetoed = flagged
                    .as_array()
                    .map(|orders| orders.contains(&order))
                    .unwrap_or(false);
                Ok(Value::Param(serde_json::Value::Bool(!vetoed)))
            })
        },
        100,
    );
    mediator.on("order.created", HandlerRef::service("mailer@deliver"), 0);

    let responses = mediator
        .fire("order.created", Value::param("order-1"))
        .unwrap()
        .unwrap();

    assert_eq!(
        responses,
        vec![
            Value::param(true),
            Value::param("mailed"),
            Value::param(serde_json::Value::Null),
        ]
    );
    assert_eq!(
        *audit.entries.borrow(),
        vec!["mailer.deliver: order-1".to_string(), "audit".to_string()]
    );
}

#[test]
fn a_vetoed_order_stops_before_the_mailer_and_the_masters() {
    let audit = Rc::new(AuditLog::default());
    let mut mediator = build_mediator(&audit);

    mediator
        .subscribe(SubscriberRef::Service("audit.subscriber".to_string()))
        .unwrap();
    mediator.on(
        "order.created",
        HandlerRef::callback(|_| Ok(Value::param(false))),
        100,
    );
    mediator.on("order.created", HandlerRef::service("mailer@deliver"), 0);

    let responses = mediator
        .fire("order.created", Value::param("order-13"))
        .unwrap()
        .unwrap();

    assert_eq!(responses, Vec::<Value>::new());
    assert!(audit.entries.borrow().is_empty());
}

#[test]
fn master_only_events_are_not_dispatched() {
    let audit = Rc::new(AuditLog::default());
    let mut mediator = build_mediator(&audit);

    mediator
        .subscribe(SubscriberRef::Service("audit.subscriber".to_string()))
        .unwrap();

    // no exact handler for "order.removed": the master audit never runs
    assert_eq!(mediator.fire("order.removed", ()).unwrap(), None);
    assert!(audit.entries.borrow().is_empty());
}
