// note: this example assumes you've analyzed the previous one

use springy_container::container::Container;
use springy_container::instance::Value;
use springy_events::handler::{service_binding, EventService, HandlerRef, HandlerResult};
use springy_events::mediator::Mediator;
use std::cell::RefCell;
use std::rc::Rc;

struct Mailer;

impl EventService for Mailer {
    fn call(&self, method: &str, args: &[Value]) -> HandlerResult {
        let recipient = args
            .first()
            .and_then(Value::as_param)
            .and_then(|param| param.as_str())
            .unwrap_or("nobody");
        println!("{method} -> {recipient}");
        Ok(Value::param("sent"))
    }
}

fn main() {
    // run with RUST_LOG=debug to watch the dispatch
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let container = Rc::new(RefCell::new(Container::new()));
    container
        .borrow_mut()
        .instance("mailer", service_binding(Rc::new(Mailer)))
        .expect("error registering mailer");

    let mut mediator = Mediator::new(container);

    // the "mailer" key is only resolved when the event fires
    mediator.on("user.registered", HandlerRef::service("mailer@deliver"), 0);

    // prints "deliver -> alice@example.com"
    let responses = mediator
        .fire("user.registered", Value::param("alice@example.com"))
        .expect("error dispatching event")
        .unwrap_or_default();

    assert_eq!(responses, vec![Value::param("sent")]);
}
