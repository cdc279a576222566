use springy_container::container::Container;
use springy_container::instance::Value;
use springy_events::handler::HandlerRef;
use springy_events::mediator::Mediator;
use std::cell::RefCell;
use std::rc::Rc;

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let container = Rc::new(RefCell::new(Container::new()));
    let mut mediator = Mediator::new(container);

    mediator.on(
        "user.registered",
        HandlerRef::callback(|args| {
            let name = args
                .first()
                .and_then(Value::as_param)
                .and_then(|param| param.as_str())
                .unwrap_or("someone");
            println!("welcome, {name}!");
            Ok(Value::param(serde_json::Value::Null))
        }),
        0,
    );

    // prints "welcome, alice!"
    mediator
        .fire("user.registered", Value::param("alice"))
        .expect("error dispatching event");

    // no handlers for this one - nothing is dispatched and nothing is returned
    let responses = mediator
        .fire("user.removed", ())
        .expect("error dispatching event");
    assert!(responses.is_none());
}
