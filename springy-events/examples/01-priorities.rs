// note: this example assumes you've analyzed the previous one

use springy_container::container::Container;
use springy_container::instance::Value;
use springy_events::handler::HandlerRef;
use springy_events::mediator::Mediator;
use std::cell::RefCell;
use std::rc::Rc;

fn printing(message: &'static str) -> HandlerRef {
    HandlerRef::callback(move |_| {
        print!("{message}");
        Ok(Value::param(serde_json::Value::Null))
    })
}

fn main() {
    let container = Rc::new(RefCell::new(Container::new()));
    let mut mediator = Mediator::new(container);

    // for ordered execution of handlers, priorities can be used - higher runs first
    mediator.on("app.started", printing("!\n"), 1);
    mediator.on("app.started", printing("Hello "), 3);
    mediator.on("app.started", printing("world"), 2);

    // master handlers run after every exact handler of matching events
    mediator.on(
        "app.*",
        HandlerRef::callback(|_| {
            println!("(audited)");
            Ok(Value::param(serde_json::Value::Null))
        }),
        0,
    );

    // prints "Hello world!" followed by "(audited)"
    mediator
        .fire("app.started", ())
        .expect("error dispatching event");
}
