// note: this example assumes you've analyzed the previous one

use springy_container::container::Container;
use springy_container::instance::{Binding, Value};
use std::rc::Rc;

struct Connection;

impl Connection {
    fn open() -> Self {
        println!("opening connection");
        Connection
    }
}

fn main() {
    // shared instances log their realization - run with RUST_LOG=debug to see it
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut container = Container::new();

    // nothing is constructed at registration time
    container
        .instance(
            "database.connection",
            Binding::deferred(|_, _| Ok(Value::object(Connection::open()))),
        )
        .expect("error registering connection");

    // "opening connection" prints exactly once, on the first lookup
    let first = container
        .shared("database.connection")
        .expect("error resolving connection");
    let second = container
        .shared("database.connection")
        .expect("error resolving connection");

    assert!(Rc::ptr_eq(&first, &second));
    println!("same connection: {}", Rc::ptr_eq(&first, &second));
}
