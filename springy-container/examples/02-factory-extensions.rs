// note: this example assumes you've analyzed the previous one

use springy_container::container::Container;
use springy_container::instance::Value;

fn main() {
    let mut container = Container::new();

    container.bind("greeting", |_, _| Ok(Value::param("Hello")));

    // extensions decorate factory results in registration order
    container
        .extend("greeting", |value, _| {
            let greeting = value
                .as_param()
                .and_then(|param| param.as_str())
                .unwrap_or_default();
            Ok(Value::param(format!("{greeting} world")))
        })
        .expect("error extending greeting");
    container
        .extend("greeting", |value, _| {
            let greeting = value
                .as_param()
                .and_then(|param| param.as_str())
                .unwrap_or_default();
            Ok(Value::param(format!("{greeting}!")))
        })
        .expect("error extending greeting");

    let greeting = container
        .make("greeting", &[])
        .expect("error creating greeting");

    // prints "Hello world!"
    if let Some(greeting) = greeting.as_param().and_then(|param| param.as_str()) {
        println!("{greeting}");
    }
}
