use springy_container::container::Container;
use springy_container::instance::{Binding, Value};

struct Mailer {
    sender: String,
}

impl Mailer {
    fn deliver(&self, recipient: &str) {
        println!("{} -> {}", self.sender, recipient);
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let mut container = Container::new();

    // parameters are plain data, returned by value
    container
        .raw("mail.sender", Binding::param("noreply@example.com"))
        .expect("error registering parameter");

    // factories produce a fresh result on every make()
    container.bind("mailer", |container, _| {
        let sender = container.param("mail.sender")?;
        Ok(Value::object(Mailer {
            sender: sender.as_str().unwrap_or_default().to_string(),
        }))
    });

    let mailer = container
        .make("mailer", &[])
        .expect("error creating mailer")
        .downcast::<Mailer>()
        .expect("mailer has an unexpected type");

    // prints "noreply@example.com -> user@example.com"
    mailer.deliver("user@example.com");
}
