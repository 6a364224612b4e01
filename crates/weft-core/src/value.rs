//! Attribute and prop values, event payloads and listener handles.

use std::fmt;
use std::rc::Rc;

/// Payload handed to event listeners by the host backend.
#[derive(Clone, Debug, Default)]
pub struct Event {
    /// Event name without the `on` prefix, e.g. `click`.
    pub name: String,
    /// Optional payload, e.g. the current text of an input widget.
    pub value: Option<String>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// A bound event listener.
///
/// Equality is `Rc` pointer identity, which is what the attribute
/// differ uses to decide whether a listener must be rebound.
#[derive(Clone)]
pub struct EventHandler {
    inner: Rc<dyn Fn(&Event)>,
}

impl EventHandler {
    pub fn new(handler: impl Fn(&Event) + 'static) -> Self {
        Self {
            inner: Rc::new(handler),
        }
    }

    pub fn call(&self, event: &Event) {
        (self.inner)(event)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler")
    }
}

/// Structured style attribute: ordered property/value pairs, flattened
/// to css-like text when applied to the host.
pub type Style = Vec<(String, String)>;

/// Attribute and prop values. Comparison is shallow value equality,
/// except handlers which compare by identity.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Num(f64),
    Style(Style),
    Handler(EventHandler),
}

impl Value {
    /// Textual form used for plain host attributes. Handlers and style
    /// objects have none; passing one where text is expected removes
    /// the attribute instead.
    pub(crate) fn as_text(&self) -> Option<String> {
        match self {
            Value::Str(text) => Some(text.clone()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Num(number) => Some(number.to_string()),
            Value::Style(_) | Value::Handler(_) => None,
        }
    }

    pub(crate) fn truthy(&self) -> bool {
        match self {
            Value::Str(text) => !text.is_empty(),
            Value::Bool(flag) => *flag,
            Value::Num(number) => *number != 0.0,
            Value::Style(_) | Value::Handler(_) => true,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Str(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Str(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Num(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Num(number as f64)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Num(number as f64)
    }
}

impl From<usize> for Value {
    fn from(number: usize) -> Self {
        Value::Num(number as f64)
    }
}

impl From<Style> for Value {
    fn from(style: Style) -> Self {
        Value::Style(style)
    }
}

impl From<EventHandler> for Value {
    fn from(handler: EventHandler) -> Self {
        Value::Handler(handler)
    }
}

/// Dependency list for effects and memos, compared elementwise.
pub type Deps = Vec<Value>;

/// Builds a dependency list from anything convertible to [`Value`]:
/// `deps![count, label]`.
#[macro_export]
macro_rules! deps {
    ($($dep:expr),* $(,)?) => {
        vec![$($crate::Value::from($dep)),*]
    };
}
