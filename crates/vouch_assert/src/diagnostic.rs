//! Failure diagnostics.
//!
//! A diagnostic is one location line, one line naming the failure, then
//! labelled lines. Multi-line label text is indented under its label:
//!
//! ```text
//! Location:  tests/user.rs:42:5
//! Error:     Not equal
//! Expected:  User { Name: "John", Addr: Address { City: "NY" } }
//! Actual:    User { Name: "John", Addr: Address { City: "Boston" } }
//! Diff:      Addr.City: expected "NY", actual "Boston"
//! Messages:  lookup by id
//! ```

use std::fmt;
use std::panic::Location;

use vouch_value::{diff_structured, render_differences, Value};

/// Optional user message attached to an assertion.
///
/// Accepts `()` (no message), `&str`, `String` or `format_args!(..)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message(Option<String>);

impl Message {
    pub fn none() -> Self {
        Message(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<()> for Message {
    fn from((): ()) -> Self {
        Message(None)
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message((!s.is_empty()).then(|| s.to_owned()))
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message((!s.is_empty()).then_some(s))
    }
}

impl From<fmt::Arguments<'_>> for Message {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Message::from(args.to_string())
    }
}

/// One labelled line of a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub name: &'static str,
    pub text: String,
}

/// A structured assertion failure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "diagnostics should be reported, not silently dropped"]
pub struct Diagnostic {
    /// Call site of the assertion.
    pub location: Option<&'static Location<'static>>,
    /// What kind of failure this is, e.g. "Not equal".
    pub message: String,
    pub labels: Vec<Label>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Diagnostic {
            location: None,
            message: message.into(),
            labels: Vec::new(),
        }
    }

    pub fn at(mut self, location: &'static Location<'static>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_label(mut self, name: &'static str, text: impl Into<String>) -> Self {
        self.labels.push(Label {
            name,
            text: text.into(),
        });
        self
    }

    /// `Expected:`/`Actual:` lines. When both render identically the
    /// renderings carry their types, so `i32(1)` vs `i64(1)` stays legible.
    pub fn with_expected_actual(self, expected: &Value, actual: &Value) -> Self {
        let (e, a) = render_pair(expected, actual);
        self.with_label("Expected", e).with_label("Actual", a)
    }

    /// `Diff:` lines for structured values of the same type.
    pub fn with_diff(self, expected: &Value, actual: &Value) -> Self {
        let structured = expected.kind().is_structured() || expected.as_ref_value().is_some();
        if !structured || expected.type_name() != actual.type_name() {
            return self;
        }
        let differences = diff_structured(expected, actual);
        if differences.is_empty() {
            return self;
        }
        self.with_label("Diff", render_differences(&differences))
    }

    /// `Messages:` line, when the user supplied one.
    pub fn with_message(self, msg: &Message) -> Self {
        match msg.as_str() {
            Some(text) => self.with_label("Messages", text),
            None => self,
        }
    }

    /// Text of the first label with this name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.text.as_str())
    }
}

/// Render two values for side-by-side display.
pub fn render_pair(expected: &Value, actual: &Value) -> (String, String) {
    let (e, a) = (expected.to_string(), actual.to_string());
    if e == a && expected.type_name() != actual.type_name() {
        (expected.render_typed(), actual.render_typed())
    } else {
        (e, a)
    }
}

const LABEL_WIDTH: usize = 11;

fn write_line(f: &mut fmt::Formatter<'_>, label: &str, text: &str) -> fmt::Result {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("");
    let head = format!("{label}:");
    write!(f, "{head:<LABEL_WIDTH$}")?;
    if head.len() >= LABEL_WIDTH {
        f.write_str(" ")?;
    }
    f.write_str(first)?;
    for line in lines {
        write!(f, "\n{:LABEL_WIDTH$}{line}", "")?;
    }
    Ok(())
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location {
            write_line(f, "Location", &location.to_string())?;
            writeln!(f)?;
        }
        write_line(f, "Error", &self.message)?;
        for label in &self.labels {
            writeln!(f)?;
            write_line(f, label.name, &label.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vouch_value::ToValue;

    #[test]
    fn renders_labels_aligned() {
        let d = Diagnostic::new("Not equal")
            .with_label("Expected", "1")
            .with_label("Actual", "2");
        assert_eq!(
            d.to_string(),
            "Error:     Not equal\nExpected:  1\nActual:    2"
        );
    }

    #[test]
    fn indents_multiline_text() {
        let d = Diagnostic::new("Not equal").with_label("Diff", "a\nb");
        assert_eq!(
            d.to_string(),
            "Error:     Not equal\nDiff:      a\n           b"
        );
    }

    #[test]
    fn typed_rendering_when_values_print_alike() {
        let d = Diagnostic::new("Not equal")
            .with_expected_actual(&1i32.to_value(), &1i64.to_value());
        assert_eq!(d.label("Expected"), Some("i32(1)"));
        assert_eq!(d.label("Actual"), Some("i64(1)"));
    }

    #[test]
    fn message_conversions() {
        assert_eq!(Message::from(()).as_str(), None);
        assert_eq!(Message::from("").as_str(), None);
        assert_eq!(Message::from("hi").as_str(), Some("hi"));
        assert_eq!(Message::from(format_args!("n={}", 3)).as_str(), Some("n=3"));
    }

    #[test]
    fn diff_only_for_structured_values() {
        let d = Diagnostic::new("x").with_diff(&1i32.to_value(), &2i32.to_value());
        assert_eq!(d.label("Diff"), None);
        let d = Diagnostic::new("x").with_diff(&vec![1i32].to_value(), &vec![2i32].to_value());
        assert_eq!(d.label("Diff"), Some("[0]: expected 1, actual 2"));
    }
}
