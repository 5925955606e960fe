//! Argument lists passed to and returned from mocked methods.

use std::fmt;
use std::ops::Deref;

use vouch_assert::{assert, Message, TestingT};
use vouch_value::{equal_deep, match_value, FromValue, MatchError, Matcher, Value};

/// Positional values: the arguments of a call, or the values an
/// expectation returns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments(Vec<Value>);

impl Arguments {
    pub fn new(values: Vec<Value>) -> Self {
        Arguments(values)
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }

    /// The value at `index`.
    ///
    /// # Panics
    /// If there are not enough values.
    pub fn get(&self, index: usize) -> &Value {
        match self.0.get(index) {
            Some(v) => v,
            None => panic!(
                "mock: arguments: cannot get({index}) because there are {} argument(s)",
                self.0.len()
            ),
        }
    }

    /// The value at `index` decoded as `T`.
    ///
    /// # Panics
    /// If the value is missing or is not a `T`.
    pub fn typed<T: FromValue>(&self, index: usize) -> T {
        let v = self.get(index);
        match T::from_value(v) {
            Some(decoded) => decoded,
            None => panic!(
                "mock: arguments: {}({index}) failed because object wasn't correct type: {v:?}",
                std::any::type_name::<T>()
            ),
        }
    }

    pub fn int(&self, index: usize) -> i64 {
        self.get(index).as_i64().unwrap_or_else(|| self.mistyped("int", index))
    }

    pub fn uint(&self, index: usize) -> u64 {
        self.get(index).as_u64().unwrap_or_else(|| self.mistyped("uint", index))
    }

    pub fn float(&self, index: usize) -> f64 {
        self.get(index).as_f64().unwrap_or_else(|| self.mistyped("float", index))
    }

    pub fn bool(&self, index: usize) -> bool {
        self.get(index).as_bool().unwrap_or_else(|| self.mistyped("bool", index))
    }

    pub fn string(&self, index: usize) -> String {
        match self.get(index).as_str() {
            Some(s) => s.to_owned(),
            None => self.mistyped("string", index),
        }
    }

    /// The error at `index`: `None` for nil, otherwise the `E` held as an
    /// opaque value.
    ///
    /// # Panics
    /// If the value is neither nil nor an `E`.
    pub fn error<E: std::error::Error + Clone + 'static>(&self, index: usize) -> Option<E> {
        let v = self.get(index);
        if v.is_nil() {
            return None;
        }
        match v.as_opaque().and_then(|o| o.downcast_ref::<E>()) {
            Some(err) => Some(err.clone()),
            None => self.mistyped("error", index),
        }
    }

    fn mistyped(&self, accessor: &str, index: usize) -> ! {
        panic!(
            "mock: arguments: {accessor}({index}) failed because object wasn't correct type: {:?}",
            self.0[index]
        )
    }

    /// Compare against `expected` matchers, one line per position.
    /// Returns the rendered comparison and the number of mismatches.
    pub fn diff(&self, expected: &[Matcher]) -> Result<(String, usize), MatchError> {
        diff_args(expected, &self.0)
    }

    /// Asserts that the arguments satisfy `expected`, reporting the
    /// per-position comparison on failure.
    #[track_caller]
    pub fn assert(
        &self,
        t: &(impl TestingT + ?Sized),
        expected: &[Matcher],
        msg: impl Into<Message>,
    ) -> bool {
        match self.diff(expected) {
            Ok((_, 0)) => true,
            Ok((rendered, n)) => assert::fail(
                t,
                &format!("Arguments do not match: {n} difference(s)\n{rendered}"),
                msg,
            ),
            Err(err) => assert::fail(t, &err.to_string(), msg),
        }
    }

    /// Legacy identity check: every position is the same object as in
    /// `objects` (pointer identity for references, deep equality for
    /// everything else).
    pub fn is_same(&self, objects: &[Value]) -> bool {
        self.0.len() == objects.len()
            && self.0.iter().zip(objects).all(|(a, b)| {
                if a.is_pointer_like() {
                    a.same(b)
                } else {
                    equal_deep(a, b)
                }
            })
    }
}

/// Per-position comparison of matchers against values.
///
/// ```text
/// 0: PASS:  "example.com" == "example.com"
/// 1: FAIL:  (Missing) != 3
/// ```
pub(crate) fn diff_args(
    expected: &[Matcher],
    actual: &[Value],
) -> Result<(String, usize), MatchError> {
    let mut out = String::new();
    let mut differences = 0;
    for i in 0..expected.len().max(actual.len()) {
        let (line, ok) = match (expected.get(i), actual.get(i)) {
            (Some(m), Some(v)) => {
                let ok = match_value(m, v)?;
                let op = if ok { "==" } else { "!=" };
                let verdict = if ok { "PASS" } else { "FAIL" };
                (format!("{i}: {verdict}:  {v} {op} {m}"), ok)
            }
            (Some(m), None) => (format!("{i}: FAIL:  (Missing) != {m}"), false),
            (None, Some(v)) => (format!("{i}: FAIL:  {v} != (Missing)"), false),
            (None, None) => continue,
        };
        if !ok {
            differences += 1;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&line);
    }
    Ok((out, differences))
}

impl Deref for Arguments {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Arguments(values)
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
