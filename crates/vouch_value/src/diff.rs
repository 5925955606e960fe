//! Path-addressed structural diff.
//!
//! [`diff_structured`] walks two values in lockstep and reports every leaf
//! where they disagree. The result is empty exactly when `equal_deep` holds.
//!
//! ```text
//! expected: User { Name: "John", Addr: Address { City: "NY" } }
//! actual:   User { Name: "John", Addr: Address { City: "Boston" } }
//!
//! => [Difference { path: Addr.City, expected: "NY", actual: "Boston" }]
//! ```

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::capability::has_equal;
use crate::equal::equal_deep;
use crate::stack::ensure_sufficient_stack;
use crate::value::{RecordValue, Value};

/// One step into a structured value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Record field name.
    Field(Arc<str>),
    /// Sequence index.
    Index(usize),
    /// Mapping key, rendered.
    Key(String),
}

/// Location inside a structured value. The empty path is the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(SmallVec<[Segment; 4]>);

impl Path {
    pub fn root() -> Self {
        Path(SmallVec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[must_use]
    pub fn child(&self, segment: Segment) -> Self {
        let mut next = self.clone();
        next.0.push(segment);
        next
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Key(key) => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

/// One side of a difference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Snapshot {
    /// Absent on this side.
    Missing,
    Rendered(String),
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Missing => f.write_str("<missing>"),
            Snapshot::Rendered(s) => f.write_str(s),
        }
    }
}

/// One disagreement between two values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Difference {
    pub path: Path,
    pub expected: Snapshot,
    pub actual: Snapshot,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, actual {}",
            self.path, self.expected, self.actual
        )
    }
}

/// Every leaf at which `expected` and `actual` disagree.
///
/// - Different kinds or types at the root produce one difference holding the
///   two kind (or type) tags.
/// - Sequences of different lengths produce one whole-value difference.
/// - Mappings descend into the union of keys, sorted by rendered form; a key
///   present on one side only reports `<missing>` for the other.
/// - Records descend field by field unless their type has an `Equal`
///   capability, in which case they are compared as leaves.
#[tracing::instrument(level = "trace", skip_all)]
pub fn diff_structured(expected: &Value, actual: &Value) -> Vec<Difference> {
    let mut walker = DiffWalker::default();

    if expected.kind() != actual.kind() && !byte_like(expected, actual) {
        return vec![Difference {
            path: Path::root(),
            expected: Snapshot::Rendered(expected.kind().to_string()),
            actual: Snapshot::Rendered(actual.kind().to_string()),
        }];
    }
    if expected.type_name() != actual.type_name() && !byte_like(expected, actual) {
        return vec![Difference {
            path: Path::root(),
            expected: Snapshot::Rendered(expected.type_name().to_owned()),
            actual: Snapshot::Rendered(actual.type_name().to_owned()),
        }];
    }

    walker.walk(&Path::root(), expected, actual);
    walker.out
}

fn byte_like(a: &Value, b: &Value) -> bool {
    let bytes = |v: &Value| match v {
        Value::Bytes(_) => true,
        Value::Seq(s) => s.as_bytes().is_some(),
        _ => false,
    };
    bytes(a) && bytes(b)
}

#[derive(Default)]
struct DiffWalker {
    out: Vec<Difference>,
    visited: FxHashSet<(usize, usize)>,
}

impl DiffWalker {
    fn walk(&mut self, path: &Path, expected: &Value, actual: &Value) {
        ensure_sufficient_stack(|| self.walk_inner(path, expected, actual));
    }

    fn walk_inner(&mut self, path: &Path, expected: &Value, actual: &Value) {
        if expected.type_name() != actual.type_name() || expected.is_nil() || actual.is_nil() {
            self.leaf(path, expected, actual);
            return;
        }

        match (expected, actual) {
            (Value::Seq(e), Value::Seq(a)) => match (e.items(), a.items()) {
                (Some(es), Some(acts)) if es.len() == acts.len() => {
                    for (i, (ev, av)) in es.iter().zip(acts).enumerate() {
                        self.walk(&path.child(Segment::Index(i)), ev, av);
                    }
                }
                _ => self.leaf(path, expected, actual),
            },
            (Value::Map(e), Value::Map(a)) => {
                let (Some(es), Some(acts)) = (e.entries(), a.entries()) else {
                    self.leaf(path, expected, actual);
                    return;
                };
                let mut keys: Vec<(String, &Value)> =
                    es.iter().map(|(k, _)| (k.to_string(), k)).collect();
                for (k, _) in acts {
                    if !es.iter().any(|(ek, _)| equal_deep(ek, k)) {
                        keys.push((k.to_string(), k));
                    }
                }
                keys.sort_by(|x, y| x.0.cmp(&y.0));

                for (rendered, key) in keys {
                    let child = path.child(Segment::Key(rendered));
                    match (e.get(key), a.get(key)) {
                        (Some(ev), Some(av)) => self.walk(&child, ev, av),
                        (Some(ev), None) => self.push(child, render(ev), Snapshot::Missing),
                        (None, Some(av)) => self.push(child, Snapshot::Missing, render(av)),
                        (None, None) => {}
                    }
                }
            }
            (Value::Record(e), Value::Record(a)) if !has_equal(e.type_name()) => {
                self.walk_fields(path, e, a);
            }
            (Value::Ref(e), Value::Ref(a)) => {
                let (Some(ea), Some(aa)) = (e.addr(), a.addr()) else {
                    self.leaf(path, expected, actual);
                    return;
                };
                if ea == aa || !self.visited.insert((ea, aa)) {
                    return;
                }
                if let (Some(ev), Some(av)) = (e.load(), a.load()) {
                    self.walk(path, &ev, &av);
                }
            }
            _ => self.leaf(path, expected, actual),
        }
    }

    fn walk_fields(&mut self, path: &Path, expected: &RecordValue, actual: &RecordValue) {
        for field in expected.fields() {
            let child = path.child(Segment::Field(Arc::from(field.name())));
            match actual.get(field.name()) {
                Some(av) => self.walk(&child, field.value(), av),
                None => self.push(child, render(field.value()), Snapshot::Missing),
            }
        }
        for field in actual.fields() {
            if expected.get(field.name()).is_none() {
                let child = path.child(Segment::Field(Arc::from(field.name())));
                self.push(child, Snapshot::Missing, render(field.value()));
            }
        }
    }

    fn leaf(&mut self, path: &Path, expected: &Value, actual: &Value) {
        if equal_deep(expected, actual) {
            return;
        }
        let (mut e, mut a) = (expected.to_string(), actual.to_string());
        if e == a {
            e = expected.render_typed();
            a = actual.render_typed();
        }
        self.push(path.clone(), Snapshot::Rendered(e), Snapshot::Rendered(a));
    }

    fn push(&mut self, path: Path, expected: Snapshot, actual: Snapshot) {
        self.out.push(Difference {
            path,
            expected,
            actual,
        });
    }
}

fn render(v: &Value) -> Snapshot {
    Snapshot::Rendered(v.to_string())
}

/// One line per difference, for diagnostics.
pub fn render_differences(differences: &[Difference]) -> String {
    differences
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
