//! Human-readable rendering of values for diagnostics.
//!
//! `{}` renders compactly on one line; `{:#}` renders one child per line with
//! four-space indentation. References already on the current path render as
//! `&<cycle>`, so self-referential values always terminate.

use std::fmt::{self, Write};

use rustc_hash::FxHashSet;

use super::{simple_type_name, Value};
use crate::stack::ensure_sufficient_stack;

struct Printer {
    out: String,
    pretty: bool,
    depth: usize,
    visiting: FxHashSet<usize>,
}

impl Printer {
    fn new(pretty: bool) -> Self {
        Printer {
            out: String::new(),
            pretty,
            depth: 0,
            visiting: FxHashSet::default(),
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
    }

    fn value(&mut self, v: &Value) -> fmt::Result {
        ensure_sufficient_stack(|| self.value_inner(v))
    }

    fn value_inner(&mut self, v: &Value) -> fmt::Result {
        match v {
            Value::Nil => self.out.push_str("nil"),
            Value::Bool(b) => write!(self.out, "{b}")?,
            Value::Int(n) => write!(self.out, "{n}")?,
            Value::Uint(n) => write!(self.out, "{n}")?,
            Value::Float(n) => write!(self.out, "{n}")?,
            Value::Str(s) => write!(self.out, "{:?}", &**s)?,
            Value::Bytes(None) => self.out.push_str("nil"),
            Value::Bytes(Some(b)) => write!(self.out, "b\"{}\"", b.escape_ascii())?,
            Value::Seq(s) => match s.items() {
                None => self.out.push_str("nil"),
                Some(items) => self.list("[", "]", items.iter(), |p, item| p.value(item))?,
            },
            Value::Set(s) => match s.items() {
                None => self.out.push_str("nil"),
                Some(items) => self.list("{", "}", items.iter(), |p, item| p.value(item))?,
            },
            Value::Map(m) => match m.entries() {
                None => self.out.push_str("nil"),
                Some(entries) => self.list("{", "}", entries.iter(), |p, (k, v)| {
                    p.value(k)?;
                    p.out.push_str(": ");
                    p.value(v)
                })?,
            },
            Value::Record(r) => {
                self.out.push_str(&simple_type_name(r.type_name()));
                if r.fields().is_empty() {
                    self.out.push_str(" {}");
                } else {
                    self.out.push(' ');
                    let spaced = !self.pretty;
                    self.list(
                        if spaced { "{ " } else { "{" },
                        if spaced { " }" } else { "}" },
                        r.fields().iter(),
                        |p, field| {
                            p.out.push_str(field.name());
                            p.out.push_str(": ");
                            p.value(field.value())
                        },
                    )?;
                }
            }
            Value::Ref(r) => match (r.addr(), r.load()) {
                (Some(addr), Some(referent)) => {
                    self.out.push('&');
                    if self.visiting.insert(addr) {
                        let result = self.value(&referent);
                        self.visiting.remove(&addr);
                        result?;
                    } else {
                        self.out.push_str("<cycle>");
                    }
                }
                _ => self.out.push_str("nil"),
            },
            Value::Func(func) => {
                if func.is_nil() {
                    self.out.push_str("nil");
                } else {
                    write!(self.out, "<fn {}>", simple_type_name(func.type_name()))?;
                }
            }
            Value::Chan(chan) => match chan.addr() {
                None => self.out.push_str("nil"),
                Some(addr) => write!(
                    self.out,
                    "<chan {} @ {addr:#x}>",
                    simple_type_name(chan.type_name())
                )?,
            },
            Value::Opaque(o) => self.out.push_str(o.repr()),
        }
        Ok(())
    }

    fn list<I, T>(
        &mut self,
        open: &str,
        close: &str,
        items: I,
        mut item: impl FnMut(&mut Self, T) -> fmt::Result,
    ) -> fmt::Result
    where
        I: ExactSizeIterator<Item = T>,
    {
        let empty = items.len() == 0;
        self.out.push_str(open.trim_end());
        if empty {
            self.out.push_str(close.trim_start());
            return Ok(());
        }
        self.out.push_str(&open[open.trim_end().len()..]);
        self.depth += 1;
        for (i, elem) in items.enumerate() {
            if self.pretty {
                self.newline();
            } else if i > 0 {
                self.out.push_str(", ");
            }
            item(self, elem)?;
            if self.pretty {
                self.out.push(',');
            }
        }
        self.depth -= 1;
        if self.pretty {
            self.newline();
        }
        self.out.push_str(close);
        Ok(())
    }
}

/// Render with cycle protection; `pretty` selects the multi-line layout.
pub(crate) fn render(v: &Value, pretty: bool) -> Result<String, fmt::Error> {
    let mut printer = Printer::new(pretty);
    printer.value(v)?;
    Ok(printer.out)
}

impl Value {
    /// Render prefixed with the simple type name, e.g. `i32(1)`.
    ///
    /// Used when two values print identically but differ in type.
    pub fn render_typed(&self) -> String {
        match self {
            Value::Nil => "nil".to_owned(),
            Value::Record(_) => self.to_string(),
            _ => format!("{}({self})", self.simple_type_name()),
        }
    }

    /// Multi-line rendering, same as `format!("{value:#}")`.
    pub fn render_pretty(&self) -> String {
        format!("{self:#}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, f.alternate())?)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_typed())
    }
}
