//! Collectors turn a submitted field map into a [`Value`].

use crate::error::{FormletError, Result};
use crate::value::{pair, Datum, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Raw submitted fields, keyed by field name.
pub type Submission = BTreeMap<String, String>;

/// Message of the error reified from a missing field.
pub const MISSING_INPUT: &str = "missing input";

pub type Wrapper = Rc<dyn Fn(&Collector, &Submission) -> Result<Value>>;

#[derive(Clone)]
pub enum Collector {
    /// Collects nothing. Dropped when combined with another collector.
    Nullary,
    /// Always yields the same value.
    Const(Value),
    /// Reads a single submitted field.
    Field(String),
    Combined(Rc<Collector>, Rc<Collector>),
    /// Applies a function value to the collected value.
    Mapped(Rc<Collector>, Value),
    /// Hands the inner collector and the raw input to a wrapper.
    Wrapped(Rc<Collector>, Wrapper),
    /// Turns values failing `predicate` into an error with `message`.
    Checked {
        inner: Rc<Collector>,
        predicate: Value,
        message: String,
    },
}

impl Collector {
    pub fn field<S: Into<String>>(name: S) -> Self {
        Collector::Field(name.into())
    }

    pub fn constant(value: Value) -> Self {
        Collector::Const(value)
    }

    pub fn is_nullary(&self) -> bool {
        matches!(self, Collector::Nullary)
    }

    /// Combine two collectors, skipping nullary sides.
    pub fn combine(left: Collector, right: Collector) -> Collector {
        match (left, right) {
            (Collector::Nullary, right) => right,
            (left, Collector::Nullary) => left,
            (left, right) => Collector::Combined(Rc::new(left), Rc::new(right)),
        }
    }

    pub fn map(self, transformation: Value) -> Collector {
        Collector::Mapped(Rc::new(self), transformation)
    }

    pub fn wrap<F>(self, wrapper: F) -> Collector
    where
        F: Fn(&Collector, &Submission) -> Result<Value> + 'static,
    {
        Collector::Wrapped(Rc::new(self), Rc::new(wrapper))
    }

    pub fn satisfies<S: Into<String>>(self, predicate: Value, message: S) -> Collector {
        Collector::Checked {
            inner: Rc::new(self),
            predicate,
            message: message.into(),
        }
    }

    /// Collect from a submission. A missing field becomes an error value
    /// carrying the field's name as origin.
    pub fn collect(&self, input: &Submission) -> Result<Value> {
        match self.try_collect(input) {
            Err(FormletError::MissingInput { name }) => {
                tracing::debug!(field = %name, "field missing from submission");
                Ok(Value::error_at(MISSING_INPUT, [name]))
            }
            other => other,
        }
    }

    /// Collect, but report a missing field as [`FormletError::MissingInput`]
    /// so that wrapping collectors can react to it.
    pub fn try_collect(&self, input: &Submission) -> Result<Value> {
        match self {
            Collector::Nullary => Ok(Value::plain(Datum::None)),
            Collector::Const(value) => Ok(value.clone()),
            Collector::Field(name) => match input.get(name) {
                Some(raw) => Ok(Value::plain_from(raw.as_str(), [name.as_str()])),
                None => Err(FormletError::MissingInput { name: name.clone() }),
            },
            Collector::Combined(left, right) => {
                let l = left.collect(input)?;
                let r = right.collect(input)?;
                combine_values(l, r)
            }
            Collector::Mapped(inner, transformation) => {
                let value = inner.try_collect(input)?;
                transformation.apply(value)?.force()
            }
            Collector::Wrapped(inner, wrapper) => wrapper(inner, input),
            Collector::Checked {
                inner,
                predicate,
                message,
            } => {
                let value = inner.try_collect(input)?.force()?;
                if value.is_error()? {
                    return Ok(value);
                }
                let verdict = predicate.apply(value.clone())?.force()?;
                if verdict.is_error()? {
                    return Ok(verdict);
                }
                match verdict.get()? {
                    Datum::Bool(true) => Ok(value),
                    Datum::Bool(false) => Ok(Value::error_at(message.as_str(), value.origins().iter())),
                    other => Err(FormletError::KindMismatch {
                        expected: "bool".to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    }
}

/// Join the values of two combined collectors.
///
/// A left function is applied to the right value. Otherwise the two are
/// paired. A single failing side is passed on as is; two failing sides are
/// aggregated into one error.
fn combine_values(left: Value, right: Value) -> Result<Value> {
    let left = left.force()?;
    let right = right.force()?;
    let left_failed = left.is_error()?;
    let right_failed = right.is_error()?;

    if left_failed && !right_failed {
        return Ok(left);
    }
    if !left_failed && left.is_applicable()? {
        return left.apply(right)?.force();
    }
    if right_failed && !left_failed {
        return Ok(right);
    }
    pair().apply(left)?.apply(right)?.force()
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collector::Nullary => write!(f, "Nullary"),
            Collector::Const(v) => f.debug_tuple("Const").field(v).finish(),
            Collector::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Collector::Combined(l, r) => f.debug_tuple("Combined").field(l).field(r).finish(),
            Collector::Mapped(inner, t) => f.debug_tuple("Mapped").field(inner).field(t).finish(),
            Collector::Wrapped(inner, _) => f.debug_tuple("Wrapped").field(inner).finish(),
            Collector::Checked { inner, message, .. } => f
                .debug_struct("Checked")
                .field("inner", inner)
                .field("message", message)
                .finish(),
        }
    }
}
