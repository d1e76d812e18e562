//! Values: plain data, curried functions and errors.
//!
//! A [`Value`] is a cheap, reference-counted handle. Cloning it shares the
//! underlying node, which is what gives values an identity ([`ValueId`]) that
//! survives being passed around. Function values memoize their result once
//! they are satisfied, so a shared sub-value is evaluated at most once.

use crate::error::{ErrorKind, FormletError, Raised, Result};
use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

/// Names of the input fields that causally contributed to a value.
pub type Origins = BTreeSet<String>;

/// Message of the error produced when several arguments of a call are errors.
pub const ARGUMENT_ERRORS: &str = "arguments contain errors";

/// Payload of a plain value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Datum {
    None,
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<Datum>),
    Map(BTreeMap<String, Datum>),
}

impl Datum {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Datum::None => "none",
            Datum::Bool(_) => "bool",
            Datum::Int(_) => "int",
            Datum::String(_) => "string",
            Datum::List(_) => "list",
            Datum::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Datum::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Datum]> {
        match self {
            Datum::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Bool(b)
    }
}

impl From<i64> for Datum {
    fn from(i: i64) -> Self {
        Datum::Int(i)
    }
}

impl From<i32> for Datum {
    fn from(i: i32) -> Self {
        Datum::Int(i.into())
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::String(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::String(s)
    }
}

impl From<Vec<Datum>> for Datum {
    fn from(items: Vec<Datum>) -> Self {
        Datum::List(items)
    }
}

/// An argument as seen by a callable.
///
/// Functions that unwrap their arguments receive plain values as
/// [`Arg::Datum`] and anything still applicable (functions) as
/// [`Arg::Value`]. Raw functions receive every argument as [`Arg::Value`].
#[derive(Debug, Clone)]
pub enum Arg {
    Datum(Datum),
    Value(Value),
}

impl Arg {
    pub fn datum(&self) -> std::result::Result<&Datum, Raised> {
        match self {
            Arg::Datum(d) => Ok(d),
            Arg::Value(v) => Err(Raised::contract(format!(
                "expected plain argument, got {}",
                v.kind_name()
            ))),
        }
    }

    pub fn into_datum(self) -> std::result::Result<Datum, Raised> {
        match self {
            Arg::Datum(d) => Ok(d),
            Arg::Value(v) => Err(Raised::contract(format!(
                "expected plain argument, got {}",
                v.kind_name()
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Arg::Datum(d) => Value::plain(d),
            Arg::Value(v) => v,
        }
    }
}

/// Split the argument vector of a callable into a fixed-size array.
pub fn unpack<const N: usize>(args: Vec<Arg>) -> std::result::Result<[Arg; N], Raised> {
    args.try_into().map_err(|args: Vec<Arg>| {
        Raised::contract(format!("expected {} arguments, got {}", N, args.len()))
    })
}

/// What a callable hands back.
///
/// A bare [`Datum`] becomes a plain value carrying the union of the
/// arguments' origins; a [`Value`] is taken as is.
#[derive(Debug, Clone)]
pub enum Outcome {
    Datum(Datum),
    Value(Value),
}

impl From<Datum> for Outcome {
    fn from(d: Datum) -> Self {
        Outcome::Datum(d)
    }
}

impl From<Value> for Outcome {
    fn from(v: Value) -> Self {
        Outcome::Value(v)
    }
}

pub type Callable = Rc<dyn Fn(Vec<Arg>) -> std::result::Result<Outcome, Raised>>;

/// Stable identity of a value node, shared by all clones of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(usize);

#[derive(Clone)]
pub struct Value(Rc<Node>);

enum Node {
    Plain { datum: Datum, origins: Origins },
    Function(FunctionNode),
    Error(ErrorNode),
}

struct FunctionNode {
    name: Rc<str>,
    callable: Callable,
    arity: usize,
    args: Vec<Value>,
    unwrap_args: bool,
    reify_on: Vec<ErrorKind>,
    origins: Origins,
    result: OnceCell<Value>,
}

struct ErrorNode {
    message: String,
    origins: Origins,
    causes: Vec<Value>,
    dict: OnceCell<BTreeMap<String, Vec<String>>>,
}

fn collect_origins<I, S>(origins: I) -> Origins
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    origins.into_iter().map(Into::into).collect()
}

impl Value {
    /// A plain value without origins.
    pub fn plain<D: Into<Datum>>(datum: D) -> Self {
        Self::plain_from(datum, Origins::new())
    }

    /// A plain value produced by the given input fields.
    pub fn plain_from<D, I, S>(datum: D, origins: I) -> Self
    where
        D: Into<Datum>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value(Rc::new(Node::Plain {
            datum: datum.into(),
            origins: collect_origins(origins),
        }))
    }

    /// A curried function of `arity` arguments whose plain arguments are
    /// unwrapped before the call.
    pub fn function<F>(name: &str, arity: usize, f: F) -> Self
    where
        F: Fn(Vec<Arg>) -> std::result::Result<Outcome, Raised> + 'static,
    {
        Self::new_function(name, arity, true, Rc::new(f))
    }

    /// Like [`Value::function`], but the callable sees the argument values
    /// themselves, errors included.
    pub fn function_raw<F>(name: &str, arity: usize, f: F) -> Self
    where
        F: Fn(Vec<Arg>) -> std::result::Result<Outcome, Raised> + 'static,
    {
        Self::new_function(name, arity, false, Rc::new(f))
    }

    fn new_function(name: &str, arity: usize, unwrap_args: bool, callable: Callable) -> Self {
        Value(Rc::new(Node::Function(FunctionNode {
            name: Rc::from(name),
            callable,
            arity,
            args: Vec::new(),
            unwrap_args,
            reify_on: Vec::new(),
            origins: Origins::new(),
            result: OnceCell::new(),
        })))
    }

    /// Unary function over a plain payload.
    pub fn unary<F>(name: &str, f: F) -> Self
    where
        F: Fn(Datum) -> std::result::Result<Datum, Raised> + 'static,
    {
        Self::function(name, 1, move |args| {
            let [a] = unpack(args)?;
            Ok(f(a.into_datum()?)?.into())
        })
    }

    /// Binary function over plain payloads.
    pub fn binary<F>(name: &str, f: F) -> Self
    where
        F: Fn(Datum, Datum) -> std::result::Result<Datum, Raised> + 'static,
    {
        Self::function(name, 2, move |args| {
            let [a, b] = unpack(args)?;
            Ok(f(a.into_datum()?, b.into_datum()?)?.into())
        })
    }

    /// Boolean test over a plain payload, for use with `satisfies`.
    pub fn predicate<F>(name: &str, f: F) -> Self
    where
        F: Fn(&Datum) -> bool + 'static,
    {
        Self::unary(name, move |d| Ok(Datum::Bool(f(&d))))
    }

    /// An error value attributed to the given input fields.
    pub fn error_at<S, I, O>(message: S, origins: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        Self::error_node(message.into(), collect_origins(origins), Vec::new())
    }

    /// An error caused by other errors. Every cause must be an error value.
    pub fn error_caused_by<S, I, O>(message: S, origins: I, causes: Vec<Value>) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        if let Some(bad) = causes.iter().find(|c| !c.is_error_node()) {
            return Err(FormletError::Precondition {
                message: format!("error cause must be an error, got {}", bad.kind_name()),
            });
        }
        Ok(Self::error_node(
            message.into(),
            collect_origins(origins),
            causes,
        ))
    }

    fn error_node(message: String, origins: Origins, causes: Vec<Value>) -> Self {
        Value(Rc::new(Node::Error(ErrorNode {
            message,
            origins,
            causes,
            dict: OnceCell::new(),
        })))
    }

    pub fn id(&self) -> ValueId {
        ValueId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn kind_name(&self) -> &'static str {
        match &*self.0 {
            Node::Plain { .. } => "plain value",
            Node::Function(f) if f.arity == 0 => "satisfied function",
            Node::Function(_) => "function",
            Node::Error(_) => "error",
        }
    }

    pub fn origins(&self) -> &Origins {
        match &*self.0 {
            Node::Plain { origins, .. } => origins,
            Node::Function(f) => &f.origins,
            Node::Error(e) => &e.origins,
        }
    }

    /// A copy of this value with other origins. Function copies start with
    /// an empty memo.
    pub fn with_origins<I, S>(&self, origins: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins = collect_origins(origins);
        match &*self.0 {
            Node::Plain { datum, .. } => Value(Rc::new(Node::Plain {
                datum: datum.clone(),
                origins,
            })),
            Node::Function(f) => Value(Rc::new(Node::Function(FunctionNode {
                origins,
                ..f.copy()
            }))),
            Node::Error(e) => Self::error_node(e.message.clone(), origins, e.causes.clone()),
        }
    }

    /// Remaining arity of a function value.
    pub fn arity(&self) -> Option<usize> {
        match &*self.0 {
            Node::Function(f) => Some(f.arity),
            _ => None,
        }
    }

    /// Arguments a function value has been applied to so far.
    pub fn args(&self) -> &[Value] {
        match &*self.0 {
            Node::Function(f) => &f.args,
            _ => &[],
        }
    }

    /// Errors that led to this error.
    pub fn causes(&self) -> &[Value] {
        match &*self.0 {
            Node::Error(e) => &e.causes,
            _ => &[],
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(&*self.0, Node::Function(_))
    }

    /// Whether this node itself is an error, without evaluating anything.
    pub fn is_error_node(&self) -> bool {
        matches!(&*self.0, Node::Error(_))
    }

    /// A function is satisfied once it has received all of its arguments.
    pub fn is_satisfied(&self) -> bool {
        matches!(&*self.0, Node::Function(f) if f.arity == 0)
    }

    /// The payload of a plain value or of a satisfied function's result.
    pub fn get(&self) -> Result<&Datum> {
        match &*self.0 {
            Node::Plain { datum, .. } => Ok(datum),
            Node::Function(f) if f.arity == 0 => f.result()?.get(),
            Node::Function(_) => Err(FormletError::NotGettable {
                what: "unsatisfied function",
            }),
            Node::Error(_) => Err(FormletError::NotGettable { what: "error" }),
        }
    }

    /// Apply this value to another one.
    ///
    /// Errors absorb the application and return themselves. Satisfied
    /// functions delegate to their memoized result.
    pub fn apply(&self, arg: Value) -> Result<Value> {
        match &*self.0 {
            Node::Plain { .. } => Err(FormletError::NotApplicable {
                what: "plain value",
            }),
            Node::Error(_) => Ok(self.clone()),
            Node::Function(f) if f.arity == 0 => f.result()?.apply(arg),
            Node::Function(f) => {
                let mut next = f.copy();
                next.args.push(arg);
                next.arity -= 1;
                Ok(Value(Rc::new(Node::Function(next))))
            }
        }
    }

    /// The most evaluated form of this value: satisfied functions are
    /// replaced by their results until something else shows up.
    pub fn force(&self) -> Result<Value> {
        let mut current = self.clone();
        loop {
            let next = match &*current.0 {
                Node::Function(f) if f.arity == 0 => f.result()?.clone(),
                _ => return Ok(current),
            };
            current = next;
        }
    }

    pub fn is_applicable(&self) -> Result<bool> {
        match &*self.0 {
            Node::Plain { .. } => Ok(false),
            Node::Error(_) => Ok(true),
            Node::Function(f) if f.arity == 0 => f.result()?.is_applicable(),
            Node::Function(_) => Ok(true),
        }
    }

    pub fn is_error(&self) -> Result<bool> {
        match &*self.0 {
            Node::Plain { .. } => Ok(false),
            Node::Error(_) => Ok(true),
            Node::Function(f) if f.arity == 0 => f.result()?.is_error(),
            Node::Function(_) => Ok(false),
        }
    }

    /// The message of an error, or of a satisfied function's error result.
    pub fn error(&self) -> Result<&str> {
        match &*self.0 {
            Node::Error(e) => Ok(&e.message),
            Node::Function(f) if f.arity == 0 => f.result()?.error(),
            Node::Function(_) => Err(FormletError::NoError {
                what: "unsatisfied function",
            }),
            Node::Plain { .. } => Err(FormletError::NoError {
                what: "plain value",
            }),
        }
    }

    /// The memoized result of a satisfied function.
    pub fn result(&self) -> Result<&Value> {
        match &*self.0 {
            Node::Function(f) if f.arity == 0 => f.result(),
            _ => Err(FormletError::Precondition {
                message: format!("result requested from {}", self.kind_name()),
            }),
        }
    }

    /// Register a raised error kind to be turned into an error value
    /// instead of escaping from evaluation.
    pub fn reify_on(&self, kind: ErrorKind) -> Result<Value> {
        match &*self.0 {
            Node::Function(f) => {
                let mut next = f.copy();
                if !next.reify_on.contains(&kind) {
                    next.reify_on.push(kind);
                }
                Ok(Value(Rc::new(Node::Function(next))))
            }
            _ => Err(FormletError::NotApplicable {
                what: self.kind_name(),
            }),
        }
    }

    /// Preset leading arguments of a function.
    pub fn with_args(&self, args: Vec<Value>) -> Result<Value> {
        match &*self.0 {
            Node::Function(f) => {
                if args.len() > f.arity {
                    return Err(FormletError::ArityMismatch {
                        function: f.name.to_string(),
                        expected: f.arity,
                        got: args.len(),
                    });
                }
                let mut next = f.copy();
                next.arity -= args.len();
                next.args.extend(args);
                Ok(Value(Rc::new(Node::Function(next))))
            }
            _ => Err(FormletError::NotApplicable {
                what: self.kind_name(),
            }),
        }
    }

    /// `self ∘ other`: a unary function computing `self(other(x))`, forcing
    /// after each step.
    pub fn compose_with(&self, other: &Value) -> Result<Value> {
        for v in [self, other] {
            if !v.is_function() {
                return Err(FormletError::NotApplicable {
                    what: v.kind_name(),
                });
            }
        }
        let outer = self.clone();
        let inner = other.clone();
        Ok(Value::function_raw("compose", 1, move |args| {
            let [x] = unpack(args)?;
            let res = inner.apply(x.into_value())?.force()?;
            Ok(outer.apply(res)?.force()?.into())
        }))
    }

    /// Messages of an error and all of its causes, keyed by the error's
    /// origins joined with `;`.
    pub fn to_dict(&self) -> Result<&BTreeMap<String, Vec<String>>> {
        match &*self.0 {
            Node::Error(e) => Ok(e.dict.get_or_init(|| {
                let mut dict: BTreeMap<String, Vec<String>> = BTreeMap::new();
                let key = e.origins.iter().cloned().collect::<Vec<_>>().join(";");
                dict.entry(key).or_default().push(e.message.clone());
                for cause in &e.causes {
                    if let Ok(sub) = cause.to_dict() {
                        for (origin, messages) in sub {
                            dict.entry(origin.clone())
                                .or_default()
                                .extend(messages.iter().cloned());
                        }
                    }
                }
                dict
            })),
            _ => Err(FormletError::NoError {
                what: self.kind_name(),
            }),
        }
    }
}

impl FunctionNode {
    fn copy(&self) -> FunctionNode {
        FunctionNode {
            name: self.name.clone(),
            callable: self.callable.clone(),
            arity: self.arity,
            args: self.args.clone(),
            unwrap_args: self.unwrap_args,
            reify_on: self.reify_on.clone(),
            origins: self.origins.clone(),
            result: OnceCell::new(),
        }
    }

    fn result(&self) -> Result<&Value> {
        self.result.get_or_try_init(|| self.evaluate())
    }

    fn evaluate(&self) -> Result<Value> {
        let mut origins = Origins::new();
        let mut errors: Vec<Value> = Vec::new();
        let mut call_args = Vec::with_capacity(self.args.len());

        for arg in &self.args {
            origins.extend(arg.origins().iter().cloned());
            if !self.unwrap_args {
                call_args.push(Arg::Value(arg.clone()));
                continue;
            }

            let forced = arg.force()?;
            origins.extend(forced.origins().iter().cloned());
            if forced.is_error_node() {
                if !errors.iter().any(|e| e.ptr_eq(&forced)) {
                    errors.push(forced.clone());
                }
                call_args.push(Arg::Value(forced));
            } else if forced.is_applicable()? {
                call_args.push(Arg::Value(forced));
            } else {
                call_args.push(Arg::Datum(forced.get()?.clone()));
            }
        }

        if origins.len() == 1 && errors.len() == 1 {
            return Ok(errors.remove(0));
        }
        if !errors.is_empty() {
            return Ok(Value::error_node(
                ARGUMENT_ERRORS.to_string(),
                origins,
                errors,
            ));
        }

        match (self.callable)(call_args) {
            Ok(Outcome::Datum(datum)) => Ok(Value(Rc::new(Node::Plain { datum, origins }))),
            Ok(Outcome::Value(value)) => Ok(value),
            Err(raised) if self.reify_on.contains(&raised.kind) => {
                tracing::debug!(
                    function = %self.name,
                    kind = %raised.kind,
                    "reified raised error: {}",
                    raised.message
                );
                Ok(Value::error_node(
                    raised.message,
                    self.origins.clone(),
                    Vec::new(),
                ))
            }
            Err(raised) => Err(FormletError::Unhandled {
                function: self.name.to_string(),
                kind: raised.kind,
                message: raised.message,
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Node::Plain { datum, origins } => f
                .debug_struct("Plain")
                .field("datum", datum)
                .field("origins", origins)
                .finish(),
            Node::Function(func) => f
                .debug_struct("Function")
                .field("name", &func.name)
                .field("arity", &func.arity)
                .field("args", &func.args)
                .field("origins", &func.origins)
                .finish(),
            Node::Error(e) => f
                .debug_struct("Error")
                .field("message", &e.message)
                .field("origins", &e.origins)
                .field("causes", &e.causes)
                .finish(),
        }
    }
}

/// The identity function.
pub fn identity() -> Value {
    Value::function_raw("id", 1, |args| {
        let [x] = unpack(args)?;
        Ok(x.into_value().into())
    })
}

/// `f -> f(x)`, forced.
pub fn application_to(x: Value) -> Value {
    Value::function("application_to", 1, move |args| {
        let [f] = unpack(args)?;
        Ok(f.into_value().apply(x.clone())?.force()?.into())
    })
}

/// `(l, r) -> l ∘ r`
pub fn composition() -> Value {
    Value::function("composition", 2, |args| {
        let [l, r] = unpack(args)?;
        Ok(l.into_value().compose_with(&r.into_value())?.into())
    })
}

/// `(a, b) -> [a, b]`
pub fn pair() -> Value {
    Value::binary("pair", |a, b| Ok(Datum::List(vec![a, b])))
}
