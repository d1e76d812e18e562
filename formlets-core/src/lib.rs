//! # formlets-core
//!
//! Composable HTML form definitions that render markup, validate submitted
//! data and collect a typed result in one go.
//!
//! - [`Value`]: plain data, curried functions and errors, with origin
//!   tracking so that errors can be attributed to the inputs behind them
//! - [`Formlet`]: the combinator algebra; instantiating a formlet yields a
//!   [`Builder`] and a [`Collector`] that agree on field names
//! - [`RenderDict`]: submitted values plus errors per field, used to
//!   re-render a submitted form
//!
//! ## Example
//!
//! ```
//! use formlets_core::*;
//!
//! let name = with_errors(
//!     &text_input(None, Attributes::new())
//!         .satisfies(Value::predicate("non-empty", |d| d.as_str() != Some("")), "must not be empty"),
//! );
//! let form = Form::new(&name, &NameSource::default());
//!
//! let mut submission = Submission::new();
//! submission.insert("field0".to_string(), String::new());
//! let processed = form.process(submission).unwrap();
//! assert!(!processed.is_valid().unwrap());
//! assert!(processed.html.to_string().contains("must not be empty"));
//! ```

pub mod builder;
pub mod collector;
pub mod combinators;
pub mod error;
pub mod formlet;
pub mod name_source;
pub mod render_dict;
pub mod value;

#[cfg(test)]
mod tests;

pub use builder::{Builder, HtmlTransform, TagCallbacks};
pub use collector::{Collector, Submission, Wrapper, MISSING_INPUT};
pub use combinators::{
    checkbox, fieldset, input, pure, submit, text, text_input, textarea, textarea_raw,
    with_errors, with_label, ERROR_CLASS,
};
pub use error::{ErrorKind, FormletError, Raised, Result};
pub use formlet::{Form, Formlet, Instance, Processed};
pub use name_source::{NameSource, DEFAULT_PREFIX};
pub use render_dict::RenderDict;
pub use value::{
    application_to, composition, identity, pair, unpack, Arg, Datum, Origins, Outcome, Value,
    ValueId, ARGUMENT_ERRORS,
};

pub use formlets_html::{Attributes, Html, Tag};
