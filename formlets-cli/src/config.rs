//! Declarative form definitions loaded from YAML.

use formlets_core::{
    checkbox, fieldset, pure, submit, text_input, textarea, with_errors, with_label, Datum,
    Formlet, NameSource, Outcome, Value, DEFAULT_PREFIX,
};
use formlets_html::Attributes;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Message attached to required fields left empty.
pub const REQUIRED_MESSAGE: &str = "must not be empty";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read form file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid field #{index}: {message}")]
    InvalidField { index: usize, message: String },
}

/// A form definition, matching the form.yml schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_prefix")]
    pub name_prefix: String,

    /// Wrap the whole form in a fieldset with this legend.
    #[serde(default)]
    pub legend: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Checkbox,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Flag(bool),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub kind: FieldKind,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub default: Option<FieldDefault>,

    #[serde(default)]
    pub required: bool,

    /// Caption of a submit button.
    #[serde(default)]
    pub value: Option<String>,

    /// Whether a submit button reports being pressed.
    #[serde(default)]
    pub collects: bool,

    #[serde(default)]
    pub attributes: Attributes,
}

impl FormConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn name_source(&self) -> NameSource {
        NameSource::new(self.name_prefix.as_str())
    }

    /// Number of fields contributing to the collected value.
    pub fn collecting_fields(&self) -> usize {
        self.fields.iter().filter(|f| f.collects_value()).count()
    }

    /// Compose the formlet for this definition.
    ///
    /// The collected value is a list with one entry per collecting field, in
    /// definition order.
    pub fn to_formlet(&self) -> Result<Formlet, ConfigError> {
        let mut formlet: Option<Formlet> = None;
        for (index, field) in self.fields.iter().enumerate() {
            let next = field.to_formlet(index)?;
            formlet = Some(match formlet {
                Some(formlet) => formlet.cmb(&next),
                None => next,
            });
        }
        let formlet = formlet
            .unwrap_or_else(|| pure(Value::plain(Datum::None)))
            .map(flatten_fields(self.collecting_fields()));

        Ok(match &self.legend {
            Some(legend) => fieldset(legend, &formlet, Attributes::new(), Attributes::new()),
            None => formlet,
        })
    }
}

impl FieldConfig {
    fn collects_value(&self) -> bool {
        self.kind != FieldKind::Submit || self.collects
    }

    fn to_formlet(&self, index: usize) -> Result<Formlet, ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidField {
            index,
            message: message.to_string(),
        };
        let attributes = self.attributes.clone();

        let formlet = match self.kind {
            FieldKind::Submit => {
                if self.required {
                    return Err(invalid("submit buttons cannot be required"));
                }
                let caption = self.value.as_deref().unwrap_or("Submit");
                return Ok(submit(caption, attributes, self.collects));
            }
            FieldKind::Text | FieldKind::Textarea => {
                let default = match &self.default {
                    None => None,
                    Some(FieldDefault::Text(text)) => Some(text.as_str()),
                    Some(FieldDefault::Flag(_)) => {
                        return Err(invalid("text fields take a string default"))
                    }
                };
                if self.kind == FieldKind::Text {
                    text_input(default, attributes)
                } else {
                    textarea(default, attributes)
                }
            }
            FieldKind::Checkbox => {
                let default = match &self.default {
                    None => false,
                    Some(FieldDefault::Flag(flag)) => *flag,
                    Some(FieldDefault::Text(_)) => {
                        return Err(invalid("checkboxes take a boolean default"))
                    }
                };
                checkbox(default, attributes)
            }
        };

        let formlet = if self.required {
            formlet.satisfies(non_empty(), REQUIRED_MESSAGE)
        } else {
            formlet
        };
        let formlet = with_errors(&formlet);
        Ok(match &self.label {
            Some(label) => with_label(label, &formlet),
            None => formlet,
        })
    }
}

/// Holds for non-empty strings and checked checkboxes.
fn non_empty() -> Value {
    Value::predicate("non-empty", |d| match d {
        Datum::String(s) => !s.is_empty(),
        Datum::Bool(b) => *b,
        _ => false,
    })
}

/// Flatten the left-nested pairs built by combining `count` collectors into
/// one list. Errors pass through untouched.
fn flatten_fields(count: usize) -> Value {
    Value::function_raw("fields", 1, move |args| {
        let [collected] = formlets_core::unpack(args)?;
        let collected = collected.into_value().force()?;
        if collected.is_error()? {
            return Ok(Outcome::Value(collected));
        }
        let items = unnest(collected.get()?.clone(), count);
        Ok(Datum::List(items).into())
    })
}

fn unnest(datum: Datum, count: usize) -> Vec<Datum> {
    match (count, datum) {
        (0, _) => Vec::new(),
        (1, datum) => vec![datum],
        (_, Datum::List(mut items)) if items.len() == 2 => {
            let last = items.pop().unwrap_or(Datum::None);
            let first = items.pop().unwrap_or(Datum::None);
            let mut out = unnest(first, count - 1);
            out.push(last);
            out
        }
        (_, datum) => vec![datum],
    }
}
