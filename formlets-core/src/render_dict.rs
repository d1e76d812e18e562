//! Submitted values and accumulated errors, as seen by builders.

use crate::collector::Submission;
use crate::error::Result;
use crate::value::{Value, ValueId};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderDict {
    values: Submission,
    errors: BTreeMap<String, Vec<String>>,
    empty: bool,
}

static EMPTY: RenderDict = RenderDict {
    values: BTreeMap::new(),
    errors: BTreeMap::new(),
    empty: true,
};

impl RenderDict {
    /// The dict used to render a form nobody has submitted yet.
    pub fn empty() -> &'static RenderDict {
        &EMPTY
    }

    /// Build the dict for a submission and the value collected from it.
    pub fn new(input: Submission, value: &Value) -> Result<Self> {
        let errors = Self::compute_from(value)?;
        tracing::debug!(
            fields = input.len(),
            erroneous = errors.len(),
            "computed render dict"
        );
        Ok(Self {
            values: input,
            errors,
            empty: false,
        })
    }

    /// Walk a value graph and gather error messages per origin.
    ///
    /// Each node is visited at most once, so an error reachable along
    /// several paths is reported once.
    pub fn compute_from(value: &Value) -> Result<BTreeMap<String, Vec<String>>> {
        let mut errors = BTreeMap::new();
        let mut visited = HashSet::new();
        digest(value, &mut errors, &mut visited)?;
        Ok(errors)
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn value_exists(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn errors(&self, name: &str) -> Option<&[String]> {
        self.errors.get(name).map(Vec::as_slice)
    }

    pub fn all_errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}

fn digest(
    value: &Value,
    errors: &mut BTreeMap<String, Vec<String>>,
    visited: &mut HashSet<ValueId>,
) -> Result<()> {
    if !visited.insert(value.id()) {
        return Ok(());
    }

    if value.is_error_node() {
        let message = value.error()?;
        for origin in value.origins() {
            errors
                .entry(origin.clone())
                .or_insert_with(Vec::new)
                .push(message.to_string());
        }
        for cause in value.causes() {
            digest(cause, errors, visited)?;
        }
    } else if value.is_function() {
        if value.is_satisfied() {
            digest(value.result()?, errors, visited)?;
        }
        for arg in value.args() {
            digest(arg, errors, visited)?;
        }
    }
    Ok(())
}
