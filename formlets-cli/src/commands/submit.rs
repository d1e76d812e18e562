//! Process a submission against a form.

use anyhow::{anyhow, bail, Context, Result};
use formlets_core::{Datum, Submission};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Serialize)]
struct SubmitReport<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Datum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    errors: &'a BTreeMap<String, Vec<String>>,
    html: String,
}

/// Merge `--data` and `--field` inputs. Later fields win.
pub fn read_submission(data: Option<&Path>, fields: &[String]) -> Result<Submission> {
    let mut submission = match data {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<Submission>(&raw)
                .with_context(|| format!("{} is not a JSON object of strings", path.display()))?
        }
        None => Submission::new(),
    };

    for field in fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected NAME=VALUE, got '{}'", field))?;
        if name.is_empty() {
            bail!("Empty field name in '{}'", field);
        }
        submission.insert(name.to_string(), value.to_string());
    }

    tracing::debug!(fields = submission.len(), "read submission");
    Ok(submission)
}

pub fn submit_form(form_path: &Path, submission: Submission, json: bool) -> Result<()> {
    let form = super::load_form(form_path)?;
    let processed = form
        .process(submission)
        .context("Failed to process submission")?;

    let valid = processed.is_valid()?;
    let value = if valid {
        Some(
            processed
                .value
                .get()
                .context("Collected value is not plain data")?,
        )
    } else {
        None
    };
    let error = if valid {
        None
    } else {
        Some(processed.value.error()?)
    };

    let report = SubmitReport {
        valid,
        value,
        error,
        errors: processed.dict.all_errors(),
        html: processed.html.to_string(),
    };

    if json {
        let payload = serde_json::to_string_pretty(&report)?;
        println!("{}", payload);
    } else {
        println!("{}", report.html);
        match (report.value, report.error) {
            (Some(value), _) => println!("valid: {}", serde_json::to_string(value)?),
            (None, error) => {
                println!("invalid: {}", error.unwrap_or_default());
                for (field, messages) in report.errors {
                    for message in messages {
                        println!("- {}: {}", field, message);
                    }
                }
            }
        }
    }

    Ok(())
}
