//! CLI command implementations.

pub mod render;
pub mod submit;

pub use render::render_form;
pub use submit::{read_submission, submit_form};

use crate::config::FormConfig;
use anyhow::{Context, Result};
use formlets_core::Form;
use std::path::Path;

/// Load a form definition and instantiate it.
fn load_form(path: &Path) -> Result<Form> {
    let config = FormConfig::from_file(path)
        .with_context(|| format!("Failed to load form definition {}", path.display()))?;
    let formlet = config
        .to_formlet()
        .context("Failed to compose form definition")?;
    Ok(Form::new(&formlet, &config.name_source()))
}
