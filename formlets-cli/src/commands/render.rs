//! Render a form without a submission.

use anyhow::{Context, Result};
use std::path::Path;

pub fn render_form(form_path: &Path) -> Result<()> {
    let form = super::load_form(form_path)?;
    let html = form.render_blank().context("Failed to render form")?;
    println!("{}", html);
    Ok(())
}
