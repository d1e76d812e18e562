//! User-facing form combinators, built purely from [`Formlet`] methods.

use crate::collector::{Collector, Submission};
use crate::error::{FormletError, Result};
use crate::formlet::Formlet;
use crate::value::Value;
use formlets_html::{Attributes, Html};

/// CSS class of the `<span>` carrying an error message.
pub const ERROR_CLASS: &str = "error";

pub fn pure(value: Value) -> Formlet {
    Formlet::pure(value)
}

pub fn text<S: Into<String>>(content: S) -> Formlet {
    Formlet::text(content)
}

/// An `<input>` of the given type.
pub fn input(input_type: &str, mut attributes: Attributes) -> Formlet {
    attributes.set("type", input_type);
    Formlet::input(attributes)
}

pub fn textarea_raw(attributes: Attributes) -> Formlet {
    Formlet::text_area(attributes)
}

/// A text input that shows the submitted value, or `default` when there is
/// none.
pub fn text_input(default: Option<&str>, attributes: Attributes) -> Formlet {
    let default = default.map(str::to_string);
    input("text", attributes).map_html(move |dict, html| {
        let value = html
            .attribute("name")
            .and_then(|name| dict.value(name))
            .map(str::to_string)
            .or_else(|| default.clone());
        Ok(match value {
            Some(value) => html.with_attribute("value", value),
            None => html,
        })
    })
}

/// A textarea whose content is the submitted value, or `default`.
pub fn textarea(default: Option<&str>, attributes: Attributes) -> Formlet {
    let default = default.map(str::to_string);
    textarea_raw(attributes).map_html(move |dict, html| {
        let value = html
            .attribute("name")
            .and_then(|name| dict.value(name))
            .map(str::to_string)
            .or_else(|| default.clone());
        Ok(match value {
            Some(value) => html.with_content(Html::text(value)),
            None => html,
        })
    })
}

/// Collects `true` when the field was submitted and `false` when it is
/// missing, instead of reporting missing input.
fn presence(inner: &Collector, input: &Submission) -> Result<Value> {
    match inner.try_collect(input) {
        Ok(value) => Ok(Value::plain_from(true, value.origins().iter())),
        Err(FormletError::MissingInput { name }) => Ok(Value::plain_from(false, [name])),
        Err(err) => Err(err),
    }
}

/// A checkbox collecting whether it was checked.
///
/// Unsubmitted forms show `default`; submitted ones show what was sent.
pub fn checkbox(default: bool, attributes: Attributes) -> Formlet {
    input("checkbox", attributes)
        .wrap_collector(presence)
        .map_html(move |dict, html| {
            let checked = if dict.is_empty() {
                default
            } else {
                html.attribute("name")
                    .map(|name| dict.value_exists(name))
                    .unwrap_or(false)
            };
            Ok(if checked {
                html.with_attribute("checked", "checked")
            } else {
                html
            })
        })
}

/// A submit button. With `collects` it reports whether it was pressed,
/// otherwise it collects nothing.
pub fn submit(value: &str, mut attributes: Attributes, collects: bool) -> Formlet {
    attributes.set("value", value);
    let button = input("submit", attributes);
    if collects {
        button.wrap_collector(presence)
    } else {
        button.replace_collector(Collector::Nullary)
    }
}

/// Wrap a formlet's markup in a `<fieldset>` with a `<legend>`.
pub fn fieldset(
    legend: &str,
    formlet: &Formlet,
    attributes: Attributes,
    legend_attributes: Attributes,
) -> Formlet {
    let legend = legend.to_string();
    formlet.map_html(move |_, html| {
        let legend = Html::tag(
            "legend",
            legend_attributes.clone(),
            Some(Html::text(legend.as_str())),
        );
        Ok(Html::tag("fieldset", attributes.clone(), Some(legend.concat(html))))
    })
}

fn first_field_name(html: &Html, combinator: &str) -> Result<String> {
    html.first_field_name()
        .map(str::to_string)
        .ok_or_else(|| FormletError::Precondition {
            message: format!("{} applied to un-named formlet", combinator),
        })
}

/// Put a `<label>` in front of the formlet, pointing at its first named
/// field. The field gets its name as `id`.
pub fn with_label(label: &str, formlet: &Formlet) -> Formlet {
    let label = label.to_string();
    formlet.map_html(move |_, html| {
        let name = first_field_name(&html, "with_label")?;
        let (html, _) = html.replace_first_named(|tag| tag.with_attribute("id", name.as_str()));
        let label = Html::tag(
            "label",
            Attributes::new().with_attr("for", name.as_str()),
            Some(Html::text(label.as_str())),
        );
        Ok(label.concat(html))
    })
}

/// Append the errors recorded for the formlet's first named field.
pub fn with_errors(formlet: &Formlet) -> Formlet {
    formlet.map_html(|dict, html| {
        let name = first_field_name(&html, "with_errors")?;
        let Some(errors) = dict.errors(&name) else {
            return Ok(html);
        };
        Ok(errors.iter().fold(html, |html, error| {
            html.concat(Html::tag(
                "span",
                Attributes::new().with_attr("class", ERROR_CLASS),
                Some(Html::text(error.as_str())),
            ))
        }))
    })
}
