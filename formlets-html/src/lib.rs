//! # formlets-html
//!
//! A small, immutable HTML tree. Formlet builders produce it and the form
//! wiring combinators (labels, error annotations, fieldsets) rewrite it.
//! Rendering to markup text goes through [`std::fmt::Display`], which escapes
//! text content and attribute values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered tag attributes.
///
/// Insertion order is kept so that rendered markup is stable; setting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Attributes {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl From<Attributes> for BTreeMap<String, String> {
    fn from(attrs: Attributes) -> Self {
        attrs.entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

/// A single element. `content == None` renders as a self-closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attributes: Attributes,
    pub content: Option<Box<Html>>,
}

impl Tag {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.set(key, value);
        self
    }

    pub fn content(&self) -> Option<&Html> {
        self.content.as_deref()
    }

    pub fn with_content(mut self, content: Html) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    /// The value of the `name` attribute, i.e. the form field this tag feeds.
    pub fn field_name(&self) -> Option<&str> {
        self.attribute("name")
    }
}

/// HTML tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Html {
    #[default]
    Nop,
    Text(String),
    Tag(Tag),
    Sequence(Vec<Html>),
}

impl Html {
    pub fn nop() -> Self {
        Html::Nop
    }

    pub fn text<S: Into<String>>(s: S) -> Self {
        Html::Text(s.into())
    }

    pub fn tag<S: Into<String>>(name: S, attributes: Attributes, content: Option<Html>) -> Self {
        Html::Tag(Tag {
            name: name.into(),
            attributes,
            content: content.map(Box::new),
        })
    }

    /// Combine two pieces of HTML
    pub fn concat(self, other: Html) -> Html {
        match (self, other) {
            (Html::Nop, other) => other,
            (this, Html::Nop) => this,
            (Html::Sequence(mut seq1), Html::Sequence(seq2)) => {
                seq1.extend(seq2);
                Html::Sequence(seq1)
            }
            (Html::Sequence(mut seq), other) => {
                seq.push(other);
                Html::Sequence(seq)
            }
            (this, Html::Sequence(mut seq)) => {
                seq.insert(0, this);
                Html::Sequence(seq)
            }
            (this, other) => Html::Sequence(vec![this, other]),
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Html::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Attribute of the root tag; `None` for anything that is not a tag.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.as_tag().and_then(|t| t.attribute(key))
    }

    /// Set an attribute on the root tag. Non-tags are returned unchanged.
    pub fn with_attribute<K: Into<String>, V: Into<String>>(self, key: K, value: V) -> Html {
        match self {
            Html::Tag(tag) => Html::Tag(tag.with_attribute(key, value)),
            other => other,
        }
    }

    pub fn content(&self) -> Option<&Html> {
        self.as_tag().and_then(Tag::content)
    }

    /// Replace the content of the root tag. Non-tags are returned unchanged.
    pub fn with_content(self, content: Html) -> Html {
        match self {
            Html::Tag(tag) => Html::Tag(tag.with_content(content)),
            other => other,
        }
    }

    /// First tag in depth-first pre-order that satisfies `pred`.
    pub fn depth_first<P>(&self, pred: &P) -> Option<&Tag>
    where
        P: Fn(&Tag) -> bool,
    {
        match self {
            Html::Nop | Html::Text(_) => None,
            Html::Tag(tag) => {
                if pred(tag) {
                    return Some(tag);
                }
                tag.content.as_deref().and_then(|c| c.depth_first(pred))
            }
            Html::Sequence(items) => items.iter().find_map(|item| item.depth_first(pred)),
        }
    }

    /// Rewrite the first tag in depth-first pre-order that satisfies `pred`.
    ///
    /// Returns the new tree and whether a tag was rewritten.
    pub fn replace_depth_first<P, F>(self, pred: &P, f: F) -> (Html, bool)
    where
        P: Fn(&Tag) -> bool,
        F: FnOnce(Tag) -> Tag,
    {
        let mut f = Some(f);
        let html = self.replace_inner(pred, &mut f);
        (html, f.is_none())
    }

    fn replace_inner<P, F>(self, pred: &P, f: &mut Option<F>) -> Html
    where
        P: Fn(&Tag) -> bool,
        F: FnOnce(Tag) -> Tag,
    {
        if f.is_none() {
            return self;
        }
        match self {
            Html::Tag(tag) if pred(&tag) => match f.take() {
                Some(f) => Html::Tag(f(tag)),
                None => Html::Tag(tag),
            },
            Html::Tag(mut tag) => {
                tag.content = tag
                    .content
                    .map(|content| Box::new(content.replace_inner(pred, f)));
                Html::Tag(tag)
            }
            Html::Sequence(items) => Html::Sequence(
                items
                    .into_iter()
                    .map(|item| item.replace_inner(pred, f))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Name of the first tag carrying a `name` attribute.
    pub fn first_field_name(&self) -> Option<&str> {
        self.depth_first(&|t: &Tag| t.field_name().is_some())
            .and_then(Tag::field_name)
    }

    /// Rewrite the first tag carrying a `name` attribute.
    pub fn replace_first_named<F>(self, f: F) -> (Html, bool)
    where
        F: FnOnce(Tag) -> Tag,
    {
        self.replace_depth_first(&|t: &Tag| t.field_name().is_some(), f)
    }
}

impl From<Tag> for Html {
    fn from(tag: Tag) -> Self {
        Html::Tag(tag)
    }
}

fn escape(s: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (key, value) in self.attributes.iter() {
            write!(f, " {}=\"{}\"", key, escape(value, true))?;
        }
        match &self.content {
            None => write!(f, "/>"),
            Some(content) => write!(f, ">{}</{}>", content, self.name),
        }
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Html::Nop => Ok(()),
            Html::Text(text) => write!(f, "{}", escape(text, false)),
            Html::Tag(tag) => write!(f, "{}", tag),
            Html::Sequence(items) => {
                for item in items {
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> Html {
        Html::tag(
            "input",
            Attributes::new()
                .with_attr("type", "text")
                .with_attr("name", name),
            None,
        )
    }

    #[test]
    fn test_concat_drops_nop() {
        let a = Html::text("a");
        assert_eq!(Html::nop().concat(a.clone()), a);
        assert_eq!(a.clone().concat(Html::nop()), a);
    }

    #[test]
    fn test_concat_flattens_sequences() {
        let seq = Html::text("a").concat(Html::text("b")).concat(Html::text("c"));
        match seq {
            Html::Sequence(items) => assert_eq!(items.len(), 3),
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_attributes_keep_insertion_order() {
        let mut attrs = Attributes::new().with_attr("b", "1").with_attr("a", "2");
        attrs.set("b", "3");
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(attrs.get("b"), Some("3"));
        assert_eq!(attrs.remove("a"), Some("2".to_string()));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_render_escapes() {
        let html = Html::tag(
            "span",
            Attributes::new().with_attr("title", "a \"quote\""),
            Some(Html::text("1 < 2 & 3")),
        );
        insta::assert_snapshot!(html.to_string(), @r#"<span title="a &quot;quote&quot;">1 &lt; 2 &amp; 3</span>"#);
    }

    #[test]
    fn test_self_closing_and_empty_content() {
        assert_eq!(input("f0").to_string(), r#"<input type="text" name="f0"/>"#);
        let area = Html::tag("textarea", Attributes::new(), Some(Html::text("")));
        assert_eq!(area.to_string(), "<textarea></textarea>");
    }

    #[test]
    fn test_first_field_name_is_depth_first() {
        let html = Html::tag(
            "div",
            Attributes::new(),
            Some(Html::text("x").concat(input("f1"))),
        )
        .concat(input("f2"));
        assert_eq!(html.first_field_name(), Some("f1"));
        assert_eq!(Html::text("plain").first_field_name(), None);
    }

    #[test]
    fn test_replace_first_named_only_touches_one_tag() {
        let html = input("f1").concat(input("f2"));
        let (html, replaced) = html.replace_first_named(|t| t.with_attribute("id", "f1"));
        assert!(replaced);
        assert_eq!(
            html.to_string(),
            r#"<input type="text" name="f1" id="f1"/><input type="text" name="f2"/>"#
        );

        let (_, replaced) = Html::text("x").replace_first_named(|t| t);
        assert!(!replaced);
    }

    #[test]
    fn test_root_accessors() {
        let html = input("f0").with_attribute("value", "v");
        assert_eq!(html.attribute("value"), Some("v"));
        assert_eq!(Html::text("t").with_attribute("value", "v"), Html::text("t"));
        let html = Html::tag("textarea", Attributes::new(), None).with_content(Html::text("c"));
        assert_eq!(html.content(), Some(&Html::text("c")));
    }
}
