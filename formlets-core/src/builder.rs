//! Builders render a form's markup from a [`RenderDict`].

use crate::error::Result;
use crate::render_dict::RenderDict;
use formlets_html::{Attributes, Html};
use std::fmt;
use std::rc::Rc;

/// Supplies attributes and content of a tag rendered by [`Builder::Tag`].
pub trait TagCallbacks {
    fn attributes(&self, dict: &RenderDict, name: Option<&str>) -> Attributes;

    fn content(&self, dict: &RenderDict, name: Option<&str>) -> Option<Html>;
}

pub type HtmlTransform = Rc<dyn Fn(&RenderDict, Html) -> Result<Html>>;

#[derive(Clone)]
pub enum Builder {
    Nop,
    Text(String),
    Tag {
        tag: String,
        callbacks: Rc<dyn TagCallbacks>,
        name: Option<String>,
    },
    Combined(Rc<Builder>, Rc<Builder>),
    /// Rewrites the inner builder's markup with access to the dict.
    Mapped(Rc<Builder>, HtmlTransform),
}

impl Builder {
    pub fn text<S: Into<String>>(content: S) -> Self {
        Builder::Text(content.into())
    }

    pub fn tag<S: Into<String>>(
        tag: S,
        callbacks: Rc<dyn TagCallbacks>,
        name: Option<String>,
    ) -> Self {
        Builder::Tag {
            tag: tag.into(),
            callbacks,
            name,
        }
    }

    pub fn concat(left: Builder, right: Builder) -> Builder {
        Builder::Combined(Rc::new(left), Rc::new(right))
    }

    pub fn map<F>(self, transformation: F) -> Builder
    where
        F: Fn(&RenderDict, Html) -> Result<Html> + 'static,
    {
        Builder::Mapped(Rc::new(self), Rc::new(transformation))
    }

    pub fn build_with_dict(&self, dict: &RenderDict) -> Result<Html> {
        match self {
            Builder::Nop => Ok(Html::nop()),
            Builder::Text(content) => Ok(Html::text(content.as_str())),
            Builder::Tag {
                tag,
                callbacks,
                name,
            } => {
                let name = name.as_deref();
                let attributes = callbacks.attributes(dict, name);
                let content = callbacks.content(dict, name);
                Ok(Html::tag(tag.as_str(), attributes, content))
            }
            Builder::Combined(left, right) => {
                Ok(left.build_with_dict(dict)?.concat(right.build_with_dict(dict)?))
            }
            Builder::Mapped(inner, transformation) => {
                let base = inner.build_with_dict(dict)?;
                transformation(dict, base)
            }
        }
    }

    /// Render without any submission.
    pub fn build(&self) -> Result<Html> {
        self.build_with_dict(RenderDict::empty())
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Builder::Nop => write!(f, "Nop"),
            Builder::Text(content) => f.debug_tuple("Text").field(content).finish(),
            Builder::Tag { tag, name, .. } => f
                .debug_struct("Tag")
                .field("tag", tag)
                .field("name", name)
                .finish(),
            Builder::Combined(l, r) => f.debug_tuple("Combined").field(l).field(r).finish(),
            Builder::Mapped(inner, _) => f.debug_tuple("Mapped").field(inner).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Submission;
    use crate::value::Value;

    struct Echo;

    impl TagCallbacks for Echo {
        fn attributes(&self, dict: &RenderDict, name: Option<&str>) -> Attributes {
            let mut attrs = Attributes::new();
            if let Some(name) = name {
                attrs.set("name", name);
                if let Some(v) = dict.value(name) {
                    attrs.set("value", v);
                }
            }
            attrs
        }

        fn content(&self, _dict: &RenderDict, _name: Option<&str>) -> Option<Html> {
            None
        }
    }

    #[test]
    fn test_tag_builder_reads_dict() {
        let b = Builder::tag("input", Rc::new(Echo), Some("f0".to_string()));
        assert_eq!(b.build().unwrap().to_string(), r#"<input name="f0"/>"#);

        let mut input = Submission::new();
        input.insert("f0".to_string(), "v".to_string());
        let dict = RenderDict::new(input, &Value::plain(true)).unwrap();
        assert_eq!(
            b.build_with_dict(&dict).unwrap().to_string(),
            r#"<input name="f0" value="v"/>"#
        );
    }

    #[test]
    fn test_combined_and_mapped() {
        let b = Builder::concat(Builder::text("a"), Builder::Nop)
            .map(|_, html| Ok(Html::tag("p", Attributes::new(), Some(html))));
        assert_eq!(b.build().unwrap().to_string(), "<p>a</p>");
    }
}
