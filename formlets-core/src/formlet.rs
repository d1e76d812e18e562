//! The formlet algebra.
//!
//! A [`Formlet`] is an immutable form definition. Instantiating it with a
//! [`NameSource`] yields a matching builder and collector plus the name
//! source for whatever comes next. Derived combinators live in
//! [`crate::combinators`] and only use the methods defined here.

use crate::builder::{Builder, TagCallbacks};
use crate::collector::{Collector, Submission};
use crate::error::Result;
use crate::name_source::NameSource;
use crate::render_dict::RenderDict;
use crate::value::Value;
use formlets_html::{Attributes, Html};
use std::fmt;
use std::rc::Rc;

pub type BuilderMap = Rc<dyn Fn(Builder) -> Builder>;
pub type CollectorMap = Rc<dyn Fn(Collector) -> Collector>;

/// Result of instantiating a formlet.
#[derive(Debug, Clone)]
pub struct Instance {
    pub builder: Builder,
    pub collector: Collector,
    pub name_source: NameSource,
}

#[derive(Clone)]
pub struct Formlet(Rc<FormletNode>);

enum FormletNode {
    Pure(Value),
    Combined(Formlet, Formlet),
    Mapped {
        inner: Formlet,
        builder: BuilderMap,
        collector: CollectorMap,
    },
    Text(String),
    Input(Rc<FieldTag>),
    TextArea(Rc<FieldTag>),
}

/// Callbacks of the single named tag an input or textarea renders to.
struct FieldTag {
    attributes: Attributes,
    content: Option<Html>,
}

impl TagCallbacks for FieldTag {
    fn attributes(&self, _dict: &RenderDict, name: Option<&str>) -> Attributes {
        let mut attributes = self.attributes.clone();
        if let Some(name) = name {
            attributes.set("name", name);
        }
        attributes
    }

    fn content(&self, _dict: &RenderDict, _name: Option<&str>) -> Option<Html> {
        self.content.clone()
    }
}

impl Formlet {
    fn from_node(node: FormletNode) -> Self {
        Formlet(Rc::new(node))
    }

    /// Collects `value` and renders nothing.
    pub fn pure(value: Value) -> Self {
        Self::from_node(FormletNode::Pure(value))
    }

    /// Renders constant text and collects nothing.
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self::from_node(FormletNode::Text(content.into()))
    }

    /// A bare `<input>` with the given attributes and a fresh name.
    pub fn input(attributes: Attributes) -> Self {
        Self::from_node(FormletNode::Input(Rc::new(FieldTag {
            attributes,
            content: None,
        })))
    }

    /// A bare `<textarea>` with the given attributes and a fresh name.
    pub fn text_area(attributes: Attributes) -> Self {
        Self::from_node(FormletNode::TextArea(Rc::new(FieldTag {
            attributes,
            content: Some(Html::text("")),
        })))
    }

    pub fn instantiate(&self, name_source: &NameSource) -> Instance {
        match &*self.0 {
            FormletNode::Pure(value) => Instance {
                builder: Builder::Nop,
                collector: Collector::constant(value.clone()),
                name_source: name_source.clone(),
            },
            FormletNode::Combined(left, right) => {
                let l = left.instantiate(name_source);
                let r = right.instantiate(&l.name_source);
                Instance {
                    builder: Builder::concat(l.builder, r.builder),
                    collector: Collector::combine(l.collector, r.collector),
                    name_source: r.name_source,
                }
            }
            FormletNode::Mapped {
                inner,
                builder,
                collector,
            } => {
                let instance = inner.instantiate(name_source);
                Instance {
                    builder: builder(instance.builder),
                    collector: collector(instance.collector),
                    name_source: instance.name_source,
                }
            }
            FormletNode::Text(content) => Instance {
                builder: Builder::text(content.as_str()),
                collector: Collector::Nullary,
                name_source: name_source.clone(),
            },
            FormletNode::Input(tag) => Self::named_tag("input", tag, name_source),
            FormletNode::TextArea(tag) => Self::named_tag("textarea", tag, name_source),
        }
    }

    fn named_tag(tag_name: &str, tag: &Rc<FieldTag>, name_source: &NameSource) -> Instance {
        let (name, next) = name_source.next();
        let callbacks: Rc<dyn TagCallbacks> = tag.clone();
        Instance {
            builder: Builder::tag(tag_name, callbacks, Some(name.clone())),
            collector: Collector::field(name),
            name_source: next,
        }
    }

    /// This formlet followed by `other`.
    pub fn cmb(&self, other: &Formlet) -> Formlet {
        Self::from_node(FormletNode::Combined(self.clone(), other.clone()))
    }

    /// Rewrite builder and collector after instantiation.
    pub fn map_bc<B, C>(&self, transform_builder: B, transform_collector: C) -> Formlet
    where
        B: Fn(Builder) -> Builder + 'static,
        C: Fn(Collector) -> Collector + 'static,
    {
        Self::from_node(FormletNode::Mapped {
            inner: self.clone(),
            builder: Rc::new(transform_builder),
            collector: Rc::new(transform_collector),
        })
    }

    /// Additionally require the collected value to pass `predicate`.
    pub fn satisfies<S: Into<String>>(&self, predicate: Value, error: S) -> Formlet {
        let error = error.into();
        self.map_bc(
            |b| b,
            move |c| c.satisfies(predicate.clone(), error.clone()),
        )
    }

    /// Map a function value over the collected value.
    pub fn map(&self, transformation: Value) -> Formlet {
        self.map_bc(|b| b, move |c| c.map(transformation.clone()))
    }

    pub fn wrap_collector<F>(&self, wrapper: F) -> Formlet
    where
        F: Fn(&Collector, &Submission) -> Result<Value> + 'static,
    {
        let wrapper = Rc::new(wrapper);
        self.map_bc(
            |b| b,
            move |c| {
                let wrapper = wrapper.clone();
                c.wrap(move |inner, input| wrapper(inner, input))
            },
        )
    }

    pub fn replace_collector(&self, collector: Collector) -> Formlet {
        self.map_bc(|b| b, move |_| collector.clone())
    }

    /// Rewrite the rendered markup, with access to the render dict.
    pub fn map_html<F>(&self, transformation: F) -> Formlet
    where
        F: Fn(&RenderDict, Html) -> Result<Html> + 'static,
    {
        let transformation = Rc::new(transformation);
        self.map_bc(
            move |b| {
                let transformation = transformation.clone();
                b.map(move |dict, html| transformation(dict, html))
            },
            |c| c,
        )
    }
}

impl fmt::Debug for Formlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            FormletNode::Pure(v) => f.debug_tuple("Pure").field(v).finish(),
            FormletNode::Combined(l, r) => f.debug_tuple("Combined").field(l).field(r).finish(),
            FormletNode::Mapped { inner, .. } => f.debug_tuple("Mapped").field(inner).finish(),
            FormletNode::Text(content) => f.debug_tuple("Text").field(content).finish(),
            FormletNode::Input(tag) => f.debug_tuple("Input").field(&tag.attributes).finish(),
            FormletNode::TextArea(tag) => {
                f.debug_tuple("TextArea").field(&tag.attributes).finish()
            }
        }
    }
}

/// One instantiation of a formlet, driving the render/collect cycle.
#[derive(Debug, Clone)]
pub struct Form {
    instance: Instance,
}

/// Outcome of processing a submission.
#[derive(Debug, Clone)]
pub struct Processed {
    pub value: Value,
    pub dict: RenderDict,
    pub html: Html,
}

impl Processed {
    pub fn is_valid(&self) -> Result<bool> {
        Ok(!self.value.is_error()?)
    }
}

impl Form {
    pub fn new(formlet: &Formlet, name_source: &NameSource) -> Self {
        let instance = formlet.instantiate(name_source);
        tracing::debug!(
            prefix = name_source.prefix(),
            fields = instance.name_source.drawn() - name_source.drawn(),
            "instantiated form"
        );
        Self { instance }
    }

    pub fn builder(&self) -> &Builder {
        &self.instance.builder
    }

    pub fn collector(&self) -> &Collector {
        &self.instance.collector
    }

    pub fn render_blank(&self) -> Result<Html> {
        self.instance.builder.build()
    }

    /// Collect a submission and re-render the form with sticky values and
    /// error annotations.
    pub fn process(&self, submission: Submission) -> Result<Processed> {
        let collected = self.instance.collector.collect(&submission)?;
        let dict = RenderDict::new(submission, &collected)?;
        let value = collected.force()?;
        let html = self.instance.builder.build_with_dict(&dict)?;
        Ok(Processed { value, dict, html })
    }
}
