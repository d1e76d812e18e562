/// Immutable generator of unique field names.
///
/// Names are `prefix` followed by a counter; every call to [`NameSource::next`]
/// yields a name and the source to use for the following field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameSource {
    prefix: String,
    counter: usize,
}

pub const DEFAULT_PREFIX: &str = "field";

impl NameSource {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of names drawn so far along this path.
    pub fn drawn(&self) -> usize {
        self.counter
    }

    pub fn next(&self) -> (String, NameSource) {
        let name = format!("{}{}", self.prefix, self.counter);
        tracing::trace!(name = %name, "allocated field name");
        let source = NameSource {
            prefix: self.prefix.clone(),
            counter: self.counter + 1,
        };
        (name, source)
    }
}

impl Default for NameSource {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_deterministic() {
        let ns = NameSource::new("f");
        let (a, ns1) = ns.next();
        let (b, _) = ns.next();
        assert_eq!(a, b);
        assert_eq!(a, "f0");
        assert_eq!(ns1.next().0, "f1");
        assert_eq!(ns.drawn(), 0);
        assert_eq!(ns1.drawn(), 1);
    }

    #[test]
    fn test_default_prefix() {
        assert_eq!(NameSource::default().next().0, "field0");
    }
}
