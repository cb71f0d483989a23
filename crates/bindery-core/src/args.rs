//! Keyword arguments for method dispatch.

use crate::convert::{FromVariant, IntoVariant};
use crate::error::{BindError, BindResult};
use crate::variant::Variant;

/// Ordered keyword arguments passed to [`ObjectHandle::call`](crate::ObjectHandle::call).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    method: String,
    entries: Vec<(String, Variant)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword argument (builder form).
    pub fn with(mut self, name: impl Into<String>, value: impl IntoVariant) -> Self {
        self.push(name, value);
        self
    }

    /// Add a keyword argument. A repeated name replaces the earlier value.
    pub fn push(&mut self, name: impl Into<String>, value: impl IntoVariant) {
        let name = name.into();
        let value = value.into_variant();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Name of the method these arguments were dispatched to.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub(crate) fn set_method(&mut self, method: &str) {
        self.method = method.to_string();
    }

    /// Raw Variant for `name`.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Typed argument; fails if missing or of the wrong kind.
    pub fn get<T: FromVariant>(&self, name: &str) -> BindResult<T> {
        let variant = self.variant(name).ok_or_else(|| BindError::MissingArgument {
            method: self.method.clone(),
            name: name.to_string(),
        })?;
        Ok(T::from_variant(variant)?)
    }

    /// Typed argument, or `None` when absent.
    pub fn get_opt<T: FromVariant>(&self, name: &str) -> BindResult<Option<T>> {
        self.variant(name)
            .map(|v| T::from_variant(v).map_err(BindError::from))
            .transpose()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Variant)> for CallArgs {
    fn from_iter<I: IntoIterator<Item = (S, Variant)>>(iter: I) -> Self {
        let mut args = CallArgs::new();
        for (name, value) in iter {
            args.push(name, value);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;

    #[test]
    fn typed_get() {
        let args = CallArgs::new().with("factor", 2.5).with("name", "x");
        assert_eq!(args.get::<f64>("factor"), Ok(2.5));
        assert_eq!(args.get::<String>("name"), Ok("x".to_string()));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn missing_argument_names_method() {
        let mut args = CallArgs::new();
        args.set_method("scale");
        assert_eq!(
            args.get::<f64>("factor"),
            Err(BindError::MissingArgument {
                method: "scale".into(),
                name: "factor".into()
            })
        );
        assert_eq!(args.get_opt::<f64>("factor"), Ok(None));
    }

    #[test]
    fn wrong_kind_is_conversion_error() {
        let args = CallArgs::new().with("factor", "big");
        assert_eq!(
            args.get::<f64>("factor"),
            Err(BindError::Conversion(ConversionError::mismatch("string", "double")))
        );
    }

    #[test]
    fn repeated_name_replaces() {
        let args: CallArgs = vec![("a", Variant::Int(1)), ("a", Variant::Int(2))]
            .into_iter()
            .collect();
        assert_eq!(args.len(), 1);
        assert_eq!(args.variant("a"), Some(&Variant::Int(2)));
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["a"]);
    }
}
