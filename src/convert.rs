//! Conversion between scripting values and Variants.
//!
//! [`to_variant`] is total over its error contract: every [`Value`] either
//! maps to exactly one Variant kind or fails with a [`ConversionError`] naming
//! the offending type. Nothing is coerced across kinds on the way in; any
//! widening happens later, in typed extraction.
//!
//! ## Mapping rules
//!
//! | Value | Variant |
//! |-------|---------|
//! | `None` | `None` |
//! | `bool`, `int`, `float`, `str` | `Bool`, `Int`, `Float`, `String` |
//! | `list`, `tuple` | `Sequence` (every element must convert) |
//! | `dict` with `int` keys | `Map<int, Variant>` |
//! | `dict` with `str` keys | `Map<string, Variant>` |
//! | object | `Object` (the wrapped handle) |
//! | anything else | error |
//!
//! A dictionary's key kind is fixed by its first key; any other key type
//! fails the whole conversion.

use bindery_core::{ConversionError, KeyKind, MapKey, Variant, VariantMap};

use crate::context::{Context, Options};
use crate::value::Value;

const VARIANT: &str = "Variant";

/// Classify a scripting value into a Variant.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn to_variant(value: &Value, options: &Options) -> Result<Variant, ConversionError> {
    Ok(match value {
        Value::None => Variant::None,
        Value::Bool(v) => Variant::Bool(*v),
        Value::Int(v) => Variant::Int(*v),
        Value::Float(v) => Variant::Float(*v),
        Value::Str(s) => Variant::String(s.clone()),
        Value::List(items) | Value::Tuple(items) => Variant::Sequence(
            items
                .iter()
                .map(|item| to_variant(item, options))
                .collect::<Result<_, _>>()?,
        ),
        Value::Dict(entries) => Variant::Map(map_to_variant(entries, options)?),
        Value::Object(object) => Variant::Object(object.handle().clone()),
        Value::Opaque(name) => return Err(ConversionError::no_conversion(name.as_str(), VARIANT)),
    })
}

fn map_to_variant(
    entries: &[(Value, Value)],
    options: &Options,
) -> Result<VariantMap, ConversionError> {
    let key_kind = match entries.first() {
        None => options.empty_map_keys,
        Some((Value::Int(_), _)) => KeyKind::Int,
        Some((Value::Str(_), _)) => KeyKind::String,
        Some((key, value)) => {
            return Err(ConversionError::no_conversion(
                dict_item(key, value),
                "Variant[Map<int|string, Variant>]",
            ));
        }
    };

    let mut map = VariantMap::new(key_kind);
    for (key, value) in entries {
        let map_key = match (key_kind, key) {
            (KeyKind::Int, Value::Int(k)) => MapKey::Int(*k),
            (KeyKind::String, Value::Str(k)) => MapKey::String(k.clone()),
            _ => {
                return Err(ConversionError::no_conversion(
                    dict_item(key, value),
                    format!("{VARIANT}[{}]", map.type_label()),
                ));
            }
        };
        map.insert(map_key, to_variant(value, options)?)?;
    }
    Ok(map)
}

/// `dict_item([(float, int)])`: the offending pair, by type.
fn dict_item(key: &Value, value: &Value) -> String {
    format!("dict_item([({}, {})])", key.type_name(), value.type_name())
}

/// Turn a Variant back into a scripting value. Handles are wrapped through
/// `context` so a live proxy is reused.
pub fn from_variant(variant: Variant, context: &Context) -> Value {
    match variant {
        Variant::None => Value::None,
        Variant::Bool(v) => Value::Bool(v),
        Variant::Int(v) => Value::Int(v),
        Variant::Float(v) => Value::Float(v),
        Variant::String(s) => Value::Str(s),
        Variant::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(|item| from_variant(item, context))
                .collect(),
        ),
        Variant::Map(map) => Value::Dict(
            map.iter()
                .map(|(key, value)| {
                    let key = match key {
                        MapKey::Int(k) => Value::Int(k),
                        MapKey::String(k) => Value::Str(k),
                    };
                    (key, from_variant(value.clone(), context))
                })
                .collect(),
        ),
        Variant::Object(handle) => Value::Object(context.wrap(handle)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(value: Value) -> Result<Variant, ConversionError> {
        to_variant(&value, &Options::default())
    }

    #[test]
    fn scalars_map_directly() {
        assert_eq!(convert(Value::Int(3)), Ok(Variant::Int(3)));
        assert_eq!(convert(Value::Float(3.0)), Ok(Variant::Float(3.0)));
        assert_eq!(convert(Value::from("x")), Ok(Variant::from("x")));
        assert_eq!(convert(Value::None), Ok(Variant::None));
    }

    #[test]
    fn sequences_fail_on_any_element() {
        assert_eq!(
            convert(Value::Tuple(vec![Value::Int(1), Value::Float(2.0)])),
            Ok(Variant::Sequence(vec![Variant::Int(1), Variant::Float(2.0)]))
        );
        let err = convert(Value::List(vec![Value::Int(1), Value::Opaque("module".into())]))
            .unwrap_err();
        assert_eq!(err.to_string(), "No conversion from type 'module' to 'Variant'");
    }

    #[test]
    fn float_key_is_rejected() {
        let err = convert(Value::Dict(vec![(Value::Float(5.0), Value::Int(2))])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No conversion from type 'dict_item([(float, int)])' to 'Variant[Map<int|string, Variant>]'"
        );
    }

    #[test]
    fn mixed_keys_are_rejected() {
        let err = convert(Value::Dict(vec![
            (Value::Int(1), Value::Int(2)),
            (Value::from("a"), Value::Int(3)),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConversionError::no_conversion("dict_item([(str, int)])", "Variant[Map<int, Variant>]")
        );
    }

    #[test]
    fn string_keyed_map() {
        let v = convert(Value::Dict(vec![(Value::from("k"), Value::Float(1.5))])).unwrap();
        let map = v.as_map().unwrap();
        assert_eq!(map.key_kind(), KeyKind::String);
        assert_eq!(map.get(&MapKey::from("k")), Some(&Variant::Float(1.5)));
    }

    #[test]
    fn empty_map_uses_configured_key_kind() {
        let options = Options {
            empty_map_keys: KeyKind::String,
            ..Options::default()
        };
        let v = to_variant(&Value::Dict(Vec::new()), &options).unwrap();
        assert_eq!(v.type_label(), "Map<string, Variant>");
        assert_eq!(
            convert(Value::Dict(Vec::new())).unwrap().type_label(),
            "Map<int, Variant>"
        );
    }

    #[test]
    fn from_variant_round_trips_plain_data() {
        let context = Context::new();
        let value = Value::Dict(vec![(Value::Int(1), Value::from([1.5, 2.0]))]);
        let back = from_variant(convert(value.clone()).unwrap(), &context);
        assert_eq!(back, value);
    }
}
