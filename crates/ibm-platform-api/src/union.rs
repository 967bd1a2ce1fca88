//! Decoding of discriminated (tagged) JSON unions.
//!
//! Several API payloads are polymorphic: a JSON object whose concrete shape
//! is selected by a string discriminator field (`type` for zone addresses,
//! `destination_type` for notification destinations). Each such union is a
//! closed Rust enum implementing [`TaggedUnion`]; its `Deserialize` impl
//! routes through [`decode`] so every failure is reported as a typed
//! [`DecodeError`] rather than a free-form serde message.
//!
//! Serialization goes through serde's internally tagged representation, so
//! the discriminator is always emitted.

use std::cell::Cell;

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why a JSON value could not be decoded into a typed model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The discriminator field was absent, `null`, or the empty string.
    #[error("missing discriminator field `{field}`")]
    MissingDiscriminator { field: String },

    /// The discriminator carried a value no variant is registered for.
    #[error("unknown value `{value}` for discriminator field `{field}`")]
    UnknownVariant { field: String, value: String },

    /// A field the selected variant requires was absent.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// Anything else: wrong JSON types, invalid dates, bad UUIDs, ...
    #[error("{0}")]
    Malformed(String),
}

const MISSING_FIELD: &str = "missing field `";

thread_local! {
    // Latest union failure raised by `deserialize` on this thread. serde
    // flattens errors to text, so the typed value travels here instead.
    static LAST_FAILURE: Cell<Option<DecodeError>> = const { Cell::new(None) };
}

impl DecodeError {
    /// Recover the typed error behind a `serde_json` failure.
    ///
    /// A union failure recorded during the failed decode wins. Otherwise
    /// only serde's own "missing field" message is recognized; everything
    /// else is [`DecodeError::Malformed`].
    pub fn from_json(err: &serde_json::Error) -> Self {
        if let Some(failure) = LAST_FAILURE.with(Cell::take) {
            return failure;
        }

        let full = err.to_string();
        let message = full
            .rfind(" at line ")
            .map_or(full.as_str(), |idx| &full[..idx]);

        if let Some(field) = message
            .strip_prefix(MISSING_FIELD)
            .and_then(|rest| rest.strip_suffix('`'))
        {
            return Self::MissingField(field.to_owned());
        }

        Self::Malformed(message.to_owned())
    }
}

/// Deserialize a JSON document, reporting failures as [`DecodeError`].
pub fn from_str<T: DeserializeOwned>(body: &str) -> Result<T, DecodeError> {
    LAST_FAILURE.with(Cell::take);
    serde_json::from_str(body).map_err(|e| DecodeError::from_json(&e))
}

/// A closed set of payload shapes selected by a string discriminator.
pub trait TaggedUnion: Sized {
    /// Name of the JSON field carrying the discriminator.
    const DISCRIMINATOR: &'static str;

    /// Every registered discriminator value.
    const VARIANTS: &'static [&'static str];

    /// Decode the payload for an already validated discriminator value.
    /// `object` still contains the discriminator field.
    fn from_variant(tag: &str, object: Value) -> Result<Self, DecodeError>;

    /// The discriminator value of this instance.
    fn variant(&self) -> &'static str;
}

/// Decode a raw JSON value into the union `T`.
pub fn decode<T: TaggedUnion>(value: Value) -> Result<T, DecodeError> {
    let Value::Object(object) = value else {
        return Err(DecodeError::Malformed(format!(
            "expected a JSON object carrying `{}`, found {}",
            T::DISCRIMINATOR,
            json_kind(&value)
        )));
    };

    let tag = match object.get(T::DISCRIMINATOR) {
        Some(Value::String(tag)) if !tag.is_empty() => tag.clone(),
        None | Some(Value::Null | Value::String(_)) => {
            return Err(DecodeError::MissingDiscriminator {
                field: T::DISCRIMINATOR.to_owned(),
            });
        }
        Some(other) => {
            return Err(DecodeError::Malformed(format!(
                "discriminator field `{}` must be a string, found {}",
                T::DISCRIMINATOR,
                json_kind(other)
            )));
        }
    };

    if !T::VARIANTS.contains(&tag.as_str()) {
        return Err(DecodeError::UnknownVariant {
            field: T::DISCRIMINATOR.to_owned(),
            value: tag,
        });
    }

    T::from_variant(&tag, Value::Object(object))
}

/// Decode a variant payload struct from the union object.
pub(crate) fn payload<P: DeserializeOwned>(object: Value) -> Result<P, DecodeError> {
    serde_json::from_value(object).map_err(|e| DecodeError::from_json(&e))
}

/// `Deserialize` body shared by every union type.
pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TaggedUnion,
{
    let value = Value::deserialize(deserializer)?;
    decode(value).map_err(|failure| {
        let err = <D::Error as serde::de::Error>::custom(&failure);
        LAST_FAILURE.with(|slot| slot.set(Some(failure)));
        err
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize)]
    #[serde(tag = "kind")]
    enum Shape {
        #[serde(rename = "circle")]
        Circle(Circle),
        #[serde(rename = "square")]
        Square(Square),
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Circle {
        radius: u32,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Square {
        side: u32,
    }

    impl TaggedUnion for Shape {
        const DISCRIMINATOR: &'static str = "kind";
        const VARIANTS: &'static [&'static str] = &["circle", "square"];

        fn from_variant(tag: &str, object: Value) -> Result<Self, DecodeError> {
            match tag {
                "circle" => payload(object).map(Self::Circle),
                _ => payload(object).map(Self::Square),
            }
        }

        fn variant(&self) -> &'static str {
            match self {
                Self::Circle(_) => "circle",
                Self::Square(_) => "square",
            }
        }
    }

    impl<'de> Deserialize<'de> for Shape {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            super::deserialize(deserializer)
        }
    }

    #[derive(Debug, Deserialize)]
    struct Drawing {
        #[allow(dead_code)]
        shapes: Vec<Shape>,
    }

    #[test]
    fn dispatches_on_discriminator_and_ignores_extra_fields() {
        let shape: Shape = decode(json!({"kind": "square", "side": 4, "colour": "red"})).unwrap();
        assert_eq!(shape, Shape::Square(Square { side: 4 }));
        assert_eq!(shape.variant(), "square");
    }

    #[test]
    fn serialization_always_carries_the_tag() {
        let value = serde_json::to_value(Shape::Circle(Circle { radius: 2 })).unwrap();
        assert_eq!(value, json!({"kind": "circle", "radius": 2}));
    }

    #[test]
    fn missing_null_and_empty_discriminators_are_rejected() {
        for body in [json!({"radius": 1}), json!({"kind": null}), json!({"kind": ""})] {
            assert_eq!(
                decode::<Shape>(body).unwrap_err(),
                DecodeError::MissingDiscriminator {
                    field: "kind".into()
                }
            );
        }
    }

    #[test]
    fn unregistered_discriminator_is_unknown_variant() {
        let err = decode::<Shape>(json!({"kind": "hexagon"})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownVariant {
                field: "kind".into(),
                value: "hexagon".into()
            }
        );
    }

    #[test]
    fn non_string_discriminator_is_malformed() {
        let err = decode::<Shape>(json!({"kind": 7})).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
        let err = decode::<Shape>(json!(["circle"])).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn missing_variant_field_is_reported_by_name() {
        let err = decode::<Shape>(json!({"kind": "circle"})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("radius".into()));
    }

    #[test]
    fn nested_failures_keep_their_type() {
        let err = from_str::<Drawing>(
            r#"{"shapes": [{"kind": "circle", "radius": 1}, {"kind": "blob"}]}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownVariant {
                field: "kind".into(),
                value: "blob".into()
            }
        );

        let err = from_str::<Drawing>(r#"{"shapes": [{"side": 3}]}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingDiscriminator {
                field: "kind".into()
            }
        );

        let err = from_str::<Drawing>(r#"{"shapes": [{"kind": "square"}]}"#).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("side".into()));

        let err = from_str::<Drawing>("{}").unwrap_err();
        assert_eq!(err, DecodeError::MissingField("shapes".into()));
    }

    #[derive(Debug, Deserialize)]
    struct Labelled {
        #[allow(dead_code)]
        #[serde(deserialize_with = "reject_label")]
        label: String,
    }

    fn reject_label<'de, D: Deserializer<'de>>(_: D) -> Result<String, D::Error> {
        Err(serde::de::Error::custom("missing discriminator field `kind`"))
    }

    #[test]
    fn look_alike_messages_are_not_union_failures() {
        let err = from_str::<Labelled>(r#"{"label": "x"}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Malformed("missing discriminator field `kind`".into())
        );
    }

    #[test]
    fn earlier_union_failure_does_not_leak_into_later_decode() {
        from_str::<Drawing>(r#"{"shapes": [{"kind": "blob"}]}"#).unwrap_err();
        let err = from_str::<Drawing>(r#"{"shapes": 5}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }
}
