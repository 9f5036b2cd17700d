use std::fmt;

use serde::{
    Deserialize, Serialize,
    de::{self, Deserializer, MapAccess, SeqAccess},
    ser::{SerializeMap as _, Serializer},
};

use crate::{FieldError, LiteralObject, LiteralValue, value::as_i32};

impl Serialize for LiteralValue {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => ser.serialize_unit(),
            Self::String(s) => ser.serialize_str(s),
            Self::Number(n) => match as_i32(*n) {
                Some(i) => ser.serialize_i32(i),
                None => ser.serialize_f64(*n),
            },
            Self::Boolean(b) => ser.serialize_bool(*b),
            Self::List(l) => l.serialize(ser),
            Self::Object(o) => o.serialize(ser),
        }
    }
}

impl<'de> Deserialize<'de> for LiteralValue {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = LiteralValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a valid literal value")
            }

            fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
                Ok(LiteralValue::Boolean(b))
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
                Ok(LiteralValue::Number(n as f64))
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
                Ok(LiteralValue::Number(n as f64))
            }

            fn visit_f64<E: de::Error>(self, n: f64) -> Result<Self::Value, E> {
                Ok(LiteralValue::Number(n))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
                self.visit_string(s.into())
            }

            fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
                Ok(LiteralValue::String(s))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(LiteralValue::Null)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(LiteralValue::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, de: D) -> Result<Self::Value, D::Error> {
                LiteralValue::deserialize(de)
            }

            fn visit_seq<V: SeqAccess<'de>>(self, mut visitor: V) -> Result<Self::Value, V::Error> {
                let mut values = Vec::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some(el) = visitor.next_element()? {
                    values.push(el);
                }
                Ok(LiteralValue::List(values))
            }

            fn visit_map<V: MapAccess<'de>>(self, mut visitor: V) -> Result<Self::Value, V::Error> {
                let mut object = LiteralObject::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some((key, value)) = visitor.next_entry::<String, LiteralValue>()? {
                    object.insert(key, value);
                }
                Ok(LiteralValue::Object(object))
            }
        }

        de.deserialize_any(Visitor)
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let has_extensions = !self.extensions().is_null();
        let mut map = ser.serialize_map(Some(1 + usize::from(has_extensions)))?;

        map.serialize_key("message")?;
        map.serialize_value(self.message())?;

        if has_extensions {
            map.serialize_key("extensions")?;
            map.serialize_value(self.extensions())?;
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_str, json, to_string, to_value};

    use crate::{FieldError, LiteralValue, literal};

    #[test]
    fn serializes_literals() {
        assert_eq!(
            to_value(literal!({"int": 1, "float": 1.5, "list": [null, "s", false]})).unwrap(),
            json!({"int": 1, "float": 1.5, "list": [null, "s", false]}),
        );
    }

    #[test]
    fn preserves_object_order() {
        assert_eq!(
            to_string(&literal!({"z": 1, "a": 2})).unwrap(),
            r#"{"z":1,"a":2}"#,
        );
    }

    #[test]
    fn deserializes_literals() {
        let v: LiteralValue = from_str(r#"{"a": [1, 2.25, "x", true, null], "b": {}}"#).unwrap();

        assert_eq!(v, literal!({"a": [1, 2.25, "x", true, null], "b": {}}));
    }

    #[test]
    fn round_trips_large_numbers() {
        let v = literal!(1e12);
        let back: LiteralValue = from_str(&to_string(&v).unwrap()).unwrap();

        assert_eq!(back, v);
    }

    #[test]
    fn serializes_field_errors() {
        assert_eq!(
            to_value(FieldError::from("boom")).unwrap(),
            json!({"message": "boom"}),
        );
        assert_eq!(
            to_value(FieldError::new("boom", literal!({"code": 7}))).unwrap(),
            json!({"message": "boom", "extensions": {"code": 7}}),
        );
    }
}
