//! The five scalars every schema carries.

use std::sync::LazyLock;

use arcstr::ArcStr;

use crate::{
    executor::{Context, FieldResult},
    schema::builder::ScalarBuilder,
    value::{HostValue, LiteralValue, as_i32},
};

/// Declarations of `ID`, `String`, `Int`, `Float` and `Boolean`, in that
/// order.
pub(crate) static BUILTIN_SCALARS: LazyLock<[ScalarBuilder; 5]> = LazyLock::new(|| {
    [
        ScalarBuilder::new("ID", encode_id, decode_id).description(
            "The `ID` scalar type represents a unique identifier, often used to refetch an \
             object or as key for a cache. It is serialized as a string, and accepts both \
             strings and integers as input.",
        ),
        ScalarBuilder::new("String", encode_string, decode_string).description(
            "The `String` scalar type represents textual data, represented as UTF-8 character \
             sequences.",
        ),
        ScalarBuilder::new("Int", encode_int, decode_int).description(
            "The `Int` scalar type represents non-fractional signed whole numeric values \
             between -(2^31) and 2^31 - 1.",
        ),
        ScalarBuilder::new("Float", encode_float, decode_float).description(
            "The `Float` scalar type represents signed double-precision fractional values as \
             specified by IEEE 754.",
        ),
        ScalarBuilder::new("Boolean", encode_boolean, decode_boolean)
            .description("The `Boolean` scalar type represents `true` or `false`."),
    ]
});

/// Views a host value as text, whichever string type it was built from.
pub(crate) fn host_str(v: &HostValue) -> Option<&str> {
    v.downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| v.downcast_ref::<ArcStr>().map(ArcStr::as_str))
        .or_else(|| v.downcast_ref::<&'static str>().copied())
}

fn host_int(v: &HostValue) -> Option<i64> {
    v.downcast_ref::<i32>()
        .map(|&i| i.into())
        .or_else(|| v.downcast_ref::<i64>().copied())
        .or_else(|| v.downcast_ref::<u32>().map(|&i| i.into()))
}

fn host_float(v: &HostValue) -> Option<f64> {
    v.downcast_ref::<f64>()
        .copied()
        .or_else(|| v.downcast_ref::<f32>().map(|&f| f.into()))
}

fn unexpected(scalar: &str, v: &HostValue) -> crate::FieldError {
    format!("{scalar} cannot represent host value {v:?}").into()
}

fn invalid(scalar: &str, v: &LiteralValue) -> crate::FieldError {
    format!("{scalar} cannot represent value: {v}").into()
}

fn encode_id(_: &Context, v: &HostValue) -> FieldResult<LiteralValue> {
    if v.is_null() {
        return Ok(LiteralValue::Null);
    }
    if let Some(s) = host_str(v) {
        return Ok(s.into());
    }
    host_int(v)
        .map(|i| LiteralValue::String(i.to_string()))
        .ok_or_else(|| unexpected("ID", v))
}

fn decode_id(_: &Context, v: &LiteralValue) -> FieldResult<HostValue> {
    match v {
        LiteralValue::Null => Ok(HostValue::null()),
        LiteralValue::String(s) => Ok(HostValue::new(s.clone())),
        LiteralValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
            Ok(HostValue::new(format!("{n:.0}")))
        }
        v => Err(invalid("ID", v)),
    }
}

fn encode_string(_: &Context, v: &HostValue) -> FieldResult<LiteralValue> {
    if v.is_null() {
        return Ok(LiteralValue::Null);
    }
    host_str(v)
        .map(LiteralValue::from)
        .ok_or_else(|| unexpected("String", v))
}

fn decode_string(_: &Context, v: &LiteralValue) -> FieldResult<HostValue> {
    match v {
        LiteralValue::Null => Ok(HostValue::null()),
        LiteralValue::String(s) => Ok(HostValue::new(s.clone())),
        v => Err(invalid("String", v)),
    }
}

fn encode_int(_: &Context, v: &HostValue) -> FieldResult<LiteralValue> {
    if v.is_null() {
        return Ok(LiteralValue::Null);
    }
    let i = host_int(v).ok_or_else(|| unexpected("Int", v))?;
    i32::try_from(i)
        .map(LiteralValue::from)
        .map_err(|_| format!("Int cannot represent non 32-bit signed integer value: {i}").into())
}

fn decode_int(_: &Context, v: &LiteralValue) -> FieldResult<HostValue> {
    match v {
        LiteralValue::Null => Ok(HostValue::null()),
        LiteralValue::Number(n) => as_i32(*n)
            .map(HostValue::new)
            .ok_or_else(|| invalid("Int", v)),
        v => Err(invalid("Int", v)),
    }
}

fn encode_float(_: &Context, v: &HostValue) -> FieldResult<LiteralValue> {
    if v.is_null() {
        return Ok(LiteralValue::Null);
    }
    host_float(v)
        .or_else(|| host_int(v).map(|i| i as f64))
        .map(LiteralValue::Number)
        .ok_or_else(|| unexpected("Float", v))
}

fn decode_float(_: &Context, v: &LiteralValue) -> FieldResult<HostValue> {
    match v {
        LiteralValue::Null => Ok(HostValue::null()),
        LiteralValue::Number(n) => Ok(HostValue::new(*n)),
        v => Err(invalid("Float", v)),
    }
}

fn encode_boolean(_: &Context, v: &HostValue) -> FieldResult<LiteralValue> {
    if v.is_null() {
        return Ok(LiteralValue::Null);
    }
    v.downcast_ref::<bool>()
        .map(|&b| LiteralValue::Boolean(b))
        .ok_or_else(|| unexpected("Boolean", v))
}

fn decode_boolean(_: &Context, v: &LiteralValue) -> FieldResult<HostValue> {
    match v {
        LiteralValue::Null => Ok(HostValue::null()),
        LiteralValue::Boolean(b) => Ok(HostValue::new(*b)),
        v => Err(invalid("Boolean", v)),
    }
}
