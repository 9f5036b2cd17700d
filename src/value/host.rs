use std::{any::Any, fmt, sync::Arc};

use arcstr::ArcStr;

/// Dynamically typed value living on the host side of the schema.
///
/// Resolvers produce these, decoders return them and encoders consume them.
/// Cloning is cheap, the payload is shared.
#[derive(Clone, Default)]
pub struct HostValue(Option<Arc<dyn Any + Send + Sync>>);

/// Value tagged with the name of its concrete object type.
///
/// This is what the default interface and union unwrap functions expect.
#[derive(Clone, Debug)]
pub struct Typed {
    /// Name of the concrete object type.
    pub type_name: ArcStr,
    /// Underlying object value.
    pub value: HostValue,
}

impl HostValue {
    /// Constructs a null value.
    pub fn null() -> Self {
        Self(None)
    }

    /// Wraps an arbitrary value.
    pub fn new<T: Any + Send + Sync>(v: T) -> Self {
        Self(Some(Arc::new(v)))
    }

    /// Wraps an optional value, mapping [`None`] to null.
    pub fn optional<T: Any + Send + Sync>(v: Option<T>) -> Self {
        v.map_or_else(Self::null, Self::new)
    }

    /// Constructs the default host representation of a list.
    pub fn list(items: Vec<Self>) -> Self {
        Self::new(items)
    }

    /// Tags a value with its concrete object type name.
    pub fn typed(type_name: impl Into<ArcStr>, value: Self) -> Self {
        Self::new(Typed {
            type_name: type_name.into(),
            value,
        })
    }

    /// Does this value represent null?
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Returns a reference to the payload if it is of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Checks whether the payload is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Views the items of a list built with [`HostValue::list`].
    pub fn as_list(&self) -> Option<&[Self]> {
        self.downcast_ref::<Vec<Self>>().map(Vec::as_slice)
    }

    /// Views a value built with [`HostValue::typed`].
    pub fn as_typed(&self) -> Option<&Typed> {
        self.downcast_ref()
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("HostValue(null)")
        } else if let Some(items) = self.as_list() {
            f.debug_tuple("HostValue").field(&items).finish()
        } else {
            f.write_str("HostValue(..)")
        }
    }
}
