//! [`literal!`] macro implementation.
//!
//! [`literal!`]: literal

/// Constructs [`LiteralValue`]s via JSON-like syntax.
///
/// Object keys should convert [`Into`]`<`[`String`]`>`, any other expression
/// should convert into a [`LiteralValue`].
/// ```rust
/// # use gql_schema::{literal, LiteralValue};
/// #
/// let code = 200;
/// let features = ["key", "value"];
///
/// let value: LiteralValue = literal!({
///     "code": code,
///     "success": code == 200,
///     "payload": {
///         features[0]: features[1],
///         "list": [1, null, 2.5],
///     },
/// });
/// ```
///
/// [`LiteralValue`]: crate::LiteralValue
#[macro_export]
macro_rules! literal {
    ///////////
    // Array //
    ///////////

    // Done with trailing comma.
    (@array [$($elems:expr,)*]) => {
        $crate::LiteralValue::list(vec![
            $( $elems, )*
        ])
    };

    // Done without trailing comma.
    (@array [$($elems:expr),*]) => {
        $crate::LiteralValue::list(vec![
            $( $crate::literal!($elems), )*
        ])
    };

    // Next element is `null`.
    (@array [$($elems:expr,)*] null $($rest:tt)*) => {
        $crate::literal!(
            @array [$($elems,)* $crate::literal!(null)] $($rest)*
        )
    };

    // Next element is an array.
    (@array [$($elems:expr,)*] [$($array:tt)*] $($rest:tt)*) => {
        $crate::literal!(
            @array [$($elems,)* $crate::literal!([$($array)*])] $($rest)*
        )
    };

    // Next element is a map.
    (@array [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        $crate::literal!(
            @array [$($elems,)* $crate::literal!({$($map)*})] $($rest)*
        )
    };

    // Next element is an expression followed by comma.
    (@array [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        $crate::literal!(
            @array [$($elems,)* $crate::literal!($next),] $($rest)*
        )
    };

    // Last element is an expression with no trailing comma.
    (@array [$($elems:expr,)*] $last:expr) => {
        $crate::literal!(
            @array [$($elems,)* $crate::literal!($last)]
        )
    };

    // Comma after the most recent element.
    (@array [$($elems:expr),*] , $($rest:tt)*) => {
        $crate::literal!(@array [$($elems,)*] $($rest)*)
    };

    // Unexpected token after most recent element.
    (@array [$($elems:expr),*] $unexpected:tt $($rest:tt)*) => {
        $crate::literal!(@unexpected $unexpected)
    };

    ////////////
    // Object //
    ////////////

    // Done.
    (@object $object:ident () () ()) => {};

    // Insert the current entry followed by trailing comma.
    (@object $object:ident [$($key:tt)+] ($value:expr) , $($rest:tt)*) => {
        let _ = $object.insert(($($key)+).into(), $value);
        $crate::literal!(@object $object () ($($rest)*) ($($rest)*));
    };

    // Current entry followed by unexpected token.
    (@object $object:ident [$($key:tt)+] ($value:expr) $unexpected:tt $($rest:tt)*) => {
        $crate::literal!(@unexpected $unexpected);
    };

    // Insert the last entry without trailing comma.
    (@object $object:ident [$($key:tt)+] ($value:expr)) => {
        let _ = $object.insert(($($key)+).into(), $value);
    };

    // Next value is `null`.
    (@object $object:ident ($($key:tt)+) (: null $($rest:tt)*) $copy:tt) => {
        $crate::literal!(
            @object $object
            [$($key)+]
            ($crate::literal!(null)) $($rest)*
        );
    };

    // Next value is an array.
    (@object $object:ident ($($key:tt)+) (: [$($array:tt)*] $($rest:tt)*) $copy:tt) => {
        $crate::literal!(
            @object $object
            [$($key)+]
            ($crate::literal!([$($array)*])) $($rest)*
        );
    };

    // Next value is a map.
    (@object $object:ident ($($key:tt)+) (: {$($map:tt)*} $($rest:tt)*) $copy:tt) => {
        $crate::literal!(
            @object $object
            [$($key)+]
            ($crate::literal!({$($map)*})) $($rest)*
        );
    };

    // Next value is an expression followed by comma.
    (@object $object:ident ($($key:tt)+) (: $value:expr , $($rest:tt)*) $copy:tt) => {
        $crate::literal!(
            @object $object
            [$($key)+]
            ($crate::literal!($value)) , $($rest)*
        );
    };

    // Last value is an expression with no trailing comma.
    (@object $object:ident ($($key:tt)+) (: $value:expr) $copy:tt) => {
        $crate::literal!(
            @object $object
            [$($key)+]
            ($crate::literal!($value))
        );
    };

    // Missing value for last entry.
    (@object $object:ident ($($key:tt)+) (:) $copy:tt) => {
        // "unexpected end of macro invocation"
        $crate::literal!();
    };

    // Missing colon and value for last entry.
    (@object $object:ident ($($key:tt)+) () $copy:tt) => {
        // "unexpected end of macro invocation"
        $crate::literal!();
    };

    // Misplaced colon.
    (@object $object:ident () (: $($rest:tt)*) ($colon:tt $($copy:tt)*)) => {
        $crate::literal!(@unexpected $colon);
    };

    // Found a comma inside a key.
    (@object $object:ident ($($key:tt)*) (, $($rest:tt)*) ($comma:tt $($copy:tt)*)) => {
        $crate::literal!(@unexpected $comma);
    };

    // Key is fully parenthesized.
    (@object $object:ident () (($key:expr) : $($rest:tt)*) $copy:tt) => {
        $crate::literal!(@object $object ($key) (: $($rest)*) (: $($rest)*));
    };

    // Refuse to absorb colon token into key expression.
    (@object $object:ident ($($key:tt)*) (: $($unexpected:tt)+) $copy:tt) => {
        $crate::literal!(@unexpected $($unexpected)+);
    };

    // Munch a token into the current key.
    (@object $object:ident ($($key:tt)*) ($tt:tt $($rest:tt)*) $copy:tt) => {
        $crate::literal!(
            @object $object
            ($($key)* $tt)
            ($($rest)*) ($($rest)*)
        );
    };

    ////////////
    // Errors //
    ////////////

    (@unexpected) => {};

    //////////////
    // Defaults //
    //////////////

    ([ $($arr:tt)* ]$(,)?) => {
        $crate::literal!(@array [] $($arr)*)
    };

    ({}$(,)?) => {
        $crate::LiteralValue::object($crate::LiteralObject::new())
    };

    ({ $($map:tt)+ }$(,)?) => {
        $crate::LiteralValue::object({
            let mut object = $crate::LiteralObject::new();
            $crate::literal!(@object object () ($($map)*) ($($map)*));
            object
        })
    };

    (null$(,)?) => ($crate::LiteralValue::null());

    ($e:expr$(,)?) => ($crate::LiteralValue::from($e));
}

#[cfg(test)]
mod tests {
    type V = crate::LiteralValue;

    #[test]
    fn null() {
        assert_eq!(literal!(null), V::Null);
        assert_eq!(literal!(None::<i32>), V::Null);
    }

    #[test]
    fn scalar() {
        let val = 42;

        assert_eq!(literal!(1), V::Number(1.0));
        assert_eq!(literal!("val"), V::String("val".into()));
        assert_eq!(literal!(1.34), V::Number(1.34));
        assert_eq!(literal!(false), V::Boolean(false));
        assert_eq!(literal!(1 + 2), V::Number(3.0));
        assert_eq!(literal!(val), V::Number(42.0));
        assert_eq!(literal!(Some("x")), V::String("x".into()));
    }

    #[test]
    fn list() {
        assert_eq!(literal!([]), V::List(vec![]));
        assert_eq!(literal!([null]), V::List(vec![V::Null]));
        assert_eq!(
            literal!([1, [2], "three"]),
            V::List(vec![
                V::Number(1.0),
                V::List(vec![V::Number(2.0)]),
                V::String("three".into()),
            ]),
        );
    }

    #[test]
    fn object() {
        let key = "dynamic";

        assert_eq!(literal!({}), V::Object(Default::default()));
        assert_eq!(
            literal!({ "key": null, key: [1 + 2], "nested": {"a": true} }),
            V::Object(
                [
                    ("key".to_owned(), V::Null),
                    ("dynamic".to_owned(), V::List(vec![V::Number(3.0)])),
                    (
                        "nested".to_owned(),
                        V::Object([("a".to_owned(), V::Boolean(true))].into_iter().collect()),
                    ),
                ]
                .into_iter()
                .collect(),
            ),
        );
    }
}
