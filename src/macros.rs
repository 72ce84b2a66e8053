/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Object values and array elements are single token trees, so negative
/// numbers inside them need parentheses: `value!({ "x": (-1) })`.
///
/// # Examples
///
/// ```rust
/// use formtree::{value, Value};
///
/// let data = value!({
///     "kind": "circle",
///     "radius": 2.5,
///     "tags": ["a", "b"],
///     "meta": null
/// });
/// assert_eq!(data.get_entry("kind"), Some(&Value::from("circle")));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Anything else goes through `From`.
    ($s:expr) => {
        $crate::Value::from($s)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Map, Number, Value};

    #[test]
    fn test_value_macro_primitives() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(true), Value::Bool(true));
        assert_eq!(value!(42), Value::Number(Number::Integer(42)));
        assert_eq!(value!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(value!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_value_macro_objects() {
        assert_eq!(value!({}), Value::Object(Map::new()));

        let obj = value!({
            "name": "Alice",
            "age": (-3)
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("age"), Some(&Value::Number(Number::Integer(-3))));
            }
            _ => panic!("Expected object"),
        }
    }
}
