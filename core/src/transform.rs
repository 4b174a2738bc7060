//! Recursive key rewriting for nested result payloads.
//!
//! Rows come back from the database keyed by storage names. Before they reach
//! application code every map key, at every depth, is rewritten with a
//! per-key function while the shape of the value stays exactly the same.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tablekit_core::transform::camelize_keys;
//!
//! let row = json!({ "user_id": 7, "tags": [{ "tag_name": "x" }] });
//! assert_eq!(
//!     camelize_keys(&row),
//!     json!({ "userId": 7, "tags": [{ "tagName": "x" }] })
//! );
//! ```

use serde_json::{Map, Value};

use crate::case::{to_camel_case, to_snake_case};

/// Rewrites every map key in `value` with `f`, returning a new value.
///
/// Only JSON objects have their keys rewritten. A non-object input (including
/// a top-level array) is returned unchanged. Inside an object, array values
/// are rebuilt element by element with each element passed back through this
/// function, so objects in arrays are rewritten while arrays nested directly
/// in arrays are left as they are.
///
/// When two keys map to the same transformed key the one processed last wins.
pub fn transform_keys<F>(value: &Value, f: F) -> Value
where
    F: Fn(&str) -> String,
{
    transform_with(value, &f)
}

fn transform_with(value: &Value, f: &dyn Fn(&str) -> String) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };

    let mut out = Map::with_capacity(map.len());
    for (key, inner) in map {
        let transformed = match inner {
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| transform_with(item, f)).collect())
            }
            Value::Object(_) => transform_with(inner, f),
            other => other.clone(),
        };
        out.insert(f(key), transformed);
    }

    Value::Object(out)
}

/// Rewrites every key to `camelCase`.
pub fn camelize_keys(value: &Value) -> Value {
    transform_keys(value, to_camel_case)
}

/// Rewrites every key to `snake_case`.
pub fn snakeify_keys(value: &Value) -> Value {
    transform_keys(value, to_snake_case)
}

/// Result hook: camelizes a query result.
///
/// An array result is treated as a list of rows and each row is transformed
/// on its own; any other result is transformed once.
pub fn post_process_response(result: Value) -> Value {
    match result {
        Value::Array(rows) => Value::Array(rows.iter().map(camelize_keys).collect()),
        other => camelize_keys(&other),
    }
}

/// Identifier hook: snake-cases `value` before handing it to `orig`.
///
/// `orig` is the dialect's own wrapping (quoting) function. If conversion
/// yields an empty string the untouched value is passed through instead.
pub fn wrap_identifier<F>(value: &str, orig: F) -> String
where
    F: FnOnce(&str) -> String,
{
    let transformed = to_snake_case(value);
    if transformed.is_empty() {
        orig(value)
    } else {
        orig(&transformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key_count(value: &Value) -> usize {
        match value {
            Value::Object(map) => map.len() + map.values().map(key_count).sum::<usize>(),
            Value::Array(items) => items.iter().map(key_count).sum(),
            _ => 0,
        }
    }

    #[test]
    fn test_rewrites_keys_at_every_depth() {
        let input = json!({ "fooBar": [{ "bazQux": 1 }], "outerKey": { "innerKey": "v" } });
        let out = snakeify_keys(&input);
        assert_eq!(
            out,
            json!({ "foo_bar": [{ "baz_qux": 1 }], "outer_key": { "inner_key": "v" } })
        );

        let back = camelize_keys(&out);
        assert_eq!(back, input);
    }

    #[test]
    fn test_non_objects_pass_through() {
        assert_eq!(camelize_keys(&json!(42)), json!(42));
        assert_eq!(camelize_keys(&json!("some_text")), json!("some_text"));
        assert_eq!(camelize_keys(&Value::Null), Value::Null);
        // A top-level array is not a map, so its elements are not visited.
        let arr = json!([{ "a_b": 1 }]);
        assert_eq!(camelize_keys(&arr), arr);
    }

    #[test]
    fn test_scalars_inside_arrays_untouched() {
        let input = json!({ "some_list": [1, "two_three", null, { "x_y": true }] });
        let out = camelize_keys(&input);
        assert_eq!(out, json!({ "someList": [1, "two_three", null, { "xY": true }] }));
    }

    #[test]
    fn test_arrays_nested_in_arrays_are_not_rewritten() {
        let input = json!({ "grid_rows": [[{ "cell_value": 1 }]] });
        let out = camelize_keys(&input);
        assert_eq!(out, json!({ "gridRows": [[{ "cell_value": 1 }]] }));
    }

    #[test]
    fn test_identity_preserves_structure() {
        let input = json!({
            "a": [1, 2, { "b": [] }],
            "c": { "d": { "e": null } },
            "f": "g"
        });
        let out = transform_keys(&input, str::to_string);
        assert_eq!(out, input);
        assert_eq!(key_count(&out), key_count(&input));
    }

    #[test]
    fn test_preserves_array_lengths() {
        let input = json!({ "items": [{ "itemId": 1 }, { "itemId": 2 }, 3] });
        let out = snakeify_keys(&input);
        assert_eq!(out["items"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_key_collision_last_wins() {
        let input = json!({ "fooBar": 1, "foo_bar": 2 });
        let out = snakeify_keys(&input);
        assert_eq!(out, json!({ "foo_bar": 2 }));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = json!({ "list_items": [{ "item_name": "a" }] });
        let snapshot = input.clone();
        let _ = camelize_keys(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_key_order_preserved() {
        let input = json!({ "z_last": 1, "a_first": 2, "m_mid": 3 });
        let out = camelize_keys(&input);
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zLast", "aFirst", "mMid"]);
    }

    #[test]
    fn test_post_process_response_rows() {
        let rows = json!([{ "user_id": 1 }, { "user_id": 2 }]);
        assert_eq!(
            post_process_response(rows),
            json!([{ "userId": 1 }, { "userId": 2 }])
        );
        assert_eq!(
            post_process_response(json!({ "row_count": 3 })),
            json!({ "rowCount": 3 })
        );
        assert_eq!(post_process_response(json!(5)), json!(5));
    }

    #[test]
    fn test_wrap_identifier() {
        let quote = |s: &str| format!("\"{s}\"");
        assert_eq!(wrap_identifier("createdAt", quote), "\"created_at\"");
        assert_eq!(wrap_identifier("", quote), "\"\"");
        assert_eq!(wrap_identifier("*", |s: &str| s.to_string()), "*");
    }
}
