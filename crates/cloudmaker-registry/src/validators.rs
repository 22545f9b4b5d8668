//! Reusable validator predicates for [`ParamSpec`](crate::ParamSpec).

use serde_json::Value;

/// Accept every value.
pub fn any(_: &Value) -> bool {
  true
}

pub fn non_empty_string(value: &Value) -> bool {
  value.as_str().is_some_and(|s| !s.is_empty())
}

/// A string, or `false` to disable the option.
pub fn string_or_false(value: &Value) -> bool {
  value.is_string() || value == &Value::Bool(false)
}

pub fn positive_number(value: &Value) -> bool {
  value.as_f64().is_some_and(|n| n.is_finite() && n > 0.0)
}

/// Build a predicate accepting strings equal (ignoring ASCII case) to one of `allowed`.
pub fn one_of(allowed: &'static [&'static str]) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
  move |value| {
    value
      .as_str()
      .is_some_and(|s| allowed.iter().any(|a| a.eq_ignore_ascii_case(s)))
  }
}
