//! Parameter predicates and accessors shared by the operations.

use cloudmaker_config::Parameters;
use cloudmaker_registry::OperationError;
use serde_json::Value;

use crate::helpers::{Annotation, Shape, Vertex};

/// A list of `{x, y}` points with non-negative integer coordinates.
pub fn is_vertex_list(value: &Value) -> bool {
  let Some(points) = value.as_array() else {
    return false;
  };
  points.iter().all(|p| {
    p.as_object().is_some_and(|point| {
      ["x", "y"]
        .iter()
        .all(|axis| point.get(*axis).is_none_or(|c| c.as_u64().is_some()))
    })
  })
}

/// The `vertices` parameter as an annotation. Empty when no points were given.
pub(crate) fn annotation(params: &Parameters) -> Result<Annotation, OperationError> {
  let vertices = match params.get("vertices") {
    None | Some(Value::Null) => Vec::new(),
    Some(value) => serde_json::from_value::<Vec<Vertex>>(value.clone()).map_err(|e| {
      OperationError::InvalidInput {
        message: format!("invalid vertices: {}", e),
      }
    })?,
  };
  Ok(Annotation::from_vertices(vertices))
}

pub(crate) fn shape(params: &Parameters) -> Result<Shape, OperationError> {
  let raw = string(params, "shape")?;
  Shape::parse(raw).ok_or_else(|| OperationError::InvalidInput {
    message: format!("unsupported shape: {}", raw),
  })
}

pub(crate) fn string<'a>(params: &'a Parameters, key: &str) -> Result<&'a str, OperationError> {
  params
    .get(key)
    .and_then(Value::as_str)
    .ok_or_else(|| OperationError::InvalidInput {
      message: format!("{} must be a string", key),
    })
}

pub(crate) fn number(params: &Parameters, key: &str) -> Result<f64, OperationError> {
  params
    .get(key)
    .and_then(Value::as_f64)
    .ok_or_else(|| OperationError::InvalidInput {
      message: format!("{} must be a number", key),
    })
}
