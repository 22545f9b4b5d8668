//! File naming and annotation geometry helpers.
//!
//! Geometry strings use ImageMagick syntax: `WxH+X+Y` for regions, and
//! `-draw` primitives (`polygon`, `circle`) for shapes.

use std::path::{Path, PathBuf};

use cloudmaker_config::Parameters;
use cloudmaker_registry::OperationError;
use serde::{Deserialize, Serialize};

/// A point of a bounding polygon. Missing coordinates are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
  #[serde(default)]
  pub x: i64,
  #[serde(default)]
  pub y: i64,
}

impl Vertex {
  pub fn new(x: i64, y: i64) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingPoly {
  #[serde(default)]
  pub vertices: Vec<Vertex>,
}

/// A detected region, as produced by an image annotation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
  pub bounding_poly: BoundingPoly,
}

impl Annotation {
  pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
    Self {
      bounding_poly: BoundingPoly { vertices },
    }
  }
}

/// How a bounding box is turned into a geometry string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
  Rectangle,
  /// Largest square centered in the bounding box.
  Square,
  /// Circle inscribed in [`Shape::Square`].
  Circle,
}

impl Shape {
  pub fn parse(s: &str) -> Option<Self> {
    [
      ("rectangle", Shape::Rectangle),
      ("square", Shape::Square),
      ("circle", Shape::Circle),
    ]
    .into_iter()
    .find(|(name, _)| name.eq_ignore_ascii_case(s))
    .map(|(_, shape)| shape)
  }
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
  left: i64,
  top: i64,
  width: i64,
  height: i64,
}

impl Bounds {
  fn of(annotation: &Annotation) -> Result<Self, OperationError> {
    let vertices = &annotation.bounding_poly.vertices;
    let (Some(min_x), Some(max_x), Some(min_y), Some(max_y)) = (
      vertices.iter().map(|v| v.x).min(),
      vertices.iter().map(|v| v.x).max(),
      vertices.iter().map(|v| v.y).min(),
      vertices.iter().map(|v| v.y).max(),
    ) else {
      return Err(OperationError::InvalidInput {
        message: "annotation has no vertices".to_string(),
      });
    };

    Ok(Self {
      left: min_x,
      top: min_y,
      width: max_x - min_x,
      height: max_y - min_y,
    })
  }
}

/// Name of the object an operation writes.
///
/// With a non-empty string `outputPrefix` the result is `<prefix>-<basename>`,
/// otherwise `<basename>.out`.
pub fn create_output_file_name(file_name: &str, params: &Parameters) -> String {
  let base = base_name(file_name);
  match params
    .get("outputPrefix")
    .and_then(|v| v.as_str())
    .filter(|s| !s.is_empty())
  {
    Some(prefix) => format!("{}-{}", prefix, base),
    None => format!("{}.out", base),
  }
}

/// Path of a scratch file inside `dir`.
pub fn create_temp_file_name(dir: &Path, file_name: &str) -> PathBuf {
  dir.join(base_name(file_name))
}

/// Replace the extension of `file_name`. An empty extension leaves it unchanged.
pub fn change_extension(file_name: &str, extension: &str) -> String {
  let extension = extension.trim_start_matches('.');
  if extension.is_empty() {
    return file_name.to_string();
  }
  Path::new(file_name)
    .with_extension(extension)
    .to_string_lossy()
    .into_owned()
}

/// `WxH` of the annotation's bounding box.
pub fn annotation_to_dimensions(annotation: &Annotation) -> Result<String, OperationError> {
  let b = Bounds::of(annotation)?;
  Ok(format!("{}x{}", b.width, b.height))
}

/// `+X+Y` offset of the annotation's bounding box.
pub fn annotation_to_coordinate(annotation: &Annotation) -> Result<String, OperationError> {
  let b = Bounds::of(annotation)?;
  Ok(format!("+{}+{}", b.left, b.top))
}

/// Geometry of the annotation in the requested shape.
pub fn annotation_to_shape(annotation: &Annotation, shape: Shape) -> Result<String, OperationError> {
  let b = Bounds::of(annotation)?;
  if shape == Shape::Rectangle {
    return Ok(format!("{}x{}+{}+{}", b.width, b.height, b.left, b.top));
  }

  let side = b.width.min(b.height);
  let left = round(b.left as f64 + (b.width - side) as f64 / 2.0);
  let top = round(b.top as f64 + (b.height - side) as f64 / 2.0);

  match shape {
    Shape::Square => Ok(format!("{}x{}+{}+{}", side, side, left, top)),
    _ => {
      let radius = side as f64 / 2.0;
      let cx = round(left as f64 + radius);
      let cy = round(top as f64 + radius);
      Ok(format!("circle {},{} {},{}", cx, cy, left, cy))
    }
  }
}

/// `-draw` polygons for every annotation, separated by spaces.
pub fn annotations_to_polygons(annotations: &[Annotation]) -> String {
  annotations
    .iter()
    .map(|a| {
      let points: Vec<String> = a
        .bounding_poly
        .vertices
        .iter()
        .map(|v| format!("{},{}", v.x, v.y))
        .collect();
      format!("polygon {}", points.join(" "))
    })
    .collect::<Vec<_>>()
    .join(" ")
}

pub(crate) fn base_name(file_name: &str) -> &str {
  Path::new(file_name)
    .file_name()
    .and_then(|s| s.to_str())
    .unwrap_or(file_name)
}

fn round(n: f64) -> i64 {
  n.round() as i64
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn params(value: serde_json::Value) -> Parameters {
    value.as_object().cloned().unwrap()
  }

  fn annotation(points: &[(i64, i64)]) -> Annotation {
    Annotation::from_vertices(points.iter().map(|&(x, y)| Vertex::new(x, y)).collect())
  }

  #[test]
  fn test_output_name_appends_out_without_prefix() {
    assert_eq!(create_output_file_name("filename.png", &Parameters::new()), "filename.png.out");
    assert_eq!(
      create_output_file_name("img.js", &params(json!({ "outputPrefix": false }))),
      "img.js.out"
    );
    assert_eq!(
      create_output_file_name("bar.png", &params(json!({ "outputPrefix": "" }))),
      "bar.png.out"
    );
  }

  #[test]
  fn test_output_name_with_prefix() {
    assert_eq!(
      create_output_file_name("bar.png", &params(json!({ "outputPrefix": "foo" }))),
      "foo-bar.png"
    );
    assert_eq!(
      create_output_file_name("uploads/foo.js", &params(json!({ "outputPrefix": "blurred" }))),
      "blurred-foo.js"
    );
  }

  #[test]
  fn test_temp_file_name() {
    assert_eq!(
      create_temp_file_name(Path::new("/tmp"), "test2.js"),
      PathBuf::from("/tmp/test2.js")
    );

    let output = create_output_file_name("img1.js", &params(json!({ "outputPrefix": "cropped" })));
    assert_eq!(
      create_temp_file_name(Path::new("/tmp"), &output),
      PathBuf::from("/tmp/cropped-img1.js")
    );
  }

  #[test]
  fn test_change_extension() {
    assert_eq!(change_extension("test.png", ".jpg"), "test.jpg");
    assert_eq!(change_extension("test.jpg", ".png"), "test.png");
    assert_eq!(change_extension("test.png", ".gif"), "test.gif");
    assert_eq!(change_extension("test.png", ""), "test.png");
  }

  #[test]
  fn test_shape_rectangle() {
    let a = annotation(&[(0, 0), (100, 0), (0, 100), (100, 100)]);
    assert_eq!(annotation_to_shape(&a, Shape::Rectangle).unwrap(), "100x100+0+0");

    let a = annotation(&[(10, 15), (100, 100), (100, 15), (10, 100)]);
    assert_eq!(annotation_to_shape(&a, Shape::Rectangle).unwrap(), "90x85+10+15");
  }

  #[test]
  fn test_shape_square_and_circle() {
    let a = annotation(&[(10, 15), (100, 100), (100, 15), (10, 100)]);
    assert_eq!(annotation_to_shape(&a, Shape::Square).unwrap(), "85x85+13+15");
    assert_eq!(annotation_to_shape(&a, Shape::Circle).unwrap(), "circle 56,58 13,58");
  }

  #[test]
  fn test_shape_without_vertices() {
    let err = annotation_to_shape(&Annotation::default(), Shape::Rectangle).unwrap_err();
    assert!(matches!(err, OperationError::InvalidInput { .. }));
  }

  #[test]
  fn test_polygons() {
    let a = annotation(&[(1, 2), (3, 4), (5, 6), (7, 8)]);
    assert_eq!(annotations_to_polygons(&[a.clone()]), "polygon 1,2 3,4 5,6 7,8");
    assert_eq!(
      annotations_to_polygons(&[a, annotation(&[(0, 0), (1, 1)])]),
      "polygon 1,2 3,4 5,6 7,8 polygon 0,0 1,1"
    );
  }

  #[test]
  fn test_dimensions_and_coordinate() {
    let a = annotation(&[(1, 2), (3, 4), (5, 6), (7, 8)]);
    assert_eq!(annotation_to_dimensions(&a).unwrap(), "6x6");
    assert_eq!(annotation_to_coordinate(&a).unwrap(), "+1+2");
  }

  #[test]
  fn test_annotation_deserializes_with_missing_coordinates() {
    let a: Annotation = serde_json::from_value(json!({
      "boundingPoly": { "vertices": [{ "x": 4 }, { "y": 9 }] }
    }))
    .unwrap();
    assert_eq!(a.bounding_poly.vertices, vec![Vertex::new(4, 0), Vertex::new(0, 9)]);
  }

  #[test]
  fn test_shape_parse() {
    assert_eq!(Shape::parse("Square"), Some(Shape::Square));
    assert_eq!(Shape::parse("hexagon"), None);
  }
}
