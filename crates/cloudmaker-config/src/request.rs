use serde::{Deserialize, Serialize};

/// Caller-supplied parameter overrides, or a fully resolved parameter set.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// A pipeline request as received from the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub body: Option<RequestBody>,
}

impl Request {
  /// Wrap a body into a request.
  pub fn new(body: RequestBody) -> Self {
    Self { body: Some(body) }
  }
}

/// The body of a pipeline request.
///
/// Both fields are raw JSON; structural checks happen during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
  /// Describes the source object, expected to be a single object.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<serde_json::Value>,

  /// Ordered list of function invocations.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub functions: Option<serde_json::Value>,
}

/// The source object a pipeline operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
  pub bucket: String,
  pub name: String,
  pub gcs_source_uri: String,
}

/// One validated entry of the `functions` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
  /// Name of a registered operation.
  pub name: String,

  /// Partial parameter overrides. Empty when the caller supplied none.
  #[serde(default)]
  pub parameters: Parameters,
}
