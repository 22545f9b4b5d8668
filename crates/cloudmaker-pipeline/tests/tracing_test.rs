//! The pipeline span carries the execution id of the run.

use std::fmt;
use std::sync::{Arc, Mutex};

use cloudmaker_config::{HandlerConfig, Request, RequestBody};
use cloudmaker_pipeline::Handler;
use cloudmaker_registry::FunctionRegistry;
use cloudmaker_store::MemoryObjectStore;
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::span::{Id, Record};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Collects every value recorded into an `execution_id` span field.
#[derive(Clone, Default)]
struct ExecutionIds(Arc<Mutex<Vec<String>>>);

struct IdVisitor(Option<String>);

impl Visit for IdVisitor {
  fn record_str(&mut self, field: &Field, value: &str) {
    if field.name() == "execution_id" {
      self.0 = Some(value.to_string());
    }
  }

  fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
    if field.name() == "execution_id" {
      self.0 = Some(format!("{value:?}"));
    }
  }
}

impl<S: Subscriber> Layer<S> for ExecutionIds {
  fn on_record(&self, _span: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
    let mut visitor = IdVisitor(None);
    values.record(&mut visitor);
    if let Some(id) = visitor.0 {
      self.0.lock().unwrap().push(id);
    }
  }
}

#[tokio::test]
async fn test_execution_id_recorded_on_pipeline_span() {
  let ids = ExecutionIds::default();
  let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(ids.clone()));

  let store = Arc::new(MemoryObjectStore::new());
  store.insert("b", "img.png", "pixels");
  let handler = Handler::new(
    Arc::new(FunctionRegistry::builder().build()),
    store,
    HandlerConfig::default(),
  );

  let result = handler
    .run(&Request::new(RequestBody {
      data: Some(json!({ "bucket": "b", "name": "img.png", "gcsSourceUri": "x" })),
      functions: Some(json!([])),
    }))
    .await
    .unwrap();

  assert_eq!(*ids.0.lock().unwrap(), vec![result.execution_id]);
}
