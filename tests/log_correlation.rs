//! Correlation between responses and emitted log records.
//!
//! Runs in its own test binary so a process-global capturing subscriber
//! can observe every record the service emits. A single sequential test
//! keeps the captured stream attributable to one request at a time.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use serde_json::{json, Value};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

mod common;

/// One captured event, flattened to string fields.
#[derive(Debug, Default, Clone)]
struct CapturedEvent {
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct CaptureVisitor<'a>(&'a mut CapturedEvent);

impl Visit for CaptureVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0
            .fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: tracing::Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut captured = CapturedEvent::default();
        event.record(&mut CaptureVisitor(&mut captured));
        self.events.lock().unwrap().push(captured);
    }
}

fn install_capture() -> Arc<Mutex<Vec<CapturedEvent>>> {
    static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();
    EVENTS
        .get_or_init(|| {
            let events = Arc::new(Mutex::new(Vec::new()));
            let layer = CaptureLayer {
                events: events.clone(),
            };
            let subscriber = tracing_subscriber::registry().with(layer);
            tracing::subscriber::set_global_default(subscriber)
                .expect("capturing subscriber must install once");
            events
        })
        .clone()
}

/// Captured records whose `event` field matches, keyed by trace id.
fn records_for(
    events: &Arc<Mutex<Vec<CapturedEvent>>>,
    kind: &str,
    trace_id: &str,
) -> Vec<CapturedEvent> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|ev| ev.field("event") == Some(kind) && ev.field("trace_id") == Some(trace_id))
        .cloned()
        .collect()
}

fn prediction_record_count(events: &Arc<Mutex<Vec<CapturedEvent>>>) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|ev| {
            matches!(
                ev.field("event"),
                Some("prediction") | Some("prediction_error") | Some("unhandled_exception")
            )
        })
        .count()
}

fn traceparent(trace_id: &str) -> String {
    format!("00-{trace_id}-00f067aa0ba902b7-01")
}

fn valid_body() -> Value {
    json!({
        "sepal_length": 5.1,
        "sepal_width": 3.5,
        "petal_length": 1.4,
        "petal_width": 0.2
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn every_outcome_emits_exactly_the_specified_records() {
    let events = install_capture();
    let client = reqwest::Client::new();

    // Model failure: the 500 body's trace id keys exactly one
    // prediction_error record, and nothing else.
    let failing = common::spawn_failing_service().await;
    let trace_a = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    let response = client
        .post(failing.url("/predict/"))
        .header("traceparent", traceparent(trace_a))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["trace_id"], trace_a);
    assert_eq!(records_for(&events, "prediction_error", trace_a).len(), 1);
    assert_eq!(records_for(&events, "unhandled_exception", trace_a).len(), 0);
    assert_eq!(records_for(&events, "prediction", trace_a).len(), 0);

    // Escaped panic: one unhandled_exception record, same trace id as
    // the envelope, and the internal detail stays out of the response.
    let panicking = common::spawn_panicking_service().await;
    let trace_b = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    let response = client
        .post(panicking.url("/predict/"))
        .header("traceparent", traceparent(trace_b))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["trace_id"], trace_b);
    assert_eq!(body["detail"], "Internal server error");
    let unhandled = records_for(&events, "unhandled_exception", trace_b);
    assert_eq!(unhandled.len(), 1);
    assert_eq!(
        unhandled[0].field("error"),
        Some("classifier invariant violated")
    );
    assert_eq!(records_for(&events, "prediction_error", trace_b).len(), 0);

    // Success: exactly one prediction record under the request's trace.
    let ready = common::spawn_ready_service().await;
    let trace_c = "cccccccccccccccccccccccccccccccc";
    let response = client
        .post(ready.url("/predict/"))
        .header("traceparent", traceparent(trace_c))
        .json(&valid_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let prediction = records_for(&events, "prediction", trace_c);
    assert_eq!(prediction.len(), 1);
    assert_eq!(prediction[0].field("status"), Some("success"));

    // Validation failure: no prediction-class record of any kind is
    // added by the 422 path.
    let before = prediction_record_count(&events);
    let response = client
        .post(ready.url("/predict/"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    assert_eq!(prediction_record_count(&events), before);

    let response = client
        .post(ready.url("/predict/"))
        .json(&json!({
            "sepal_length": "invalid",
            "sepal_width": 3.5,
            "petal_length": 1.4,
            "petal_width": 0.2
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    assert_eq!(prediction_record_count(&events), before);
}
