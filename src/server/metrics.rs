use crate::moralis::Endpoint;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::{sync::OnceLock, time::Duration};
use tokio::sync::RwLock;

pub fn spawn_process_collector() {
    tokio::spawn(async {
        let collector = metrics_process::Collector::default();
        collector.describe();

        loop {
            collector.collect();
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}

// to prevent multiple initialization of the metrics recorder, happens in tests
static HANDLER: OnceLock<Arc<RwLock<PrometheusHandle>>> = OnceLock::new();

pub fn setup_metrics_recorder() -> Arc<RwLock<PrometheusHandle>> {
    HANDLER.get_or_init(internal_setup).clone()
}

fn internal_setup() -> Arc<RwLock<PrometheusHandle>> {
    let builder = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Note: counters are initialized with 0, otherwise they're not present
    // under `GET /metrics` right after startup, before anything happens.

    describe_counter!(
        "http_requests_total",
        "HTTP calls made to the history-proxy API"
    );

    describe_counter!(
        "upstream_requests_total",
        "Requests made to Moralis, by endpoint and outcome"
    );
    for endpoint in Endpoint::ALL {
        counter!("upstream_requests_total", "endpoint" => endpoint.as_str(), "outcome" => "ok")
            .absolute(0);
    }

    Arc::new(RwLock::new(builder))
}
