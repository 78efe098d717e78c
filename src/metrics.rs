use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder and describe all metrics
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "language_predictions_total",
        "Total number of successful predictions"
    );
    describe_histogram!(
        "language_prediction_duration_seconds",
        "Feature extraction plus inference time in seconds"
    );
    describe_counter!(
        "language_prediction_errors_total",
        "Total number of failed predictions"
    );
    describe_counter!(
        "prediction_log_write_failures_total",
        "Prediction log writes that failed after a successful prediction"
    );
    describe_gauge!(
        "language_detector_info",
        "Service version information"
    );

    gauge!("language_detector_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

pub fn record_prediction(language_code: &str, duration: Duration) {
    counter!(
        "language_predictions_total",
        "language" => language_code.to_string(),
    )
    .increment(1);

    histogram!("language_prediction_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_error(error_type: &str) {
    counter!(
        "language_prediction_errors_total",
        "error_type" => error_type.to_string(),
    )
    .increment(1);
}

pub fn record_log_write_failure() {
    counter!("prediction_log_write_failures_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics_into_local_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            init_metric_descriptions();
            record_prediction("en", Duration::from_millis(3));
            record_prediction("en", Duration::from_millis(5));
            record_error("validation_error");
            record_log_write_failure();
        });

        let rendered = handle.render();
        assert!(rendered.contains("language_predictions_total{language=\"en\"} 2"));
        assert!(rendered.contains("language_prediction_errors_total{error_type=\"validation_error\"} 1"));
        assert!(rendered.contains("prediction_log_write_failures_total 1"));
    }
}
