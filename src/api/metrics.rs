use actix_web::HttpResponse;
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

fn render_counter(name: &str, help: &str, value: u64) -> String {
    format!(
        "# HELP {} {}\n# TYPE {} counter\n{} {}\n",
        name, help, name, name, value
    )
}

/// GET /metrics - contadores no formato de exposição do Prometheus
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text exposition", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let mut out = String::new();
    out.push_str(&render_counter(
        "storefront_requests_total",
        "Requests seen by the token-protected API surface",
        REQUEST_COUNT.load(Ordering::Relaxed),
    ));
    out.push('\n');
    out.push_str(&render_counter(
        "storefront_errors_total",
        "Requests that ended in a logical or store failure",
        ERROR_COUNT.load(Ordering::Relaxed),
    ));

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_counter_exposition_format() {
        let rendered = render_counter("x_total", "some help text", 3);

        assert!(rendered.contains("# HELP x_total some help text"));
        assert!(rendered.contains("# TYPE x_total counter"));
        assert!(rendered.ends_with("x_total 3\n"));
    }

    #[test]
    fn test_counters_are_monotonic() {
        let before = REQUEST_COUNT.load(Ordering::Relaxed);
        increment_request_count();
        assert!(REQUEST_COUNT.load(Ordering::Relaxed) > before);

        let before = ERROR_COUNT.load(Ordering::Relaxed);
        increment_error_count();
        assert!(ERROR_COUNT.load(Ordering::Relaxed) > before);
    }
}
