mod metrics;
mod session;

pub use metrics::track_metrics;
pub use session::session_middleware;
