//! Console Logging
//!
//! Routes `tracing` events to the browser console through `tracing-web`,
//! which picks `console.error`/`warn`/`info`/`debug` by level.

use tracing::Level;
use tracing_subscriber::{
    Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use tracing_web::MakeWebConsoleWriter;

fn max_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the console subscriber; a second call is a no-op.
pub fn init() {
    let console = fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(LevelFilter::from_level(max_level()));

    let _ = tracing_subscriber::registry().with(console).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_builds_log_debug() {
        assert_eq!(max_level() == Level::DEBUG, cfg!(debug_assertions));
    }
}
