//! Logging setup
//!
//! Installs the `tracing` subscriber used by every module. `RUST_LOG`
//! (read through `EnvFilter`) can override or extend the default directives.

use tracing::level_filters::LevelFilter;
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::fmt::time;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Debug builds log game events at `debug`, release builds at `info`.
/// Call once, early in `main`.
pub fn init() -> anyhow::Result<()> {
    let game_directive = if cfg!(debug_assertions) {
        "sidescroller=debug"
    } else {
        "sidescroller=info"
    };

    let fmt_layer = tracing_subscriber::fmt::layer().with_ansi(!cfg!(target_arch = "wasm32"));
    // No monotonic clock on wasm32-unknown-unknown
    #[cfg(not(target_arch = "wasm32"))]
    let fmt_layer = fmt_layer.with_timer(time::uptime());
    #[cfg(target_arch = "wasm32")]
    let fmt_layer = fmt_layer.without_time();

    tracing_subscriber::Registry::default()
        .with(fmt_layer)
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env()?
                .add_directive(game_directive.parse()?)
                .add_directive("miniquad=warn".parse()?),
        )
        .try_init()?;
    Ok(())
}
