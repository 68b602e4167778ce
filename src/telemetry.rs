//! Opt-in `tracing` setup for hosts embedding `unichart`.
//!
//! The crate only emits events: group resolution and batches log at `debug`,
//! rejected datasets and failing subscribers at `warn`, animation frame loops
//! at `trace`. Hosts that already install a subscriber need nothing from here.

/// Filter used when `RUST_LOG` is unset: warnings from everything, group and
/// batch activity from this crate.
pub const DEFAULT_FILTER: &str = "warn,unichart=info";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        install(filter)
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Same as [`init_default_tracing`] with explicit filter directives, e.g.
/// `"unichart::animation=trace"` to follow frame loops.
#[must_use]
pub fn init_tracing_with_filter(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        match tracing_subscriber::EnvFilter::try_new(directives) {
            Ok(filter) => install(filter),
            Err(error) => {
                tracing::warn!(%error, directives, "ignoring invalid tracing filter");
                false
            }
        }
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}

#[cfg(feature = "telemetry")]
fn install(filter: tracing_subscriber::EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}
