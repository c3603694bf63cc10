use std::{fs::File, path::Path};

use pprof::{ProfilerGuard, ProfilerGuardBuilder};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the `tracing` subscriber (default level `info`) and starts a CPU profiler.
pub fn init_telemetry() -> Option<ProfilerGuard<'static>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false);
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();

    match ProfilerGuardBuilder::default()
        .frequency(1000)
        .blocklist(&["libc", "libpthread", "libgcc", "libm"])
        .build()
    {
        Ok(guard) => Some(guard),
        Err(error) => {
            warn!(%error, "CPU profiler unavailable, continuing without a flamegraph");
            None
        }
    }
}

/// Writes the collected CPU profile as a flamegraph. Failures are logged, not fatal.
pub fn write_profile(guard: ProfilerGuard<'_>, output_path: impl AsRef<Path>) {
    let output_path = output_path.as_ref();
    let written = guard
        .report()
        .build()
        .map_err(|error| error.to_string())
        .and_then(|report| {
            let mut file = File::create(output_path).map_err(|error| error.to_string())?;
            report.flamegraph(&mut file).map_err(|error| error.to_string())
        });
    if let Err(error) = written {
        warn!(path = %output_path.display(), %error, "failed to write CPU profile");
    }
}
