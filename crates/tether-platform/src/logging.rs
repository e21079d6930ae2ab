use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Installs the platform logger: logcat on Android, `env_logger` elsewhere.
///
/// Later calls are no-ops. On desktop `RUST_LOG` still overrides `level`.
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    install(level)
}

#[cfg(target_os = "android")]
fn install(level: LevelFilter) -> anyhow::Result<()> {
    android_logger::init_once(android_logger::Config::default().with_max_level(level));
    Ok(())
}

#[cfg(not(target_os = "android"))]
fn install(level: LevelFilter) -> anyhow::Result<()> {
    use anyhow::Context;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .context("installing env_logger")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        // Another test binary may already own the global logger.
        let _ = init(LevelFilter::Debug);
        assert!(init(LevelFilter::Trace).is_ok());
    }
}
