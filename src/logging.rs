use log::LevelFilter;
use sentry::integrations::log::SentryLogger;

/// Sets up Sentry (enabled only when `SENTRY_DSN` is set) and routes `log`
/// records through it to stderr. Level comes from `RUST_LOG`, default `info`.
///
/// Keep the returned guard alive until exit so queued events are flushed.
pub fn init() -> sentry::ClientInitGuard {
    let guard = sentry::init(sentry::ClientOptions {
        release: sentry::release_name!(),
        ..Default::default()
    });

    let dest = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .build();
    let max_level: LevelFilter = dest.filter();
    if log::set_boxed_logger(Box::new(SentryLogger::with_dest(dest))).is_ok() {
        log::set_max_level(max_level);
    }

    guard
}
