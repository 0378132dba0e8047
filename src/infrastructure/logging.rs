//! Logging setup with a reloadable filter
//!
//! The filter is kept as a root level plus per-target levels and rendered
//! into an `EnvFilter` directive string whenever it changes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::panic;
use std::str::FromStr;

use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::infrastructure::error::LoggingError;
use crate::infrastructure::traits::{LogLevels, Subsystem};

/// Baseline level when `RUST_LOG` is not set.
pub const DEFAULT_BASE_LEVEL: LevelFilter = LevelFilter::WARN;

/// Root level plus per-target overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directives {
    root: LevelFilter,
    targets: BTreeMap<String, String>,
    /// Directives kept verbatim (span filters and the like).
    extra: Vec<String>,
}

impl Directives {
    pub fn new(root: LevelFilter) -> Self {
        Self {
            root,
            targets: BTreeMap::new(),
            extra: Vec::new(),
        }
    }

    /// Parse a `RUST_LOG`-style spec. Bare levels set the root, `target=level`
    /// pairs become target overrides, everything else is kept verbatim.
    pub fn parse(spec: &str, fallback: LevelFilter) -> Self {
        let mut directives = Self::new(fallback);
        for item in spec.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            if let Ok(level) = LevelFilter::from_str(item) {
                directives.root = level;
                continue;
            }
            match item.split_once('=') {
                Some((target, level))
                    if !target.contains('[') && LevelFilter::from_str(level).is_ok() =>
                {
                    directives
                        .targets
                        .insert(target.to_string(), level.to_string());
                }
                _ => directives.extra.push(item.to_string()),
            }
        }
        directives
    }

    pub fn set(&mut self, subsystem: &Subsystem, level: LevelFilter) {
        match subsystem {
            Subsystem::Root => self.root = level,
            Subsystem::Target(target) => {
                self.targets.insert(target.clone(), level.to_string());
            }
        }
    }

    pub fn root(&self) -> LevelFilter {
        self.root
    }

    /// Level directive for `target`, if one was set.
    pub fn target(&self, target: &str) -> Option<&str> {
        self.targets.get(target).map(String::as_str)
    }

    /// Render as an `EnvFilter` directive string.
    pub fn render(&self) -> String {
        std::iter::once(self.root.to_string())
            .chain(self.extra.iter().cloned())
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn to_filter(&self) -> Result<EnvFilter, LoggingError> {
        let directive = self.render();
        EnvFilter::try_new(&directive)
            .map_err(|source| LoggingError::InvalidDirective { directive, source })
    }
}

/// [`LogLevels`] backed by the reload handle of the installed subscriber.
pub struct ReloadLogLevels {
    handle: reload::Handle<EnvFilter, Registry>,
    directives: RefCell<Directives>,
}

impl ReloadLogLevels {
    pub fn directives(&self) -> Directives {
        self.directives.borrow().clone()
    }
}

impl LogLevels for ReloadLogLevels {
    fn set_level(&self, subsystem: &Subsystem, level: LevelFilter) -> Result<(), LoggingError> {
        let mut next = self.directives.borrow().clone();
        next.set(subsystem, level);
        self.handle.reload(next.to_filter()?)?;
        debug!(%subsystem, %level, directives = %next.render(), "log level changed");
        *self.directives.borrow_mut() = next;
        Ok(())
    }
}

/// Install the global subscriber: formatted output to stderr behind a
/// reloadable filter seeded from `RUST_LOG` or `base`.
pub fn init_logging(base: LevelFilter) -> Result<ReloadLogLevels, LoggingError> {
    let directives = match std::env::var("RUST_LOG") {
        Ok(spec) if !spec.trim().is_empty() => Directives::parse(&spec, base),
        _ => Directives::new(base),
    };
    let (filter, handle) = reload::Layer::new(directives.to_filter()?);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    debug!(directives = %directives.render(), "logging initialized");
    Ok(ReloadLogLevels {
        handle,
        directives: RefCell::new(directives),
    })
}

/// Replace the default panic hook so caught panics leave no trace on stderr
/// beyond the launcher's own `error:` line. Details go to tracing at debug.
pub fn quiet_panics() {
    panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_default();
        debug!(%location, panic = %info, "panic caught");
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_new_directives_when_rendering_then_only_root_level() {
        let directives = Directives::new(LevelFilter::WARN);
        assert_eq!(directives.render(), "warn");
    }

    #[test]
    fn given_target_override_when_rendering_then_appended_after_root() {
        let mut directives = Directives::new(LevelFilter::WARN);
        directives.set(&Subsystem::Target("app::core".into()), LevelFilter::TRACE);
        directives.set(&Subsystem::Root, LevelFilter::INFO);
        assert_eq!(directives.render(), "info,app::core=trace");
    }

    #[test]
    fn given_repeated_target_when_setting_then_last_level_wins() {
        let mut directives = Directives::new(LevelFilter::WARN);
        let target = Subsystem::Target("app".into());
        directives.set(&target, LevelFilter::TRACE);
        directives.set(&target, LevelFilter::ERROR);
        assert_eq!(directives.target("app"), Some("error"));
    }

    #[test]
    fn given_rust_log_spec_when_parsing_then_splits_root_targets_and_extra() {
        let directives = Directives::parse("debug,hyper=warn,app[span]=trace", LevelFilter::WARN);
        assert_eq!(directives.root(), LevelFilter::DEBUG);
        assert_eq!(directives.target("hyper"), Some("warn"));
        assert_eq!(directives.render(), "debug,app[span]=trace,hyper=warn");
    }

    #[test]
    fn given_rendered_directives_when_building_filter_then_accepted() {
        let mut directives = Directives::new(LevelFilter::WARN);
        directives.set(&Subsystem::Target("launchkit::application".into()), LevelFilter::DEBUG);
        assert!(directives.to_filter().is_ok());
    }

    #[test]
    fn given_quiet_hook_when_panicking_then_unwind_still_caught() {
        quiet_panics();

        let result = panic::catch_unwind(|| panic!("quiet"));

        drop(panic::take_hook());
        assert!(result.is_err());
    }
}
