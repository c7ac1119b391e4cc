//! Construction-time configuration
//!
//! Read once at startup - from the URL query string in the browser, from
//! `DISTANCE_TIMER_*` environment variables on native - and never mutated
//! afterwards. Unrecognized or malformed values fall back to defaults;
//! an invalid `start` is deliberately kept so that construction fails fast
//! instead of silently timing from the wrong instant.

/// Timer configuration. All cadence values are milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerConfig {
    /// Optional start-instant override, `YYYY-MM-DD[THH:MM[:SS[.mmm]]]`.
    /// Parsed (and validated) by the composition root.
    pub start: Option<String>,
    /// Target update cadence.
    pub update_interval_ms: f64,
    /// Couple the scheduler to the page-visibility signal.
    pub pause_when_hidden: bool,
    /// Frame rate the cadence adjustment steers toward.
    pub target_fps: f64,
    /// Monitor sampling period.
    pub sample_interval_ms: f64,
    /// Monitor window capacity.
    pub max_samples: usize,
    /// Open the performance overlay at startup.
    pub show_overlay: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            start: None,
            update_interval_ms: 100.0,
            pause_when_hidden: true,
            target_fps: 30.0,
            sample_interval_ms: 1000.0,
            max_samples: 60,
            show_overlay: false,
        }
    }
}

impl TimerConfig {
    /// Parse overrides from a URL query string (`?start=2020-10-05&interval=50
    /// &pause=0&overlay=1`). A leading `?` is tolerated.
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = match pair.split_once('=') {
                Some(kv) => kv,
                None => continue,
            };
            match key {
                "start" if !value.is_empty() => config.start = Some(value.to_string()),
                "interval" => {
                    if let Ok(ms) = value.parse::<f64>() {
                        if ms.is_finite() && ms >= 0.0 {
                            config.update_interval_ms = ms;
                        }
                    }
                }
                "pause" => config.pause_when_hidden = !matches!(value, "0" | "false"),
                "overlay" => config.show_overlay = matches!(value, "1" | "true"),
                "fps" => {
                    if let Ok(fps) = value.parse::<f64>() {
                        if fps.is_finite() && fps > 0.0 {
                            config.target_fps = fps;
                        }
                    }
                }
                _ => {}
            }
        }
        config
    }

    /// Read overrides from `DISTANCE_TIMER_START`, `DISTANCE_TIMER_INTERVAL_MS`,
    /// `DISTANCE_TIMER_PAUSE_WHEN_HIDDEN`, `DISTANCE_TIMER_FPS` and
    /// `DISTANCE_TIMER_OVERLAY` - the same knobs the query string exposes.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(start) = std::env::var("DISTANCE_TIMER_START") {
            if !start.is_empty() {
                config.start = Some(start);
            }
        }
        if let Ok(interval) = std::env::var("DISTANCE_TIMER_INTERVAL_MS") {
            if let Ok(ms) = interval.parse::<f64>() {
                if ms.is_finite() && ms >= 0.0 {
                    config.update_interval_ms = ms;
                }
            }
        }
        if let Ok(pause) = std::env::var("DISTANCE_TIMER_PAUSE_WHEN_HIDDEN") {
            config.pause_when_hidden = !matches!(pause.as_str(), "0" | "false");
        }
        if let Ok(fps) = std::env::var("DISTANCE_TIMER_FPS") {
            if let Ok(fps) = fps.parse::<f64>() {
                if fps.is_finite() && fps > 0.0 {
                    config.target_fps = fps;
                }
            }
        }
        if let Ok(overlay) = std::env::var("DISTANCE_TIMER_OVERLAY") {
            config.show_overlay = matches!(overlay.as_str(), "1" | "true");
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let c = TimerConfig::default();
        assert_eq!(c.update_interval_ms, 100.0);
        assert!(c.pause_when_hidden);
        assert_eq!(c.target_fps, 30.0);
        assert_eq!(c.sample_interval_ms, 1000.0);
        assert_eq!(c.max_samples, 60);
        assert!(!c.show_overlay);
        assert_eq!(c.start, None);
    }

    #[test]
    fn query_overrides_parse() {
        let c = TimerConfig::from_query("?start=2021-01-01T00:00&interval=50&pause=0&overlay=1");
        assert_eq!(c.start.as_deref(), Some("2021-01-01T00:00"));
        assert_eq!(c.update_interval_ms, 50.0);
        assert!(!c.pause_when_hidden);
        assert!(c.show_overlay);
    }

    #[test]
    fn query_ignores_malformed_values() {
        let c = TimerConfig::from_query("interval=abc&fps=-5&overlay=yes&unknown=1&noequals");
        assert_eq!(c.update_interval_ms, 100.0);
        assert_eq!(c.target_fps, 30.0);
        assert!(!c.show_overlay);
    }

    #[test]
    fn empty_query_is_default() {
        assert_eq!(TimerConfig::from_query(""), TimerConfig::default());
        assert_eq!(TimerConfig::from_query("?"), TimerConfig::default());
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn env_overrides_expose_the_same_knobs_as_the_query() {
        // Sole test touching these variables, so no cross-test interference.
        std::env::set_var("DISTANCE_TIMER_START", "2021-01-01T00:00");
        std::env::set_var("DISTANCE_TIMER_INTERVAL_MS", "50");
        std::env::set_var("DISTANCE_TIMER_PAUSE_WHEN_HIDDEN", "0");
        std::env::set_var("DISTANCE_TIMER_FPS", "60");
        std::env::set_var("DISTANCE_TIMER_OVERLAY", "1");

        let from_env = TimerConfig::from_env();
        let from_query =
            TimerConfig::from_query("?start=2021-01-01T00:00&interval=50&pause=0&fps=60&overlay=1");
        assert_eq!(from_env, from_query);
        assert_eq!(from_env.target_fps, 60.0);

        // Malformed fps falls back, as in the query path.
        std::env::set_var("DISTANCE_TIMER_FPS", "-5");
        assert_eq!(TimerConfig::from_env().target_fps, 30.0);

        for key in [
            "DISTANCE_TIMER_START",
            "DISTANCE_TIMER_INTERVAL_MS",
            "DISTANCE_TIMER_PAUSE_WHEN_HIDDEN",
            "DISTANCE_TIMER_FPS",
            "DISTANCE_TIMER_OVERLAY",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn invalid_start_is_kept_for_fail_fast_construction() {
        // Validation happens at engine construction, not here.
        let c = TimerConfig::from_query("start=garbage");
        assert_eq!(c.start.as_deref(), Some("garbage"));
    }
}
