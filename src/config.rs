use serde::Deserialize;
use thiserror::Error;

use crate::logging::LogLevel;

const DEFAULT_NAV_SCROLL_THRESHOLD: f64 = 50.0;
const DEFAULT_SCROLL_THROTTLE_MS: u32 = 16;
const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 150;
const DEFAULT_PARALLAX_BASE_RATE: f64 = -0.3;
const DEFAULT_PARALLAX_SPEED_STEP: f64 = 0.2;
const DEFAULT_DECORATION_SPEED: f64 = 0.5;
const DEFAULT_DECORATION_ROTATION_RATE: f64 = 0.1;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
const DEFAULT_COUNT_UP_STEPS: u32 = 50;
const DEFAULT_COUNT_UP_TICK_MS: u32 = 30;
const DEFAULT_STATS_DELAY_MS: u32 = 1_000;
const DEFAULT_FILTER_STAGGER_MS: u32 = 100;
const DEFAULT_FILTER_EXIT_MS: u32 = 300;
const DEFAULT_SKILL_STAGGER_MS: u32 = 100;
const DEFAULT_ANCHOR_OFFSET: f64 = 80.0;
const DEFAULT_ANCHOR_SCROLL_MS: u32 = 1_000;
const DEFAULT_CURSOR_SMOOTHING: f64 = 0.1;
const DEFAULT_HERO_REVEAL_DELAY_MS: u32 = 300;
const DEFAULT_HERO_STAGGER_MS: u32 = 150;
const DEFAULT_SUBMIT_DELAY_MS: u32 = 2_000;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const NAV_SCROLL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 2_000.0);
const SCROLL_THROTTLE_MS_BOUNDS: (u32, u32) = (1, 1_000);
const RESIZE_DEBOUNCE_MS_BOUNDS: (u32, u32) = (0, 5_000);
const PARALLAX_BASE_RATE_BOUNDS: (f64, f64) = (-2.0, 2.0);
const PARALLAX_SPEED_STEP_BOUNDS: (f64, f64) = (0.0, 2.0);
const DECORATION_SPEED_BOUNDS: (f64, f64) = (0.0, 2.0);
const DECORATION_ROTATION_RATE_BOUNDS: (f64, f64) = (-1.0, 1.0);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);
const COUNT_UP_STEPS_BOUNDS: (u32, u32) = (1, 1_000);
const COUNT_UP_TICK_MS_BOUNDS: (u32, u32) = (1, 1_000);
const DELAY_MS_BOUNDS: (u32, u32) = (0, 10_000);
const ANCHOR_OFFSET_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const ANCHOR_SCROLL_MS_BOUNDS: (u32, u32) = (0, 5_000);
const CURSOR_SMOOTHING_BOUNDS: (f64, f64) = (0.01, 1.0);
const SUBMIT_DELAY_MS_BOUNDS: (u32, u32) = (0, 30_000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("effects config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for every page effect. Each field has a default and an
/// inclusive range; overrides outside the range are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectsConfig {
    pub nav_scroll_threshold: f64,
    pub scroll_throttle_ms: u32,
    pub resize_debounce_ms: u32,
    pub parallax_base_rate: f64,
    pub parallax_speed_step: f64,
    pub decoration_speed: f64,
    pub decoration_rotation_rate: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub count_up_steps: u32,
    pub count_up_tick_ms: u32,
    pub stats_delay_ms: u32,
    pub filter_stagger_ms: u32,
    pub filter_exit_ms: u32,
    pub skill_stagger_ms: u32,
    pub anchor_offset: f64,
    pub anchor_scroll_ms: u32,
    pub cursor_smoothing: f64,
    pub hero_reveal_delay_ms: u32,
    pub hero_stagger_ms: u32,
    pub submit_delay_ms: u32,
    pub log_level: LogLevel,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            nav_scroll_threshold: DEFAULT_NAV_SCROLL_THRESHOLD,
            scroll_throttle_ms: DEFAULT_SCROLL_THROTTLE_MS,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            parallax_base_rate: DEFAULT_PARALLAX_BASE_RATE,
            parallax_speed_step: DEFAULT_PARALLAX_SPEED_STEP,
            decoration_speed: DEFAULT_DECORATION_SPEED,
            decoration_rotation_rate: DEFAULT_DECORATION_ROTATION_RATE,
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_root_margin: DEFAULT_REVEAL_ROOT_MARGIN.to_string(),
            count_up_steps: DEFAULT_COUNT_UP_STEPS,
            count_up_tick_ms: DEFAULT_COUNT_UP_TICK_MS,
            stats_delay_ms: DEFAULT_STATS_DELAY_MS,
            filter_stagger_ms: DEFAULT_FILTER_STAGGER_MS,
            filter_exit_ms: DEFAULT_FILTER_EXIT_MS,
            skill_stagger_ms: DEFAULT_SKILL_STAGGER_MS,
            anchor_offset: DEFAULT_ANCHOR_OFFSET,
            anchor_scroll_ms: DEFAULT_ANCHOR_SCROLL_MS,
            cursor_smoothing: DEFAULT_CURSOR_SMOOTHING,
            hero_reveal_delay_ms: DEFAULT_HERO_REVEAL_DELAY_MS,
            hero_stagger_ms: DEFAULT_HERO_STAGGER_MS,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEffectsConfig {
    nav_scroll_threshold: Option<f64>,
    scroll_throttle_ms: Option<u32>,
    resize_debounce_ms: Option<u32>,
    parallax_base_rate: Option<f64>,
    parallax_speed_step: Option<f64>,
    decoration_speed: Option<f64>,
    decoration_rotation_rate: Option<f64>,
    reveal_threshold: Option<f64>,
    reveal_root_margin: Option<String>,
    count_up_steps: Option<u32>,
    count_up_tick_ms: Option<u32>,
    stats_delay_ms: Option<u32>,
    filter_stagger_ms: Option<u32>,
    filter_exit_ms: Option<u32>,
    skill_stagger_ms: Option<u32>,
    anchor_offset: Option<f64>,
    anchor_scroll_ms: Option<u32>,
    cursor_smoothing: Option<f64>,
    hero_reveal_delay_ms: Option<u32>,
    hero_stagger_ms: Option<u32>,
    submit_delay_ms: Option<u32>,
    log_level: Option<String>,
}

impl EffectsConfig {
    /// Reads overrides from the JSON body of the page's `#effects-config`
    /// block. Unknown keys are ignored.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let raw: RawEffectsConfig = if source.trim().is_empty() {
            RawEffectsConfig::default()
        } else {
            serde_json::from_str(source)?
        };

        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawEffectsConfig) -> Self {
        Self {
            nav_scroll_threshold: within(
                raw.nav_scroll_threshold,
                DEFAULT_NAV_SCROLL_THRESHOLD,
                NAV_SCROLL_THRESHOLD_BOUNDS,
            ),
            scroll_throttle_ms: within(
                raw.scroll_throttle_ms,
                DEFAULT_SCROLL_THROTTLE_MS,
                SCROLL_THROTTLE_MS_BOUNDS,
            ),
            resize_debounce_ms: within(
                raw.resize_debounce_ms,
                DEFAULT_RESIZE_DEBOUNCE_MS,
                RESIZE_DEBOUNCE_MS_BOUNDS,
            ),
            parallax_base_rate: within(
                raw.parallax_base_rate,
                DEFAULT_PARALLAX_BASE_RATE,
                PARALLAX_BASE_RATE_BOUNDS,
            ),
            parallax_speed_step: within(
                raw.parallax_speed_step,
                DEFAULT_PARALLAX_SPEED_STEP,
                PARALLAX_SPEED_STEP_BOUNDS,
            ),
            decoration_speed: within(
                raw.decoration_speed,
                DEFAULT_DECORATION_SPEED,
                DECORATION_SPEED_BOUNDS,
            ),
            decoration_rotation_rate: within(
                raw.decoration_rotation_rate,
                DEFAULT_DECORATION_ROTATION_RATE,
                DECORATION_ROTATION_RATE_BOUNDS,
            ),
            reveal_threshold: within(
                raw.reveal_threshold,
                DEFAULT_REVEAL_THRESHOLD,
                REVEAL_THRESHOLD_BOUNDS,
            ),
            reveal_root_margin: raw
                .reveal_root_margin
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_REVEAL_ROOT_MARGIN.to_string()),
            count_up_steps: within(raw.count_up_steps, DEFAULT_COUNT_UP_STEPS, COUNT_UP_STEPS_BOUNDS),
            count_up_tick_ms: within(
                raw.count_up_tick_ms,
                DEFAULT_COUNT_UP_TICK_MS,
                COUNT_UP_TICK_MS_BOUNDS,
            ),
            stats_delay_ms: within(raw.stats_delay_ms, DEFAULT_STATS_DELAY_MS, DELAY_MS_BOUNDS),
            filter_stagger_ms: within(
                raw.filter_stagger_ms,
                DEFAULT_FILTER_STAGGER_MS,
                DELAY_MS_BOUNDS,
            ),
            filter_exit_ms: within(raw.filter_exit_ms, DEFAULT_FILTER_EXIT_MS, DELAY_MS_BOUNDS),
            skill_stagger_ms: within(raw.skill_stagger_ms, DEFAULT_SKILL_STAGGER_MS, DELAY_MS_BOUNDS),
            anchor_offset: within(raw.anchor_offset, DEFAULT_ANCHOR_OFFSET, ANCHOR_OFFSET_BOUNDS),
            anchor_scroll_ms: within(
                raw.anchor_scroll_ms,
                DEFAULT_ANCHOR_SCROLL_MS,
                ANCHOR_SCROLL_MS_BOUNDS,
            ),
            cursor_smoothing: within(
                raw.cursor_smoothing,
                DEFAULT_CURSOR_SMOOTHING,
                CURSOR_SMOOTHING_BOUNDS,
            ),
            hero_reveal_delay_ms: within(
                raw.hero_reveal_delay_ms,
                DEFAULT_HERO_REVEAL_DELAY_MS,
                DELAY_MS_BOUNDS,
            ),
            hero_stagger_ms: within(raw.hero_stagger_ms, DEFAULT_HERO_STAGGER_MS, DELAY_MS_BOUNDS),
            submit_delay_ms: within(
                raw.submit_delay_ms,
                DEFAULT_SUBMIT_DELAY_MS,
                SUBMIT_DELAY_MS_BOUNDS,
            ),
            log_level: raw
                .log_level
                .as_deref()
                .and_then(LogLevel::parse)
                .unwrap_or(DEFAULT_LOG_LEVEL),
        }
    }
}

fn within<T: PartialOrd + Copy>(value: Option<T>, default: T, bounds: (T, T)) -> T {
    value
        .filter(|value| bounds.0 <= *value && *value <= bounds.1)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_defaults() {
        let config = EffectsConfig::from_json("  ").expect("empty source is valid");
        assert_eq!(config, EffectsConfig::default());
    }

    #[test]
    fn overrides_inside_bounds_are_applied() {
        let config = EffectsConfig::from_json(
            r#"{"navScrollThreshold": 120, "countUpSteps": 10, "logLevel": "DEBUG", "revealRootMargin": "0px"}"#,
        )
        .expect("valid JSON");

        assert_eq!(config.nav_scroll_threshold, 120.0);
        assert_eq!(config.count_up_steps, 10);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.reveal_root_margin, "0px");
        assert_eq!(config.scroll_throttle_ms, DEFAULT_SCROLL_THROTTLE_MS);
    }

    #[test]
    fn out_of_range_overrides_fall_back_per_field() {
        let config = EffectsConfig::from_json(
            r#"{"scrollThrottleMs": 0, "revealThreshold": 1.5, "cursorSmoothing": 0.5, "logLevel": "loud"}"#,
        )
        .expect("valid JSON");

        assert_eq!(config.scroll_throttle_ms, DEFAULT_SCROLL_THROTTLE_MS);
        assert_eq!(config.reveal_threshold, DEFAULT_REVEAL_THRESHOLD);
        assert_eq!(config.cursor_smoothing, 0.5);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn malformed_source_is_an_error() {
        let result = EffectsConfig::from_json("{ navScrollThreshold: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn wrongly_typed_field_is_an_error() {
        assert!(EffectsConfig::from_json(r#"{"countUpSteps": "many"}"#).is_err());
    }
}
