use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_TITLE: &str = "diorama";
pub const DEFAULT_SIZE: (u32, u32) = (640, 480);

/// Display/window and timing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Window caption.
    pub title: String,

    /// Inner window size in logical pixels.
    pub size: (u32, u32),

    pub fullscreen: bool,

    /// Target `update` calls per second. `0.0` runs uncapped.
    pub update_rate: f32,

    /// Backend-specific options, passed through verbatim.
    pub options: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            size: DEFAULT_SIZE,
            fullscreen: false,
            update_rate: 0.0,
            options: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn update_rate(mut self, rate: f32) -> Self {
        self.update_rate = sanitize_rate(rate);
        self
    }

    /// Sets a backend-specific option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Returns the option stored under `key`, if any.
    pub fn get_option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Duration of one update tick, or `None` when uncapped.
    pub fn tick_period(&self) -> Option<Duration> {
        tick_period(self.update_rate)
    }

    /// Applies `patch` in place.
    ///
    /// Returns the subset of `patch` that actually changed a value; an empty
    /// result means the settings are untouched.
    pub fn apply(&mut self, patch: &SettingsPatch) -> SettingsPatch {
        let mut changed = SettingsPatch::default();

        if let Some(title) = &patch.title {
            if *title != self.title {
                self.title = title.clone();
                changed.title = Some(title.clone());
            }
        }

        if let Some(size) = patch.size {
            if size != self.size {
                self.size = size;
                changed.size = Some(size);
            }
        }

        if let Some(fullscreen) = patch.fullscreen {
            if fullscreen != self.fullscreen {
                self.fullscreen = fullscreen;
                changed.fullscreen = Some(fullscreen);
            }
        }

        if let Some(rate) = patch.update_rate {
            let rate = sanitize_rate(rate);
            if rate != self.update_rate {
                self.update_rate = rate;
                changed.update_rate = Some(rate);
            }
        }

        for (key, value) in &patch.options {
            if self.options.get(key) != Some(value) {
                self.options.insert(key.clone(), value.clone());
                changed.options.insert(key.clone(), value.clone());
            }
        }

        changed
    }
}

/// Partial settings update.
///
/// Unset fields keep their current value when the patch is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub title: Option<String>,
    pub size: Option<(u32, u32)>,
    pub fullscreen: Option<bool>,
    pub update_rate: Option<f32>,
    pub options: BTreeMap<String, String>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = Some(fullscreen);
        self
    }

    pub fn update_rate(mut self, rate: f32) -> Self {
        self.update_rate = Some(rate);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.size.is_none()
            && self.fullscreen.is_none()
            && self.update_rate.is_none()
            && self.options.is_empty()
    }

    /// Folds `later` into `self`. Fields set in `later` win.
    pub fn merge(&mut self, later: SettingsPatch) {
        let SettingsPatch {
            title,
            size,
            fullscreen,
            update_rate,
            options,
        } = later;

        if title.is_some() {
            self.title = title;
        }
        if size.is_some() {
            self.size = size;
        }
        if fullscreen.is_some() {
            self.fullscreen = fullscreen;
        }
        if update_rate.is_some() {
            self.update_rate = update_rate;
        }
        self.options.extend(options);
    }
}

impl From<Settings> for SettingsPatch {
    fn from(s: Settings) -> Self {
        Self {
            title: Some(s.title),
            size: Some(s.size),
            fullscreen: Some(s.fullscreen),
            update_rate: Some(s.update_rate),
            options: s.options,
        }
    }
}

fn sanitize_rate(rate: f32) -> f32 {
    if !(rate.is_finite() && rate >= 0.0) {
        log::warn!("update rate {rate} is not a finite non-negative number; running uncapped");
        return 0.0;
    }
    if rate > 0.0 && tick_period(rate).is_none() {
        log::warn!("update rate {rate} has no representable tick period; running uncapped");
        return 0.0;
    }
    rate
}

/// Period of one tick at `rate` ticks per second.
///
/// `None` means uncapped: zero, negative, non-finite, or a rate so small
/// that its period does not fit in a `Duration`.
pub(crate) fn tick_period(rate: f32) -> Option<Duration> {
    if rate > 0.0 && rate.is_finite() {
        Duration::try_from_secs_f64(1.0 / rate as f64).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.title, DEFAULT_TITLE);
        assert_eq!(s.size, (640, 480));
        assert!(!s.fullscreen);
        assert_eq!(s.update_rate, 0.0);
        assert!(s.tick_period().is_none());
    }

    #[test]
    fn apply_reports_only_real_changes() {
        let mut s = Settings::new().title("menu").size(800, 600);
        let changed = s.apply(&SettingsPatch::new().title("menu").size(1024, 768));

        assert_eq!(changed, SettingsPatch::new().size(1024, 768));
        assert_eq!(s.title, "menu");
        assert_eq!(s.size, (1024, 768));
    }

    #[test]
    fn apply_empty_patch_is_noop() {
        let mut s = Settings::default();
        let before = s.clone();
        assert!(s.apply(&SettingsPatch::default()).is_empty());
        assert_eq!(s, before);
    }

    #[test]
    fn apply_merges_options_key_by_key() {
        let mut s = Settings::new().option("resizable", "false").option("vsync", "true");
        let changed = s.apply(&SettingsPatch::new().option("vsync", "true").option("maximized", "true"));

        assert_eq!(changed.options.len(), 1);
        assert_eq!(s.get_option("resizable"), Some("false"));
        assert_eq!(s.get_option("maximized"), Some("true"));
    }

    #[test]
    fn negative_or_nan_rate_runs_uncapped() {
        assert_eq!(Settings::new().update_rate(-5.0).update_rate, 0.0);
        assert_eq!(Settings::new().update_rate(f32::NAN).update_rate, 0.0);

        let mut s = Settings::new().update_rate(30.0);
        s.apply(&SettingsPatch::new().update_rate(f32::INFINITY));
        assert_eq!(s.update_rate, 0.0);
    }

    #[test]
    fn tick_period_matches_rate() {
        let period = Settings::new().update_rate(50.0).tick_period().unwrap();
        assert!((period.as_secs_f64() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn rate_with_unrepresentable_period_runs_uncapped() {
        assert_eq!(tick_period(1e-30), None);
        assert_eq!(Settings::new().update_rate(1e-30).update_rate, 0.0);

        let mut s = Settings::new().update_rate(30.0);
        let changed = s.apply(&SettingsPatch::new().update_rate(1e-30));
        assert_eq!(changed.update_rate, Some(0.0));
        assert!(s.tick_period().is_none());
    }

    #[test]
    fn merge_later_fields_win() {
        let mut first = SettingsPatch::new().title("a").size(1, 1);
        first.merge(SettingsPatch::new().title("b").fullscreen(true));

        assert_eq!(first.title.as_deref(), Some("b"));
        assert_eq!(first.size, Some((1, 1)));
        assert_eq!(first.fullscreen, Some(true));
        assert!(first.update_rate.is_none());
    }
}
