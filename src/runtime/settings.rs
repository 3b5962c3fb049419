use turntable::config::Settings;

/// Settings to run with, and why defaults were used when they were.
pub struct LoadedSettings {
    pub settings: Settings,
    pub fallback: Option<String>,
}

/// Load and validate settings. A config that cannot be read or does not
/// validate is replaced by defaults; the app still starts.
pub fn load_settings() -> LoadedSettings {
    let loaded = Settings::load()
        .map_err(|e| format!("failed to load config, using defaults: {e}"))
        .and_then(|s| match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => Err(format!("invalid config, using defaults: {msg}")),
        });

    match loaded {
        Ok(settings) => LoadedSettings {
            settings,
            fallback: None,
        },
        Err(reason) => LoadedSettings {
            settings: Settings::default(),
            fallback: Some(reason),
        },
    }
}
