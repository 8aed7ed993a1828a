use tracing::{debug, warn};

use crate::app::domain::document::DocumentId;
use crate::app::domain::settings::{ThemeMode, ViewerSettings, Zoom};
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::storage::{KeyValueStore, SETTINGS_KEY, THEME_KEY};

/// Which document is focused plus the global display state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    active: Option<DocumentId>,
    zoom: Zoom,
    settings: ViewerSettings,
}

impl ViewState {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            active: None,
            zoom: Zoom::default(),
            settings,
        }
    }

    /// Build from persisted preferences merged over the defaults.
    pub fn load(store: &dyn KeyValueStore, system_prefers_dark: bool) -> Self {
        Self::new(load_settings(store, system_prefers_dark))
    }

    /// `None` is the welcome state.
    pub fn active(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Font size with the zoom level applied.
    pub fn effective_font_size(&self) -> f32 {
        self.zoom.scale(self.settings.font_size_pt)
    }

    pub(crate) fn set_active(&mut self, active: Option<DocumentId>) {
        self.active = active;
    }

    pub(crate) fn set_zoom(&mut self, zoom: Zoom) -> bool {
        let changed = self.zoom != zoom;
        self.zoom = zoom;
        changed
    }

    pub(crate) fn set_settings(&mut self, settings: ViewerSettings) {
        self.settings = settings.sanitized();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

/// Read the settings record, then let the standalone theme key override the
/// theme. Malformed data is logged and treated as absent.
///
/// With no theme key stored, a light desktop turns the default dark theme
/// into light.
pub fn load_settings(store: &dyn KeyValueStore, system_prefers_dark: bool) -> ViewerSettings {
    let mut settings = match store.get(SETTINGS_KEY) {
        Some(json) => match serde_json::from_str::<ViewerSettings>(&json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                warn!("Failed to parse stored settings: {e}. Using defaults.");
                ViewerSettings::default()
            }
        },
        None => ViewerSettings::default(),
    };

    match store.get(THEME_KEY) {
        Some(raw) => match ThemeMode::parse(&raw) {
            Some(theme) => settings.theme = theme,
            None => warn!(value = %raw, "Ignoring unknown stored theme"),
        },
        None if !system_prefers_dark && settings.theme == ThemeMode::Dark => {
            debug!("No stored theme, following light desktop");
            settings.theme = ThemeMode::Light;
        }
        None => {}
    }

    debug!(?settings, "Loaded settings");
    settings
}

pub fn save_settings(store: &mut dyn KeyValueStore, settings: &ViewerSettings) -> Result<()> {
    let json = serde_json::to_string(settings)?;
    store.set(SETTINGS_KEY, &json)?;
    store.set(THEME_KEY, settings.theme.as_str())
}

pub fn clear_settings(store: &mut dyn KeyValueStore) -> Result<()> {
    store.remove(SETTINGS_KEY)?;
    store.remove(THEME_KEY)
}
