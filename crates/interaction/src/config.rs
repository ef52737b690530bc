use scene::ViewOptions;
use scene::buttons;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragRotateConfig {
    /// Exact `buttons` bitmask a drag sample must carry to rotate.
    pub required_buttons: u16,
    /// Settle duration handed to the view when the drag ends.
    pub inertia_duration_ms: u32,
}

impl Default for DragRotateConfig {
    fn default() -> Self {
        Self {
            required_buttons: buttons::SECONDARY,
            inertia_duration_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub drag_rotate: DragRotateConfig,
    pub view: ViewOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "interaction config parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid interaction config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl InteractionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drag_rotate.required_buttons == 0 {
            return Err(ConfigError::Invalid(
                "drag_rotate.required_buttons must name at least one button".to_string(),
            ));
        }
        let [w, h] = self.view.viewport_px;
        if !(w > 0.0 && h > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "view.viewport_px must be positive, got [{w}, {h}]"
            )));
        }
        Ok(())
    }
}
