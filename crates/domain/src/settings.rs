use serde::{Deserialize, Serialize};

use crate::{ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, ReadError>;
    async fn set_settings(&self, settings: Settings) -> Result<(), UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Returns the default settings if none have been stored yet.
    async fn read_settings(&self) -> Result<Settings, ReadError>;
    async fn write_settings(&self, settings: Settings) -> Result<(), UpdateError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Model used for workout generation.
    pub completion_model: String,
    /// Add demonstration videos from the built-in table to generated exercises that lack one.
    pub suggest_resources: bool,
    pub user_search_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            completion_model: "o4-mini".to_string(),
            suggest_resources: true,
            user_search_limit: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_settings_missing_fields_use_defaults() {
        assert_eq!(
            serde_json::from_value::<Settings>(json!({ "suggest_resources": false })).unwrap(),
            Settings {
                suggest_resources: false,
                ..Settings::default()
            }
        );
    }
}
