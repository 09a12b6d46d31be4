use serde::{Deserialize, Serialize};

use crate::habits::RepeatPolicy;
use crate::store::{Persisted, StoreKey};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub repeat_same_day: bool,
}

impl AppSettings {
    pub fn repeat_policy(&self) -> RepeatPolicy {
        if self.repeat_same_day {
            RepeatPolicy::CountEvery
        } else {
            RepeatPolicy::OncePerDay
        }
    }

    pub fn apply(&mut self, changes: SettingsChanges) {
        if let Some(value) = changes.repeat_same_day {
            self.repeat_same_day = value;
        }
    }
}

impl Persisted for AppSettings {
    const KEY: StoreKey = StoreKey::AppSettings;
}

#[derive(Clone, Debug, Default)]
pub struct SettingsChanges {
    pub repeat_same_day: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings: AppSettings = serde_json::from_str("{}").expect("parse");
        assert_eq!(settings.repeat_policy(), RepeatPolicy::OncePerDay);
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let mut settings = AppSettings::default();
        settings.apply(SettingsChanges {
            repeat_same_day: Some(true),
        });
        assert_eq!(settings.repeat_policy(), RepeatPolicy::CountEvery);
        settings.apply(SettingsChanges::default());
        assert!(settings.repeat_same_day);
    }
}
