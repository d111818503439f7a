use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SETTINGS_FILE: &str = "settings.json";

// The only UI state that survives a restart is the email-obfuscation
// preference. The reset-flow flag is transient: it gates navigation while a
// password-reset link is being handled and must not outlive the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub obfuscate_email: bool,
    #[serde(skip)]
    pub reset_flow_active: bool,
}

impl Settings {
    // Missing or unreadable file is just defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => Settings::default(),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_the_local_part() {
        assert_eq!(mask_email("collector@example.com"), "co***@example.com");
        assert_eq!(mask_email("ab@example.com"), "ab***@example.com");
        assert_eq!(mask_email("a@example.com"), "a***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn settings_round_trip_and_skip_the_transient_flag() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join("collector-settings-test.json");
        let settings = Settings {
            obfuscate_email: true,
            reset_flow_active: true,
        };
        settings.save(&path)?;

        let loaded = Settings::load(&path);
        assert!(loaded.obfuscate_email);
        assert!(!loaded.reset_flow_active);

        std::fs::remove_file(&path).ok();
        Ok(())
    }

    #[test]
    fn missing_file_loads_defaults() {
        let loaded = Settings::load(Path::new("/nonexistent/settings.json"));
        assert!(!loaded.obfuscate_email);
    }
}
