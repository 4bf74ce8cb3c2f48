use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::CarouselError;

const OPTIONS_FILE_NAME: &str = "options.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OverlayOptions {
    /// Swap the sheet images on every left/right step, not only on "Use this printing"
    pub substitute_on_navigate: bool,
    pub close_after_select: bool,
    pub loading_message: String,
    pub custom_card_message: String,
    pub empty_message: String,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            substitute_on_navigate: true,
            close_after_select: true,
            loading_message: "Loading printings...".to_string(),
            custom_card_message: "No printing information available".to_string(),
            empty_message: "No printings found".to_string(),
        }
    }
}

impl OverlayOptions {
    pub fn load(path: &Path) -> Result<Self, CarouselError> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| CarouselError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Options from the user's config directory, or defaults when there are none
    pub fn load_or_default() -> Result<Self, CarouselError> {
        match get_options_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                debug!("No options file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}

/// Get the options file path inside the platform config directory
pub fn get_options_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "printing-carousel")
        .map(|proj_dirs| proj_dirs.config_dir().join(OPTIONS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = OverlayOptions::default();
        assert!(options.substitute_on_navigate);
        assert!(options.close_after_select);
        assert_eq!(options.custom_card_message, "No printing information available");
    }

    #[test]
    fn test_partial_options_file() {
        let path = std::env::temp_dir().join("printing_carousel_options_test.json");
        std::fs::write(&path, r#"{"substitute_on_navigate": false}"#).unwrap();

        let options = OverlayOptions::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(!options.substitute_on_navigate);
        assert_eq!(options.loading_message, "Loading printings...");
    }

    #[test]
    fn test_invalid_options_file() {
        let path = std::env::temp_dir().join("printing_carousel_options_invalid.json");
        std::fs::write(&path, "not json").unwrap();

        let result = OverlayOptions::load(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(CarouselError::Config(_))));
    }
}
