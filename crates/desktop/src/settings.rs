use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use signreel_core::pipeline::translate_text_use_case::TranslatorConfig;
use signreel_core::segmentation::domain::segment::UnmatchedPolicy;
use signreel_core::shared::constants::{DEFAULT_BACKEND_URL, DEFAULT_DICTIONARY_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    System,
    Dark,
    Light,
}

impl Appearance {
    pub const ALL: &[Appearance] = &[Appearance::System, Appearance::Dark, Appearance::Light];
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::System => write!(f, "System"),
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dictionary JSON; `None` means `isl_dictionary.json` in the working directory.
    pub dictionary_path: Option<PathBuf>,
    /// Clip directory; `None` means the dictionary's directory.
    pub media_root: Option<PathBuf>,
    pub base_path: String,
    pub backend_enabled: bool,
    pub backend_url: String,
    pub unmatched: UnmatchedPolicy,
    pub allow_model_download: bool,
    pub appearance: Appearance,
    pub high_contrast: bool,
    pub font_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dictionary_path: None,
            media_root: None,
            base_path: String::new(),
            backend_enabled: true,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            unmatched: UnmatchedPolicy::Drop,
            allow_model_download: true,
            appearance: Appearance::System,
            high_contrast: false,
            font_scale: 1.0,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("SignReel").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Could not save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.dictionary_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DICTIONARY_FILE))
    }

    pub fn media_root(&self) -> PathBuf {
        if let Some(root) = &self.media_root {
            return root.clone();
        }
        self.dictionary_path()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn translator_config(&self) -> TranslatorConfig {
        let backend_url = self.backend_url.trim();
        TranslatorConfig {
            base_path: self.base_path.clone(),
            policy: self.unmatched,
            backend_url: (self.backend_enabled && !backend_url.is_empty())
                .then(|| backend_url.to_string()),
        }
    }
}
