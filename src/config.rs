//! Site and player configuration.
//!
//! The page content (tracks, photos, letter) ships with the app in
//! `assets/site.json`; anything missing from that file falls back to the
//! defaults below.

use crate::error::Result;
use crate::utils::asset_url;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SITE_JSON: &str = include_str!("../assets/site.json");

/// Number of placeholder cards shown when the gallery has no photos.
const PLACEHOLDER_PHOTOS: usize = 6;

static SITE: Lazy<SiteConfig> = Lazy::new(|| match SiteConfig::from_json(SITE_JSON) {
    Ok(config) => config,
    Err(err) => {
        tracing::warn!("falling back to default site config: {err}");
        SiteConfig::default()
    }
});

/// Parsed `assets/site.json`, loaded once.
pub fn site() -> &'static SiteConfig {
    &SITE
}

/// Tunables for the background music player.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicConfig {
    /// Local storage key holding the playback snapshot
    pub storage_key: String,
    /// How often the position is saved while playing
    pub save_interval: Duration,
    /// Delay before the first-visit autoplay attempt
    pub autoplay_delay: Duration,
    /// Volume used when nothing was stored
    pub default_volume: f64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            storage_key: "musicState".to_string(),
            save_interval: Duration::from_millis(2000),
            autoplay_delay: Duration::from_millis(500),
            default_volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub file: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_music_base")]
    pub music_base: String,
    #[serde(default)]
    pub playlist: Vec<String>,
    #[serde(default = "default_photo_base")]
    pub photo_base: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub letter: String,
}

fn default_title() -> String {
    "For You".to_string()
}

fn default_music_base() -> String {
    "/assets/music".to_string()
}

fn default_photo_base() -> String {
    "/assets/photos".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: String::new(),
            music_base: default_music_base(),
            playlist: Vec::new(),
            photo_base: default_photo_base(),
            photos: Vec::new(),
            letter: String::new(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Track URLs in playlist order.
    pub fn track_urls(&self) -> Vec<String> {
        self.playlist
            .iter()
            .filter(|file| is_audio_file(file))
            .map(|file| asset_url(&self.music_base, file))
            .collect()
    }

    /// Photos to show, with placeholders when none are configured.
    pub fn gallery_photos(&self) -> Vec<Photo> {
        let photos: Vec<Photo> = self
            .photos
            .iter()
            .filter(|photo| is_image_file(&photo.file))
            .cloned()
            .collect();
        if !photos.is_empty() {
            return photos;
        }
        (1..=PLACEHOLDER_PHOTOS)
            .map(|n| Photo {
                file: "placeholder.jpg".to_string(),
                label: format!("Memory {n}"),
            })
            .collect()
    }

    pub fn photo_url(&self, photo: &Photo) -> String {
        asset_url(&self.photo_base, &photo.file)
    }
}

fn has_extension(file: &str, extensions: &[&str]) -> bool {
    let lower = file.to_ascii_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}

fn is_audio_file(file: &str) -> bool {
    has_extension(file, &[".mp3", ".mp4", ".wav", ".ogg", ".m4a"])
}

fn is_image_file(file: &str) -> bool {
    has_extension(file, &[".jpg", ".jpeg", ".png", ".gif"])
}
