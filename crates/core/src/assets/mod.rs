use serde::{Deserialize, Serialize};

use crate::{config::AssetConfig, media::VideoId, GreetingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

/// Reference to a media file the render layer knows how to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub path: String,
    pub kind: MediaKind,
}

impl MediaRef {
    pub fn new(path: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Every asset referenced by the screens, resolved once per session.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    soundtrack: MediaRef,
    photos: Vec<MediaRef>,
    videos: Vec<MediaRef>,
}

impl AssetCatalog {
    pub fn from_config(config: &AssetConfig) -> Result<Self> {
        let photos: Vec<MediaRef> = if config.photos.is_empty() {
            (1..=config.photo_count)
                .map(|n| config.photo_pattern.replace("{n}", &n.to_string()))
                .map(|path| MediaRef::new(path, MediaKind::Image))
                .collect()
        } else {
            config
                .photos
                .iter()
                .map(|path| MediaRef::new(path.as_str(), MediaKind::Image))
                .collect()
        };

        if photos.is_empty() {
            return Err(GreetingError::InvalidInput(
                "the gallery needs at least one photo",
            ));
        }

        Ok(Self {
            soundtrack: MediaRef::new(config.soundtrack.as_str(), MediaKind::Audio),
            photos,
            videos: config
                .videos
                .iter()
                .map(|path| MediaRef::new(path.as_str(), MediaKind::Video))
                .collect(),
        })
    }

    pub fn soundtrack(&self) -> &MediaRef {
        &self.soundtrack
    }

    pub fn photos(&self) -> &[MediaRef] {
        &self.photos
    }

    pub fn videos(&self) -> &[MediaRef] {
        &self.videos
    }

    pub fn video(&self, id: VideoId) -> Option<&MediaRef> {
        self.videos.get(id.0)
    }
}
