use serde::Serialize;

use crate::{
    assets::MediaRef,
    carousel::CarouselMode,
    media::MediaElement,
    question::DodgeMove,
    scene::{SceneKind, SceneState},
    session::Session,
};

/// Everything the render layer needs to draw the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub at_ms: u64,
    pub scene: SceneKind,
    pub music: MusicSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<GallerySnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<ClosingSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicSnapshot {
    /// Music button state.
    pub is_playing: bool,
    pub audible: bool,
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSnapshot {
    pub dodge: DodgeMove,
    pub tease: Option<String>,
    pub declines: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GallerySnapshot {
    pub active_index: usize,
    /// Set while the full-screen overlay should render.
    pub preview_index: Option<usize>,
    pub mode: CarouselMode,
    pub active_item: MediaRef,
    pub preview_item: Option<MediaRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosingSnapshot {
    pub message_visible: bool,
}

impl RenderSnapshot {
    pub fn capture<M: MediaElement>(session: &Session<M>) -> Self {
        let playback = session.playback();
        let scene = session.scene();

        let mut snapshot = Self {
            at_ms: session.now().as_millis() as u64,
            scene: scene.kind(),
            music: MusicSnapshot {
                is_playing: playback.is_playing(),
                audible: playback.is_audible(),
                volume: playback.volume(),
            },
            question: None,
            gallery: None,
            closing: None,
        };

        match scene {
            SceneState::Question(game) => {
                snapshot.question = Some(QuestionSnapshot {
                    dodge: game.dodge(),
                    tease: game.tease().map(str::to_string),
                    declines: game.decline_count(),
                });
            }
            SceneState::Story(story) => {
                let gallery = &story.gallery;
                snapshot.gallery = Some(GallerySnapshot {
                    active_index: gallery.active_index(),
                    preview_index: gallery.preview_index(),
                    mode: gallery.mode(),
                    active_item: gallery.active_item().clone(),
                    preview_item: gallery.preview_item().cloned(),
                });
            }
            SceneState::Forever(closing) => {
                snapshot.closing = Some(ClosingSnapshot {
                    message_visible: closing.is_message_visible(),
                });
            }
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{config::AppConfig, session::SessionEvent};

    use super::*;

    #[test]
    fn serialises_only_the_mounted_screen() {
        let mut session = Session::simulated(AppConfig::default()).unwrap();
        session
            .dispatch(Duration::from_millis(250), SessionEvent::Accept)
            .unwrap();

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["scene"], "story");
        assert_eq!(json["at_ms"], 250);
        assert_eq!(json["gallery"]["mode"], "auto_advancing");
        assert_eq!(json["gallery"]["active_item"]["path"], "/photos/foto1.jpg");
        assert!(json.get("question").is_none());
        assert!(json.get("closing").is_none());
    }

    #[test]
    fn question_snapshot_starts_untouched() {
        let session = Session::simulated(AppConfig::default()).unwrap();
        let snapshot = session.snapshot();

        let question = snapshot.question.unwrap();
        assert_eq!(question.dodge, DodgeMove::default());
        assert_eq!(question.declines, 0);
        assert!(!snapshot.music.is_playing);
    }
}
