//! A visitor's session: the single audio coordinator plus whichever screen is
//! mounted, driven by timestamped events from the render layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    assets::AssetCatalog,
    carousel::SwipeSurface,
    config::AppConfig,
    media::{MediaElement, SimulatedMedia, VideoId},
    playback::{FadeSpec, PlaybackCoordinator},
    render::RenderSnapshot,
    scene::{SceneKind, SceneState},
    timeline::SessionClock,
    Result,
};

/// Input forwarded by the render layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// "Yes" on the question screen.
    Accept,
    /// "No" on the question screen (click or hover).
    Decline,
    ToggleMusic,
    ThumbnailClick { index: usize },
    TouchStart { x: f32, surface: SwipeSurface },
    TouchEnd { x: f32 },
    PreviewOpen { index: usize },
    PreviewClose,
    VideoPlay { video: VideoId },
    VideoPause { video: VideoId },
    VideoEnded { video: VideoId },
    Navigate { to: SceneKind },
}

impl SessionEvent {
    /// Whether the event stems from the visitor touching the page, which
    /// unlocks playback in environments with an autoplay policy.
    pub fn is_user_gesture(&self) -> bool {
        !matches!(self, Self::VideoEnded { .. })
    }
}

/// One line of a recorded or scripted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: SessionEvent,
}

#[derive(Debug)]
pub struct Session<M> {
    config: AppConfig,
    assets: AssetCatalog,
    clock: SessionClock,
    playback: PlaybackCoordinator<M>,
    scene: SceneState,
}

impl Session<SimulatedMedia> {
    /// Session backed by an in-memory audio element that follows the
    /// configured autoplay policy.
    pub fn simulated(config: AppConfig) -> Result<Self> {
        let element = SimulatedMedia::new(
            config.assets.soundtrack.as_str(),
            config.playback.autoplay,
        );
        Self::new(config, element)
    }
}

impl<M: MediaElement> Session<M> {
    pub fn new(config: AppConfig, element: M) -> Result<Self> {
        let assets = AssetCatalog::from_config(&config.assets)?;
        let playback = PlaybackCoordinator::new(element, &config.playback);
        let scene = SceneState::mount(SceneKind::Question, &config, &assets, Duration::ZERO)?;

        Ok(Self {
            config,
            assets,
            clock: SessionClock::new(),
            playback,
            scene,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetCatalog {
        &self.assets
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn playback(&self) -> &PlaybackCoordinator<M> {
        &self.playback
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }

    /// Fires every timer due up to `at` and returns the session time.
    pub fn advance_to(&mut self, at: Duration) -> Duration {
        let now = self.clock.advance_to(at);
        self.playback.advance_to(now);
        self.scene.advance_to(now);
        now
    }

    /// Advances time to `at`, then applies `event`. Events that do not apply
    /// to the mounted screen are ignored.
    pub fn dispatch(&mut self, at: Duration, event: SessionEvent) -> Result<()> {
        let now = self.advance_to(at);
        if event.is_user_gesture() {
            self.playback.note_user_gesture();
        }

        let in_story = self.scene.kind() == SceneKind::Story;
        match event {
            SessionEvent::ToggleMusic => {
                let playing = self.playback.toggle();
                tracing::info!(playing, "music button pressed");
            }
            SessionEvent::Navigate { to } => self.enter(to, now)?,
            SessionEvent::Accept if self.scene.kind() == SceneKind::Question => {
                let spec = FadeSpec::from(&self.config.playback.fade);
                self.playback.fade_in(now, spec);
                self.enter(SceneKind::Story, now)?;
            }
            SessionEvent::VideoPlay { video } if in_story && self.assets.video(video).is_some() => {
                self.playback.on_foreground_video_play(video);
            }
            SessionEvent::VideoPause { video } if in_story => {
                self.playback.on_foreground_video_pause(video);
            }
            SessionEvent::VideoEnded { video } if in_story => {
                self.playback.on_foreground_video_ended(video);
            }
            other => self.apply_to_screen(other, now),
        }

        Ok(())
    }

    /// Runs a script and returns the snapshot taken after each step.
    pub fn replay(&mut self, steps: &[TimedEvent]) -> Result<Vec<RenderSnapshot>> {
        let mut snapshots = Vec::with_capacity(steps.len());
        for step in steps {
            self.dispatch(Duration::from_millis(step.at_ms), step.event.clone())?;
            snapshots.push(self.snapshot());
        }
        Ok(snapshots)
    }

    fn apply_to_screen(&mut self, event: SessionEvent, now: Duration) {
        match (&mut self.scene, event) {
            (SceneState::Question(game), SessionEvent::Decline) => {
                game.decline();
            }
            (SceneState::Story(story), SessionEvent::ThumbnailClick { index }) => {
                story.gallery.select(index, now);
            }
            (SceneState::Story(story), SessionEvent::TouchStart { x, surface }) => {
                story.gallery.touch_start(x, surface);
            }
            (SceneState::Story(story), SessionEvent::TouchEnd { x }) => {
                story.gallery.touch_end(x, now);
            }
            (SceneState::Story(story), SessionEvent::PreviewOpen { index }) => {
                story.gallery.open_preview(index);
            }
            (SceneState::Story(story), SessionEvent::PreviewClose) => {
                story.gallery.close_preview(now);
            }
            (scene, event) => {
                tracing::debug!(scene = ?scene.kind(), ?event, "event ignored on this screen");
            }
        }
    }

    fn enter(&mut self, kind: SceneKind, now: Duration) -> Result<()> {
        let current = self.scene.kind();
        if current == kind {
            return Ok(());
        }

        if current == SceneKind::Story {
            self.playback.release_foreground_videos();
        }
        self.scene = SceneState::mount(kind, &self.config, &self.assets, now)?;
        tracing::info!(from = ?current, to = ?kind, "screen changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{carousel::CarouselMode, media::AutoplayPolicy};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn session(policy: AutoplayPolicy) -> Session<SimulatedMedia> {
        let mut config = AppConfig::default();
        config.playback.autoplay = policy;
        config.question.seed = Some(5);
        Session::simulated(config).unwrap()
    }

    fn story_session() -> Session<SimulatedMedia> {
        let mut session = session(AutoplayPolicy::RequireGesture);
        session.dispatch(Duration::ZERO, SessionEvent::Accept).unwrap();
        session
    }

    fn gallery(session: &Session<SimulatedMedia>) -> (usize, CarouselMode) {
        match session.scene() {
            SceneState::Story(story) => (story.gallery.active_index(), story.gallery.mode()),
            other => panic!("expected the story screen, got {:?}", other.kind()),
        }
    }

    #[test]
    fn starts_on_the_question_in_silence() {
        let session = session(AutoplayPolicy::RequireGesture);
        assert_eq!(session.scene().kind(), SceneKind::Question);
        assert!(!session.playback().is_playing());
        assert_eq!(session.now(), Duration::ZERO);
    }

    #[test]
    fn accepting_fades_music_in_and_opens_the_story() {
        let mut session = story_session();

        assert_eq!(session.scene().kind(), SceneKind::Story);
        assert!(session.playback().is_playing());
        assert_eq!(session.playback().volume(), 0.0);

        session.advance_to(ms(1_000));
        assert!((session.playback().volume() - 0.25).abs() < 1e-4);

        session.advance_to(ms(10_000));
        assert!((session.playback().volume() - 0.6).abs() < 1e-6);
        assert!(!session.playback().is_fading());
    }

    #[test]
    fn accepting_under_a_strict_policy_keeps_silence() {
        let mut session = session(AutoplayPolicy::Deny);
        session.dispatch(Duration::ZERO, SessionEvent::Accept).unwrap();

        assert_eq!(session.scene().kind(), SceneKind::Story);
        assert!(!session.playback().is_playing());

        session.dispatch(ms(100), SessionEvent::ToggleMusic).unwrap();
        assert!(!session.playback().is_playing());
    }

    #[test]
    fn declining_moves_the_button() {
        let mut session = session(AutoplayPolicy::Allow);
        session.dispatch(ms(10), SessionEvent::Decline).unwrap();
        session.dispatch(ms(20), SessionEvent::Decline).unwrap();

        let SceneState::Question(game) = session.scene() else {
            panic!("question screen should still be mounted");
        };
        assert_eq!(game.decline_count(), 2);
        assert!(game.tease().is_some());
    }

    #[test]
    fn thumbnail_scenario_on_ten_photos() {
        let mut session = story_session();

        session
            .dispatch(Duration::ZERO, SessionEvent::ThumbnailClick { index: 3 })
            .unwrap();
        assert_eq!(gallery(&session), (3, CarouselMode::Paused));

        session.advance_to(ms(5_000));
        assert_eq!(gallery(&session), (3, CarouselMode::AutoAdvancing));

        session.advance_to(ms(10_000));
        assert_eq!(gallery(&session), (4, CarouselMode::AutoAdvancing));
    }

    #[test]
    fn preview_and_swipes_flow_through() {
        let mut session = story_session();

        session
            .dispatch(ms(100), SessionEvent::PreviewOpen { index: 0 })
            .unwrap();
        session
            .dispatch(
                ms(200),
                SessionEvent::TouchStart {
                    x: 50.0,
                    surface: SwipeSurface::Preview,
                },
            )
            .unwrap();
        session
            .dispatch(ms(300), SessionEvent::TouchEnd { x: 150.0 })
            .unwrap();

        let snapshot = session.snapshot();
        let view = snapshot.gallery.expect("story shows the gallery");
        assert_eq!(view.preview_index, Some(9));
        assert_eq!(view.mode, CarouselMode::PreviewOpen);

        session.advance_to(ms(60_000));
        assert_eq!(gallery(&session).0, 0);

        session
            .dispatch(ms(60_000), SessionEvent::PreviewClose)
            .unwrap();
        session.advance_to(ms(65_000));
        assert_eq!(gallery(&session), (1, CarouselMode::AutoAdvancing));
    }

    #[test]
    fn video_pauses_and_restores_music() {
        let mut session = story_session();
        session.advance_to(ms(5_000));

        session
            .dispatch(ms(6_000), SessionEvent::VideoPlay { video: VideoId(0) })
            .unwrap();
        assert!(!session.playback().is_audible());
        assert!(session.playback().is_playing());

        session
            .dispatch(ms(9_000), SessionEvent::VideoEnded { video: VideoId(0) })
            .unwrap();
        assert!(session.playback().is_audible());
    }

    #[test]
    fn unknown_videos_are_ignored() {
        let mut session = story_session();
        session
            .dispatch(ms(10), SessionEvent::VideoPlay { video: VideoId(4) })
            .unwrap();
        assert!(!session.playback().is_suppressed());
    }

    #[test]
    fn leaving_the_story_releases_videos() {
        let mut session = story_session();
        session
            .dispatch(ms(10), SessionEvent::VideoPlay { video: VideoId(0) })
            .unwrap();

        session
            .dispatch(
                ms(20),
                SessionEvent::Navigate {
                    to: SceneKind::Forever,
                },
            )
            .unwrap();
        assert!(!session.playback().is_suppressed());
        assert!(session.playback().is_audible());
    }

    #[test]
    fn closing_message_is_revealed_later() {
        let mut session = story_session();
        session
            .dispatch(
                ms(1_000),
                SessionEvent::Navigate {
                    to: SceneKind::Forever,
                },
            )
            .unwrap();

        session.advance_to(ms(3_499));
        let closing = session.snapshot().closing.unwrap();
        assert!(!closing.message_visible);

        session.advance_to(ms(3_500));
        assert!(session.snapshot().closing.unwrap().message_visible);
    }

    #[test]
    fn remounted_gallery_starts_fresh() {
        let mut session = story_session();
        session.advance_to(ms(12_000));
        assert_eq!(gallery(&session).0, 2);

        session
            .dispatch(
                ms(12_000),
                SessionEvent::Navigate {
                    to: SceneKind::Forever,
                },
            )
            .unwrap();
        session
            .dispatch(
                ms(13_000),
                SessionEvent::Navigate {
                    to: SceneKind::Story,
                },
            )
            .unwrap();

        session.advance_to(ms(17_999));
        assert_eq!(gallery(&session).0, 0);
        session.advance_to(ms(18_000));
        assert_eq!(gallery(&session).0, 1);
    }

    #[test]
    fn events_for_other_screens_are_ignored() {
        let mut session = session(AutoplayPolicy::Allow);
        session
            .dispatch(ms(5), SessionEvent::ThumbnailClick { index: 2 })
            .unwrap();
        session.dispatch(ms(6), SessionEvent::PreviewClose).unwrap();

        assert_eq!(session.scene().kind(), SceneKind::Question);
        assert!(session.snapshot().gallery.is_none());
    }

    #[test]
    fn music_button_works_on_every_screen() {
        let mut session = session(AutoplayPolicy::RequireGesture);
        session.dispatch(ms(1), SessionEvent::ToggleMusic).unwrap();
        assert!(session.playback().is_playing());
        assert!((session.playback().volume() - 0.9).abs() < f32::EPSILON);

        session.dispatch(ms(2), SessionEvent::ToggleMusic).unwrap();
        assert!(!session.playback().is_playing());
    }

    #[test]
    fn replays_a_json_script() {
        let script = r#"[
            { "at_ms": 0, "event": "accept" },
            { "at_ms": 0, "event": "thumbnail_click", "index": 3 },
            { "at_ms": 10000, "event": "toggle_music" },
            { "at_ms": 11000, "event": "touch_start", "x": 300.0, "surface": "gallery" },
            { "at_ms": 11100, "event": "touch_end", "x": 100.0 }
        ]"#;
        let steps: Vec<TimedEvent> = serde_json::from_str(script).unwrap();
        assert_eq!(steps[1].event, SessionEvent::ThumbnailClick { index: 3 });

        let mut session = session(AutoplayPolicy::RequireGesture);
        let snapshots = session.replay(&steps).unwrap();

        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots[0].scene, SceneKind::Story);
        assert!(snapshots[0].music.is_playing);
        assert_eq!(snapshots[1].gallery.as_ref().unwrap().active_index, 3);
        assert_eq!(snapshots[2].gallery.as_ref().unwrap().active_index, 4);
        assert!(!snapshots[2].music.is_playing);
        assert_eq!(snapshots[4].gallery.as_ref().unwrap().active_index, 5);
        assert_eq!(snapshots[4].at_ms, 11_100);
    }
}
