use serde::{Deserialize, Serialize};

use crate::{GreetingError, Result};

/// Playable element provided by the render layer (an `<audio>` tag, a native
/// sink, or [`SimulatedMedia`]).
pub trait MediaElement {
    /// Starts playback. The environment may refuse, in which case
    /// [`GreetingError::MediaStartRejected`] is returned and the element stays
    /// paused.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    /// Tells the element a user gesture happened. Environments with an
    /// autoplay policy use this to unlock playback.
    fn register_user_gesture(&mut self) {}
}

/// Identifies a foreground video by its position in the asset catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub usize);

/// The single background audio handle of a session.
#[derive(Debug)]
pub struct MediaHandle<M> {
    element: M,
}

impl<M: MediaElement> MediaHandle<M> {
    pub fn new(element: M) -> Self {
        Self { element }
    }

    pub fn is_playing(&self) -> bool {
        !self.element.is_paused()
    }

    pub fn volume(&self) -> f32 {
        self.element.volume()
    }

    /// Borrowed view for render code that attaches visual controls.
    pub fn element(&self) -> &M {
        &self.element
    }

    pub(crate) fn element_mut(&mut self) -> &mut M {
        &mut self.element
    }

    pub(crate) fn play(&mut self) -> Result<()> {
        self.element.play()
    }

    pub(crate) fn pause(&mut self) {
        if self.is_playing() {
            self.element.pause();
        }
    }

    pub(crate) fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.element.set_volume(volume);
    }

    pub(crate) fn register_user_gesture(&mut self) {
        self.element.register_user_gesture();
    }
}

/// How a [`SimulatedMedia`] answers `play()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoplayPolicy {
    /// Every start succeeds.
    Allow,
    /// Starts succeed once any user gesture has been registered. Activation
    /// is sticky for the rest of the session, like browser user activation.
    RequireGesture,
    /// Every start is refused.
    Deny,
}

/// In-memory media element that follows an [`AutoplayPolicy`].
#[derive(Debug, Clone)]
pub struct SimulatedMedia {
    source: String,
    policy: AutoplayPolicy,
    activated: bool,
    paused: bool,
    volume: f32,
    starts: usize,
    rejections: usize,
}

impl SimulatedMedia {
    pub fn new(source: impl Into<String>, policy: AutoplayPolicy) -> Self {
        Self {
            source: source.into(),
            policy,
            activated: false,
            paused: true,
            volume: 1.0,
            starts: 0,
            rejections: 0,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn policy(&self) -> AutoplayPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: AutoplayPolicy) {
        self.policy = policy;
    }

    /// Number of successful `play()` calls.
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Number of refused `play()` calls.
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    fn allows_start(&self) -> bool {
        match self.policy {
            AutoplayPolicy::Allow => true,
            AutoplayPolicy::RequireGesture => self.activated,
            AutoplayPolicy::Deny => false,
        }
    }
}

impl MediaElement for SimulatedMedia {
    fn play(&mut self) -> Result<()> {
        if !self.allows_start() {
            self.rejections += 1;
            return Err(GreetingError::rejected(format!(
                "playback of `{}` requires a user gesture",
                self.source
            )));
        }

        self.paused = false;
        self.starts += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn register_user_gesture(&mut self) {
        self.activated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_unlocks_playback() {
        let mut media = SimulatedMedia::new("song.mp3", AutoplayPolicy::RequireGesture);

        let err = media.play().unwrap_err();
        assert!(matches!(err, GreetingError::MediaStartRejected { .. }));
        assert!(media.is_paused());

        media.register_user_gesture();
        media.play().unwrap();
        assert!(!media.is_paused());
        assert_eq!(media.starts(), 1);
        assert_eq!(media.rejections(), 1);
    }

    #[test]
    fn deny_ignores_gestures() {
        let mut media = SimulatedMedia::new("song.mp3", AutoplayPolicy::Deny);
        media.register_user_gesture();
        assert!(media.play().is_err());
    }

    #[test]
    fn handle_clamps_volume() {
        let mut handle = MediaHandle::new(SimulatedMedia::new("song.mp3", AutoplayPolicy::Allow));

        handle.set_volume(1.7);
        assert_eq!(handle.volume(), 1.0);
        handle.set_volume(-0.2);
        assert_eq!(handle.volume(), 0.0);
        handle.set_volume(f32::NAN);
        assert_eq!(handle.volume(), 0.0);
    }

    #[test]
    fn handle_reports_playing_state() {
        let mut handle = MediaHandle::new(SimulatedMedia::new("song.mp3", AutoplayPolicy::Allow));
        assert!(!handle.is_playing());

        handle.play().unwrap();
        assert!(handle.is_playing());

        handle.pause();
        assert!(!handle.is_playing());
        assert_eq!(handle.element().source(), "song.mp3");
    }
}
