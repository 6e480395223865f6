//! Background audio arbitration.
//!
//! One [`PlaybackCoordinator`] exists per session. It owns the shared audio
//! handle, reconciles the music button with foreground videos and swallows
//! autoplay rejections so the user can simply press the button again.

use std::{collections::BTreeSet, time::Duration};

use crate::{
    config::{FadeConfig, PlaybackConfig},
    media::{MediaElement, MediaHandle, VideoId},
    timeline::{Expired, TimerId, TimerSet},
};

/// Parameters of a volume ramp from silence to `target_volume`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSpec {
    pub target_volume: f32,
    pub step: f32,
    pub step_interval: Duration,
}

impl From<&FadeConfig> for FadeSpec {
    fn from(config: &FadeConfig) -> Self {
        Self {
            target_volume: config.target_volume,
            step: config.step,
            step_interval: config.step_interval(),
        }
    }
}

/// Whether a foreground video currently silences the background audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    Idle,
    /// At least one video is playing. `resume_on_release` records whether
    /// the audio should come back once the last video stops.
    ByVideo { resume_on_release: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackTimer {
    FadeStep,
}

#[derive(Debug, Clone, Copy)]
struct PlaybackFade {
    target: f32,
    step: f32,
    steps: u32,
    timer: TimerId,
}

#[derive(Debug)]
pub struct PlaybackCoordinator<M> {
    handle: MediaHandle<M>,
    manual_volume: f32,
    suppression: Suppression,
    videos: BTreeSet<VideoId>,
    fade: Option<PlaybackFade>,
    timers: TimerSet<PlaybackTimer>,
}

impl<M: MediaElement> PlaybackCoordinator<M> {
    pub fn new(element: M, config: &PlaybackConfig) -> Self {
        Self {
            handle: MediaHandle::new(element),
            manual_volume: config.manual_volume,
            suppression: Suppression::Idle,
            videos: BTreeSet::new(),
            fade: None,
            timers: TimerSet::new(),
        }
    }

    /// State shown on the music button. While a video holds the audio this
    /// reports whether the music will come back afterwards.
    pub fn is_playing(&self) -> bool {
        match self.suppression {
            Suppression::ByVideo { resume_on_release } => resume_on_release,
            Suppression::Idle => self.handle.is_playing(),
        }
    }

    /// Whether the background audio is actually producing sound right now.
    pub fn is_audible(&self) -> bool {
        self.handle.is_playing()
    }

    pub fn volume(&self) -> f32 {
        self.handle.volume()
    }

    pub fn suppression(&self) -> Suppression {
        self.suppression
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self.suppression, Suppression::ByVideo { .. })
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn handle(&self) -> &MediaHandle<M> {
        &self.handle
    }

    pub fn note_user_gesture(&mut self) {
        self.handle.register_user_gesture();
    }

    /// Music button. Returns the new button state.
    pub fn toggle(&mut self) -> bool {
        if let Suppression::ByVideo { resume_on_release } = &mut self.suppression {
            *resume_on_release = !*resume_on_release;
            if *resume_on_release {
                self.handle.set_volume(self.manual_volume);
            }
            tracing::debug!(resume = *resume_on_release, "music toggled while a video plays");
            return *resume_on_release;
        }

        self.stop_fade();
        if self.handle.is_playing() {
            self.handle.pause();
            tracing::info!("background audio paused");
            return false;
        }

        self.handle.set_volume(self.manual_volume);
        self.start()
    }

    /// Starts the audio from silence and ramps it up to the target volume.
    /// Returns `false` when the environment refused to start playback, in
    /// which case no ramp is scheduled.
    pub fn fade_in(&mut self, now: Duration, spec: FadeSpec) -> bool {
        self.stop_fade();
        let target = if spec.target_volume.is_finite() {
            spec.target_volume.clamp(0.0, 1.0)
        } else {
            self.manual_volume
        };

        if let Suppression::ByVideo { resume_on_release } = &mut self.suppression {
            *resume_on_release = true;
            self.handle.set_volume(target);
            return true;
        }

        self.handle.set_volume(0.0);
        if !self.start() {
            return false;
        }

        if !(spec.step.is_finite() && spec.step > 0.0) || target <= 0.0 {
            self.handle.set_volume(target);
            return true;
        }

        let timer = self
            .timers
            .schedule_every(PlaybackTimer::FadeStep, now, spec.step_interval);
        self.fade = Some(PlaybackFade {
            target,
            step: spec.step,
            steps: 0,
            timer,
        });
        tracing::debug!(target_volume = target, step = spec.step, "fade-in started");
        true
    }

    pub fn on_foreground_video_play(&mut self, video: VideoId) {
        self.videos.insert(video);
        if self.is_suppressed() {
            return;
        }

        let was_playing = self.handle.is_playing();
        if let Some(target) = self.stop_fade() {
            self.handle.set_volume(target);
        }
        self.handle.pause();
        self.suppression = Suppression::ByVideo {
            resume_on_release: was_playing,
        };
        tracing::debug!(video = video.0, was_playing, "video took over the audio");
    }

    pub fn on_foreground_video_pause(&mut self, video: VideoId) {
        self.release(video);
    }

    pub fn on_foreground_video_ended(&mut self, video: VideoId) {
        self.release(video);
    }

    /// Forgets every playing video, e.g. when the view holding them unmounts.
    pub fn release_foreground_videos(&mut self) {
        self.videos.clear();
        self.leave_suppression();
    }

    pub fn advance_to(&mut self, now: Duration) {
        while let Some(expired) = self.timers.pop_due(now) {
            self.on_timer(expired);
        }
    }

    fn on_timer(&mut self, expired: Expired<PlaybackTimer>) {
        match expired.kind {
            PlaybackTimer::FadeStep => self.fade_step(expired.id),
        }
    }

    fn fade_step(&mut self, id: TimerId) {
        let Some(fade) = self.fade.as_mut().filter(|fade| fade.timer == id) else {
            self.timers.cancel(id);
            return;
        };

        fade.steps += 1;
        let volume = (fade.step * fade.steps as f32).min(fade.target);
        let reached = volume >= fade.target;
        self.handle.set_volume(volume);

        if reached {
            self.timers.cancel(id);
            self.fade = None;
            tracing::debug!(volume, "fade-in complete");
        }
    }

    fn release(&mut self, video: VideoId) {
        self.videos.remove(&video);
        if self.videos.is_empty() {
            self.leave_suppression();
        }
    }

    fn leave_suppression(&mut self) {
        let previous = std::mem::replace(&mut self.suppression, Suppression::Idle);
        if let Suppression::ByVideo {
            resume_on_release: true,
        } = previous
        {
            self.start();
        }
    }

    fn start(&mut self) -> bool {
        match self.handle.play() {
            Ok(()) => {
                tracing::info!(volume = self.handle.volume(), "background audio playing");
                true
            }
            Err(err) => {
                tracing::debug!(%err, "background audio stayed paused");
                false
            }
        }
    }

    /// Cancels a running ramp and returns its target volume.
    fn stop_fade(&mut self) -> Option<f32> {
        let fade = self.fade.take()?;
        self.timers.cancel(fade.timer);
        Some(fade.target)
    }
}
