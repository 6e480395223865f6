//! Auto-advancing photo gallery with manual override.
//!
//! The controller cycles a fixed, non-empty list on an interval. A thumbnail
//! click or gallery swipe pauses it for a cooldown; an open preview tears the
//! interval down until the preview closes.

mod swipe;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use swipe::{step_index, SwipeDirection, SwipeGesture, SwipeSurface};

use crate::{
    assets::MediaRef,
    config::GalleryConfig,
    timeline::{Expired, TimerId, TimerSet},
    GreetingError, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselMode {
    AutoAdvancing,
    /// Suspended by user interaction; resumes after the cooldown.
    Paused,
    /// Suspended until the preview closes.
    PreviewOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarouselTimer {
    Advance,
    Cooldown,
}

#[derive(Debug)]
pub struct CarouselController {
    items: Vec<MediaRef>,
    advance_interval: Duration,
    resume_cooldown: Duration,
    swipe_threshold: f32,
    active_index: usize,
    preview_index: Option<usize>,
    mode: CarouselMode,
    swipe: Option<SwipeGesture>,
    timers: TimerSet<CarouselTimer>,
    advance_timer: Option<TimerId>,
    cooldown_timer: Option<TimerId>,
}

impl CarouselController {
    /// Builds the controller and starts auto-advancing from the first item.
    pub fn mount(items: Vec<MediaRef>, config: &GalleryConfig, now: Duration) -> Result<Self> {
        if items.is_empty() {
            return Err(GreetingError::InvalidInput(
                "a carousel needs at least one item",
            ));
        }

        let mut carousel = Self {
            items,
            advance_interval: config.advance_interval(),
            resume_cooldown: config.resume_cooldown(),
            swipe_threshold: config.swipe_threshold_px,
            active_index: 0,
            preview_index: None,
            mode: CarouselMode::AutoAdvancing,
            swipe: None,
            timers: TimerSet::new(),
            advance_timer: None,
            cooldown_timer: None,
        };
        carousel.start_auto_advance(now);
        Ok(carousel)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MediaRef] {
        &self.items
    }

    pub fn mode(&self) -> CarouselMode {
        self.mode
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn preview_index(&self) -> Option<usize> {
        self.preview_index
    }

    pub fn active_item(&self) -> &MediaRef {
        &self.items[self.active_index]
    }

    pub fn preview_item(&self) -> Option<&MediaRef> {
        self.preview_index.map(|index| &self.items[index])
    }

    /// Thumbnail click. Ignored for out-of-range indices and while the
    /// preview covers the gallery.
    pub fn select(&mut self, index: usize, now: Duration) -> bool {
        if index >= self.items.len() {
            tracing::debug!(index, len = self.items.len(), "ignoring out-of-range thumbnail");
            return false;
        }
        if self.mode == CarouselMode::PreviewOpen {
            return false;
        }

        self.active_index = index;
        self.pause_for_cooldown(now);
        true
    }

    pub fn open_preview(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            tracing::debug!(index, len = self.items.len(), "ignoring out-of-range preview");
            return false;
        }

        self.stop_auto_advance();
        self.cancel_cooldown();
        self.swipe = None;
        self.preview_index = Some(index);
        self.mode = CarouselMode::PreviewOpen;
        tracing::debug!(index, "preview opened");
        true
    }

    /// Closes the preview and restarts auto-advance with a full interval.
    pub fn close_preview(&mut self, now: Duration) -> bool {
        if self.preview_index.take().is_none() {
            return false;
        }

        self.swipe = None;
        self.start_auto_advance(now);
        tracing::debug!("preview closed");
        true
    }

    pub fn touch_start(&mut self, x: f32, surface: SwipeSurface) {
        let valid = match surface {
            SwipeSurface::Gallery => self.preview_index.is_none(),
            SwipeSurface::Preview => self.preview_index.is_some(),
        };
        self.swipe = valid.then(|| SwipeGesture::begin(x, surface));
    }

    /// Ends the current touch and moves the index the gesture began over.
    pub fn touch_end(&mut self, x: f32, now: Duration) -> Option<SwipeDirection> {
        let gesture = self.swipe.take()?;
        let direction = gesture.finish(x, self.swipe_threshold)?;
        let len = self.items.len();

        match gesture.surface() {
            SwipeSurface::Gallery => {
                self.active_index = step_index(self.active_index, len, direction);
                self.pause_for_cooldown(now);
            }
            SwipeSurface::Preview => {
                let current = self.preview_index?;
                self.preview_index = Some(step_index(current, len, direction));
            }
        }

        Some(direction)
    }

    pub fn advance_to(&mut self, now: Duration) {
        while let Some(expired) = self.timers.pop_due(now) {
            self.on_timer(expired);
        }
    }

    fn on_timer(&mut self, expired: Expired<CarouselTimer>) {
        match expired.kind {
            CarouselTimer::Advance => {
                if self.mode == CarouselMode::AutoAdvancing {
                    self.active_index = (self.active_index + 1) % self.items.len();
                }
            }
            CarouselTimer::Cooldown => {
                self.cooldown_timer = None;
                if self.mode == CarouselMode::Paused {
                    self.start_auto_advance(expired.at);
                }
            }
        }
    }

    fn pause_for_cooldown(&mut self, now: Duration) {
        self.stop_auto_advance();
        self.cancel_cooldown();
        self.mode = CarouselMode::Paused;
        self.cooldown_timer = Some(self.timers.schedule_once(
            CarouselTimer::Cooldown,
            now,
            self.resume_cooldown,
        ));
    }

    fn start_auto_advance(&mut self, now: Duration) {
        self.stop_auto_advance();
        self.mode = CarouselMode::AutoAdvancing;
        self.advance_timer = Some(self.timers.schedule_every(
            CarouselTimer::Advance,
            now,
            self.advance_interval,
        ));
    }

    fn stop_auto_advance(&mut self) {
        if let Some(timer) = self.advance_timer.take() {
            self.timers.cancel(timer);
        }
    }

    fn cancel_cooldown(&mut self) {
        if let Some(timer) = self.cooldown_timer.take() {
            self.timers.cancel(timer);
        }
    }
}
