use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    assets::AssetCatalog,
    carousel::CarouselController,
    config::AppConfig,
    question::QuestionGame,
    timeline::{TimerId, TimerSet},
    Result,
};

/// The screens of the site, in the order a visitor meets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// The yes/no question.
    Question,
    /// Photo gallery and video section.
    Story,
    /// Closing message.
    Forever,
}

/// The photo gallery and video section.
#[derive(Debug)]
pub struct StoryScene {
    pub gallery: CarouselController,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClosingTimer {
    Reveal,
}

/// The closing screen. Its message appears after a short delay.
#[derive(Debug)]
pub struct ClosingScene {
    revealed: bool,
    timers: TimerSet<ClosingTimer>,
    reveal_timer: Option<TimerId>,
}

impl ClosingScene {
    pub fn mount(reveal_delay: Duration, now: Duration) -> Self {
        let mut timers = TimerSet::new();
        let reveal_timer = timers.schedule_once(ClosingTimer::Reveal, now, reveal_delay);
        Self {
            revealed: false,
            timers,
            reveal_timer: Some(reveal_timer),
        }
    }

    pub fn is_message_visible(&self) -> bool {
        self.revealed
    }

    pub fn advance_to(&mut self, now: Duration) {
        while let Some(expired) = self.timers.pop_due(now) {
            match expired.kind {
                ClosingTimer::Reveal if self.reveal_timer == Some(expired.id) => {
                    self.reveal_timer = None;
                    self.revealed = true;
                }
                ClosingTimer::Reveal => {}
            }
        }
    }
}

/// The mounted screen together with the component that drives it. Replacing
/// the scene drops the old component and every timer it owned.
#[derive(Debug)]
pub enum SceneState {
    Question(QuestionGame),
    Story(StoryScene),
    Forever(ClosingScene),
}

impl SceneState {
    pub fn mount(
        kind: SceneKind,
        config: &AppConfig,
        assets: &AssetCatalog,
        now: Duration,
    ) -> Result<Self> {
        Ok(match kind {
            SceneKind::Question => Self::Question(QuestionGame::new(&config.question)),
            SceneKind::Story => Self::Story(StoryScene {
                gallery: CarouselController::mount(
                    assets.photos().to_vec(),
                    &config.gallery,
                    now,
                )?,
            }),
            SceneKind::Forever => {
                Self::Forever(ClosingScene::mount(config.closing.reveal_delay(), now))
            }
        })
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Question(_) => SceneKind::Question,
            Self::Story(_) => SceneKind::Story,
            Self::Forever(_) => SceneKind::Forever,
        }
    }

    pub fn advance_to(&mut self, now: Duration) {
        match self {
            Self::Question(_) => {}
            Self::Story(story) => story.gallery.advance_to(now),
            Self::Forever(closing) => closing.advance_to(now),
        }
    }
}
