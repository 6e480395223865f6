//! Core library for the greeting site.
//!
//! The interesting state lives in two components: the [`PlaybackCoordinator`],
//! which owns the background audio shared by every screen, and the
//! [`CarouselController`], which cycles the photo gallery. Both run on a
//! virtual clock (see [`timeline`]) so the render layer only forwards events
//! and reads [`RenderSnapshot`]s back.

pub mod assets;
pub mod carousel;
pub mod config;
pub mod error;
pub mod media;
pub mod playback;
pub mod question;
pub mod render;
pub mod scene;
pub mod session;
pub mod timeline;

pub use assets::{AssetCatalog, MediaKind, MediaRef};
pub use carousel::{CarouselController, CarouselMode, SwipeDirection, SwipeGesture, SwipeSurface};
pub use config::{
    AppConfig, AssetConfig, ClosingConfig, FadeConfig, GalleryConfig, PlaybackConfig,
    QuestionConfig,
};
pub use error::{GreetingError, Result};
pub use media::{AutoplayPolicy, MediaElement, MediaHandle, SimulatedMedia, VideoId};
pub use playback::{FadeSpec, PlaybackCoordinator, Suppression};
pub use question::{DodgeMove, QuestionGame};
pub use render::RenderSnapshot;
pub use scene::{ClosingScene, SceneKind, SceneState, StoryScene};
pub use session::{Session, SessionEvent, TimedEvent};
pub use timeline::{Expired, SessionClock, TimerId, TimerSet};
