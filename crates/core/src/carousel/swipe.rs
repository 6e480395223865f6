use serde::{Deserialize, Serialize};

/// Which part of the gallery a touch started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeSurface {
    /// The inline photo strip.
    Gallery,
    /// The full-screen preview overlay.
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Forward,
    Backward,
}

/// A touch in progress. Consumed when the touch ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeGesture {
    start_x: f32,
    surface: SwipeSurface,
}

impl SwipeGesture {
    pub fn begin(start_x: f32, surface: SwipeSurface) -> Self {
        Self { start_x, surface }
    }

    pub fn surface(&self) -> SwipeSurface {
        self.surface
    }

    /// Resolves the gesture. `delta = start - end`, so dragging the finger
    /// to the left moves forward. Movements shorter than `threshold` are
    /// noise.
    pub fn finish(self, end_x: f32, threshold: f32) -> Option<SwipeDirection> {
        let delta = self.start_x - end_x;
        if !delta.is_finite() || delta.abs() < threshold.max(0.0) || delta == 0.0 {
            return None;
        }

        if delta > 0.0 {
            Some(SwipeDirection::Forward)
        } else {
            Some(SwipeDirection::Backward)
        }
    }
}

/// Moves `index` one step in `direction`, wrapping at both ends of `len`.
pub fn step_index(index: usize, len: usize, direction: SwipeDirection) -> usize {
    debug_assert!(len > 0);
    match direction {
        SwipeDirection::Forward => (index + 1) % len,
        SwipeDirection::Backward => (index + len - 1) % len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_moves_are_noise() {
        let gesture = SwipeGesture::begin(200.0, SwipeSurface::Gallery);
        assert_eq!(gesture.finish(170.0, 50.0), None);
        assert_eq!(gesture.finish(249.0, 50.0), None);
        assert_eq!(gesture.finish(200.0, 0.0), None);
    }

    #[test]
    fn direction_follows_delta_sign() {
        let gesture = SwipeGesture::begin(200.0, SwipeSurface::Preview);
        assert_eq!(gesture.finish(150.0, 50.0), Some(SwipeDirection::Forward));
        assert_eq!(gesture.finish(260.0, 50.0), Some(SwipeDirection::Backward));
    }

    #[test]
    fn non_finite_positions_are_ignored() {
        let gesture = SwipeGesture::begin(f32::NAN, SwipeSurface::Gallery);
        assert_eq!(gesture.finish(10.0, 50.0), None);
    }

    #[test]
    fn stepping_wraps_both_ends() {
        assert_eq!(step_index(4, 5, SwipeDirection::Forward), 0);
        assert_eq!(step_index(0, 5, SwipeDirection::Backward), 4);
        assert_eq!(step_index(2, 5, SwipeDirection::Backward), 1);
        assert_eq!(step_index(0, 1, SwipeDirection::Forward), 0);
    }
}
