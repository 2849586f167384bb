//! Horizontal swipe recognition for chapter navigation

use crate::types::Direction;

/// Minimum horizontal travel for a touch to count as a swipe
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// Tracks one touch from start to end.
///
/// A swipe to the left (finger moves toward smaller x) goes to the next
/// chapter, a swipe to the right goes back.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwipeTracker {
    start_x: Option<f64>,
    end_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f64) {
        self.start_x = Some(x);
        self.end_x = None;
    }

    pub fn touch_move(&mut self, x: f64) {
        if self.start_x.is_some() {
            self.end_x = Some(x);
        }
    }

    /// Finish the touch and classify it. A tap (no movement) yields `None`.
    pub fn touch_end(&mut self) -> Option<Direction> {
        let start = self.start_x.take()?;
        let end = self.end_x.take()?;
        classify_swipe(start - end)
    }
}

/// Classify a horizontal travel distance (`start - end`)
pub fn classify_swipe(distance: f64) -> Option<Direction> {
    if distance > MIN_SWIPE_DISTANCE {
        Some(Direction::Next)
    } else if distance < -MIN_SWIPE_DISTANCE {
        Some(Direction::Previous)
    } else {
        None
    }
}
