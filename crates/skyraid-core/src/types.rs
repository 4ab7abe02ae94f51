//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

use crate::constants::{BOUNDS_HEIGHT_SHRINK, BOUNDS_WIDTH_SHRINK, TICK_MILLIS};

/// Stable identifier assigned to every entity by its level.
///
/// Renderers diff consecutive snapshots by id to add and remove sprites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// 2D position in screen space (pixels). Origin is the top-left corner of the
/// playfield; `y` grows downward. Entity positions are the top-left corner of
/// their sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Visual footprint of a sprite (pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Playfield dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f64,
    pub height: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each running tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: u64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Full visual rectangle of a sprite at `pos`.
    pub fn from_sprite(pos: Position, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.width, size.height)
    }

    /// Collision rectangle: the visual rectangle shrunk to 80% width and 40%
    /// height, kept centred.
    pub fn shrunk(pos: Position, size: Size) -> Self {
        let width = size.width * BOUNDS_WIDTH_SHRINK;
        let height = size.height * BOUNDS_HEIGHT_SHRINK;
        Self {
            x: pos.x + (size.width - width) / 2.0,
            y: pos.y + (size.height - height) / 2.0,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Closed-interval overlap test: touching edges intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.max_x()
            && other.x <= self.max_x()
            && self.y <= other.max_y()
            && other.y <= self.max_y()
    }

    /// Whether any part of the rectangle lies inside the screen.
    pub fn overlaps_screen(&self, screen: &Screen) -> bool {
        self.max_x() > 0.0 && self.x < screen.width && self.max_y() > 0.0 && self.y < screen.height
    }
}

impl Screen {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: crate::constants::SCREEN_WIDTH,
            height: crate::constants::SCREEN_HEIGHT,
        }
    }
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += TICK_MILLIS;
    }
}
