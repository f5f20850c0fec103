//! Grid geometry, colours and facing math.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A position on the world grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a delta, saturating at the integer limits.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Placement and footprint of a world object. Defaults to 1x1 at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self { x: 0, y: 0, w: 1, h: 1 }
    }
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn position(self) -> Point {
        Point { x: self.x, y: self.y }
    }

    #[must_use]
    pub const fn with_position(self, position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self
        }
    }

    #[must_use]
    pub const fn with_size(self, w: i32, h: i32) -> Self {
        Self { w, h, ..self }
    }

    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// True if `point` falls inside the footprint (right and bottom edges excluded).
    pub const fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }

    /// Smallest rectangle enclosing both. Extents wider than `i32::MAX` saturate.
    #[must_use]
    pub fn union(self, other: Rectangle) -> Rectangle {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rectangle::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Parse the "x y w h" form written by `Display`.
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<i32> = text
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [x, y, w, h] => Some(Self::new(*x, *y, *w, *h)),
            _ => None,
        }
    }
}

impl Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.w, self.h)
    }
}

/// An RGBA colour. Written as "AARRGGBB" hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Fully transparent black, the "casts no light" colour.
    pub const TRANSPARENT: Colour = Colour::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    pub fn parse(text: &str) -> Option<Self> {
        let raw = text.trim().trim_start_matches('#');
        if raw.len() != 8 {
            return None;
        }
        let argb = u32::from_str_radix(raw, 16).ok()?;
        let [a, r, g, b] = argb.to_be_bytes();
        Some(Self { r, g, b, a })
    }
}

impl Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }
}

/// Floating point widths that can be snapped to the world's right angles.
pub trait WorldAngle: Copy {
    fn snap_to_world(self) -> Self;
}

impl WorldAngle for f64 {
    fn snap_to_world(self) -> Self {
        (self / 90.0).round() * 90.0
    }
}

impl WorldAngle for f32 {
    fn snap_to_world(self) -> Self {
        (self / 90.0).round() * 90.0
    }
}

/// Snap an angle in degrees to the nearest multiple of 90.
pub fn snap_angle_to_world<A: WorldAngle>(degrees: A) -> A {
    degrees.snap_to_world()
}
