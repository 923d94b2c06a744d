//! Backend-neutral drawing primitives produced by the gauge.
//!
//! Coordinates are display points with the origin at the top-left corner
//! and y growing downwards.

use std::ops::Add;

use crate::smoothing::polar_to_cartesian;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` in the screen direction `angle_degrees`
    /// (0 = +x, 90 = down)
    pub fn offset_polar(self, radius: f32, angle_degrees: f32) -> Self {
        let (dx, dy) = polar_to_cartesian(radius, angle_degrees);
        self + Point::new(dx, dy)
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// RGBA color with components in 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const DARK_GRAY: Color = Color::rgb(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn white(level: f32) -> Self {
        let level = level.clamp(0.0, 1.0);
        Self::rgb(level, level, level)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// 8-bit RGBA, unmultiplied
    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSize {
    Large,
    Small,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled circle
    Disc {
        center: Point,
        radius: f32,
        color: Color,
    },
    /// Text centred on `position`
    Label {
        text: String,
        position: Point,
        color: Color,
        size: LabelSize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_offset_polar_north_is_up() {
        let p = Point::new(100.0, 100.0).offset_polar(50.0, -90.0);
        assert_abs_diff_eq!(p.x, 100.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_to_rgba8() {
        assert_eq!(Color::RED.to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color::rgba(0.3, 0.3, 0.3, 0.5).to_rgba8(), [77, 77, 77, 128]);
    }
}
