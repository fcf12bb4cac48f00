//! Axis-aligned rectangle geometry
//!
//! Screen space: x grows right, y grows down. A rect covers
//! `[x, x + width) × [y, y + height)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect of the given size with its center at `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Zero width or height
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open point test
    pub fn contains_pt(&self, p: Vec2) -> bool {
        self.x <= p.x && p.x < self.right() && self.y <= p.y && p.y < self.bottom()
    }

    /// Every point of `other` lies within `self` (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Open interiors intersect on both axes; touching edges do not count
    pub fn overlaps_rect(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow by `dx`/`dy` on every side (shrink if negative)
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + dx * 2.0,
            self.height + dy * 2.0,
        )
    }

    /// Translate by (`dx`, `dy`)
    pub fn moved(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Translate by a vector
    pub fn translate(&self, v: Vec2) -> Self {
        self.moved(v.x, v.y)
    }

    /// Change the size keeping one edge or the center fixed per axis.
    ///
    /// `ax`/`ay`: negative anchors left/top, zero anchors the center,
    /// positive anchors right/bottom.
    pub fn resize(&self, width: f32, height: f32, ax: i32, ay: i32) -> Self {
        let x = match ax.signum() {
            -1 => self.x,
            0 => self.x + (self.width - width) / 2.0,
            _ => self.right() - width,
        };
        let y = match ay.signum() {
            -1 => self.y,
            0 => self.y + (self.height - height) / 2.0,
            _ => self.bottom() - height,
        };
        Self::new(x, y, width, height)
    }

    /// Same rect with width and height exchanged about the center
    pub fn swapped(&self) -> Self {
        Self::centered(self.center(), Vec2::new(self.height, self.width))
    }

    /// Smallest rect covering both
    pub fn union(&self, other: &Rect) -> Self {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Bounding box of this rect rotated by `theta` radians about its center
    pub fn aabb_rotated(&self, theta: f32) -> Self {
        if theta == 0.0 {
            return *self;
        }
        let (sin, cos) = theta.sin_cos();
        let w = (self.width * cos).abs() + (self.height * sin).abs();
        let h = (self.width * sin).abs() + (self.height * cos).abs();
        Self::centered(self.center(), Vec2::new(w, h))
    }

    /// Translation that keeps `self` inside `fence` while staying as close to
    /// `v` as possible on each axis. `None` if `self` cannot fit in `fence`.
    pub fn clamp_move(&self, v: Vec2, fence: &Rect) -> Option<Vec2> {
        if self.width > fence.width || self.height > fence.height {
            return None;
        }
        let x = v.x.clamp(fence.x - self.x, fence.right() - self.right());
        let y = v.y.clamp(fence.y - self.y, fence.bottom() - self.bottom());
        Some(Vec2::new(x, y))
    }
}
