//! Axis-aligned rectangle geometry for sprites
//!
//! Screen space: origin at the top-left corner, y grows downward.
//! Overlap is strict, so rectangles that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which horizontal screen edge a rectangle was clamped against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of `size` whose top-left corner sits at `pos`
    pub fn from_top_left(pos: Vec2, size: (f32, f32)) -> Self {
        Self::new(pos.x, pos.y, size.0, size.1)
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: (f32, f32)) -> Self {
        Self::new(center.x - size.0 / 2.0, center.y - size.1 / 2.0, size.0, size.1)
    }

    /// Rectangle of `size` whose bottom edge midpoint sits at `anchor`
    pub fn from_mid_bottom(anchor: Vec2, size: (f32, f32)) -> Self {
        Self::new(anchor.x - size.0 / 2.0, anchor.y - size.1, size.0, size.1)
    }

    /// Rectangle of `size` whose top edge midpoint sits at `anchor`
    pub fn from_mid_top(anchor: Vec2, size: (f32, f32)) -> Self {
        Self::new(anchor.x - size.0 / 2.0, anchor.y, size.0, size.1)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.y + self.h / 2.0)
    }

    /// Midpoint of the top edge (cannon muzzle)
    pub fn mid_top(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.top())
    }

    /// Midpoint of the bottom edge (alien gun)
    pub fn mid_bottom(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.bottom())
    }

    pub fn set_center_x(&mut self, cx: f32) {
        self.x = cx - self.w / 2.0;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Keep the rectangle inside `[0, width]` horizontally.
    ///
    /// Returns the edge that was touched, if any. Touching counts, so a
    /// rectangle resting exactly on an edge reports that edge.
    pub fn clamp_x(&mut self, width: f32) -> Option<Edge> {
        if self.left() <= 0.0 {
            self.x = 0.0;
            Some(Edge::Left)
        } else if self.right() >= width {
            self.x = width - self.w;
            Some(Edge::Right)
        } else {
            None
        }
    }
}
