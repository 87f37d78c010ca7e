// src/geometry.rs
//! Screen-space primitives. Origin is the top-left pixel, y grows downwards.

use serde::{Deserialize, Serialize};

/// A pixel position. Signed so widgets may overdraw past the top/left edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Every pixel position covered by the rectangle, row by row.
    pub fn points(self) -> impl Iterator<Item = Point> {
        let Rect { origin, size } = self;
        (0..size.height as i32)
            .flat_map(move |y| (0..size.width as i32).map(move |x| origin.offset(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_points_cover_area_row_major() {
        let rect = Rect::new(Point::new(2, 3), Size::new(2, 2));
        let points: Vec<_> = rect.points().collect();
        assert_eq!(
            points,
            vec![
                Point::new(2, 3),
                Point::new(3, 3),
                Point::new(2, 4),
                Point::new(3, 4)
            ]
        );
    }

    #[test]
    fn empty_rect_has_no_points() {
        assert_eq!(Rect::new(Point::new(0, 0), Size::new(0, 5)).points().count(), 0);
    }
}
