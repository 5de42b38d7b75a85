//! Plain geometry values threaded through layout steps

/// Vertical drawing position
///
/// Each drawing step takes the cursor it starts from and returns the
/// cursor the next step starts from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    y: f64,
}

impl Cursor {
    pub fn new(y: f64) -> Self {
        Self { y }
    }

    pub fn y(self) -> f64 {
        self.y
    }

    /// Cursor moved down by `dy`
    pub fn advance(self, dy: f64) -> Self {
        Self { y: self.y + dy }
    }

    /// The lower of two cursors
    pub fn max(self, other: Cursor) -> Self {
        Self {
            y: self.y.max(other.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned box with its origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
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

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same box with a different height
    pub fn with_height(self, height: f64) -> Self {
        Self { height, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_advance() {
        let cursor = Cursor::new(45.0).advance(12.5);
        assert_eq!(cursor.y(), 57.5);
        assert_eq!(cursor.max(Cursor::new(60.0)).y(), 60.0);
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(15.0, 45.0, 85.0, 27.0);
        assert_eq!(rect.right(), 100.0);
        assert_eq!(rect.bottom(), 72.0);
        assert_eq!(rect.with_height(30.0).bottom(), 75.0);
        assert_eq!(rect.origin().offset(3.0, 10.0), Point::new(18.0, 55.0));
    }
}
