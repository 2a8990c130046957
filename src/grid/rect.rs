use serde::Serialize;

/// An axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Grow by `amount` on every side without leaving `0..width` x `0..height`.
    pub fn expand_clamped(&self, amount: u32, width: u32, height: u32) -> Rect {
        let x = self.x.saturating_sub(amount);
        let y = self.y.saturating_sub(amount);
        let right = self.right().saturating_add(amount).min(width);
        let bottom = self.bottom().saturating_add(amount).min(height);
        Rect::new(x, y, right - x, bottom - y)
    }
}
