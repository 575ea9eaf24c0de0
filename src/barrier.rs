/// Destructible barriers.
///
/// A barrier is a rectangle of unit cells, each either intact or destroyed.
/// Damage only ever clears cells, so a barrier erodes monotonically over a run.

use crate::entities::{Projectile, Rect};

#[derive(Clone, Debug, PartialEq)]
pub struct Barrier {
    pub x: f32,
    pub y: f32,
    width: usize,
    height: usize,
    /// Row-major, `width * height` entries; `true` means intact.
    mask: Vec<bool>,
}

impl Barrier {
    pub fn new(x: f32, y: f32, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            mask: vec![true; width * height],
        }
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width as f32, self.height as f32)
    }

    /// `false` for destroyed cells and for coordinates outside the mask.
    pub fn is_intact(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height && self.mask[row * self.width + col]
    }

    pub fn intact_count(&self) -> usize {
        self.mask.iter().filter(|&&cell| cell).count()
    }

    /// A projectile counts as striking the barrier once it sits strictly
    /// inside the horizontal span and below the top edge.
    pub fn struck_by(&self, projectile: &Projectile) -> bool {
        projectile.x > self.x
            && projectile.x < self.x + self.width as f32
            && projectile.y > self.y
    }

    /// Clear the `(2r+1)²` square of cells centred on the world point
    /// `(px, py)`, clipped to the mask on each axis.
    pub fn take_damage(&mut self, px: f32, py: f32, radius: i32) {
        let local_x = (px - self.x).floor() as i64;
        let local_y = (py - self.y).floor() as i64;
        let radius = radius as i64;

        for dy in -radius..=radius {
            let row = local_y + dy;
            if row < 0 || row >= self.height as i64 {
                continue;
            }
            for dx in -radius..=radius {
                let col = local_x + dx;
                if col < 0 || col >= self.width as i64 {
                    continue;
                }
                self.mask[row as usize * self.width + col as usize] = false;
            }
        }
    }

    /// Fraction of the cells covered by `area` (world coordinates) that are
    /// still intact. Zero when `area` misses the barrier entirely.
    pub fn coverage(&self, area: &Rect) -> f32 {
        let col_start = (area.x - self.x).floor().max(0.0) as usize;
        let col_end = ((area.right() - self.x).ceil().max(0.0) as usize).min(self.width);
        let row_start = (area.y - self.y).floor().max(0.0) as usize;
        let row_end = ((area.bottom() - self.y).ceil().max(0.0) as usize).min(self.height);

        let mut total = 0usize;
        let mut intact = 0usize;
        for row in row_start..row_end {
            for col in col_start..col_end {
                total += 1;
                if self.mask[row * self.width + col] {
                    intact += 1;
                }
            }
        }

        if total == 0 {
            0.0
        } else {
            intact as f32 / total as f32
        }
    }
}
