//! Greedy rectangle packing used to size a customer's basket
//!
//! Items are placed one at a time on an integer grid. Each item first tries
//! to slot into a gap inside the area packed so far (row-major scan, upright
//! before rotated). If nothing fits, the packed area grows by one item on
//! whichever side keeps the bounds most compact.

use glam::Vec2;

use super::geom::Rect;

/// Where an item ended up and whether it had to be turned sideways
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub rotated: bool,
}

/// Packing workspace for one basket
#[derive(Debug, Clone, Default)]
pub struct Board {
    rects: Vec<Rect>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangles placed so far, in insertion order
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Bounding rect of everything placed, or [`Rect::ZERO`] when empty
    pub fn bounds(&self) -> Rect {
        let mut iter = self.rects.iter();
        match iter.next() {
            Some(first) => iter.fold(*first, |acc, r| acc.union(r)),
            None => Rect::ZERO,
        }
    }

    /// Place an item of `size` (grid units) and record it
    pub fn add(&mut self, size: Vec2) -> Placement {
        let placement = self.get_fitting(size);
        self.rects.push(placement.rect);
        placement
    }

    /// Find where `size` would go without recording it
    pub fn get_fitting(&self, size: Vec2) -> Placement {
        let bounds = self.bounds();
        self.find_gap(&bounds, size)
            .unwrap_or_else(|| Self::extend(&bounds, size))
    }

    fn fits(&self, bounds: &Rect, rect: &Rect) -> bool {
        bounds.contains_rect(rect) && !self.rects.iter().any(|r| r.overlaps_rect(rect))
    }

    fn find_gap(&self, bounds: &Rect, size: Vec2) -> Option<Placement> {
        let (x0, x1) = (bounds.x as i32, bounds.right() as i32);
        let (y0, y1) = (bounds.y as i32, bounds.bottom() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (x, y) = (x as f32, y as f32);
                let upright = Rect::new(x, y, size.x, size.y);
                if self.fits(bounds, &upright) {
                    return Some(Placement {
                        rect: upright,
                        rotated: false,
                    });
                }
                let turned = Rect::new(x, y, size.y, size.x);
                if self.fits(bounds, &turned) {
                    return Some(Placement {
                        rect: turned,
                        rotated: true,
                    });
                }
            }
        }
        None
    }

    fn extend(bounds: &Rect, size: Vec2) -> Placement {
        let (bw, bh) = (bounds.width, bounds.height);
        let (w, h) = (size.x, size.y);
        // Resulting bounds for: right, right rotated, below, below rotated
        let candidates = [
            (bw + w, bh.max(h)),
            (bw + h, bh.max(w)),
            (bw.max(w), bh + h),
            (bw.max(h), bh + w),
        ];
        let mut best = 0;
        let mut best_extent = f32::INFINITY;
        for (i, (cw, ch)) in candidates.iter().enumerate() {
            let extent = cw.max(*ch);
            if extent < best_extent {
                best = i;
                best_extent = extent;
            }
        }

        let rotated = best % 2 == 1;
        let (pw, ph) = if rotated { (h, w) } else { (w, h) };
        let rect = if best < 2 {
            Rect::new(bounds.right(), bounds.y, pw, ph)
        } else {
            Rect::new(bounds.x, bounds.bottom(), pw, ph)
        };
        Placement { rect, rotated }
    }
}
