#![forbid(unsafe_code)]

//! Geometric primitives.

/// A bounding box as reported by the visual tree.
///
/// Uses viewport coordinates in CSS pixels (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Bounds {
    /// Create a new bounding box.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Check if the box has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Return the same box shifted horizontally by `dx`.
    #[inline]
    #[must_use]
    pub fn shifted_x(self, dx: f64) -> Self {
        Self {
            left: self.left + dx,
            ..self
        }
    }

    /// Absolute distance between the horizontal centers of two boxes.
    #[inline]
    pub fn horizontal_center_distance(&self, other: &Bounds) -> f64 {
        (self.center_x() - other.center_x()).abs()
    }
}

/// Index of the item whose horizontal center is nearest to `container`'s.
///
/// Items reported as `None` (geometry unavailable) are skipped. Distances are
/// compared with a strict `<`, so the first minimum encountered wins and ties
/// resolve to the lowest index. Non-finite distances never win.
///
/// Returns `None` when no item has usable geometry.
pub fn nearest_to_center<I>(container: &Bounds, items: I) -> Option<usize>
where
    I: IntoIterator<Item = Option<Bounds>>,
{
    let mut closest = None;
    let mut min_dist = f64::INFINITY;
    for (index, bounds) in items.into_iter().enumerate() {
        let Some(bounds) = bounds else {
            continue;
        };
        let dist = container.horizontal_center_distance(&bounds);
        if dist < min_dist {
            min_dist = dist;
            closest = Some(index);
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn strip(lefts: &[f64], width: f64) -> Vec<Option<Bounds>> {
        lefts
            .iter()
            .map(|&left| Some(Bounds::new(left, 0.0, width, 100.0)))
            .collect()
    }

    #[test]
    fn bounds_edges_and_center() {
        let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(b.right(), 110.0);
        assert_eq!(b.bottom(), 70.0);
        assert_eq!(b.center_x(), 60.0);
        assert!(!b.is_empty());
        assert!(Bounds::new(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn shifted_keeps_size() {
        let b = Bounds::new(10.0, 5.0, 40.0, 30.0).shifted_x(-15.0);
        assert_eq!(b, Bounds::new(-5.0, 5.0, 40.0, 30.0));
    }

    #[test]
    fn nearest_picks_minimum_distance() {
        let container = Bounds::new(0.0, 0.0, 300.0, 100.0);
        // centers: 50, 150, 250
        let items = strip(&[0.0, 100.0, 200.0], 100.0);
        assert_eq!(nearest_to_center(&container, items), Some(1));
    }

    #[test]
    fn nearest_tie_resolves_to_lowest_index() {
        let container = Bounds::new(0.0, 0.0, 200.0, 100.0);
        // centers: 50 and 150, both 50px from 100
        let items = strip(&[0.0, 100.0], 100.0);
        assert_eq!(nearest_to_center(&container, items), Some(0));
    }

    #[test]
    fn nearest_skips_missing_geometry() {
        let container = Bounds::new(0.0, 0.0, 300.0, 100.0);
        let mut items = strip(&[0.0, 100.0, 200.0], 100.0);
        items[1] = None;
        assert_eq!(nearest_to_center(&container, items), Some(0));
    }

    #[test]
    fn nearest_ignores_nan() {
        let container = Bounds::new(0.0, 0.0, 300.0, 100.0);
        let items = vec![
            Some(Bounds::new(f64::NAN, 0.0, 100.0, 100.0)),
            Some(Bounds::new(500.0, 0.0, 100.0, 100.0)),
        ];
        assert_eq!(nearest_to_center(&container, items), Some(1));
    }

    #[test]
    fn nearest_empty_is_none() {
        let container = Bounds::new(0.0, 0.0, 300.0, 100.0);
        assert_eq!(nearest_to_center(&container, Vec::new()), None);
        assert_eq!(nearest_to_center(&container, vec![None, None]), None);
    }
}
