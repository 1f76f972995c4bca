use pathviz_core::{Point, Range};

/// Adjacency used by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Orthogonal moves only: N, E, S, W.
    Four,
    /// Orthogonal and diagonal moves: N, NE, E, SE, S, SW, W, NW.
    Eight,
}

impl Connectivity {
    /// Number of candidate directions.
    #[inline]
    pub const fn degree(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

const DIRS_4: [Point; 4] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
];

const DIRS_8: [Point; 8] = [
    Point::new(0, -1),
    Point::new(1, -1),
    Point::new(1, 0),
    Point::new(1, 1),
    Point::new(0, 1),
    Point::new(-1, 1),
    Point::new(-1, 0),
    Point::new(-1, -1),
];

/// Lazy iterator over the in-bounds neighbors of a point.
///
/// The order is fixed (clockwise from north) so that searches break ties
/// the same way on every run. Cloning yields an independent iterator from
/// the same position, which makes the sequence restartable.
#[derive(Debug, Clone)]
pub struct Neighbors {
    center: Point,
    dirs: &'static [Point],
    bounds: Range,
    next: usize,
}

impl Neighbors {
    pub fn new(center: Point, connectivity: Connectivity, bounds: Range) -> Self {
        let dirs: &'static [Point] = match connectivity {
            Connectivity::Four => &DIRS_4,
            Connectivity::Eight => &DIRS_8,
        };
        Self {
            center,
            dirs,
            bounds,
            next: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        while let Some(&d) = self.dirs.get(self.next) {
            self.next += 1;
            let n = self.center + d;
            if self.bounds.contains(n) {
                return Some(n);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.dirs.len() - self.next))
    }
}

impl std::iter::FusedIterator for Neighbors {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(p: Point, c: Connectivity) -> Vec<Point> {
        Neighbors::new(p, c, Range::with_dims(5, 5)).collect()
    }

    #[test]
    fn interior_four_in_nesw_order() {
        assert_eq!(
            collect(Point::at(2, 2), Connectivity::Four),
            vec![Point::at(1, 2), Point::at(2, 3), Point::at(3, 2), Point::at(2, 1)]
        );
    }

    #[test]
    fn interior_eight_clockwise() {
        assert_eq!(
            collect(Point::at(2, 2), Connectivity::Eight),
            vec![
                Point::at(1, 2),
                Point::at(1, 3),
                Point::at(2, 3),
                Point::at(3, 3),
                Point::at(3, 2),
                Point::at(3, 1),
                Point::at(2, 1),
                Point::at(1, 1),
            ]
        );
    }

    #[test]
    fn corner_is_filtered() {
        assert_eq!(
            collect(Point::at(0, 0), Connectivity::Four),
            vec![Point::at(0, 1), Point::at(1, 0)]
        );
        assert_eq!(
            collect(Point::at(4, 4), Connectivity::Eight),
            vec![Point::at(3, 4), Point::at(4, 3), Point::at(3, 3)]
        );
    }

    #[test]
    fn agrees_with_point_helpers() {
        let p = Point::at(2, 2);
        assert_eq!(collect(p, Connectivity::Four), p.neighbors_4().to_vec());
        assert_eq!(collect(p, Connectivity::Eight), p.neighbors_8().to_vec());
    }

    #[test]
    fn clone_restarts_from_same_state() {
        let it = Neighbors::new(Point::at(1, 1), Connectivity::Eight, Range::with_dims(3, 3));
        let a: Vec<_> = it.clone().collect();
        let b: Vec<_> = it.collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), Connectivity::Eight.degree());
    }
}
