//! Fixed-capacity history of recent projectile positions.

use glam::Vec2;

/// Ring buffer of positions that overwrites its oldest entry once full.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    points: Vec<Vec2>,
    head: usize,
    len: usize,
}

impl Trail {
    /// Creates an empty trail remembering up to `capacity` positions.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: vec![Vec2::ZERO; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    /// Records `point`, discarding the oldest entry when full.
    pub fn push(&mut self, point: Vec2) {
        let capacity = self.points.len();
        self.points[self.head] = point;
        self.head = (self.head + 1) % capacity;
        self.len = (self.len + 1).min(capacity);
    }

    /// Number of positions currently remembered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Reports whether no position has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of positions remembered.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// Remembered positions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        let capacity = self.points.len();
        let start = (self.head + capacity - self.len) % capacity;
        (0..self.len).map(move |offset| self.points[(start + offset) % capacity])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(trail: &Trail) -> Vec<f32> {
        trail.iter().map(|point| point.x).collect()
    }

    #[test]
    fn fills_in_insertion_order() {
        let mut trail = Trail::with_capacity(4);
        assert!(trail.is_empty());
        trail.push(Vec2::new(1.0, 0.0));
        trail.push(Vec2::new(2.0, 0.0));
        assert_eq!(trail.len(), 2);
        assert_eq!(xs(&trail), vec![1.0, 2.0]);
    }

    #[test]
    fn overwrites_oldest_once_full() {
        let mut trail = Trail::with_capacity(3);
        for x in 1..=5 {
            trail.push(Vec2::new(x as f32, 0.0));
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.capacity(), 3);
        assert_eq!(xs(&trail), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn zero_capacity_keeps_latest_point() {
        let mut trail = Trail::with_capacity(0);
        trail.push(Vec2::new(7.0, 0.0));
        trail.push(Vec2::new(8.0, 0.0));
        assert_eq!(xs(&trail), vec![8.0]);
    }
}
