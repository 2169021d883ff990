//! Bounded breadcrumb trail used by the retrace behaviour.

use std::collections::VecDeque;

use rubblerats_core::constants::PATH_CAPACITY;
use rubblerats_core::types::Point;

/// FIFO-evicting sequence of visited points, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumbs {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Breadcrumbs {
    /// Capacity is clamped to at least one; storage grows on demand past
    /// the default trail length.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity.min(PATH_CAPACITY)),
            capacity,
        }
    }

    /// Append a point, evicting and returning the oldest one when full.
    pub fn push(&mut self, point: Point) -> Option<Point> {
        let evicted = if self.points.len() == self.capacity {
            self.points.pop_front()
        } else {
            None
        };
        self.points.push_back(point);
        evicted
    }

    /// Most recent breadcrumb.
    pub fn last(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// Drop the most recent breadcrumb.
    pub fn pop(&mut self) -> Option<Point> {
        self.points.pop_back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}
