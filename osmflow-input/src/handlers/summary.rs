use geo::{Coord, Rect};
use log::warn;
use osmflow_core::{Handler, HandlerResult, Point, Relation, Way};

/// Object counts and the extent of the points in a stream.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    /// Number of points.
    pub points: u64,
    /// Number of ways.
    pub ways: u64,
    /// Number of relations.
    pub relations: u64,
    /// Objects marked as deleted, of any kind.
    pub invisible: u64,
    /// Bounding box of every valid point position, if there was one.
    pub bounds: Option<Rect<f64>>,
}

impl Summary {
    /// Combine two summaries, for example of adjacent extracts.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.points += other.points;
        self.ways += other.ways;
        self.relations += other.relations;
        self.invisible += other.invisible;
        self.bounds = Self::merge_bounds(self.bounds, other.bounds);
        self
    }

    /// Total number of objects.
    #[must_use]
    pub const fn objects(&self) -> u64 {
        self.points + self.ways + self.relations
    }

    fn merge_bounds(lhs: Option<Rect<f64>>, rhs: Option<Rect<f64>>) -> Option<Rect<f64>> {
        match (lhs, rhs) {
            (Some(left), Some(right)) => {
                let left_min = left.min();
                let left_max = left.max();
                let right_min = right.min();
                let right_max = right.max();

                Some(Rect::new(
                    Coord {
                        x: left_min.x.min(right_min.x),
                        y: left_min.y.min(right_min.y),
                    },
                    Coord {
                        x: left_max.x.max(right_max.x),
                        y: left_max.y.max(right_max.y),
                    },
                ))
            }
            (Some(bounds), None) | (None, Some(bounds)) => Some(bounds),
            (None, None) => None,
        }
    }
}

/// Handler that builds a [`Summary`].
///
/// Points without a position are counted but do not extend the bounds.
/// Positions outside the WGS84 range are logged and skipped.
#[derive(Debug, Clone, Default)]
pub struct SummaryHandler {
    summary: Summary,
}

impl SummaryHandler {
    /// Create an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts gathered so far.
    #[must_use]
    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Consume the handler, returning its summary.
    #[must_use]
    pub fn into_summary(self) -> Summary {
        self.summary
    }

    fn count_visibility(&mut self, visible: bool) {
        if !visible {
            self.summary.invisible += 1;
        }
    }
}

impl Handler for SummaryHandler {
    fn point(&mut self, point: &Point) -> HandlerResult {
        self.summary.points += 1;
        self.count_visibility(point.meta.visible);
        if let Some(position) = point.position {
            if position.is_valid() {
                let coord = Coord::from(position);
                self.summary.bounds =
                    Summary::merge_bounds(self.summary.bounds, Some(Rect::new(coord, coord)));
            } else {
                warn!(
                    "Skipped point {} with out-of-range position ({}, {})",
                    point.meta.id,
                    position.lon(),
                    position.lat()
                );
            }
        }
        Ok(())
    }

    fn way(&mut self, way: &Way) -> HandlerResult {
        self.summary.ways += 1;
        self.count_visibility(way.meta.visible);
        Ok(())
    }

    fn relation(&mut self, relation: &Relation) -> HandlerResult {
        self.summary.relations += 1;
        self.count_visibility(relation.meta.visible);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osmflow_core::Position;
    use rstest::rstest;

    fn assert_close(actual: f64, expected: f64) {
        let delta = (actual - expected).abs();
        assert!(
            delta <= 1.0e-7,
            "expected {expected}, got {actual} (|Δ| = {delta})"
        );
    }

    #[rstest]
    fn counts_objects_and_extends_bounds() {
        let mut handler = SummaryHandler::new();
        handler
            .point(&Point::new(1, Position::from_degrees(7.0, 52.0)))
            .expect("summary never stops");
        handler
            .point(&Point::new(2, Position::from_degrees(6.5, 52.5)))
            .expect("summary never stops");
        let mut deleted = Way::new(3);
        deleted.meta.visible = false;
        handler.way(&deleted).expect("summary never stops");
        handler
            .relation(&Relation::new(4))
            .expect("summary never stops");

        let summary = handler.into_summary();
        assert_eq!(
            (summary.points, summary.ways, summary.relations),
            (2, 1, 1)
        );
        assert_eq!(summary.invisible, 1);
        assert_eq!(summary.objects(), 4);
        let bounds = summary.bounds.expect("points were present");
        assert_close(bounds.min().x, 6.5);
        assert_close(bounds.min().y, 52.0);
        assert_close(bounds.max().x, 7.0);
        assert_close(bounds.max().y, 52.5);
    }

    #[rstest]
    fn skips_points_without_usable_positions() {
        let mut handler = SummaryHandler::new();
        let mut unplaced = Point::new(1, Position::from_degrees(0.0, 0.0));
        unplaced.position = None;
        handler.point(&unplaced).expect("summary never stops");
        handler
            .point(&Point::new(2, Position::from_fixed(i32::MAX, 0)))
            .expect("summary never stops");
        assert_eq!(handler.summary().points, 2);
        assert_eq!(handler.summary().bounds, None);
    }

    #[rstest]
    fn merge_combines_counts_and_bounds() {
        let point = |lon: f64, lat: f64| {
            let coord = Coord { x: lon, y: lat };
            Some(Rect::new(coord, coord))
        };
        let west = Summary {
            points: 1,
            bounds: point(-1.0, 0.0),
            ..Summary::default()
        };
        let east = Summary {
            points: 2,
            ways: 1,
            bounds: point(1.0, 2.0),
            ..Summary::default()
        };
        let merged = west.merge(east).merge(Summary::default());
        assert_eq!((merged.points, merged.ways), (3, 1));
        let bounds = merged.bounds.expect("both sides had bounds");
        assert_close(bounds.min().x, -1.0);
        assert_close(bounds.max().y, 2.0);
    }
}
