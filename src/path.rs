//! Route geometry: the polyline a vehicle follows and distances along it.

use crate::math::{haversine, project_onto_segment, LatLng};
use crate::util::Interval;
use itertools::Itertools;

/// The shortest segment length used when converting distances to segment fractions, in m.
pub const MIN_SEGMENT_LEN: f64 = 1e-6; // m

/// The travel path of a route, with its distance table.
#[derive(Clone, Debug)]
pub struct RoutePath {
    /// The path samples: origin, routed geometry, destination.
    /// Never empty, and free of consecutive duplicates.
    points: Vec<LatLng>,
    /// The cumulative distance in m at each sample.
    cum_dist: Vec<f64>,
    /// The distance along the path of the origin, each stop and the destination,
    /// in schedule order. Non-decreasing.
    anchor_dist: Vec<f64>,
}

impl RoutePath {
    /// Builds the path of a route from its externally routed samples.
    ///
    /// # Parameters
    /// * `origin` - The route's origin, prepended to the samples.
    /// * `samples` - The routed geometry between origin and destination.
    /// * `destination` - The route's destination, appended to the samples.
    /// * `stops` - The coordinates of the intermediate stops, in schedule order.
    pub fn new(origin: LatLng, samples: &[LatLng], destination: LatLng, stops: &[LatLng]) -> Self {
        let points = std::iter::once(origin)
            .chain(samples.iter().copied())
            .chain(std::iter::once(destination))
            .dedup()
            .collect::<Vec<_>>();
        let cum_dist = build_distance_table(&points);

        let locations = std::iter::once(origin)
            .chain(stops.iter().copied())
            .chain(std::iter::once(destination))
            .map(|loc| nearest_distance_along_path(loc, &points, &cum_dist))
            .collect();
        let anchor_dist = monotonic_distances(locations);

        Self {
            points,
            cum_dist,
            anchor_dist,
        }
    }

    /// The deduplicated path samples.
    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    /// The cumulative distance in m at each path sample.
    pub fn distances(&self) -> &[f64] {
        &self.cum_dist
    }

    /// The total length of the path in m.
    pub fn length(&self) -> f64 {
        self.cum_dist.last().copied().unwrap_or(0.0)
    }

    /// The distance along the path of the origin, each stop and the destination.
    pub fn anchor_distances(&self) -> &[f64] {
        &self.anchor_dist
    }

    /// The span of distance covered by travel leg `idx`.
    pub fn leg(&self, idx: usize) -> Interval<f64> {
        let start = self.anchor_dist[idx];
        let end = f64::max(self.anchor_dist[idx + 1], start);
        Interval::new(start, end)
    }

    /// The first path sample.
    pub fn start(&self) -> LatLng {
        self.points[0]
    }

    /// Whether the path has no extent to travel along.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2 || self.length() <= 0.0
    }

    /// Finds the coordinate at the given distance along the path.
    ///
    /// The containing segment is the first whose end lies at or beyond `dist`;
    /// latitude and longitude are interpolated linearly within it.
    pub fn sample_at_distance(&self, dist: f64) -> LatLng {
        let last = self.points.len() - 1;
        let seg = self
            .cum_dist
            .iter()
            .skip(1)
            .position(|d| *d >= dist)
            .unwrap_or(last);
        let start = self.points[seg];
        let end = self.points[usize::min(seg + 1, last)];
        let seg_len = f64::max(haversine(start, end), MIN_SEGMENT_LEN);
        let t = ((dist - self.cum_dist[seg]) / seg_len).clamp(0.0, 1.0);
        start.lerp(end, t)
    }
}

/// Computes the cumulative great-circle distance in m at each point.
pub fn build_distance_table(points: &[LatLng]) -> Vec<f64> {
    let steps = points.iter().tuple_windows().scan(0.0, |total, (a, b)| {
        *total += haversine(*a, *b);
        Some(*total)
    });
    points.first().map(|_| 0.0).into_iter().chain(steps).collect()
}

/// Finds the distance along a path of the point nearest to `target`.
///
/// Segments are compared in planar `(lat, lng)` space, which is adequate for the
/// short segments of routed geometry; the returned distance is geodesic.
pub fn nearest_distance_along_path(target: LatLng, points: &[LatLng], cum_dist: &[f64]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let target = target.to_point();
    points
        .iter()
        .tuple_windows()
        .enumerate()
        .map(|(idx, (a, b))| {
            let proj = project_onto_segment(target, a.to_point(), b.to_point());
            (idx, a, b, proj)
        })
        .min_by(|x, y| x.3.dist2.total_cmp(&y.3.dist2))
        .map(|(idx, a, b, proj)| {
            let seg_len = f64::max(haversine(*a, *b), MIN_SEGMENT_LEN);
            cum_dist.get(idx).copied().unwrap_or(0.0) + proj.t * seg_len
        })
        .unwrap_or(0.0)
}

/// Clamps each distance to be no less than the one before it, and no less than zero.
pub fn monotonic_distances(mut dists: Vec<f64>) -> Vec<f64> {
    for i in 1..dists.len() {
        dists[i] = f64::max(0.0, f64::max(dists[i], dists[i - 1]));
    }
    dists
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn ll(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng)
    }

    #[test]
    fn distance_table_is_cumulative() {
        let points = [ll(0.0, 0.0), ll(0.0, 1.0), ll(0.0, 3.0)];
        let table = build_distance_table(&points);
        let d = haversine(points[0], points[1]);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0], 0.0);
        assert_approx_eq!(table[1], d);
        assert_approx_eq!(table[2], 3.0 * d, 1e-6);
        assert!(build_distance_table(&[]).is_empty());
    }

    #[test]
    fn nearest_distance_projects_onto_closest_segment() {
        let points = [ll(0.0, 0.0), ll(0.0, 1.0), ll(0.0, 2.0)];
        let table = build_distance_table(&points);
        let d = table[1];

        assert_approx_eq!(nearest_distance_along_path(ll(0.1, 1.5), &points, &table), 1.5 * d, 1e-6);
        assert_eq!(nearest_distance_along_path(ll(0.0, -4.0), &points, &table), 0.0);
        assert_approx_eq!(nearest_distance_along_path(ll(0.0, 9.0), &points, &table), table[2]);
    }

    #[test]
    fn nearest_distance_on_tiny_paths_is_zero() {
        assert_eq!(nearest_distance_along_path(ll(1.0, 1.0), &[], &[]), 0.0);
        assert_eq!(nearest_distance_along_path(ll(1.0, 1.0), &[ll(0.0, 0.0)], &[0.0]), 0.0);
    }

    #[test]
    fn stop_distances_never_go_backwards() {
        assert_eq!(
            monotonic_distances(vec![0.0, 50.0, 40.0, 70.0, 10.0]),
            vec![0.0, 50.0, 50.0, 70.0, 70.0]
        );
    }

    #[test]
    fn path_removes_consecutive_duplicates() {
        let path = RoutePath::new(
            ll(0.0, 0.0),
            &[ll(0.0, 0.0), ll(0.0, 1.0), ll(0.0, 1.0), ll(0.0, 2.0)],
            ll(0.0, 2.0),
            &[],
        );
        assert_eq!(path.points(), &[ll(0.0, 0.0), ll(0.0, 1.0), ll(0.0, 2.0)]);
        assert_eq!(path.anchor_distances().len(), 2);
        assert_approx_eq!(path.anchor_distances()[1], path.length());
    }

    #[test]
    fn stop_off_the_path_is_projected() {
        let path = RoutePath::new(
            ll(0.0, 0.0),
            &[ll(0.0, 1.0)],
            ll(0.0, 2.0),
            &[ll(0.05, 1.0)],
        );
        let anchors = path.anchor_distances();
        assert_approx_eq!(anchors[1], path.distances()[1], 1e-6);
        assert_approx_eq!(path.leg(1).length(), path.length() - anchors[1], 1e-6);
    }

    #[test]
    fn sample_at_distance_interpolates_within_segment() {
        let path = RoutePath::new(ll(0.0, 0.0), &[ll(0.0, 1.0)], ll(0.0, 2.0), &[]);
        let half = 0.5 * path.length();
        let p = path.sample_at_distance(half);
        assert_approx_eq!(p.lat, 0.0);
        assert_approx_eq!(p.lng, 1.0, 1e-9);

        let quarter = path.sample_at_distance(0.25 * path.length());
        assert_approx_eq!(quarter.lng, 0.5, 1e-9);

        assert_eq!(path.sample_at_distance(0.0), ll(0.0, 0.0));
        assert_eq!(path.sample_at_distance(2.0 * path.length()), ll(0.0, 2.0));
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let path = RoutePath::new(ll(1.0, 1.0), &[ll(1.0, 1.0)], ll(1.0, 1.0), &[]);
        assert!(path.is_degenerate());
        assert_eq!(path.start(), ll(1.0, 1.0));
    }
}
