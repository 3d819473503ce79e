//! Per-day visit ordering (nearest-neighbor heuristic).

use crate::error::RoutingError;
use crate::model::{Location, TransportMode};
use crate::traits::{DurationMatrix, RoutingProvider};

/// Reorder a day's locations to reduce travel time, starting from `start`.
///
/// Empty and single-location days come back unchanged without a routing
/// call. Otherwise one matrix request covers the start plus every location.
/// The return leg to `start` is not part of the ordering.
#[tracing::instrument(level = "debug", skip(locations, router), fields(stops = locations.len()))]
pub fn optimize_visit_order<R>(
    locations: Vec<Location>,
    start: (f64, f64),
    mode: TransportMode,
    router: &R,
) -> Result<Vec<Location>, RoutingError>
where
    R: RoutingProvider + ?Sized,
{
    if locations.len() <= 1 {
        return Ok(locations);
    }

    let mut points = Vec::with_capacity(locations.len() + 1);
    points.push(start);
    points.extend(locations.iter().map(Location::coordinates));

    let matrix = router.duration_matrix(&points, mode)?;
    validate_matrix(&matrix, points.len())?;

    let order = nearest_neighbor_order(&matrix);

    let mut slots: Vec<Option<Location>> = locations.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|index| slots[index - 1].take())
        .collect())
}

/// Greedy tour over `matrix` starting at index 0.
///
/// Returns indices `1..n` in visiting order. Unreachable or non-finite
/// entries cost infinity; ties go to the lowest index, so an all-unreachable
/// row still yields the next remaining index.
pub fn nearest_neighbor_order(matrix: &DurationMatrix) -> Vec<usize> {
    let n = matrix.len();
    if n <= 1 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    visited[0] = true;
    let mut order = Vec::with_capacity(n - 1);
    let mut current = 0;

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for candidate in 1..n {
            if visited[candidate] {
                continue;
            }
            let cost = travel_cost(matrix, current, candidate);
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((candidate, cost)),
            }
        }

        let Some((next, _)) = best else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Total travel time of visiting `order` from index 0, in seconds.
pub fn route_duration(matrix: &DurationMatrix, order: &[usize]) -> f64 {
    let mut current = 0;
    let mut total = 0.0;
    for &next in order {
        total += travel_cost(matrix, current, next);
        current = next;
    }
    total
}

fn travel_cost(matrix: &DurationMatrix, from: usize, to: usize) -> f64 {
    matrix
        .get(from)
        .and_then(|row| row.get(to))
        .copied()
        .flatten()
        .filter(|seconds| seconds.is_finite())
        .unwrap_or(f64::INFINITY)
}

fn validate_matrix(matrix: &DurationMatrix, expected: usize) -> Result<(), RoutingError> {
    if matrix.len() != expected || matrix.iter().any(|row| row.len() != expected) {
        return Err(RoutingError::MalformedResponse(format!(
            "expected a {expected}x{expected} duration matrix, got {} rows",
            matrix.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> DurationMatrix {
        rows.iter()
            .map(|row| row.iter().map(|&v| if v < 0.0 { None } else { Some(v) }).collect())
            .collect()
    }

    #[test]
    fn test_follows_nearest_neighbor() {
        let m = matrix(&[
            &[0.0, 50.0, 10.0, 30.0],
            &[50.0, 0.0, 45.0, 5.0],
            &[10.0, 45.0, 0.0, 20.0],
            &[30.0, 5.0, 20.0, 0.0],
        ]);
        assert_eq!(nearest_neighbor_order(&m), vec![2, 3, 1]);
        assert_eq!(route_duration(&m, &[2, 3, 1]), 35.0);
    }

    #[test]
    fn test_ties_break_to_lowest_index() {
        let m = matrix(&[
            &[0.0, 10.0, 10.0],
            &[10.0, 0.0, 10.0],
            &[10.0, 10.0, 0.0],
        ]);
        assert_eq!(nearest_neighbor_order(&m), vec![1, 2]);
    }

    #[test]
    fn test_unreachable_is_visited_last() {
        let m = matrix(&[
            &[0.0, -1.0, 40.0],
            &[-1.0, 0.0, -1.0],
            &[40.0, -1.0, 0.0],
        ]);
        assert_eq!(nearest_neighbor_order(&m), vec![2, 1]);
    }

    #[test]
    fn test_non_finite_counts_as_unreachable() {
        let m = vec![
            vec![Some(0.0), Some(f64::NAN), Some(90.0)],
            vec![Some(0.0), Some(0.0), Some(0.0)],
            vec![Some(90.0), Some(1.0), Some(0.0)],
        ];
        assert_eq!(nearest_neighbor_order(&m), vec![2, 1]);
    }

    #[test]
    fn test_trivial_matrices() {
        assert!(nearest_neighbor_order(&Vec::new()).is_empty());
        assert!(nearest_neighbor_order(&vec![vec![Some(0.0)]]).is_empty());
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let m = matrix(&[&[0.0, 1.0], &[1.0, 0.0]]);
        assert!(validate_matrix(&m, 3).is_err());
        assert!(validate_matrix(&m, 2).is_ok());
    }
}
