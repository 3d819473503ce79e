//! Weather-aware distribution of locations across trip days.

use crate::model::Location;
use crate::suitability::Suitability;
use crate::weather::WeatherCategory;

/// Days holding more than this many locations donate one to an empty day.
const REBALANCE_THRESHOLD: usize = 3;

/// Partition `locations` into `day_count` lists.
///
/// `categories[i]` is the weather for day `i`; days past the end of the slice
/// (or `None` entries) are treated as moderate. Every input location appears
/// in exactly one output list. Returns an empty vector when there is nothing
/// to assign.
pub fn assign_days(
    locations: &[Location],
    day_count: usize,
    categories: &[Option<WeatherCategory>],
) -> Vec<Vec<Location>> {
    if locations.is_empty() || day_count == 0 {
        return Vec::new();
    }

    let category = |day: usize| categories.get(day).copied().flatten();

    let mut good_days = Vec::new();
    let mut bad_days = Vec::new();
    let mut moderate_days = Vec::new();
    for day in 0..day_count {
        match category(day) {
            Some(c) if c.favors_outdoor() => good_days.push(day),
            Some(c) if c.favors_indoor() => bad_days.push(day),
            _ => moderate_days.push(day),
        }
    }

    let all_days: Vec<usize> = (0..day_count).collect();
    let mut days: Vec<Vec<Location>> = vec![Vec::new(); day_count];

    let (mut indoor, mut outdoor, mut flexible) = (Vec::new(), Vec::new(), Vec::new());
    for location in locations {
        match location.suitability() {
            Suitability::Indoor => indoor.push(location),
            Suitability::Outdoor => outdoor.push(location),
            Suitability::Flexible => flexible.push(location),
        }
    }

    let indoor_targets = if bad_days.is_empty() { &all_days } else { &bad_days };
    round_robin(&mut days, &indoor, indoor_targets);

    let outdoor_targets = if good_days.is_empty() {
        moderate_days.iter().chain(all_days.iter()).copied().collect()
    } else {
        good_days
    };
    round_robin(&mut days, &outdoor, &outdoor_targets);

    for location in flexible {
        if let Some(day) = least_loaded(&days) {
            days[day].push(location.clone());
        }
    }

    rebalance(&mut days);

    tracing::debug!(
        day_count,
        indoor = indoor.len(),
        outdoor = outdoor.len(),
        loads = ?days.iter().map(Vec::len).collect::<Vec<_>>(),
        "assigned locations to days"
    );

    days
}

fn round_robin(days: &mut [Vec<Location>], locations: &[&Location], targets: &[usize]) {
    if targets.is_empty() {
        return;
    }
    for (i, location) in locations.iter().enumerate() {
        days[targets[i % targets.len()]].push((*location).clone());
    }
}

fn least_loaded(days: &[Vec<Location>]) -> Option<usize> {
    days.iter()
        .enumerate()
        .min_by_key(|(index, day)| (day.len(), *index))
        .map(|(index, _)| index)
}

fn most_loaded(days: &[Vec<Location>]) -> Option<usize> {
    days.iter()
        .enumerate()
        .max_by_key(|(index, day)| (day.len(), std::cmp::Reverse(*index)))
        .map(|(index, _)| index)
}

/// Single corrective pass: each day empty at the start of the pass may take
/// one location from the most-loaded day, if that day is over the threshold.
fn rebalance(days: &mut [Vec<Location>]) {
    let empty_days: Vec<usize> = days
        .iter()
        .enumerate()
        .filter(|(_, day)| day.is_empty())
        .map(|(index, _)| index)
        .collect();

    for empty in empty_days {
        let Some(donor) = most_loaded(days) else {
            break;
        };
        if days[donor].len() <= REBALANCE_THRESHOLD {
            continue;
        }
        if let Some(location) = days[donor].pop() {
            days[empty].push(location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::weather::WeatherCategory::*;

    fn located(prefix: &str, category: &str, count: usize) -> Vec<Location> {
        (0..count)
            .map(|i| Location::new(format!("{prefix}{i}"), format!("{prefix} {i}"), category, (0.0, 0.0)))
            .collect()
    }

    fn ids(day: &[Location]) -> Vec<&str> {
        day.iter().map(Location::id).collect()
    }

    #[test]
    fn test_empty_inputs() {
        assert!(assign_days(&[], 3, &[]).is_empty());
        assert!(assign_days(&located("p", "park", 2), 0, &[]).is_empty());
    }

    #[test]
    fn test_single_day_takes_everything() {
        let mut locations = located("m", "museum", 2);
        locations.extend(located("p", "park", 2));
        locations.extend(located("x", "market", 2));

        let days = assign_days(&locations, 1, &[Some(Challenging)]);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].len(), 6);
    }

    #[test]
    fn test_weather_steering() {
        let mut locations = located("m", "museum", 4);
        locations.extend(located("p", "park", 4));

        let days = assign_days(&locations, 2, &[Some(Challenging), Some(Excellent)]);
        assert_eq!(ids(&days[0]), vec!["m0", "m1", "m2", "m3"]);
        assert_eq!(ids(&days[1]), vec!["p0", "p1", "p2", "p3"]);
    }

    #[test]
    fn test_indoor_without_bad_days_spreads_over_all_days() {
        let locations = located("m", "museum", 3);
        let days = assign_days(&locations, 3, &[Some(Excellent), Some(Good), Some(Fair)]);
        assert_eq!(days.iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 1, 1]);
    }

    #[test]
    fn test_outdoor_without_good_days_prefers_moderate_first() {
        let locations = located("p", "park", 4);
        // moderate = [1, 2], fallback targets = [1, 2, 0, 1, 2]
        let days = assign_days(&locations, 3, &[Some(Indoor), Some(Fair)]);
        assert_eq!(ids(&days[1]), vec!["p0", "p3"]);
        assert_eq!(ids(&days[2]), vec!["p1"]);
        assert_eq!(ids(&days[0]), vec!["p2"]);
    }

    #[test]
    fn test_flexible_goes_to_least_loaded_lowest_index() {
        let mut locations = located("p", "park", 2);
        locations.extend(located("x", "market", 3));

        let days = assign_days(&locations, 3, &[Some(Excellent), None, None]);
        // park load: [2, 0, 0] -> x0 day1, x1 day2, x2 day1
        assert_eq!(ids(&days[0]), vec!["p0", "p1"]);
        assert_eq!(ids(&days[1]), vec!["x0", "x2"]);
        assert_eq!(ids(&days[2]), vec!["x1"]);
    }

    #[test]
    fn test_rebalance_moves_one_per_empty_day() {
        let locations = located("p", "park", 6);
        let days = assign_days(&locations, 3, &[Some(Excellent), Some(Indoor), Some(Indoor)]);
        // all six parks land on day 0; two empty days each take one
        assert_eq!(days[0].len(), 4);
        assert_eq!(ids(&days[1]), vec!["p5"]);
        assert_eq!(ids(&days[2]), vec!["p4"]);
    }

    #[test]
    fn test_rebalance_leaves_light_days_alone() {
        let locations = located("p", "park", 3);
        let days = assign_days(&locations, 2, &[Some(Excellent), Some(Indoor)]);
        assert_eq!(days[0].len(), 3);
        assert!(days[1].is_empty());
    }

    #[test]
    fn test_every_location_assigned_once() {
        let mut locations = located("m", "museum", 5);
        locations.extend(located("p", "garden", 7));
        locations.extend(located("x", "cultural", 4));

        let days = assign_days(&locations, 4, &[Some(Good), Some(Indoor), Some(Fair)]);
        let assigned: Vec<&str> = days.iter().flat_map(|day| ids(day)).collect();
        let unique: HashSet<&str> = assigned.iter().copied().collect();
        assert_eq!(assigned.len(), locations.len());
        assert_eq!(unique.len(), locations.len());
    }
}
