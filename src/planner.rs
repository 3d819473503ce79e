//! Itinerary construction: preconditions, day assignment, then per-day
//! ordering and timelines on a bounded worker pool.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use serde::Deserialize;

use crate::assignment::assign_days;
use crate::config::ScheduleConstraints;
use crate::error::PlannerError;
use crate::model::{round_km, Accommodation, DailyWeather, DayPlan, Itinerary, Location, TransportMode};
use crate::optimizer::optimize_visit_order;
use crate::timeline::TimelineBuilder;
use crate::traits::RoutingProvider;

pub const MAX_TRIP_DAYS: usize = 14;

/// Smallest location count accepted for a trip of `day_count` days.
pub fn minimum_locations(day_count: usize) -> usize {
    (2 * day_count).max(3)
}

/// Everything a planning run needs.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRequest {
    pub start_date: NaiveDate,
    pub day_count: usize,
    pub accommodation: Accommodation,
    pub locations: Vec<Location>,
    /// Daily forecasts, matched to trip days by date.
    #[serde(default)]
    pub forecast: Vec<DailyWeather>,
    #[serde(default)]
    pub mode: TransportMode,
    #[serde(default)]
    pub constraints: ScheduleConstraints,
}

impl TripRequest {
    pub fn trip_dates(&self) -> Vec<NaiveDate> {
        (0..self.day_count)
            .map(|offset| self.start_date + Duration::days(offset as i64))
            .collect()
    }

    /// Cheap checks run before any routing work.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.day_count == 0 || self.day_count > MAX_TRIP_DAYS {
            return Err(PlannerError::InvalidTripLength {
                days: self.day_count,
            });
        }

        let required = minimum_locations(self.day_count);
        if self.locations.len() < required {
            return Err(PlannerError::InsufficientLocations {
                actual: self.locations.len(),
                required,
                days: self.day_count,
            });
        }

        let mut seen = HashSet::new();
        for location in &self.locations {
            if !seen.insert(location.id()) {
                return Err(PlannerError::DuplicateLocation {
                    id: location.id().to_string(),
                });
            }
        }

        Ok(())
    }
}

/// One day's input after assignment.
struct DayInput {
    day_number: usize,
    date: NaiveDate,
    weather: Option<DailyWeather>,
    locations: Vec<Location>,
}

pub struct ItineraryPlanner<R> {
    router: R,
    max_workers: usize,
}

impl<R> ItineraryPlanner<R>
where
    R: RoutingProvider + Sync,
{
    pub fn new(router: R) -> Self {
        Self {
            router,
            max_workers: crate::config::DEFAULT_MAX_WORKERS,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    /// Build a full itinerary, or fail without returning partial days.
    #[tracing::instrument(
        skip(self, request),
        fields(days = request.day_count, locations = request.locations.len(), mode = %request.mode)
    )]
    pub fn plan(&self, request: &TripRequest) -> Result<Itinerary, PlannerError> {
        request.validate()?;

        let dates = request.trip_dates();
        let mut warnings = Vec::new();

        let weather: Vec<Option<DailyWeather>> = dates
            .iter()
            .map(|date| request.forecast.iter().find(|day| day.date == *date).cloned())
            .collect();
        for (date, day) in dates.iter().zip(&weather) {
            if day.is_none() {
                tracing::warn!(%date, "no forecast for day, scheduling as moderate");
                warnings.push(format!("No weather forecast for {date}; scheduled as a moderate day"));
            }
        }

        let categories: Vec<_> = weather
            .iter()
            .map(|day| day.as_ref().map(DailyWeather::category))
            .collect();
        let assigned = assign_days(&request.locations, request.day_count, &categories);

        let inputs: Vec<DayInput> = dates
            .into_iter()
            .zip(weather)
            .zip(assigned)
            .enumerate()
            .map(|(index, ((date, weather), locations))| DayInput {
                day_number: index + 1,
                date,
                weather,
                locations,
            })
            .collect();

        let days = self.build_days(request, inputs)?;

        warnings.extend(constraint_warnings(&days, &request.constraints));
        for warning in &warnings {
            tracing::debug!(%warning, "itinerary warning");
        }

        let distance_meters: f64 = days.iter().map(DayPlan::distance_meters).sum();
        let total_locations = days.iter().map(|day| day.locations().len()).sum();
        let start_date = request.start_date;
        let end_date = days.last().map(DayPlan::date).unwrap_or(start_date);

        tracing::info!(
            days = days.len(),
            total_locations,
            distance_km = round_km(distance_meters),
            warnings = warnings.len(),
            "itinerary built"
        );

        Ok(Itinerary {
            start_date,
            end_date,
            days,
            total_locations,
            total_distance_km: round_km(distance_meters),
            warnings,
            approved: false,
        })
    }

    fn build_days(
        &self,
        request: &TripRequest,
        inputs: Vec<DayInput>,
    ) -> Result<Vec<DayPlan>, PlannerError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()?;

        let abort = AtomicBool::new(false);
        let builder = TimelineBuilder::new(
            &self.router,
            &request.accommodation,
            request.mode,
            request.constraints.preferred_start_time,
        )
        .with_abort_flag(&abort);

        let results: Vec<Result<DayPlan, PlannerError>> = pool.install(|| {
            inputs
                .into_par_iter()
                .map(|input| {
                    let result = self.build_day(request, &builder, &abort, input);
                    let failed = matches!(&result, Err(err) if !matches!(err, PlannerError::Cancelled { .. }));
                    if failed {
                        abort.store(true, Ordering::Relaxed);
                    }
                    result
                })
                .collect()
        });

        let mut days = Vec::with_capacity(results.len());
        let mut cancelled = None;
        for result in results {
            match result {
                Ok(day) => days.push(day),
                Err(PlannerError::Cancelled { day }) => {
                    cancelled.get_or_insert(PlannerError::Cancelled { day });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "day construction failed, discarding itinerary");
                    return Err(err);
                }
            }
        }
        match cancelled {
            Some(err) => Err(err),
            None => Ok(days),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(day = input.day_number, date = %input.date))]
    fn build_day(
        &self,
        request: &TripRequest,
        builder: &TimelineBuilder<'_, R>,
        abort: &AtomicBool,
        input: DayInput,
    ) -> Result<DayPlan, PlannerError> {
        if abort.load(Ordering::Relaxed) {
            return Err(PlannerError::Cancelled {
                day: input.day_number,
            });
        }

        let ordered = optimize_visit_order(
            input.locations,
            request.accommodation.coordinates,
            request.mode,
            &self.router,
        )
        .map_err(|err| PlannerError::routing(input.day_number, err))?;

        builder.build(input.day_number, input.date, ordered, input.weather)
    }
}

fn constraint_warnings(days: &[DayPlan], constraints: &ScheduleConstraints) -> Vec<String> {
    let mut warnings = Vec::new();
    for day in days {
        if day.total_distance_km() > constraints.max_distance_km_per_day {
            warnings.push(format!(
                "Day {} covers {:.2} km, over the {:.2} km daily limit",
                day.day_number(),
                day.total_distance_km(),
                constraints.max_distance_km_per_day
            ));
        }
        if day.ends_at() > day.date().and_time(constraints.preferred_end_time) {
            warnings.push(format!(
                "Day {} ends at {}, after the preferred end time {}",
                day.day_number(),
                day.end_time().format("%H:%M"),
                constraints.preferred_end_time.format("%H:%M")
            ));
        }
    }
    warnings
}
