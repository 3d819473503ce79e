//! Turns an ordered day of stops into a timed schedule.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::PlannerError;
use crate::model::{
    round_km, whole_minutes, Accommodation, DailyWeather, DayPlan, EventKind, Location,
    TimelineEvent, TransportMode, TravelSegment,
};
use crate::traits::RoutingProvider;

/// Builds [`DayPlan`]s for one trip: fixed accommodation, start time and
/// transport mode.
pub struct TimelineBuilder<'a, R: ?Sized> {
    router: &'a R,
    accommodation: &'a Accommodation,
    mode: TransportMode,
    start_time: NaiveTime,
    abort: Option<&'a AtomicBool>,
}

impl<'a, R> TimelineBuilder<'a, R>
where
    R: RoutingProvider + ?Sized,
{
    pub fn new(
        router: &'a R,
        accommodation: &'a Accommodation,
        mode: TransportMode,
        start_time: NaiveTime,
    ) -> Self {
        Self {
            router,
            accommodation,
            mode,
            start_time,
            abort: None,
        }
    }

    /// Stop before the next routing call once `flag` is raised.
    pub fn with_abort_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.abort = Some(flag);
        self
    }

    /// Walk the stops in order: start, (travel, visit)*, travel home, end.
    ///
    /// An empty day yields `start` and `end` at the same instant without any
    /// routing call.
    pub fn build(
        &self,
        day_number: usize,
        date: NaiveDate,
        locations: Vec<Location>,
        weather: Option<DailyWeather>,
    ) -> Result<DayPlan, PlannerError> {
        let day_start = date.and_time(self.start_time);
        let home = self.accommodation.coordinates;

        let mut clock = Clock::new(day_start);
        let mut events = Vec::with_capacity(locations.len() * 2 + 3);
        let mut distance_meters = 0.0;
        let mut travel_seconds = 0.0;
        let mut visit_minutes: u64 = 0;

        events.push(TimelineEvent {
            starts_at: day_start,
            ends_at: day_start,
            kind: EventKind::Start {
                location: self.accommodation.name.clone(),
                coordinates: home,
            },
        });

        if !locations.is_empty() {
            let mut position = home;
            for location in &locations {
                let segment = self.travel(day_number, position, location.coordinates())?;
                distance_meters += segment.distance_meters;
                travel_seconds += segment.duration_seconds;
                events.push(self.travel_event(day_number, &mut clock, &segment)?);

                let minutes = location.estimated_visit_duration_minutes();
                visit_minutes += u64::from(minutes);
                let arrived = clock.now(day_number)?;
                clock.advance(f64::from(minutes) * 60.0);
                events.push(TimelineEvent {
                    starts_at: arrived,
                    ends_at: clock.now(day_number)?,
                    kind: EventKind::Visit {
                        location_id: location.id().to_string(),
                        name: location.name().to_string(),
                        category: location.category().to_string(),
                        duration_minutes: minutes,
                        coordinates: location.coordinates(),
                        address: location.address().map(str::to_string),
                    },
                });
                position = location.coordinates();
            }

            let segment = self.travel(day_number, position, home)?;
            distance_meters += segment.distance_meters;
            travel_seconds += segment.duration_seconds;
            events.push(self.travel_event(day_number, &mut clock, &segment)?);
        }

        let ends_at = clock.now(day_number)?;
        events.push(TimelineEvent {
            starts_at: ends_at,
            ends_at,
            kind: EventKind::End {
                location: self.accommodation.name.clone(),
                coordinates: home,
            },
        });

        tracing::debug!(
            day = day_number,
            stops = locations.len(),
            distance_m = distance_meters,
            "built day timeline"
        );

        let weather_category = weather.as_ref().map(DailyWeather::category);
        Ok(DayPlan {
            day_number,
            date,
            weather,
            weather_category,
            mode: self.mode,
            locations,
            events,
            total_distance_km: round_km(distance_meters),
            total_travel_minutes: whole_minutes(travel_seconds),
            total_visit_minutes: visit_minutes,
            start_time: day_start.time(),
            end_time: ends_at.time(),
            ends_at,
            distance_meters,
        })
    }

    fn travel(
        &self,
        day_number: usize,
        from: (f64, f64),
        to: (f64, f64),
    ) -> Result<TravelSegment, PlannerError> {
        if self.abort.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(PlannerError::Cancelled { day: day_number });
        }
        self.router
            .segment(from, to, self.mode)
            .map_err(|err| PlannerError::routing(day_number, err))
    }

    fn travel_event(
        &self,
        day_number: usize,
        clock: &mut Clock,
        segment: &TravelSegment,
    ) -> Result<TimelineEvent, PlannerError> {
        let departed = clock.now(day_number)?;
        clock.advance(segment.duration_seconds);
        Ok(TimelineEvent {
            starts_at: departed,
            ends_at: clock.now(day_number)?,
            kind: EventKind::Travel {
                mode: segment.mode,
                distance_km: round_km(segment.distance_meters),
                duration_minutes: whole_minutes(segment.duration_seconds),
                origin: segment.origin,
                destination: segment.destination,
            },
        })
    }
}

/// Day clock that accumulates unrounded seconds from the day start.
struct Clock {
    origin: NaiveDateTime,
    elapsed_seconds: f64,
}

impl Clock {
    fn new(origin: NaiveDateTime) -> Self {
        Self {
            origin,
            elapsed_seconds: 0.0,
        }
    }

    fn advance(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.elapsed_seconds += seconds;
        }
    }

    /// Current timestamp, or `ScheduleOverflow` once the elapsed time
    /// leaves the calendar range.
    fn now(&self, day_number: usize) -> Result<NaiveDateTime, PlannerError> {
        // float-to-int casts saturate
        let millis = (self.elapsed_seconds * 1000.0).round() as i64;
        TimeDelta::try_milliseconds(millis)
            .and_then(|elapsed| self.origin.checked_add_signed(elapsed))
            .ok_or(PlannerError::ScheduleOverflow { day: day_number })
    }
}
