//! Skeleton stage: allocate nights to areas as ordered stops
//!
//! Stops partition the day range `[1, trip_nights]` contiguously. The
//! builder never fails for an empty area list; it produces a synthetic
//! fallback stop instead.

use tracing::{debug, warn};

use crate::domain::{AreaCandidate, ItinerarySplit, Stop, generate_id};

/// Build the ordered stop list for a trip
///
/// With an explicit split, stops follow split order. Without one, all
/// nights go to the single top-ranked area. With no areas at all, a single
/// synthetic stop covers the whole trip.
pub fn build_skeleton(
    destination: &str,
    trip_nights: u32,
    split: Option<&ItinerarySplit>,
    areas: &[AreaCandidate],
) -> Vec<Stop> {
    let allocations: Vec<(String, String, u32)> = match split {
        Some(split) => split
            .stops
            .iter()
            .map(|s| {
                let name = areas
                    .iter()
                    .find(|a| a.id == s.area_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| s.area_id.clone());
                (s.area_id.clone(), name, s.nights)
            })
            .collect(),
        None => {
            let top = areas
                .iter()
                .max_by(|a, b| a.combined_fit().partial_cmp(&b.combined_fit()).unwrap_or(std::cmp::Ordering::Equal));
            match top {
                Some(area) => {
                    debug!(area = %area.name, "build_skeleton: no split, all nights to top-ranked area");
                    vec![(area.id.clone(), area.name.clone(), trip_nights)]
                }
                None => {
                    warn!("build_skeleton: no areas available, using fallback stop");
                    vec![("unassigned".to_string(), destination.to_string(), trip_nights)]
                }
            }
        }
    };

    let allocations = if allocations.is_empty() {
        warn!("build_skeleton: empty split, using fallback stop");
        vec![("unassigned".to_string(), destination.to_string(), trip_nights)]
    } else {
        allocations
    };

    let last = allocations.len() - 1;
    let mut stops = Vec::with_capacity(allocations.len());
    let mut arrival_day = 1u32;
    for (idx, (area_id, area_name, nights)) in allocations.into_iter().enumerate() {
        let departure_day = arrival_day + nights;
        stops.push(Stop {
            id: generate_id("stop", &area_name),
            area_id,
            area_name,
            nights,
            arrival_day,
            departure_day,
            is_arrival_city: idx == 0,
            is_departure_city: idx == last,
            hotel: None,
        });
        arrival_day = departure_day;
    }
    stops
}

/// Transfer days: each stop's arrival day after the first
pub fn transfer_days(stops: &[Stop]) -> Vec<u32> {
    stops.iter().skip(1).map(|s| s.arrival_day).collect()
}

/// Find the stop owning a day number
pub fn owning_stop<'a>(stops: &'a [Stop], day: u32) -> Option<&'a Stop> {
    let last = stops.len().saturating_sub(1);
    stops.iter().enumerate().find(|(idx, s)| s.owns_day(day, *idx == last)).map(|(_, s)| s)
}
