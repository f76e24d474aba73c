//! Per-day activity distribution
//!
//! Deterministic round-robin of ranked activities over the trip's days,
//! favoring non-transfer days. The daily schedule stage consumes this and
//! still enforces the effort budget; the distribution only decides which
//! day gets first claim on which activity.

use std::collections::BTreeMap;

use crate::domain::VerifiedActivity;

/// Max activities offered to one day before cycling continues
const MAX_PER_DAY: usize = 3;

/// Distribute ranked activities across day numbers `1..=total_days`
pub fn distribute_activities(
    activities: &[VerifiedActivity],
    total_days: u32,
    transfer_days: &[u32],
) -> BTreeMap<u32, Vec<VerifiedActivity>> {
    let mut assigned: BTreeMap<u32, Vec<VerifiedActivity>> = BTreeMap::new();
    if total_days == 0 {
        return assigned;
    }

    // Non-transfer days first, then transfer days get the remainder
    let mut day_order: Vec<u32> = (1..=total_days).filter(|d| !transfer_days.contains(d)).collect();
    day_order.extend((1..=total_days).filter(|d| transfer_days.contains(d)));

    let mut cursor = 0usize;
    for activity in activities {
        let mut placed = false;
        for _ in 0..day_order.len() {
            let day = day_order[cursor % day_order.len()];
            cursor += 1;
            let slot = assigned.entry(day).or_default();
            if slot.len() < MAX_PER_DAY {
                slot.push(activity.clone());
                placed = true;
                break;
            }
        }
        if !placed {
            // Every day is full; remaining activities stay unscheduled
            break;
        }
    }

    assigned
}
