//! Plain data row types written by output backends, and their extraction
//! from a finished venue.

use pk_venue::VenueState;

/// One committed reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRow {
    pub family:     String,
    pub people:     u32,
    pub start_hour: i32,
    /// Exclusive.
    pub end_hour:   i32,
}

/// Scheduled occupancy of one hour of the operating window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyRow {
    pub hour:      i32,
    pub occupancy: u32,
    pub capacity:  u32,
}

/// Outcome totals and occupancy extremes for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRow {
    pub denied:            u64,
    pub accepted_original: u64,
    pub reprogrammed:      u64,
    pub peak:              u32,
    pub trough:            u32,
}

/// Every row a backend writes for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRows {
    pub reservations: Vec<ReservationRow>,
    pub occupancy:    Vec<OccupancyRow>,
    pub summary:      SummaryRow,
}

impl RunRows {
    pub fn from_venue(venue: &VenueState) -> Self {
        let reservations = venue
            .reservations()
            .iter()
            .map(|r| ReservationRow {
                family:     r.family.clone(),
                people:     r.people,
                start_hour: r.start.0,
                end_hour:   r.end.0,
            })
            .collect();

        let capacity = venue.capacity();
        let occupancy = venue
            .occupancy()
            .iter()
            .map(|(hour, occupancy)| OccupancyRow { hour: hour.0, occupancy, capacity })
            .collect();

        let report = venue.final_report();
        let summary = SummaryRow {
            denied:            report.counters.denied,
            accepted_original: report.counters.accepted_original,
            reprogrammed:      report.counters.reprogrammed,
            peak:              report.peak.occupancy,
            trough:            report.trough.occupancy,
        };

        Self { reservations, occupancy, summary }
    }
}
