//! `Coordinator` — owns the shared state and runs the two workers.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, bounded};
use pk_core::{Hour, ParkConfig};
use pk_venue::{FinalReport, VenueState};
use pk_wire::{Connector, Message};
use tracing::info;

use crate::clock::ClockDriver;
use crate::processor::RequestProcessor;
use crate::state::Shared;
use crate::{CoordError, CoordResult, ParkObserver, ProcessorStats};

/// Everything a finished run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Venue state after both workers joined.
    pub venue:      VenueState,
    pub report:     FinalReport,
    pub final_hour: Hour,
    pub processor:  ProcessorStats,
    /// Distinct agents that registered.
    pub agents:     usize,
}

/// Runs one park day.
///
/// Create via [`CoordinatorBuilder`][crate::CoordinatorBuilder].  A
/// coordinator is single-use: [`run`](Self::run) consumes it.
pub struct Coordinator<C: Connector, O: ParkObserver> {
    pub(crate) config: ParkConfig,
    pub(crate) shared: Arc<Shared<C, O, C::Sink>>,
}

impl<C: Connector, O: ParkObserver + 'static> Coordinator<C, O> {
    pub fn config(&self) -> &ParkConfig {
        &self.config
    }

    /// Spawn the request processor and the clock driver, wait for both,
    /// then build the final report.
    ///
    /// `inbound` is the shared channel every agent writes to.  A fatal
    /// error in the request processor is returned as soon as that worker
    /// stops, without waiting for the clock.
    pub fn run(self, inbound: Receiver<Message>) -> CoordResult<RunSummary> {
        info!(
            open = %self.config.open_hour,
            close = %self.config.close_hour,
            capacity = self.config.capacity,
            hour_ms = self.config.hour_duration.as_millis() as u64,
            "park opening"
        );

        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let processor = RequestProcessor::new(Arc::clone(&self.shared));
        let processor = thread::Builder::new()
            .name("pk-requests".into())
            .spawn(move || processor.run(inbound, shutdown_rx))
            .map_err(|source| CoordError::Spawn { what: "request processor", source })?;

        let clock = ClockDriver::new(Arc::clone(&self.shared), self.config.hour_duration, shutdown_tx);
        let clock = thread::Builder::new()
            .name("pk-clock".into())
            .spawn(move || clock.run())
            .map_err(|source| CoordError::Spawn { what: "clock driver", source })?;

        let stats = processor
            .join()
            .map_err(|_| CoordError::WorkerPanicked("request processor"))??;
        let final_hour = clock
            .join()
            .map_err(|_| CoordError::WorkerPanicked("clock driver"))??;

        let (venue, agents) = {
            let state = self.shared.lock();
            (state.venue.clone(), state.registry.len())
        };
        let report = venue.final_report();
        info!(
            requests = stats.requests,
            denied = report.counters.denied,
            accepted_original = report.counters.accepted_original,
            reprogrammed = report.counters.reprogrammed,
            "park closed"
        );
        self.shared.observer.on_run_end(&report);

        Ok(RunSummary { venue, report, final_hour, processor: stats, agents })
    }
}
