//! Coordinator observer trait for hour reports and decision records.

use std::sync::Arc;

use pk_core::Hour;
use pk_venue::{Decision, FinalReport, HourReport};
use pk_wire::Message;

/// Callbacks invoked by the coordinator's worker threads.
///
/// Both workers share one observer, so methods take `&self`; implementors
/// that collect data need interior mutability.  Callbacks always run with
/// the venue lock released.
///
/// All methods have default no-op implementations.
///
/// # Example: hour printer
///
/// ```rust,ignore
/// struct HourPrinter;
///
/// impl ParkObserver for HourPrinter {
///     fn on_hour(&self, report: &HourReport) {
///         println!("{report}");
///     }
/// }
/// ```
pub trait ParkObserver: Send + Sync {
    /// An agent registered.  `added` is `false` for a repeated REGISTER.
    fn on_register(&self, _agent: &str, _hour: Hour, _added: bool) {}

    /// A REQUEST was decided.  Called whether or not the response could be
    /// delivered.
    fn on_decision(&self, _request: &Message, _decision: &Decision) {}

    /// The clock moved to a new hour.
    fn on_hour(&self, _report: &HourReport) {}

    /// The clock reached closing and SHUTDOWN went out to `agents` agents.
    fn on_shutdown(&self, _final_hour: Hour, _agents: usize) {}

    /// Both workers joined.  Called once with the summary the run returns.
    fn on_run_end(&self, _report: &FinalReport) {}
}

/// A [`ParkObserver`] that does nothing.
pub struct NoopObserver;

impl ParkObserver for NoopObserver {}

/// Lets a caller keep a handle on an observer it hands to the coordinator.
impl<T: ParkObserver + ?Sized> ParkObserver for Arc<T> {
    fn on_register(&self, agent: &str, hour: Hour, added: bool) {
        (**self).on_register(agent, hour, added)
    }

    fn on_decision(&self, request: &Message, decision: &Decision) {
        (**self).on_decision(request, decision)
    }

    fn on_hour(&self, report: &HourReport) {
        (**self).on_hour(report)
    }

    fn on_shutdown(&self, final_hour: Hour, agents: usize) {
        (**self).on_shutdown(final_hour, agents)
    }

    fn on_run_end(&self, report: &FinalReport) {
        (**self).on_run_end(report)
    }
}
