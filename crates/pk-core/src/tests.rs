//! Unit tests for pk-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentSlot, ReservationId};

    #[test]
    fn index_roundtrip() {
        let id = ReservationId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ReservationId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn display() {
        assert_eq!(AgentSlot(3).to_string(), "AgentSlot(3)");
    }
}

#[cfg(test)]
mod hour {
    use crate::{Hour, STAY_HOURS};

    #[test]
    fn stay_end_is_two_hours_later() {
        assert_eq!(STAY_HOURS, 2);
        assert_eq!(Hour(9).stay_end(), Hour(11));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Hour(9) + 3, Hour(12));
        assert_eq!(Hour(12) - Hour(9), 3);
        assert_eq!(Hour(16).next(), Hour(17));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(Hour(7).to_string(), "7");
    }
}

#[cfg(test)]
mod clock {
    use crate::{Hour, ParkClock};

    #[test]
    fn starts_at_open_hour() {
        let clock = ParkClock::new(Hour(9), Hour(17));
        assert_eq!(clock.current_hour(), Hour(9));
        assert!(!clock.is_closed());
    }

    #[test]
    fn advances_one_hour_at_a_time_until_close() {
        let mut clock = ParkClock::new(Hour(9), Hour(11));
        assert_eq!(clock.advance(), Some(Hour(10)));
        assert_eq!(clock.advance(), Some(Hour(11)));
        assert!(clock.is_closed());
        assert_eq!(clock.advance(), None);
        assert_eq!(clock.current_hour(), Hour(11));
    }

    #[test]
    fn single_hour_window_is_closed_immediately() {
        let mut clock = ParkClock::new(Hour(12), Hour(12));
        assert!(clock.is_closed());
        assert_eq!(clock.advance(), None);
    }

    #[test]
    fn window_is_inclusive() {
        let clock = ParkClock::new(Hour(9), Hour(12));
        let hours: Vec<Hour> = clock.window().collect();
        assert_eq!(hours, vec![Hour(9), Hour(10), Hour(11), Hour(12)]);
        assert_eq!(clock.window_len(), 4);
        assert!(clock.contains(Hour(9)));
        assert!(clock.contains(Hour(12)));
        assert!(!clock.contains(Hour(13)));
        assert!(!clock.contains(Hour(8)));
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::{Hour, ParkConfig};

    fn valid() -> ParkConfig {
        ParkConfig {
            open_hour:     Hour(9),
            close_hour:    Hour(17),
            hour_duration: Duration::from_secs(1),
            capacity:      10,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn inverted_window_rejected() {
        let cfg = ParkConfig { open_hour: Hour(15), close_hour: Hour(10), ..valid() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn window_outside_operating_bounds_rejected() {
        let early = ParkConfig { open_hour: Hour(6), ..valid() };
        let late = ParkConfig { close_hour: Hour(20), ..valid() };
        assert!(early.validate().is_err());
        assert!(late.validate().is_err());
    }

    #[test]
    fn zero_capacity_and_duration_rejected() {
        assert!(ParkConfig { capacity: 0, ..valid() }.validate().is_err());
        assert!(ParkConfig { hour_duration: Duration::ZERO, ..valid() }.validate().is_err());
    }

    #[test]
    fn make_clock_uses_window() {
        let clock = valid().make_clock();
        assert_eq!(clock.open_hour(), Hour(9));
        assert_eq!(clock.close_hour(), Hour(17));
        assert_eq!(clock.current_hour(), Hour(9));
    }
}
