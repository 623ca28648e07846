use chrono::{TimeZone, Utc};

/// Days between the serial-day epoch (1899-12-30) and the Unix epoch.
const SERIAL_DAY_UNIX_OFFSET: f64 = 25_569.0;
const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub timestamp_ms: u64,
    pub price: f64,
}

impl Tick {
    pub fn new(timestamp_ms: u64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }

    /// Create a tick stamped with the current wall clock.
    pub fn now(price: f64) -> Self {
        Self {
            timestamp_ms: Utc::now().timestamp_millis().max(0) as u64,
            price,
        }
    }

    /// Timestamp as a serial-day float: integer part is days since
    /// 1899-12-30, fraction is time of day. This is the numeric form the
    /// chart consumes for its time axis.
    pub fn serial_day(&self) -> f64 {
        self.timestamp_ms as f64 / MS_PER_DAY + SERIAL_DAY_UNIX_OFFSET
    }
}

/// Invert a serial-day value back to a HH:MM:SS label for axis annotation.
pub fn serial_day_to_label(serial_day: f64) -> String {
    let ms = ((serial_day - SERIAL_DAY_UNIX_OFFSET) * MS_PER_DAY).round() as i64;
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_day_epoch() {
        let t = Tick::new(0, 100.0);
        assert!((t.serial_day() - 25_569.0).abs() < 1e-9);
    }

    #[test]
    fn serial_day_is_monotonic() {
        let a = Tick::new(1_700_000_000_000, 1.0);
        let b = Tick::new(1_700_000_000_001, 1.0);
        assert!(b.serial_day() > a.serial_day());
    }

    #[test]
    fn serial_day_round_trips_to_label() {
        // 2023-11-14 22:13:20 UTC
        let t = Tick::new(1_700_000_000_000, 1.0);
        assert_eq!(serial_day_to_label(t.serial_day()), "22:13:20");
    }
}
