use serde_json::Value;
use tokio::time::Instant;

use crate::constants::defaults;

/// One normalized water-quality reading
///
/// Values are passed through exactly as the sensor sent them; no numeric
/// validation takes place.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub dissolved_oxygen: Value,
    pub temperature: Value,
    pub ph: Value,
    pub conductivity: Value,
}

impl Reading {
    /// Reading with every quantity set to the sentinel value
    pub fn sentinel() -> Self {
        Reading {
            dissolved_oxygen: sentinel_value(),
            temperature: sentinel_value(),
            ph: sentinel_value(),
            conductivity: sentinel_value(),
        }
    }

    /// Row layout shared by the raw and primary sheets
    pub fn sheet_row(&self, timestamp: String) -> Vec<Value> {
        vec![
            Value::String(timestamp),
            self.dissolved_oxygen.clone(),
            self.temperature.clone(),
            self.ph.clone(),
            self.conductivity.clone(),
        ]
    }
}

pub fn sentinel_value() -> Value {
    Value::from(defaults::SENTINEL_VALUE)
}

/// Most recent reading accepted by the HTTP endpoint
#[derive(Clone, Debug, Default)]
pub struct LatestValues {
    pub reading: Option<Reading>,
    pub captured_at: Option<Instant>,
}

impl LatestValues {
    pub fn record(&mut self, reading: Reading, captured_at: Instant) {
        self.reading = Some(reading);
        self.captured_at = Some(captured_at);
    }

    /// True when nothing was ever captured or the last capture is older than `threshold`
    pub fn is_stale(&self, now: Instant, threshold: std::time::Duration) -> bool {
        match self.captured_at {
            None => true,
            Some(captured_at) => now.saturating_duration_since(captured_at) > threshold,
        }
    }
}
