use std::time::SystemTime;

/// One named measurement bound for the metrics sink.
#[derive(Debug, Clone)]
pub struct Metric {
    pub name: String,
    pub value: u128,
    pub timestamp: SystemTime,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: u128) -> Self {
        Self {
            name: name.into(),
            value,
            timestamp: SystemTime::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }
}
