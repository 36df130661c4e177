use std::{collections::VecDeque, fmt::Display, time::{SystemTime, UNIX_EPOCH}};

/// Default number of entries kept before the oldest ones are evicted.
pub const LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub operation: String,
    pub details: Option<String>,
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let millis = self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_millis())
            .unwrap_or_default();

        match &self.details {
            Some(details) => write!(f, "[{millis}] {}: {details}", self.operation),
            None => write!(f, "[{millis}] {}", self.operation)
        }
    }
}

/// Bounded operation log, oldest entry first.
#[derive(Debug, Clone)]
pub struct Profiler {
    logs: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            logs: VecDeque::with_capacity(capacity.min(LOG_CAPACITY)),
            capacity,
        }
    }

    pub fn log(&mut self, operation: impl Into<String>) {
        self.push(operation.into(), None);
    }

    pub fn log_details(&mut self, operation: impl Into<String>, details: impl Into<String>) {
        self.push(operation.into(), Some(details.into()));
    }

    fn push(&mut self, operation: String, details: Option<String>) {
        if self.capacity == 0 {
            return;
        }

        while self.logs.len() >= self.capacity {
            let _ = self.logs.pop_front();
        }

        self.logs.push_back(LogEntry {
            timestamp: SystemTime::now(),
            operation,
            details,
        });
    }

    pub fn logs(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.logs.iter()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
