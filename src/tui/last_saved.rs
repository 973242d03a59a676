use chrono::{DateTime, Local, Utc};

/// When the most recent successful save happened, for the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastSaved {
    at: Option<DateTime<Utc>>,
}

impl LastSaved {
    pub fn record(&mut self, now: DateTime<Utc>) {
        self.at = Some(now);
    }

    pub fn at(&self) -> Option<DateTime<Utc>> {
        self.at
    }

    /// Relative age, falling back to the local calendar date after a day.
    pub fn format(&self, now: DateTime<Utc>) -> String {
        let Some(at) = self.at else {
            return "Never".into();
        };
        let secs = (now - at).num_seconds().max(0);
        if secs < 60 {
            format!("{secs}s ago")
        } else if secs < 60 * 60 {
            format!("{}m ago", secs / 60)
        } else if secs < 24 * 60 * 60 {
            format!("{}h ago", secs / 3600)
        } else {
            at.with_timezone(&Local).format("%Y-%m-%d").to_string()
        }
    }
}
