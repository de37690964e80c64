//! Compliance configuration.

/// Thresholds used when deriving alerts.
#[derive(Debug, Clone)]
pub struct ComplianceConfig {
    /// Dates this many days ahead (today inclusive) raise an alert
    /// (default: 30).
    pub alert_horizon_days: i64,
    /// New soon-due alerts only notify inside this window (default: 7).
    /// Overdue alerts always notify.
    pub notification_window_days: i64,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            alert_horizon_days: 30,
            notification_window_days: 7,
        }
    }
}
