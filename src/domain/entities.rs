//! Domain entities. Pure data structures for the core business.
//!
//! No Telegram/IO types here — these are mapped from adapters. Reports are
//! request-scoped: built during one command invocation, serialized, dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single message fetched from a channel, as yielded by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: i32,
    pub timestamp: DateTime<Utc>,
    /// Message text; `None` for media-only posts.
    pub text: Option<String>,
    pub sender_id: Option<i64>,
    pub has_media: bool,
    /// View counter; only present on channel posts.
    pub views: Option<i32>,
    pub forwards: Option<i32>,
    pub reply_to_id: Option<i32>,
}

/// Reduced projection of a [`MessageRecord`] carried inside a report:
/// id, timestamp, text, and the counters with missing values collapsed to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMessage {
    pub id: i32,
    pub timestamp: DateTime<Utc>,
    pub text: Option<String>,
    pub views: i32,
    pub forwards: i32,
}

/// Aggregated view/forward statistics over the analyzed slice of a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub count_analyzed: usize,
    pub total_views: u64,
    pub total_forwards: u64,
    /// `total_views / count_analyzed`, rounded to 2 decimals; 0 when empty.
    pub average_views: f64,
    pub average_forwards: f64,
    pub messages: Vec<ReportMessage>,
}

impl ChannelReport {
    /// Build a report from accumulated totals. `count_analyzed` is always the
    /// length of `messages`; averages avoid division by zero.
    pub fn new(total_views: u64, total_forwards: u64, messages: Vec<ReportMessage>) -> Self {
        let count_analyzed = messages.len();
        let (average_views, average_forwards) = if count_analyzed == 0 {
            (0.0, 0.0)
        } else {
            (
                round2(total_views as f64 / count_analyzed as f64),
                round2(total_forwards as f64 / count_analyzed as f64),
            )
        };
        Self {
            count_analyzed,
            total_views,
            total_forwards,
            average_views,
            average_forwards,
            messages,
        }
    }
}

/// Detail record for a single message lookup. `reactions` is passed through
/// opaquely; its shape is owned by the gateway adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDetail {
    pub id: i32,
    pub timestamp: DateTime<Utc>,
    pub text: Option<String>,
    pub views: i32,
    pub forwards: i32,
    pub has_media: bool,
    pub reactions: Option<serde_json::Value>,
}

/// Outcome of a sign-in attempt: done, or the account requires a 2FA password.
#[derive(Debug)]
pub enum SignInResult {
    Success,
    PasswordRequired { hint: Option<String> },
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_message(id: i32, views: i32, forwards: i32) -> ReportMessage {
        ReportMessage {
            id,
            timestamp: DateTime::UNIX_EPOCH,
            text: Some(format!("message {id}")),
            views,
            forwards,
        }
    }

    #[test]
    fn empty_report_has_zero_averages() {
        let report = ChannelReport::new(0, 0, vec![]);
        assert_eq!(report.count_analyzed, 0);
        assert_eq!(report.total_views, 0);
        assert_eq!(report.total_forwards, 0);
        assert_eq!(report.average_views, 0.0);
        assert_eq!(report.average_forwards, 0.0);
        assert!(report.messages.is_empty());
    }

    #[test]
    fn averages_are_totals_over_count() {
        let messages = vec![
            report_message(3, 10, 1),
            report_message(2, 20, 2),
            report_message(1, 30, 3),
        ];
        let report = ChannelReport::new(60, 6, messages);
        assert_eq!(report.count_analyzed, 3);
        assert_eq!(report.average_views, 20.0);
        assert_eq!(report.average_forwards, 2.0);
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let messages = vec![
            report_message(3, 1, 0),
            report_message(2, 0, 0),
            report_message(1, 0, 0),
        ];
        let report = ChannelReport::new(1, 0, messages);
        // 1/3 = 0.333... rounds to 0.33
        assert_eq!(report.average_views, 0.33);
        assert_eq!(report.average_forwards, 0.0);
    }

    #[test]
    fn count_analyzed_tracks_message_list() {
        let report = ChannelReport::new(5, 0, vec![report_message(1, 5, 0)]);
        assert_eq!(report.count_analyzed, report.messages.len());
    }
}
