//! Channel statistics: fetch recent messages and aggregate counters.
//!
//! - `recent_messages` collects the newest N records
//! - `channel_stats` scans newest-first, filters, and aggregates
//! - `message_stats` inspects one message addressed by t.me URL

use crate::domain::{
    normalize_channel, parse_date_boundary, parse_message_url, ChannelReport, DomainError,
    MessageDetail, MessageRecord, ReportMessage,
};
use crate::ports::{ChannelGateway, MessageStream};
use crate::shared::progress;
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use std::sync::Arc;
use tracing::{debug, info};

/// Statistics service. Coordinates channel resolution, history streaming and
/// counter aggregation.
pub struct StatsService {
    gateway: Arc<dyn ChannelGateway>,
}

impl StatsService {
    pub fn new(gateway: Arc<dyn ChannelGateway>) -> Self {
        Self { gateway }
    }

    /// The newest `limit` messages of a channel, reverse-chronological.
    pub async fn recent_messages(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, DomainError> {
        let handle = normalize_channel(channel);
        let mut stream = self.gateway.iter_messages(handle, Some(limit)).await?;
        // No pre-allocation from `limit`: it is caller input with no upper
        // bound, far beyond what the channel may actually hold.
        let mut messages = Vec::new();
        while let Some(record) = stream.next().await? {
            messages.push(record);
        }
        debug!(
            channel = handle,
            count = messages.len(),
            "fetched recent messages"
        );
        Ok(messages)
    }

    /// Scan the channel newest-first and aggregate view/forward counters over
    /// up to `limit` messages that pass the filters.
    ///
    /// `max_date` (YYYY-MM-DD) keeps messages posted at or before that UTC
    /// midnight; `only_with_text` drops messages without text. Filters narrow
    /// the scan; they never extend it past `limit` accepted messages.
    pub async fn channel_stats(
        &self,
        channel: &str,
        limit: usize,
        max_date: Option<&str>,
        only_with_text: bool,
    ) -> Result<ChannelReport, DomainError> {
        // Reject a bad date before any network traffic.
        let boundary = max_date.map(parse_date_boundary).transpose()?;
        let handle = normalize_channel(channel);
        let mut stream = self.gateway.iter_messages(handle, None).await?;

        let pb = progress::scan_spinner("scanning channel history");
        let report = Self::aggregate(stream.as_mut(), boundary, only_with_text, limit, &pb).await;
        pb.finish_and_clear();
        let report = report?;

        info!(
            channel = handle,
            analyzed = report.count_analyzed,
            total_views = report.total_views,
            total_forwards = report.total_forwards,
            "channel stats computed"
        );
        Ok(report)
    }

    async fn aggregate(
        stream: &mut dyn MessageStream,
        boundary: Option<DateTime<Utc>>,
        only_with_text: bool,
        limit: usize,
        pb: &ProgressBar,
    ) -> Result<ChannelReport, DomainError> {
        let mut messages: Vec<ReportMessage> = Vec::new();
        let mut total_views = 0u64;
        let mut total_forwards = 0u64;
        let mut scanned = 0usize;

        while let Some(record) = stream.next().await? {
            scanned += 1;
            pb.set_message(format!("scanned {scanned}, kept {}", messages.len()));

            if let Some(boundary) = boundary {
                if record.timestamp > boundary {
                    continue;
                }
            }
            if only_with_text && record.text.as_deref().map_or(true, str::is_empty) {
                continue;
            }
            if messages.len() >= limit {
                break;
            }

            let views = record.views.unwrap_or(0);
            let forwards = record.forwards.unwrap_or(0);
            total_views += views as u64;
            total_forwards += forwards as u64;
            messages.push(ReportMessage {
                id: record.id,
                timestamp: record.timestamp,
                text: record.text,
                views,
                forwards,
            });
        }

        Ok(ChannelReport::new(total_views, total_forwards, messages))
    }

    /// Stats for one message addressed by its t.me URL.
    pub async fn message_stats(&self, url: &str) -> Result<MessageDetail, DomainError> {
        let (channel, message_id) = parse_message_url(url)?;
        let detail = self.gateway.get_message(&channel, message_id).await?;
        detail.ok_or_else(|| DomainError::NotFound(format!("{}/{}", channel, message_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubStream {
        records: VecDeque<MessageRecord>,
        remaining: Option<usize>,
    }

    #[async_trait]
    impl MessageStream for StubStream {
        async fn next(&mut self) -> Result<Option<MessageRecord>, DomainError> {
            if self.remaining == Some(0) {
                return Ok(None);
            }
            let record = self.records.pop_front();
            if record.is_some() {
                if let Some(n) = self.remaining.as_mut() {
                    *n -= 1;
                }
            }
            Ok(record)
        }
    }

    struct StubGateway {
        records: Vec<MessageRecord>,
        detail: Option<MessageDetail>,
        calls: AtomicUsize,
        channels: Mutex<Vec<String>>,
    }

    impl StubGateway {
        fn with_records(records: Vec<MessageRecord>) -> Self {
            Self {
                records,
                detail: None,
                calls: AtomicUsize::new(0),
                channels: Mutex::new(Vec::new()),
            }
        }

        fn with_detail(detail: Option<MessageDetail>) -> Self {
            Self {
                records: Vec::new(),
                detail,
                calls: AtomicUsize::new(0),
                channels: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChannelGateway for StubGateway {
        async fn iter_messages(
            &self,
            channel: &str,
            limit: Option<usize>,
        ) -> Result<Box<dyn MessageStream>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.channels.lock().unwrap().push(channel.to_string());
            Ok(Box::new(StubStream {
                records: self.records.clone().into(),
                remaining: limit,
            }))
        }

        async fn get_message(
            &self,
            channel: &str,
            _message_id: i32,
        ) -> Result<Option<MessageDetail>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.channels.lock().unwrap().push(channel.to_string());
            Ok(self.detail.clone())
        }
    }

    fn record(id: i32, day: u32, text: Option<&str>, views: i32, forwards: i32) -> MessageRecord {
        MessageRecord {
            id,
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            text: text.map(String::from),
            sender_id: Some(1),
            has_media: false,
            views: Some(views),
            forwards: Some(forwards),
            reply_to_id: None,
        }
    }

    fn service(gateway: StubGateway) -> (StatsService, Arc<StubGateway>) {
        let gateway = Arc::new(gateway);
        (StatsService::new(gateway.clone()), gateway)
    }

    #[tokio::test]
    async fn empty_channel_yields_zeroed_report() {
        let (svc, _) = service(StubGateway::with_records(vec![]));
        let report = svc.channel_stats("rustlang", 100, None, false).await.unwrap();
        assert_eq!(report.count_analyzed, 0);
        assert_eq!(report.total_views, 0);
        assert_eq!(report.total_forwards, 0);
        assert_eq!(report.average_views, 0.0);
        assert_eq!(report.average_forwards, 0.0);
        assert!(report.messages.is_empty());
    }

    #[tokio::test]
    async fn aggregates_totals_and_averages() {
        let records = vec![
            record(3, 20, Some("c"), 30, 3),
            record(2, 19, Some("b"), 20, 2),
            record(1, 18, Some("a"), 10, 1),
        ];
        let (svc, _) = service(StubGateway::with_records(records));
        let report = svc.channel_stats("rustlang", 100, None, false).await.unwrap();
        assert_eq!(report.count_analyzed, 3);
        assert_eq!(report.total_views, 60);
        assert_eq!(report.total_forwards, 6);
        assert_eq!(report.average_views, 20.0);
        assert_eq!(report.average_forwards, 2.0);
    }

    #[tokio::test]
    async fn averages_round_to_two_decimals() {
        let records = vec![
            record(3, 20, Some("c"), 1, 0),
            record(2, 19, Some("b"), 1, 0),
            record(1, 18, Some("a"), 0, 1),
        ];
        let (svc, _) = service(StubGateway::with_records(records));
        let report = svc.channel_stats("rustlang", 100, None, false).await.unwrap();
        assert_eq!(report.average_views, 0.67);
        assert_eq!(report.average_forwards, 0.33);
    }

    #[tokio::test]
    async fn only_text_filter_excludes_untexted_messages() {
        let records = vec![
            record(3, 20, Some("c"), 30, 3),
            record(2, 19, None, 500, 50),
            record(1, 18, Some("a"), 10, 1),
        ];
        let (svc, _) = service(StubGateway::with_records(records));
        let report = svc.channel_stats("rustlang", 100, None, true).await.unwrap();
        assert_eq!(report.count_analyzed, 2);
        assert_eq!(report.total_views, 40);
        assert_eq!(report.total_forwards, 4);
        assert!(report.messages.iter().all(|m| m.id != 2));
    }

    #[tokio::test]
    async fn max_date_skips_messages_after_boundary() {
        let records = vec![
            record(3, 20, Some("c"), 30, 3),
            record(2, 10, Some("b"), 20, 2),
            record(1, 5, Some("a"), 10, 1),
        ];
        let (svc, _) = service(StubGateway::with_records(records));
        let report = svc
            .channel_stats("rustlang", 100, Some("2024-01-15"), false)
            .await
            .unwrap();
        assert_eq!(report.count_analyzed, 2);
        assert_eq!(report.messages[0].id, 2);
        assert_eq!(report.messages[1].id, 1);
        assert_eq!(report.total_views, 30);
    }

    #[tokio::test]
    async fn limit_caps_accepted_messages() {
        let records = vec![
            record(3, 20, None, 30, 3),
            record(2, 19, Some("b"), 20, 2),
            record(1, 18, Some("a"), 10, 1),
        ];
        let (svc, _) = service(StubGateway::with_records(records));
        let report = svc.channel_stats("rustlang", 1, None, true).await.unwrap();
        assert_eq!(report.count_analyzed, 1);
        assert_eq!(report.messages[0].id, 2);
        assert_eq!(report.total_views, 20);
    }

    #[tokio::test]
    async fn limit_zero_yields_empty_report() {
        let records = vec![record(1, 18, Some("a"), 10, 1)];
        let (svc, _) = service(StubGateway::with_records(records));
        let report = svc.channel_stats("rustlang", 0, None, false).await.unwrap();
        assert_eq!(report.count_analyzed, 0);
        assert_eq!(report.total_views, 0);
    }

    #[tokio::test]
    async fn invalid_date_rejected_before_gateway_call() {
        let (svc, gateway) = service(StubGateway::with_records(vec![]));
        let err = svc
            .channel_stats("rustlang", 100, Some("15-01-2024"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidDateFormat(_)));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn recent_messages_honors_limit_and_order() {
        let records = vec![
            record(5, 22, Some("e"), 5, 0),
            record(4, 21, Some("d"), 4, 0),
            record(3, 20, Some("c"), 3, 0),
            record(2, 19, Some("b"), 2, 0),
            record(1, 18, Some("a"), 1, 0),
        ];
        let (svc, _) = service(StubGateway::with_records(records));
        let messages = svc.recent_messages("rustlang", 3).await.unwrap();
        let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn recent_messages_accepts_absurd_limit() {
        let records = vec![record(2, 19, Some("b"), 2, 0), record(1, 18, Some("a"), 1, 0)];
        let (svc, _) = service(StubGateway::with_records(records));
        let messages = svc.recent_messages("rustlang", usize::MAX).await.unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn normalizes_channel_before_gateway() {
        let (svc, gateway) = service(StubGateway::with_records(vec![]));
        svc.recent_messages("https://t.me/rustlang", 1).await.unwrap();
        svc.recent_messages("@rustlang", 1).await.unwrap();
        let channels = gateway.channels.lock().unwrap();
        assert_eq!(channels.as_slice(), ["rustlang", "rustlang"]);
    }

    #[tokio::test]
    async fn message_stats_returns_detail() {
        let detail = MessageDetail {
            id: 42,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 18, 12, 0, 0).unwrap(),
            text: Some("hello".into()),
            views: 7,
            forwards: 1,
            has_media: false,
            reactions: None,
        };
        let (svc, gateway) = service(StubGateway::with_detail(Some(detail)));
        let got = svc.message_stats("https://t.me/rustlang/42").await.unwrap();
        assert_eq!(got.id, 42);
        assert_eq!(gateway.channels.lock().unwrap().as_slice(), ["rustlang"]);
    }

    #[tokio::test]
    async fn message_stats_maps_missing_message_to_not_found() {
        let (svc, _) = service(StubGateway::with_detail(None));
        let err = svc.message_stats("https://t.me/rustlang/42").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn message_stats_rejects_malformed_url_without_gateway_call() {
        let (svc, gateway) = service(StubGateway::with_detail(None));
        let err = svc.message_stats("https://t.me/rustlang").await.unwrap_err();
        assert!(matches!(err, DomainError::MalformedMessageUrl(_)));
        assert_eq!(gateway.calls(), 0);
    }
}
