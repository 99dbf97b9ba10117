//! CSV export: stream channel history into a writer, newest first.
//!
//! Long exports pause briefly every `PACE_EVERY` rows so the backing
//! stream's page fetches stay under Telegram's flood limits.

use crate::domain::{normalize_channel, DomainError, MessageRecord};
use crate::ports::{ChannelGateway, MessageStream};
use crate::shared::progress;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const CSV_HEADER: [&str; 5] = ["id", "date", "text", "views", "forwards"];
/// Pause after this many rows.
const PACE_EVERY: usize = 100;
const PACE_DELAY: Duration = Duration::from_secs(1);

/// Export service. Streams history records into CSV.
pub struct ExportService {
    gateway: Arc<dyn ChannelGateway>,
}

impl ExportService {
    pub fn new(gateway: Arc<dyn ChannelGateway>) -> Self {
        Self { gateway }
    }

    /// Write up to `limit` messages (all history when `None`) into `sink` as
    /// CSV, newest first. Returns the number of data rows written.
    pub async fn export_csv<W: std::io::Write + Send>(
        &self,
        channel: &str,
        limit: Option<usize>,
        sink: W,
    ) -> Result<usize, DomainError> {
        let handle = normalize_channel(channel);
        let mut stream = self.gateway.iter_messages(handle, limit).await?;
        let mut writer = csv::Writer::from_writer(sink);

        let pb = progress::scan_spinner("exporting channel history");
        let rows = Self::write_rows(stream.as_mut(), &mut writer, &pb).await;
        pb.finish_and_clear();
        let rows = rows?;

        writer
            .flush()
            .map_err(|e| DomainError::Output(e.to_string()))?;
        info!(channel = handle, rows, "export complete");
        Ok(rows)
    }

    async fn write_rows<W: std::io::Write + Send>(
        stream: &mut dyn MessageStream,
        writer: &mut csv::Writer<W>,
        pb: &ProgressBar,
    ) -> Result<usize, DomainError> {
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| DomainError::Output(e.to_string()))?;

        let mut count = 0usize;
        while let Some(record) = stream.next().await? {
            writer
                .write_record(csv_row(&record))
                .map_err(|e| DomainError::Output(e.to_string()))?;
            count += 1;
            pb.set_message(format!("exported {count} rows"));
            if count % PACE_EVERY == 0 {
                writer
                    .flush()
                    .map_err(|e| DomainError::Output(e.to_string()))?;
                tokio::time::sleep(PACE_DELAY).await;
            }
        }
        Ok(count)
    }
}

fn csv_row(record: &MessageRecord) -> [String; 5] {
    [
        record.id.to_string(),
        record.timestamp.to_rfc3339(),
        record.text.as_deref().map(flatten_text).unwrap_or_default(),
        record.views.map(|v| v.to_string()).unwrap_or_default(),
        record.forwards.map(|f| f.to_string()).unwrap_or_default(),
    ]
}

/// Single-line CSV cell: LF becomes a space, CR is dropped.
fn flatten_text(text: &str) -> String {
    text.replace('\n', " ").replace('\r', "")
}
