//! Stream indexing loop

use std::future::Future;

use sqlx::AnyConnection;
use tokio::io::AsyncBufRead;
use tracing::{debug, error, info, warn};

use crate::dispatch::dispatch_document;
use crate::reader::{DocumentReader, Line};
use crate::stats::IngestStats;

/// Index every document from `input` until it ends or `shutdown` resolves.
///
/// Lines are handled strictly one after another; `shutdown` is only checked
/// while waiting for the next line, so a document being written always
/// finishes.
pub async fn index_stream<R, S>(input: R, conn: &mut AnyConnection, shutdown: S) -> IngestStats
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut reader = DocumentReader::new(input);
    let mut stats = IngestStats::default();
    tokio::pin!(shutdown);

    loop {
        let next = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Interrupted, no further input will be read");
                stats.interrupted = true;
                break;
            }
            next = reader.next_line() => next,
        };

        match next {
            Ok(None) => {
                debug!("End of input");
                break;
            }
            Ok(Some(Line::Blank)) => stats.blank_lines += 1,
            Ok(Some(Line::Malformed(e))) => {
                warn!(line = reader.line_no(), "Skipping malformed input: {}", e);
                stats.malformed_lines += 1;
            }
            Ok(Some(Line::Document(payload))) => {
                stats.documents += 1;
                dispatch_document(conn, &payload, &mut stats).await;
            }
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    stats.lines_read = reader.line_no();
    stats
}
