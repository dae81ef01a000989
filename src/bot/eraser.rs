//! History Eraser module: bulk removal of everything the bot tracked in a
//! conversation.

use tracing::{debug, info, warn};

use crate::transport::{ChatTransport, MessageRef};

use super::lifecycle::ConversationSession;

/// Summary of an `erase_all` run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EraseReport {
    /// References for which at least one deletion was issued
    pub attempted: usize,
    /// Bulk delete calls issued
    pub bulk_calls: usize,
    /// Bulk calls that failed and fell back to single deletes
    pub failed_chunks: usize,
    /// Single delete calls issued by the fallback
    pub fallback_calls: usize,
    /// Single deletes that failed as well
    pub fallback_failures: usize,
}

impl<T: ChatTransport> ConversationSession<'_, T> {
    /// Delete every tracked message, then reset the conversation.
    ///
    /// Tracked ids are deleted in chunks of the configured size with one bulk
    /// call each. A failed chunk is retried message by message and the
    /// individual failures are ignored. Whatever the transport reports, the
    /// tracked history and the menu/answer references are empty afterwards.
    ///
    /// The live menu and answer are deleted too, even if they have already
    /// been evicted from the tracked history.
    pub async fn erase_all(&mut self) -> EraseReport {
        let chunk_size = self.config.delete_chunk_size.max(1);
        let mut tracked = self.state.tracked.to_vec();
        for live in [self.state.menu, self.state.answer].into_iter().flatten() {
            if !tracked.contains(&live.message_id) {
                tracked.push(live.message_id);
            }
        }
        let mut report = EraseReport::default();

        for chunk in tracked.chunks(chunk_size) {
            report.bulk_calls += 1;
            report.attempted += chunk.len();

            match self.transport.delete_messages(self.chat_id, chunk).await {
                Ok(()) => {
                    debug!(chat_id = %self.chat_id, count = chunk.len(), "Deleted message chunk");
                }
                Err(e) => {
                    warn!(chat_id = %self.chat_id, count = chunk.len(), error = %e, "Bulk delete failed, deleting one by one");
                    report.failed_chunks += 1;

                    for &message_id in chunk {
                        report.fallback_calls += 1;
                        let message = MessageRef::new(self.chat_id, message_id);
                        if let Err(e) = self.transport.delete_message(message).await {
                            debug!(chat_id = %self.chat_id, message_id = message_id.0, error = %e, "Message could not be deleted");
                            report.fallback_failures += 1;
                        }
                    }
                }
            }
        }

        self.state.reset();

        info!(
            chat_id = %self.chat_id,
            attempted = report.attempted,
            failed_chunks = report.failed_chunks,
            fallback_failures = report.fallback_failures,
            "Conversation history erased"
        );

        report
    }
}
