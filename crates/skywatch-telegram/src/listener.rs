use crate::api::Update;
use crate::client::TelegramClient;
use skywatch_domain::{ReportService, FETCHING_ACK};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);
const DRAIN_ATTEMPTS: u32 = 3;

/// Returns true for the report command in any of its Telegram spellings:
/// `/info`, `/info@some_bot`, or either followed by arguments.
pub fn is_info_command(text: &str) -> bool {
    match text.split_whitespace().next() {
        Some(command) => command == "/info" || command.starts_with("/info@"),
        None => false,
    }
}

/// Polls Telegram for `/info` commands and answers each with a sensor
/// report. Designed to run as a single app process under the runner.
pub struct CommandListener {
    client: TelegramClient,
    service: Arc<ReportService>,
}

impl CommandListener {
    pub fn new(client: TelegramClient, service: Arc<ReportService>) -> Self {
        Self { client, service }
    }

    pub async fn run(self, ctx: CancellationToken) -> anyhow::Result<()> {
        // Commands sent while the bot was down are answered by nobody.
        let mut offset = match self
            .client
            .drain_pending_with_retry(DRAIN_ATTEMPTS, POLL_RETRY_DELAY)
            .await
        {
            Ok(offset) => offset,
            Err(err) => {
                // Polling from 0 replays the backlog, answering stale
                // commands late.
                warn!("failed to drain pending updates: {:#}", err);
                0
            }
        };

        info!("command listener started");
        loop {
            let updates = tokio::select! {
                _ = ctx.cancelled() => {
                    info!("command listener shutting down");
                    break;
                }
                result = self.client.get_updates(offset) => result,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(err) => {
                    if ctx.is_cancelled() {
                        break;
                    }
                    warn!("polling telegram failed: {:#}", err);
                    tokio::select! {
                        _ = ctx.cancelled() => break,
                        _ = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                    }
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                self.handle_update(update).await;
            }
        }

        Ok(())
    }

    async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            return;
        };
        if !is_info_command(&text) {
            debug!(chat_id = message.chat.id, "ignoring non-command message");
            return;
        }

        info!(chat_id = message.chat.id, "handling /info command");

        // Ack immediately so the user sees progress, then edit the ack
        // into the finished report.
        let ack = match self.client.send_message(message.chat.id, FETCHING_ACK).await {
            Ok(ack) => ack,
            Err(err) => {
                error!(chat_id = message.chat.id, "failed to send ack: {:#}", err);
                return;
            }
        };

        let report = self.service.build_report().await;

        if let Err(err) = self
            .client
            .edit_message_text(message.chat.id, ack.message_id, &report)
            .await
        {
            error!(chat_id = message.chat.id, "failed to deliver report: {:#}", err);
        }
    }
}
