use super::models::{SyncOutcome, SyncRequest, SyncResponse};
use crate::config::Config;
use crate::error::{network_error, AppResult, Error};
use crate::record::EventRecord;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::info;
use url::Url;

/// The sync actor that processes push requests one at a time
pub struct GoogleSyncActor {
    config: Arc<RwLock<Config>>,
    client: Client,
    command_rx: mpsc::Receiver<GoogleSyncCommand>,
}

/// Commands that can be sent to the sync actor
pub enum GoogleSyncCommand {
    PushEvent(EventRecord, mpsc::Sender<AppResult<SyncOutcome>>),
    Shutdown,
}

/// Handle for communicating with the sync actor
#[derive(Clone)]
pub struct GoogleSyncActorHandle {
    command_tx: mpsc::Sender<GoogleSyncCommand>,
}

impl GoogleSyncActorHandle {
    /// Push one event record to the collaborator endpoint
    pub async fn push_event(&self, record: EventRecord) -> AppResult<SyncOutcome> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleSyncCommand::PushEvent(record, response_tx))
            .await
            .map_err(|e| network_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| network_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(GoogleSyncCommand::Shutdown).await;
        Ok(())
    }
}

impl GoogleSyncActor {
    /// Create a new actor and return its handle.
    ///
    /// The request timeout is baked into the client here; a request that
    /// outlives it surfaces as a network error instead of pending forever.
    pub fn new(
        config: Arc<RwLock<Config>>,
        timeout: Duration,
    ) -> AppResult<(Self, GoogleSyncActorHandle)> {
        let (command_tx, command_rx) = mpsc::channel(32);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::from)?;

        let actor = Self {
            config: Arc::clone(&config),
            client,
            command_rx,
        };

        let handle = GoogleSyncActorHandle { command_tx };

        Ok((actor, handle))
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Google sync actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                GoogleSyncCommand::PushEvent(record, response_tx) => {
                    let result = Self::push_event(
                        Arc::clone(&self.config),
                        self.client.clone(),
                        record,
                    )
                    .await;
                    let _ = response_tx.send(result).await;
                }
                GoogleSyncCommand::Shutdown => {
                    info!("Google sync actor shutting down");
                    break;
                }
            }
        }

        info!("Google sync actor shut down");
    }

    /// POST the record to the sync endpoint and map the response
    async fn push_event(
        config: Arc<RwLock<Config>>,
        client: Client,
        record: EventRecord,
    ) -> AppResult<SyncOutcome> {
        // Get endpoint from config
        let endpoint = {
            let config_read = config.read().await;
            config_read.sync_endpoint.clone()
        };

        let url = Url::parse(&endpoint)
            .map_err(|e| network_error(&format!("Failed to parse endpoint URL: {}", e)))?;

        let request = SyncRequest::from(&record);

        // Make the API request; transport errors and timeouts map to Network
        let response = client.post(url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(network_error(&format!(
                "Sync endpoint returned HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: SyncResponse = response
            .json()
            .await
            .map_err(|e| network_error(&format!("Failed to parse sync response: {}", e)))?;

        Ok(response_data.into_outcome())
    }
}
