use api_client::{ApiClient, DispatchError};
use async_trait::async_trait;
use shared::{
    domain::Source,
    error::message_or_unknown,
    protocol::{EchoRequest, EchoResponse},
};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const IDLE_TRIGGER_LABEL: &str = "Send Message to API";
pub const PENDING_TRIGGER_LABEL: &str = "Sending...";

/// Seam between the interaction layer and whatever delivers the request.
#[async_trait]
pub trait MessageDispatch: Send + Sync {
    async fn send_message(&self, request: &EchoRequest) -> Result<EchoResponse, DispatchError>;
}

#[async_trait]
impl MessageDispatch for ApiClient {
    async fn send_message(&self, request: &EchoRequest) -> Result<EchoResponse, DispatchError> {
        ApiClient::send_message(self, request).await
    }
}

#[derive(Debug, Clone, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    Pending,
    Succeeded(EchoResponse),
    Failed(String),
}

impl DispatchState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn trigger_enabled(&self) -> bool {
        !self.is_pending()
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.is_pending() {
            PENDING_TRIGGER_LABEL
        } else {
            IDLE_TRIGGER_LABEL
        }
    }

    /// Text for the outcome panel; `None` while nothing has settled.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Idle | Self::Pending => None,
            Self::Succeeded(response) => {
                let data = serde_json::to_string_pretty(&response.data).unwrap_or_default();
                Some(format!(
                    "Received at: {}\n{data}",
                    response.received_at.to_rfc3339()
                ))
            }
            Self::Failed(message) => Some(format!("Error: {message}")),
        }
    }
}

pub struct MessageController<D: MessageDispatch> {
    source: Source,
    dispatch: D,
    state: Mutex<DispatchState>,
}

impl<D: MessageDispatch> MessageController<D> {
    pub fn new(source: Source, dispatch: D) -> Self {
        Self {
            source,
            dispatch,
            state: Mutex::new(DispatchState::Idle),
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub async fn state(&self) -> DispatchState {
        self.state.lock().await.clone()
    }

    /// Dispatches one greeting and settles the state with the outcome.
    /// Returns `false` when a dispatch is already in flight and this
    /// trigger was ignored.
    pub async fn trigger(&self) -> bool {
        {
            let mut state = self.state.lock().await;
            if state.is_pending() {
                return false;
            }
            *state = DispatchState::Pending;
        }

        let request = EchoRequest::new(
            format!("Hello from {}!", self.source.as_str()),
            self.source,
        );
        info!(source = self.source.as_str(), "dispatching echo request");

        let settled = match self.dispatch.send_message(&request).await {
            Ok(response) => DispatchState::Succeeded(response),
            Err(error) => {
                warn!(%error, "echo dispatch failed");
                DispatchState::Failed(message_or_unknown(error.to_string()))
            }
        };

        *self.state.lock().await = settled;
        true
    }
}
