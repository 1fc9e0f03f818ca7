use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use tryon_core::response::{classify, transport_error, unreadable_error_body};
use tryon_core::{
    BinaryResource, GarmentInput, ProcessingOutcome, RawResponse, ResultImage, TransportPayload,
    TryOnError,
};

use crate::config::TryOnConfig;
use crate::error::AppError;
use crate::notify::{LogNotifier, Notifier, PROCESSING_ID};

/// Sends one JSON request and hands back the response fully read.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, payload: &TransportPayload) -> Result<RawResponse, TryOnError>;
}

pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &TransportPayload) -> Result<RawResponse, TryOnError> {
        info!("Sending request to API endpoint");
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let success = response.status().is_success();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) if !success => return Err(unreadable_error_body(status, err)),
            Err(err) => return Err(transport_error(err)),
        };

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

#[derive(Clone)]
pub struct TryOnClient {
    endpoint: String,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
}

impl TryOnClient {
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            notifier,
        }
    }

    pub fn from_config(conf: &TryOnConfig, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let transport = HttpTransport::new(conf.timeout)?;
        Ok(Self::new(conf.endpoint.clone(), Arc::new(transport), notifier))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one try-on request. Every failure comes back as `ProcessingOutcome::Failure`.
    pub async fn submit(&self, person: &BinaryResource, garment: &GarmentInput) -> ProcessingOutcome {
        let outcome = ProcessingOutcome::from(self.try_submit(person, garment).await);

        match &outcome {
            ProcessingOutcome::Success { .. } => {
                self.notifier.success(PROCESSING_ID, "Images processed successfully!");
            }
            ProcessingOutcome::Failure { kind, message, detail } => {
                debug!("Try-on failed ({kind:?}): {detail:?}");
                self.notifier.error(PROCESSING_ID, message);
            }
        }

        outcome
    }

    async fn try_submit(&self, person: &BinaryResource, garment: &GarmentInput) -> Result<ResultImage, TryOnError> {
        let payload = TransportPayload::build(person, garment).await?;
        debug!(
            "Preparing API request with payload structure: human_image=base64_string_present, garment_image={}",
            garment.describe()
        );

        self.notifier.loading(PROCESSING_ID, "Processing your images...");
        let response = self.transport.post_json(&self.endpoint, &payload).await?;
        classify(response)
    }
}

/// One-shot try-on against the configured endpoint, reporting progress to the log.
pub async fn process_images(human: &BinaryResource, garment: &GarmentInput) -> ProcessingOutcome {
    match TryOnConfig::load() {
        Ok(conf) => process_images_with(&conf, human, garment).await,
        Err(err) => transport_error(format!("{err:#}")).into(),
    }
}

pub async fn process_images_with(
    conf: &TryOnConfig,
    human: &BinaryResource,
    garment: &GarmentInput,
) -> ProcessingOutcome {
    match TryOnClient::from_config(conf, Arc::new(LogNotifier)) {
        Ok(client) => client.submit(human, garment).await,
        Err(err) => transport_error(err).into(),
    }
}
