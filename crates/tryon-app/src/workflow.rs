use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{info, warn};
use tryon_core::upload::validate_upload;
use tryon_core::{BinaryResource, CatalogItem, GarmentInput, ProcessingOutcome, TryOnError};

use crate::client::TryOnClient;
use crate::error::AppError;

pub const MISSING_INPUT: &str = "Please upload both a human image and a garment image.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl WorkflowPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

#[derive(Debug, Clone)]
struct WorkflowState {
    phase: WorkflowPhase,
    person: Option<BinaryResource>,
    garment: Option<GarmentInput>,
    outcome: Option<ProcessingOutcome>,
}

/// Holds the user's current selections and runs at most one submission at a time.
pub struct Orchestrator {
    client: TryOnClient,
    max_upload_mb: u64,
    state: Mutex<WorkflowState>,
}

impl Orchestrator {
    pub fn new(client: TryOnClient, max_upload_mb: u64) -> Self {
        Self {
            client,
            max_upload_mb,
            state: Mutex::new(WorkflowState {
                phase: WorkflowPhase::Idle,
                person: None,
                garment: None,
                outcome: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.lock().phase
    }

    /// Outcome of the most recent run, cleared whenever an input changes.
    pub fn outcome(&self) -> Option<ProcessingOutcome> {
        self.lock().outcome.clone()
    }

    pub async fn select_person_image(&self, image: BinaryResource) -> Result<(), TryOnError> {
        validate_upload(&image, self.max_upload_mb).await?;
        let mut state = self.lock();
        state.person = Some(image);
        clear_result(&mut state);
        Ok(())
    }

    pub async fn select_garment_image(&self, image: BinaryResource) -> Result<(), TryOnError> {
        validate_upload(&image, self.max_upload_mb).await?;
        self.set_garment(GarmentInput::File(image));
        Ok(())
    }

    /// Uses a remote garment image as-is; only absolute http(s) URLs are accepted.
    pub fn select_garment_url(&self, url: &str) -> Result<(), TryOnError> {
        let parsed = reqwest::Url::parse(url.trim())
            .map_err(|err| TryOnError::Validation(format!("Invalid garment URL: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TryOnError::Validation(
                "Garment URL must start with http:// or https://".into(),
            ));
        }
        self.set_garment(GarmentInput::Url(url.trim().to_string()));
        Ok(())
    }

    pub fn select_catalog_garment(&self, item: &CatalogItem) {
        info!("Selected catalog garment {} ({})", item.name, item.id);
        self.set_garment(GarmentInput::Url(item.image_url.to_string()));
    }

    pub fn select_catalog_garment_by_id(&self, id: &str) -> Result<(), AppError> {
        let item = CatalogItem::find(id).ok_or_else(|| AppError::UnknownCatalogItem(id.to_string()))?;
        self.select_catalog_garment(item);
        Ok(())
    }

    fn set_garment(&self, garment: GarmentInput) {
        let mut state = self.lock();
        state.garment = Some(garment);
        clear_result(&mut state);
    }

    /// Submits the current selections. Calling this again after it finishes is a retry.
    pub async fn run(&self) -> Result<ProcessingOutcome, AppError> {
        let (person, garment) = {
            let mut state = self.lock();
            if state.phase == WorkflowPhase::Submitting {
                warn!("Ignoring run request while a submission is in flight");
                return Err(AppError::AlreadySubmitting);
            }

            state.outcome = None;
            state.phase = WorkflowPhase::Validating;

            match (state.person.clone(), state.garment.clone()) {
                (Some(person), Some(garment)) => {
                    state.phase = WorkflowPhase::Submitting;
                    (person, garment)
                }
                _ => {
                    let outcome = ProcessingOutcome::from(TryOnError::Validation(MISSING_INPUT.into()));
                    state.phase = WorkflowPhase::Idle;
                    state.outcome = Some(outcome.clone());
                    return Ok(outcome);
                }
            }
        };

        let mut guard = SubmitGuard {
            orchestrator: self,
            armed: true,
        };
        let outcome = self.client.submit(&person, &garment).await;
        guard.armed = false;

        let mut state = self.lock();
        state.phase = if outcome.is_success() {
            WorkflowPhase::Succeeded
        } else {
            WorkflowPhase::Failed
        };
        state.outcome = Some(outcome.clone());

        Ok(outcome)
    }
}

fn clear_result(state: &mut WorkflowState) {
    state.outcome = None;
    if state.phase.is_complete() {
        state.phase = WorkflowPhase::Idle;
    }
}

/// Puts the orchestrator back to idle if a run is dropped before it completes.
struct SubmitGuard<'a> {
    orchestrator: &'a Orchestrator,
    armed: bool,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.lock().phase = WorkflowPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use tryon_core::{FailureKind, RawResponse, TransportPayload};

    use crate::client::Transport;
    use crate::notify::LogNotifier;

    struct MockTransport {
        calls: AtomicUsize,
        status: u16,
        body: &'static [u8],
        gate: Option<Arc<Notify>>,
    }

    impl MockTransport {
        fn json(status: u16, body: &'static [u8]) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                status,
                body,
                gate: None,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post_json(&self, _url: &str, _payload: &TransportPayload) -> Result<RawResponse, TryOnError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(RawResponse {
                status: self.status,
                content_type: Some("application/json".into()),
                body: self.body.to_vec(),
            })
        }
    }

    fn orchestrator(transport: Arc<MockTransport>) -> Arc<Orchestrator> {
        let client = TryOnClient::new("http://mock/process-image", transport, Arc::new(LogNotifier));
        Arc::new(Orchestrator::new(client, 5))
    }

    fn jpeg(name: &str) -> BinaryResource {
        BinaryResource::from_bytes(name, Some("image/jpeg"), b"pixels".to_vec())
    }

    #[tokio::test]
    async fn test_missing_inputs_skip_network() {
        let transport = MockTransport::json(200, br#"{"result_image":"Zm9v"}"#);
        let orch = orchestrator(transport.clone());

        let outcome = orch.run().await.unwrap();
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(outcome.error_message(), Some(MISSING_INPUT));
        assert_eq!(orch.phase(), WorkflowPhase::Idle);
        assert_eq!(transport.calls(), 0);

        orch.select_person_image(jpeg("me.jpg")).await.unwrap();
        let outcome = orch.run().await.unwrap();
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_run() {
        let transport = MockTransport::json(200, br#"{"result_image":"Zm9v"}"#);
        let orch = orchestrator(transport.clone());
        orch.select_person_image(jpeg("me.jpg")).await.unwrap();
        orch.select_catalog_garment_by_id("1").unwrap();

        let outcome = orch.run().await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(orch.phase(), WorkflowPhase::Succeeded);
        assert_eq!(orch.outcome(), Some(outcome));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_sequential_runs_are_independent_and_equal() {
        let transport = MockTransport::json(422, br#"{"error":"bad garment image"}"#);
        let orch = orchestrator(transport.clone());
        orch.select_person_image(jpeg("me.jpg")).await.unwrap();
        orch.select_garment_image(jpeg("shirt.jpg")).await.unwrap();

        let first = orch.run().await.unwrap();
        assert_eq!(orch.phase(), WorkflowPhase::Failed);
        let second = orch.run().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.error_message(), Some("bad garment image"));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_second_run_rejected_while_submitting() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(MockTransport {
            calls: AtomicUsize::new(0),
            status: 200,
            body: br#"{"result_image":"Zm9v"}"#,
            gate: Some(gate.clone()),
        });
        let orch = orchestrator(transport.clone());
        orch.select_person_image(jpeg("me.jpg")).await.unwrap();
        orch.select_catalog_garment_by_id("2").unwrap();

        let first = tokio::spawn({
            let orch = orch.clone();
            async move { orch.run().await }
        });
        while transport.calls() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(orch.phase(), WorkflowPhase::Submitting);
        assert!(matches!(orch.run().await, Err(AppError::AlreadySubmitting)));

        // New selections are still accepted mid-flight.
        orch.select_catalog_garment_by_id("4").unwrap();

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(outcome.is_success());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_dropped_run_returns_to_idle() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(MockTransport {
            calls: AtomicUsize::new(0),
            status: 200,
            body: br#"{"result_image":"Zm9v"}"#,
            gate: Some(gate),
        });
        let orch = orchestrator(transport.clone());
        orch.select_person_image(jpeg("me.jpg")).await.unwrap();
        orch.select_catalog_garment_by_id("1").unwrap();

        let result = tokio::time::timeout(Duration::from_millis(20), orch.run()).await;
        assert!(result.is_err());
        assert_eq!(orch.phase(), WorkflowPhase::Idle);
    }

    #[tokio::test]
    async fn test_invalid_selection_is_rejected() {
        let orch = orchestrator(MockTransport::json(200, b"{}"));
        let err = orch
            .select_person_image(BinaryResource::from_bytes("cv.pdf", Some("application/pdf"), b"%PDF".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(matches!(
            orch.select_catalog_garment_by_id("nope"),
            Err(AppError::UnknownCatalogItem(_))
        ));
    }

    #[test]
    fn test_garment_url_must_be_http() {
        let orch = orchestrator(MockTransport::json(200, b"{}"));
        assert!(orch.select_garment_url("https://i.imgur.com/yXOvdOSs.jpg").is_ok());
        assert!(orch.select_garment_url("file:///etc/passwd").is_err());
        assert!(orch.select_garment_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_new_selection_clears_previous_result() {
        let orch = orchestrator(MockTransport::json(200, br#"{"result_image":"Zm9v"}"#));
        orch.select_person_image(jpeg("me.jpg")).await.unwrap();
        orch.select_catalog_garment_by_id("1").unwrap();
        orch.run().await.unwrap();
        assert!(orch.outcome().is_some());

        orch.select_catalog_garment_by_id("2").unwrap();
        assert!(orch.outcome().is_none());
        assert_eq!(orch.phase(), WorkflowPhase::Idle);
    }
}
