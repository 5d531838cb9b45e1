//! Request state controller.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use writer_adapters::traits::{GeneratorMetadata, TextGenerator};
use writer_primitives::{GenerationRequest, GenerationResult, RequestId};
use writer_prompts::build_prompt_for;

use crate::lifecycle::{Lifecycle, RequestEvent, RequestState};

/// Everything a UI needs to render the current view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSnapshot {
    lifecycle: Lifecycle,
    request_id: Option<RequestId>,
    result: Option<GenerationResult>,
}

impl RequestSnapshot {
    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RequestState {
        self.lifecycle.state()
    }

    /// Identifier of the current or most recent accepted submission.
    #[must_use]
    pub const fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }

    /// Result of the most recent settled submission. `None` while idle or in flight.
    #[must_use]
    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }
}

/// Why a submission was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The raw thoughts were blank after trimming.
    BlankThoughts,
    /// Another submission is still in flight.
    InFlight,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BlankThoughts => "raw thoughts are blank",
            Self::InFlight => "a request is already in flight",
        })
    }
}

/// Outcome of [`RequestController::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The submission ran to completion with this result.
    Settled(GenerationResult),
    /// The submission was ignored; state is unchanged.
    Ignored(IgnoreReason),
}

/// Owns the request state and the last result; the UI only reads them.
///
/// State lives in a [`watch`] channel. The guard check and the move to
/// [`RequestState::InFlight`] happen inside a single `send_if_modified`
/// closure, so racing submissions cannot both start a call.
pub struct RequestController {
    generator: Arc<dyn TextGenerator>,
    snapshot: watch::Sender<RequestSnapshot>,
}

impl fmt::Debug for RequestController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestController")
            .field("generator", self.generator.metadata())
            .field("snapshot", &*self.snapshot.borrow())
            .finish()
    }
}

impl RequestController {
    /// Creates an idle controller around the supplied generator.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let (snapshot, _) = watch::channel(RequestSnapshot::default());
        Self {
            generator,
            snapshot,
        }
    }

    /// Provider and model used for generation.
    #[must_use]
    pub fn metadata(&self) -> &GeneratorMetadata {
        self.generator.metadata()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.snapshot.borrow().state()
    }

    /// Result of the last settled submission.
    #[must_use]
    pub fn result(&self) -> Option<GenerationResult> {
        self.snapshot.borrow().result.clone()
    }

    /// Copy of the full observable state.
    #[must_use]
    pub fn snapshot(&self) -> RequestSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribes to every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestSnapshot> {
        self.snapshot.subscribe()
    }

    /// Builds the prompt, calls the generator and settles with its result.
    ///
    /// Ignored without touching state when the thoughts are blank or another
    /// submission is in flight. There is no cancellation: dropping the
    /// returned future before it completes leaves the controller in flight, so
    /// UI code that cannot await should use
    /// [`RequestController::submit_detached`].
    pub async fn submit(&self, request: GenerationRequest) -> Submission {
        match self.begin(&request) {
            Ok(request_id) => Submission::Settled(self.run(request_id, &request).await),
            Err(reason) => Submission::Ignored(reason),
        }
    }

    /// Like [`RequestController::submit`], but runs the call on a spawned task.
    ///
    /// The guard runs synchronously: on return the controller is already in
    /// flight. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the [`IgnoreReason`] when the submission is not started.
    pub fn submit_detached(
        self: &Arc<Self>,
        request: GenerationRequest,
    ) -> Result<JoinHandle<GenerationResult>, IgnoreReason> {
        let request_id = self.begin(&request)?;
        let controller = Arc::clone(self);
        Ok(tokio::spawn(async move {
            controller.run(request_id, &request).await
        }))
    }

    fn begin(&self, request: &GenerationRequest) -> Result<RequestId, IgnoreReason> {
        if request.is_blank() {
            debug!("ignoring submission with blank thoughts");
            return Err(IgnoreReason::BlankThoughts);
        }

        let mut accepted = None;
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.lifecycle.transition(RequestEvent::Submit).is_err() {
                return false;
            }
            let request_id = RequestId::random();
            snapshot.request_id = Some(request_id);
            snapshot.result = None;
            accepted = Some(request_id);
            true
        });

        accepted.ok_or_else(|| {
            debug!("ignoring submission while another is in flight");
            IgnoreReason::InFlight
        })
    }

    async fn run(&self, request_id: RequestId, request: &GenerationRequest) -> GenerationResult {
        let metadata = self.generator.metadata();
        info!(
            %request_id,
            tone = %request.tone(),
            has_context = request.context_email().is_some(),
            provider = metadata.provider(),
            model = metadata.model(),
            "generation started"
        );

        let prompt = build_prompt_for(request);
        let result = self.generator.generate(&prompt).await;

        self.snapshot.send_modify(|snapshot| {
            if let Err(err) = snapshot.lifecycle.transition(RequestEvent::Resolve) {
                warn!(%request_id, error = %err, "dropping result for unexpected state");
                return;
            }
            snapshot.result = Some(result.clone());
        });

        match &result {
            GenerationResult::Success { text } => {
                info!(%request_id, text_len = text.len(), "generation settled");
            }
            GenerationResult::Failure { kind, .. } => {
                info!(%request_id, %kind, "generation settled with failure");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::FutureExt;
    use tokio::sync::Notify;
    use writer_primitives::{ErrorKind, Tone};

    use super::*;

    /// Generator that records prompts and optionally waits for a release signal.
    struct ScriptedGenerator {
        metadata: GeneratorMetadata,
        result: GenerationResult,
        calls: AtomicUsize,
        prompts: std::sync::Mutex<Vec<String>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedGenerator {
        fn new(result: GenerationResult) -> Self {
            Self {
                metadata: GeneratorMetadata::new("scripted", "test-model"),
                result,
                calls: AtomicUsize::new(0),
                prompts: std::sync::Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(result: GenerationResult, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(result)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn metadata(&self) -> &GeneratorMetadata {
            &self.metadata
        }

        async fn generate(&self, prompt: &str) -> GenerationResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_owned());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.result.clone()
        }
    }

    fn request(thoughts: &str) -> GenerationRequest {
        GenerationRequest::new(thoughts, Tone::Persuasive).unwrap()
    }

    #[tokio::test]
    async fn settles_with_generator_result() {
        let generator = Arc::new(ScriptedGenerator::new(GenerationResult::success("Dear Pat,")));
        let controller = RequestController::new(generator.clone());
        assert_eq!(controller.state(), RequestState::Idle);
        assert!(controller.result().is_none());

        let outcome = controller.submit(request("ask for a raise")).await;

        assert_eq!(
            outcome,
            Submission::Settled(GenerationResult::success("Dear Pat,"))
        );
        assert_eq!(controller.state(), RequestState::Settled);
        assert_eq!(
            controller.result(),
            Some(GenerationResult::success("Dear Pat,"))
        );
        assert!(controller.snapshot().request_id().is_some());

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("ask for a raise"));
        assert!(prompts[0].contains("persuasive"));
    }

    #[tokio::test]
    async fn failures_settle_too() {
        let failure = GenerationResult::failure(ErrorKind::NetworkError, "offline");
        let generator = Arc::new(ScriptedGenerator::new(failure.clone()));
        let controller = RequestController::new(generator);

        controller.submit(request("hello")).await;

        assert_eq!(controller.state(), RequestState::Settled);
        assert_eq!(controller.result(), Some(failure));
    }

    #[tokio::test]
    async fn blank_thoughts_are_ignored() {
        let generator = Arc::new(ScriptedGenerator::new(GenerationResult::success("x")));
        let controller = RequestController::new(generator.clone());
        let blank: GenerationRequest =
            serde_json::from_str(r#"{"rawThoughts": "  \n ", "tone": "warm"}"#).unwrap();

        let outcome = controller.submit(blank).await;

        assert_eq!(outcome, Submission::Ignored(IgnoreReason::BlankThoughts));
        assert_eq!(controller.state(), RequestState::Idle);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn submit_while_in_flight_is_rejected() {
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(ScriptedGenerator::gated(
            GenerationResult::success("first"),
            Arc::clone(&gate),
        ));
        let controller = Arc::new(RequestController::new(generator.clone()));

        let handle = controller
            .submit_detached(request("first"))
            .expect("first submission accepted");
        assert_eq!(controller.state(), RequestState::InFlight);
        let in_flight_id = controller.snapshot().request_id();

        let second = controller
            .submit(request("second"))
            .now_or_never()
            .expect("rejection does not wait");
        assert_eq!(second, Submission::Ignored(IgnoreReason::InFlight));
        assert!(matches!(
            controller.submit_detached(request("third")),
            Err(IgnoreReason::InFlight)
        ));
        assert_eq!(controller.state(), RequestState::InFlight);
        assert_eq!(controller.snapshot().request_id(), in_flight_id);
        assert!(controller.result().is_none());

        gate.notify_one();
        let result = handle.await.unwrap();

        assert_eq!(result, GenerationResult::success("first"));
        assert_eq!(generator.calls(), 1);
        assert_eq!(controller.result(), Some(GenerationResult::success("first")));
    }

    #[tokio::test]
    async fn new_submission_clears_previous_result() {
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(ScriptedGenerator::gated(
            GenerationResult::success("draft"),
            Arc::clone(&gate),
        ));
        let controller = Arc::new(RequestController::new(generator));

        gate.notify_one();
        controller.submit(request("one")).await;
        assert!(controller.result().is_some());

        let handle = controller.submit_detached(request("two")).unwrap();
        assert_eq!(controller.state(), RequestState::InFlight);
        assert!(controller.result().is_none());

        gate.notify_one();
        handle.await.unwrap();
        assert_eq!(controller.state(), RequestState::Settled);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(ScriptedGenerator::gated(
            GenerationResult::success("done"),
            Arc::clone(&gate),
        ));
        let controller = Arc::new(RequestController::new(generator));
        let mut updates = controller.subscribe();

        let handle = controller.submit_detached(request("watch me")).unwrap();
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().state(), RequestState::InFlight);

        gate.notify_one();
        updates.changed().await.unwrap();
        let settled = updates.borrow_and_update().clone();
        assert_eq!(settled.state(), RequestState::Settled);
        assert_eq!(settled.result(), Some(&GenerationResult::success("done")));
        handle.await.unwrap();
    }
}
