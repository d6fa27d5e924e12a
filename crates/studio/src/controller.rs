use crate::artifact::{decode_upload, ImageArtifact};
use crate::state::{FinalAd, Step, WorkflowState};
use crate::WorkflowError;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use generation::{AspectRatio, GatewayError, GenerationGateway, ImagePayload};
use history::{HistoryEntry, HistoryLog, NewHistoryEntry};
use log::{debug, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Which generation capability an outstanding call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Prepare,
    Design,
    VideoPrompt,
    RandomScene,
}

struct PendingCall {
    kind: CallKind,
    lineage: u64,
}

enum CallResult {
    Prepared(ImagePayload),
    Ad(ImagePayload),
    VideoPrompt(String),
    RandomScene(String),
}

struct CallOutcome {
    kind: CallKind,
    lineage: u64,
    result: Result<CallResult, GatewayError>,
}

/// The step state machine behind the studio. All mutation flows through the
/// intent methods below; generation calls run on a worker thread and report
/// back through a channel, so at most one is outstanding and a response that
/// arrives after a start-over is recognized by its lineage tag and dropped.
pub struct StudioController {
    state: WorkflowState,
    gateway: Arc<dyn GenerationGateway>,
    history: HistoryLog,
    pending: Option<PendingCall>,
    /// Bumped on start-over; outstanding calls carry the value they were
    /// issued under and are discarded on mismatch.
    lineage: u64,
    tx: Sender<CallOutcome>,
    rx: Receiver<CallOutcome>,
}

impl StudioController {
    pub fn new(gateway: Arc<dyn GenerationGateway>, mut history: HistoryLog) -> Self {
        history.load();
        let (tx, rx) = unbounded();
        Self {
            state: WorkflowState::default(),
            gateway,
            history,
            pending: None,
            lineage: 0,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn select_history_item(&self, id: &str) -> Option<&HistoryEntry> {
        self.history.get(id)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_call(&self) -> Option<CallKind> {
        self.pending.as_ref().map(|pending| pending.kind)
    }

    // --- synchronous intents -------------------------------------------------

    /// Decode an uploaded file and make it both the original and, until an
    /// explicit prepare runs, the prepared product.
    pub fn upload(&mut self, bytes: Vec<u8>) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        self.require(self.state.step == Step::Prepare, "upload is only available in the prepare step")?;
        self.state.last_error = None;
        match decode_upload(bytes) {
            Ok(artifact) => {
                self.state.prepared = Some(artifact.clone());
                self.state.original = Some(artifact);
                self.state.has_prepared = false;
                Ok(())
            }
            Err(err) => {
                self.state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn advance_to_design(&mut self) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        self.require(
            self.state.step == Step::Prepare && self.state.prepared.is_some(),
            "advancing to design requires an uploaded product",
        )?;
        self.state.step = Step::Design;
        Ok(())
    }

    pub fn set_scene(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        self.require(self.state.step == Step::Design, "the scene is only editable in the design step")?;
        self.state.scene = text.into();
        Ok(())
    }

    /// Back to design keeping the prepared product and scene; a revision loop
    /// over the same source material.
    pub fn redesign_from_prepared(&mut self) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        self.require(self.state.step == Step::Finalize, "redesign starts from a finished ad")?;
        self.state.final_ad = None;
        self.state.video_prompt = None;
        self.state.step = Step::Design;
        Ok(())
    }

    /// Back to design with the finished ad as the new source material; it
    /// counts as already prepared.
    pub fn redesign_from_final(&mut self) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        self.require(self.state.step == Step::Finalize, "iterating requires a finished ad")?;
        let Some(final_ad) = self.state.final_ad.take() else {
            return self.reject("iterating requires a finished ad");
        };
        self.state.prepared = Some(final_ad.artifact);
        self.state.has_prepared = true;
        self.state.video_prompt = None;
        self.state.step = Step::Design;
        Ok(())
    }

    /// Wipe the session and return to the upload screen. Valid at any time,
    /// including while a generation call is in flight; that call's eventual
    /// response no longer matches the lineage and is dropped on arrival.
    pub fn start_over(&mut self) {
        self.lineage += 1;
        self.pending = None;
        self.state = WorkflowState::default();
    }

    /// Irreversibly drop all history. The confirmation prompt is the front
    /// end's responsibility.
    pub fn clear_history(&mut self) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        self.history.clear();
        Ok(())
    }

    // --- generation intents --------------------------------------------------

    /// Kick off background removal for the uploaded product. May be invoked
    /// again to re-prepare; the previous prepared image is overwritten.
    pub fn begin_prepare(&mut self) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        let payload = match (&self.state.step, &self.state.original) {
            (Step::Prepare, Some(original)) => original.payload.clone(),
            _ => return self.reject("preparing requires an uploaded product"),
        };
        self.state.last_error = None;
        self.spawn_call(CallKind::Prepare, move |gateway| {
            gateway.prepare_image(&payload).map(CallResult::Prepared)
        });
        Ok(())
    }

    /// Kick off ad generation. The live scene text is frozen here: it becomes
    /// the provenance for the resulting history entry and video prompt.
    pub fn begin_design(&mut self, aspect: AspectRatio) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        let payload = match (&self.state.step, &self.state.prepared) {
            (Step::Design, Some(prepared)) => prepared.payload.clone(),
            _ => return self.reject("designing requires a prepared product"),
        };
        let scene = self.state.scene.trim().to_string();
        if scene.is_empty() {
            return self.reject("designing requires a scene description");
        }
        self.state.last_error = None;
        self.state.submitted_scene = scene.clone();
        self.spawn_call(CallKind::Design, move |gateway| {
            gateway
                .generate_ad(&payload, &scene, aspect)
                .map(CallResult::Ad)
        });
        Ok(())
    }

    /// Kick off the video animation prompt for the finished ad, using the
    /// scene text as it stood at design time.
    pub fn begin_video_prompt(&mut self) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        let payload = match (&self.state.step, &self.state.final_ad) {
            (Step::Finalize, Some(final_ad)) => final_ad.artifact.payload.clone(),
            _ => return self.reject("the video prompt needs a finished ad"),
        };
        if self.state.video_prompt.is_some() {
            return self.reject("the video prompt has already been generated");
        }
        self.state.last_error = None;
        let scene = self.state.submitted_scene.clone();
        self.spawn_call(CallKind::VideoPrompt, move |gateway| {
            gateway
                .generate_video_prompt(&payload, &scene)
                .map(CallResult::VideoPrompt)
        });
        Ok(())
    }

    /// Kick off a scene suggestion derived from the prepared product.
    pub fn begin_random_scene(&mut self) -> Result<(), WorkflowError> {
        self.ensure_idle()?;
        let payload = match (&self.state.step, &self.state.prepared) {
            (Step::Design, Some(prepared)) => prepared.payload.clone(),
            _ => return self.reject("a scene suggestion needs a prepared product"),
        };
        self.state.last_error = None;
        self.spawn_call(CallKind::RandomScene, move |gateway| {
            gateway
                .generate_random_scene(&payload)
                .map(CallResult::RandomScene)
        });
        Ok(())
    }

    // --- completion delivery -------------------------------------------------

    /// Apply any completed generation calls without blocking. Front ends call
    /// this from their event loop.
    pub fn pump(&mut self) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Block until the outstanding call (if any) has been applied, or the
    /// timeout elapses. Returns true when the controller is idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(remaining) if !remaining.is_zero() => remaining,
                _ => return false,
            };
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => self.apply(outcome),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn apply(&mut self, outcome: CallOutcome) {
        if outcome.lineage != self.lineage {
            debug!("dropping {:?} response from a previous session", outcome.kind);
            return;
        }
        match &self.pending {
            Some(pending) if pending.kind == outcome.kind => {}
            _ => {
                debug!("dropping unexpected {:?} response", outcome.kind);
                return;
            }
        }
        self.pending = None;
        match outcome.result {
            Ok(CallResult::Prepared(payload)) => {
                self.state.prepared = Some(ImageArtifact::new(payload));
                self.state.has_prepared = true;
            }
            Ok(CallResult::Ad(payload)) => {
                let artifact = ImageArtifact::new(payload);
                let entry = self.history.append(NewHistoryEntry {
                    final_ad: history::AdImage {
                        url: artifact.url.clone(),
                    },
                    scene_description: self.state.submitted_scene.clone(),
                    video_prompt: String::new(),
                });
                self.state.final_ad = Some(FinalAd {
                    artifact,
                    history_id: entry.id.clone(),
                });
                self.state.video_prompt = None;
                self.state.step = Step::Finalize;
            }
            Ok(CallResult::VideoPrompt(text)) => {
                if let Some(final_ad) = &self.state.final_ad {
                    self.history.set_video_prompt(&final_ad.history_id, &text);
                }
                self.state.video_prompt = Some(text);
            }
            Ok(CallResult::RandomScene(text)) => {
                self.state.scene = text.trim().to_string();
            }
            Err(err) => {
                self.state.last_error = Some(err.to_string());
            }
        }
    }

    fn spawn_call(
        &mut self,
        kind: CallKind,
        job: impl FnOnce(&dyn GenerationGateway) -> Result<CallResult, GatewayError> + Send + 'static,
    ) {
        let lineage = self.lineage;
        self.pending = Some(PendingCall { kind, lineage });
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = job(gateway.as_ref());
            let _ = tx.send(CallOutcome {
                kind,
                lineage,
                result,
            });
        });
    }

    fn ensure_idle(&self) -> Result<(), WorkflowError> {
        if self.pending.is_some() {
            Err(WorkflowError::Busy)
        } else {
            Ok(())
        }
    }

    fn require(&self, ok: bool, what: &'static str) -> Result<(), WorkflowError> {
        if ok {
            Ok(())
        } else {
            warn!("rejected action: {what}");
            Err(WorkflowError::Precondition(what))
        }
    }

    fn reject(&self, what: &'static str) -> Result<(), WorkflowError> {
        warn!("rejected action: {what}");
        Err(WorkflowError::Precondition(what))
    }
}
