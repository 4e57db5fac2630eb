//! Dashboard controller.
//!
//! Owns every piece of dashboard state (selection, preview, detections,
//! history, filter settings, in-flight status) and wires the inference and
//! history ports together. Each mutation replaces the relevant field and
//! publishes a freshly computed [`DashboardView`]; the filtered list and
//! overlay are never cached between publishes.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tokio::sync::watch;
use yodash_core::filter::ResultFilter;
use yodash_core::model::{DetectionBox, HistoryEntry, ImageFile, ModelVersion};
use yodash_core::overlay::{OverlayBox, Size, fit_within, render_overlay};
use yodash_core::ports::{HistoryPort, InferencePort, Notice, Notifier};
use yodash_core::{DashError, Result};

use crate::preview::{PreviewEntry, PreviewRegistry, PreviewUrl};

/// Collaborators injected into the controller.
#[derive(Clone)]
pub struct DashboardDeps {
    pub inference: Arc<dyn InferencePort>,
    pub history: Arc<dyn HistoryPort>,
    pub notifier: Arc<dyn Notifier>,
    pub previews: PreviewRegistry,
}

/// Initial settings for a freshly mounted dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    /// Backend user identifier (the signed-in email).
    pub user: Option<String>,
    /// Bounds the preview is fitted into.
    pub viewport: Size,
    pub filter: ResultFilter,
    pub model_version: ModelVersion,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            user: None,
            viewport: Size::new(960.0, 440.0),
            filter: ResultFilter::default(),
            model_version: ModelVersion::default(),
        }
    }
}

/// Result of one `run_detection` call.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Nothing selected; the user was warned.
    NoFileSelected,
    /// Another run is still in flight; nothing was submitted.
    AlreadyRunning,
    /// Detections were replaced with `count` new boxes.
    Applied { count: usize },
    /// The selection changed, or the dashboard was unmounted, while the
    /// request was in flight.
    Superseded,
    /// The request failed; the user was alerted and detections kept.
    Failed(DashError),
}

/// Everything a front end needs to draw the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub user_email: Option<String>,
    pub selected_file: Option<String>,
    pub preview_url: Option<String>,
    pub is_detecting: bool,
    pub min_confidence: f64,
    pub label_query: String,
    pub model_version: ModelVersion,
    /// All boxes from the last applied run.
    pub detections: Vec<DetectionBox>,
    /// `detections` passed through the current filter.
    pub filtered: Vec<DetectionBox>,
    /// `filtered` mapped into display coordinates.
    pub overlay: Vec<OverlayBox>,
    pub natural_size: Option<Size>,
    pub displayed_size: Size,
    pub history: Vec<HistoryEntry>,
}

struct DashboardState {
    selected_file: Option<ImageFile>,
    preview: Option<PreviewUrl>,
    natural_size: Option<Size>,
    /// Bumped on every selection; results from older selections are discarded.
    selection_generation: u64,
    detecting: bool,
    /// Set by `unmount`; late results and history refreshes are ignored.
    unmounted: bool,
    filter: ResultFilter,
    model_version: ModelVersion,
    detections: Vec<DetectionBox>,
    history: Vec<HistoryEntry>,
}

struct Inner {
    state: RwLock<DashboardState>,
    deps: DashboardDeps,
    user: Option<String>,
    viewport: Size,
    updates: watch::Sender<DashboardView>,
}

impl Inner {
    fn write_state(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn compose_view(&self, state: &DashboardState) -> DashboardView {
        let filtered = state.filter.apply(&state.detections);
        let displayed_size = state
            .natural_size
            .map(|natural| fit_within(natural, self.viewport))
            .unwrap_or_default();
        let overlay = render_overlay(displayed_size, state.natural_size, &filtered);

        DashboardView {
            user_email: self.user.clone(),
            selected_file: state.selected_file.as_ref().map(|f| f.name().to_string()),
            preview_url: state.preview.as_ref().map(|p| p.as_str().to_string()),
            is_detecting: state.detecting,
            min_confidence: state.filter.min_confidence(),
            label_query: state.filter.label_query().to_string(),
            model_version: state.model_version,
            detections: state.detections.clone(),
            filtered,
            overlay,
            natural_size: state.natural_size,
            displayed_size,
            history: state.history.clone(),
        }
    }

    fn publish(&self, state: &DashboardState) {
        self.updates.send_replace(self.compose_view(state));
    }
}

/// Clears `detecting` when the run ends, however it ends.
struct InFlightGuard {
    inner: Arc<Inner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut state = self.inner.write_state();
        state.detecting = false;
        self.inner.publish(&state);
    }
}

/// The dashboard controller. Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct DashboardController {
    inner: Arc<Inner>,
}

impl DashboardController {
    /// Creates the controller without contacting any backend.
    pub fn new(deps: DashboardDeps, options: DashboardOptions) -> Self {
        let state = DashboardState {
            selected_file: None,
            preview: None,
            natural_size: None,
            selection_generation: 0,
            detecting: false,
            unmounted: false,
            filter: options.filter,
            model_version: options.model_version,
            detections: Vec::new(),
            history: Vec::new(),
        };
        let (updates, _) = watch::channel(DashboardView::default());
        let inner = Arc::new(Inner {
            state: RwLock::new(state),
            deps,
            user: options.user,
            viewport: options.viewport,
            updates,
        });
        {
            let state = inner.write_state();
            inner.publish(&state);
        }
        Self { inner }
    }

    /// Creates the controller and loads history once.
    pub async fn mount(deps: DashboardDeps, options: DashboardOptions) -> Self {
        let controller = Self::new(deps, options);
        tracing::info!(
            "[Dashboard] Mounted for {}",
            controller.inner.user.as_deref().unwrap_or("unknown user")
        );
        controller.refresh_history().await;
        controller
    }

    /// Tears the dashboard down: releases the preview, drops the selection
    /// and detaches any run still in flight, whose result, history refresh
    /// and alerts are then discarded. Idempotent.
    pub fn unmount(&self) {
        let released = {
            let mut state = self.inner.write_state();
            if state.unmounted {
                return;
            }
            state.unmounted = true;
            state.selection_generation += 1;
            state.selected_file = None;
            state.natural_size = None;
            state.detections.clear();
            let released = state.preview.take();
            self.inner.publish(&state);
            released
        };
        drop(released);
        tracing::info!(
            "[Dashboard] Unmounted for {}",
            self.inner.user.as_deref().unwrap_or("unknown user")
        );
    }

    fn is_unmounted(&self) -> bool {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .unmounted
    }

    pub fn view(&self) -> DashboardView {
        self.inner.updates.borrow().clone()
    }

    /// Receives a new view after every state change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.inner.updates.subscribe()
    }

    pub fn user(&self) -> Option<&str> {
        self.inner.user.as_deref()
    }

    /// The selected image and its decoded size.
    pub fn preview(&self) -> Option<PreviewEntry> {
        let state = self.inner.state.read().unwrap_or_else(PoisonError::into_inner);
        state.preview.as_ref().and_then(|p| p.resolve())
    }

    /// Replaces the selection, clears detections and issues a new preview.
    ///
    /// Does not start detection.
    pub fn select_file(&self, file: ImageFile) {
        let preview = self.inner.deps.previews.create(file.clone());
        let natural_size = preview.resolve().and_then(|entry| entry.natural_size);
        tracing::info!("[Dashboard] Selected {} ({} bytes)", file.name(), file.len());

        let mut state = self.inner.write_state();
        state.selected_file = Some(file);
        state.detections.clear();
        // The superseded preview is released here.
        state.preview = Some(preview);
        state.natural_size = natural_size;
        state.selection_generation += 1;
        self.inner.publish(&state);
    }

    /// Submits the selected file with the current model.
    ///
    /// At most one run is in flight; a second call while detecting returns
    /// `AlreadyRunning` without submitting. Only a successful run replaces
    /// detections, and only if the selection has not changed meanwhile.
    /// History is refreshed after every successful request.
    pub async fn run_detection(&self) -> RunOutcome {
        let started = {
            let mut state = self.inner.write_state();
            if state.unmounted {
                return RunOutcome::Superseded;
            }
            if state.detecting {
                return RunOutcome::AlreadyRunning;
            }
            match state.selected_file.clone() {
                Some(file) => {
                    state.detecting = true;
                    self.inner.publish(&state);
                    Some((file, state.model_version, state.selection_generation))
                }
                None => None,
            }
        };

        let Some((file, model, generation)) = started else {
            self.inner.deps.notifier.notify(Notice::Warning(
                "Upload an image first to run detection.".to_string(),
            ));
            return RunOutcome::NoFileSelected;
        };
        let _guard = InFlightGuard {
            inner: self.inner.clone(),
        };

        let result = self
            .inner
            .deps
            .inference
            .submit(&file, model, self.inner.user.as_deref())
            .await;

        match result {
            Ok(detections) => {
                let count = detections.len();
                let applied = {
                    let mut state = self.inner.write_state();
                    if state.selection_generation == generation {
                        state.detections = detections;
                        self.inner.publish(&state);
                        true
                    } else {
                        false
                    }
                };

                if applied {
                    tracing::info!("[Dashboard] Applied {} detections for {}", count, file.name());
                } else {
                    tracing::info!(
                        "[Dashboard] Discarding {} detections for superseded selection {}",
                        count,
                        file.name()
                    );
                }

                if self.is_unmounted() {
                    return RunOutcome::Superseded;
                }
                self.refresh_history().await;

                if applied {
                    RunOutcome::Applied { count }
                } else {
                    RunOutcome::Superseded
                }
            }
            Err(err) => {
                tracing::error!("[Dashboard] Error uploading or inferring: {}", err);
                if self.is_unmounted() {
                    return RunOutcome::Failed(err);
                }
                let message = match &err {
                    DashError::Backend { status_text, .. } => {
                        format!("Failed to upload image or run inference. {status_text}")
                    }
                    _ => "Error during inference. Please try again.".to_string(),
                };
                self.inner.deps.notifier.notify(Notice::Error(message));
                RunOutcome::Failed(err)
            }
        }
    }

    /// Reloads recent runs. Failures are logged and leave history unchanged.
    pub async fn refresh_history(&self) {
        if self.is_unmounted() {
            return;
        }
        match self
            .inner
            .deps
            .history
            .query(self.inner.user.as_deref())
            .await
        {
            Ok(entries) => {
                let mut state = self.inner.write_state();
                if state.unmounted {
                    return;
                }
                state.history = entries;
                self.inner.publish(&state);
            }
            Err(err) => {
                tracing::error!("[Dashboard] Error fetching history: {}", err);
            }
        }
    }

    pub fn set_min_confidence(&self, value: f64) -> Result<()> {
        let mut state = self.inner.write_state();
        state.filter.set_min_confidence(value)?;
        self.inner.publish(&state);
        Ok(())
    }

    pub fn set_label_query(&self, query: impl Into<String>) {
        let mut state = self.inner.write_state();
        state.filter.set_label_query(query);
        self.inner.publish(&state);
    }

    pub fn set_model_version(&self, model: ModelVersion) {
        let mut state = self.inner.write_state();
        state.model_version = model;
        self.inner.publish(&state);
    }
}
