//! Root shell: picks the screen to show from the session state.

use yodash_core::Result;
use yodash_core::session::{Redirect, SessionGate, SessionState};

use crate::dashboard::{DashboardController, DashboardDeps, DashboardOptions};

/// What the front end should render.
pub enum ShellView<'a> {
    Loading,
    Errored(String),
    SignIn,
    Dashboard(&'a DashboardController),
}

/// Routes between the loading, error, sign-in and dashboard screens.
///
/// The dashboard is mounted lazily on the first authenticated render and
/// dropped as soon as the session leaves the authenticated state.
pub struct RootShell {
    gate: SessionGate,
    deps: DashboardDeps,
    options: DashboardOptions,
    dashboard: Option<DashboardController>,
    mounted_for: Option<String>,
}

impl RootShell {
    /// `options.user` is ignored; the user comes from the session.
    pub fn new(gate: SessionGate, deps: DashboardDeps, options: DashboardOptions) -> Self {
        Self {
            gate,
            deps,
            options,
            dashboard: None,
            mounted_for: None,
        }
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// The mounted dashboard, if any.
    pub fn dashboard(&self) -> Option<&DashboardController> {
        self.dashboard.as_ref()
    }

    pub async fn view(&mut self) -> ShellView<'_> {
        match self.gate.state() {
            SessionState::Loading => {
                self.unmount();
                ShellView::Loading
            }
            SessionState::Errored(message) => {
                self.unmount();
                ShellView::Errored(message)
            }
            SessionState::Unauthenticated => {
                self.unmount();
                ShellView::SignIn
            }
            SessionState::Authenticated { email } => {
                if self.dashboard.is_some() && self.mounted_for != email {
                    self.unmount();
                }
                if self.dashboard.is_none() {
                    let options = DashboardOptions {
                        user: email.clone(),
                        ..self.options.clone()
                    };
                    let controller = DashboardController::mount(self.deps.clone(), options).await;
                    self.dashboard = Some(controller);
                    self.mounted_for = email;
                }
                match self.dashboard.as_ref() {
                    Some(dashboard) => ShellView::Dashboard(dashboard),
                    None => ShellView::Loading,
                }
            }
        }
    }

    pub async fn sign_in(&self) -> Result<Redirect> {
        self.gate.sign_in().await
    }

    /// Drops the dashboard before handing off to the provider.
    pub async fn sign_out(&mut self) -> Result<Redirect> {
        self.unmount();
        self.gate.sign_out().await
    }

    /// Tears the dashboard down even if a spawned run still holds a handle.
    fn unmount(&mut self) {
        if let Some(dashboard) = self.dashboard.take() {
            dashboard.unmount();
            tracing::info!("[RootShell] Dashboard unmounted");
        }
        self.mounted_for = None;
    }
}

impl Drop for RootShell {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::RunOutcome;
    use crate::preview::{PreviewRegistry, png_bytes};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;
    use yodash_core::model::{DetectionBox, HistoryEntry, ImageFile, ModelVersion};
    use yodash_core::ports::{HistoryPort, InferencePort, Notice, Notifier};
    use yodash_core::session::{IdentityProvider, IdentitySnapshot};

    struct MockProvider {
        snapshot: Mutex<IdentitySnapshot>,
    }

    impl MockProvider {
        fn set(&self, snapshot: IdentitySnapshot) {
            *self.snapshot.lock().unwrap() = snapshot;
        }
    }

    #[async_trait::async_trait]
    impl IdentityProvider for MockProvider {
        fn snapshot(&self) -> IdentitySnapshot {
            self.snapshot.lock().unwrap().clone()
        }

        async fn signin_redirect(&self) -> Result<Redirect> {
            Ok(Redirect {
                url: "https://idp.example/login".to_string(),
            })
        }

        async fn signout_redirect(&self) -> Result<Redirect> {
            Ok(Redirect {
                url: "https://idp.example/logout".to_string(),
            })
        }
    }

    struct NoInference;

    #[async_trait::async_trait]
    impl InferencePort for NoInference {
        async fn submit(
            &self,
            _image: &ImageFile,
            _model: ModelVersion,
            _user: Option<&str>,
        ) -> Result<Vec<DetectionBox>> {
            Ok(Vec::new())
        }
    }

    // Holds every request until released.
    #[derive(Default)]
    struct HeldInference {
        started: Notify,
        release: Notify,
    }

    #[async_trait::async_trait]
    impl InferencePort for HeldInference {
        async fn submit(
            &self,
            _image: &ImageFile,
            _model: ModelVersion,
            _user: Option<&str>,
        ) -> Result<Vec<DetectionBox>> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct CountingHistory {
        calls: AtomicUsize,
        users: Mutex<Vec<Option<String>>>,
    }

    #[async_trait::async_trait]
    impl HistoryPort for CountingHistory {
        async fn query(&self, user: Option<&str>) -> Result<Vec<HistoryEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.users.lock().unwrap().push(user.map(str::to_string));
            Ok(Vec::new())
        }
    }

    struct SilentNotifier;

    impl Notifier for SilentNotifier {
        fn notify(&self, _notice: Notice) {}
    }

    fn authenticated(email: &str) -> IdentitySnapshot {
        IdentitySnapshot {
            is_authenticated: true,
            email: Some(email.to_string()),
            ..Default::default()
        }
    }

    fn shell(initial: IdentitySnapshot) -> (RootShell, Arc<MockProvider>, Arc<CountingHistory>) {
        let provider = Arc::new(MockProvider {
            snapshot: Mutex::new(initial),
        });
        let history = Arc::new(CountingHistory::default());
        let deps = DashboardDeps {
            inference: Arc::new(NoInference),
            history: history.clone(),
            notifier: Arc::new(SilentNotifier),
            previews: PreviewRegistry::new(),
        };
        let shell = RootShell::new(
            SessionGate::new(provider.clone()),
            deps,
            DashboardOptions::default(),
        );
        (shell, provider, history)
    }

    #[tokio::test]
    async fn test_unauthenticated_shows_sign_in_without_backend_calls() {
        let (mut shell, _, history) = shell(IdentitySnapshot::default());

        assert!(matches!(shell.view().await, ShellView::SignIn));
        assert!(shell.dashboard().is_none());
        assert_eq!(history.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_loading_and_error_screens() {
        let (mut shell, provider, history) = shell(IdentitySnapshot {
            is_loading: true,
            ..Default::default()
        });
        assert!(matches!(shell.view().await, ShellView::Loading));

        provider.set(IdentitySnapshot {
            error: Some("invalid_grant".to_string()),
            ..Default::default()
        });
        match shell.view().await {
            ShellView::Errored(message) => assert_eq!(message, "invalid_grant"),
            _ => panic!("expected error screen"),
        }
        assert_eq!(history.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authenticated_mounts_dashboard_once() {
        let (mut shell, _, history) = shell(authenticated("ada@example.com"));

        match shell.view().await {
            ShellView::Dashboard(d) => assert_eq!(d.user(), Some("ada@example.com")),
            _ => panic!("expected dashboard"),
        }
        assert!(matches!(shell.view().await, ShellView::Dashboard(_)));

        assert_eq!(history.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            history.users.lock().unwrap().as_slice(),
            &[Some("ada@example.com".to_string())]
        );
    }

    #[tokio::test]
    async fn test_leaving_authenticated_state_unmounts() {
        let (mut shell, provider, history) = shell(authenticated("ada@example.com"));
        shell.view().await;
        assert!(shell.dashboard().is_some());

        provider.set(IdentitySnapshot::default());
        assert!(matches!(shell.view().await, ShellView::SignIn));
        assert!(shell.dashboard().is_none());

        provider.set(authenticated("grace@example.com"));
        match shell.view().await {
            ShellView::Dashboard(d) => assert_eq!(d.user(), Some("grace@example.com")),
            _ => panic!("expected dashboard"),
        }
        assert_eq!(history.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sign_out_drops_dashboard() {
        let (mut shell, _, _) = shell(authenticated("ada@example.com"));
        shell.view().await;

        let redirect = shell.sign_out().await.unwrap();
        assert_eq!(redirect.url, "https://idp.example/logout");
        assert!(shell.dashboard().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_with_run_in_flight_releases_preview() {
        let provider = Arc::new(MockProvider {
            snapshot: Mutex::new(authenticated("ada@example.com")),
        });
        let inference = Arc::new(HeldInference::default());
        let history = Arc::new(CountingHistory::default());
        let previews = PreviewRegistry::new();
        let deps = DashboardDeps {
            inference: inference.clone(),
            history: history.clone(),
            notifier: Arc::new(SilentNotifier),
            previews: previews.clone(),
        };
        let mut shell = RootShell::new(
            SessionGate::new(provider),
            deps,
            DashboardOptions::default(),
        );

        let dashboard = match shell.view().await {
            ShellView::Dashboard(d) => d.clone(),
            _ => panic!("expected dashboard"),
        };
        dashboard.select_file(ImageFile::new("photo.png", png_bytes(8, 8)));
        let handle = tokio::spawn(async move { dashboard.run_detection().await });
        inference.started.notified().await;
        assert_eq!(previews.live_count(), 1);

        shell.sign_out().await.unwrap();
        assert_eq!(previews.live_count(), 0);

        inference.release.notify_one();
        assert_eq!(handle.await.unwrap(), RunOutcome::Superseded);
        assert_eq!(history.calls.load(Ordering::SeqCst), 1);
    }
}
