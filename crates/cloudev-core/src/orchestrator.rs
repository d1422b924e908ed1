// ── Dev environment start orchestration ──
//
// Polls a dev environment until the service reports it RUNNING, issuing a
// start command whenever it is seen STOPPED. The poll loop races an overall
// deadline. Cancellation ends the wait between polls; a fetch already in
// flight is allowed to finish.

use cloudev_api::Transport;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{DevEnvStatus, DevEnvironment, DevEnvironmentId};
use crate::progress::ProgressReporter;
use crate::session::Session;

const CHECKING: &str = "checking status...";
const RESUMING: &str = "resuming dev environment...";
const WAITING_FOR_STOP: &str = "waiting for dev environment to stop...";
const WAITING: &str = "waiting for dev environment...";

// ── Transition rules ─────────────────────────────────────────────

/// What to do about one status observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartStep {
    /// Stopped: issue a start command.
    Resume,
    /// Still stopping: it must finish before it can be started.
    AwaitStop,
    /// Some other non-running status.
    Await,
    Ready,
}

/// The status seen on the previous poll, and the rules applied to the next.
#[derive(Debug)]
struct StartTracker {
    id: String,
    last: Option<DevEnvStatus>,
}

impl StartTracker {
    fn new(id: String, last: Option<DevEnvStatus>) -> Self {
        Self { id, last }
    }

    /// Record `status` and decide the next step.
    ///
    /// Leaving STARTING for STOPPED or STOPPING means the start failed
    /// remotely; that is fatal.
    fn observe(&mut self, status: &DevEnvStatus) -> Result<StartStep, CoreError> {
        if self.last == Some(DevEnvStatus::Starting)
            && matches!(status, DevEnvStatus::Stopped | DevEnvStatus::Stopping)
        {
            return Err(CoreError::StartRegression {
                id: self.id.clone(),
                from: DevEnvStatus::Starting,
                to: status.clone(),
            });
        }

        let step = match status {
            DevEnvStatus::Running => StartStep::Ready,
            DevEnvStatus::Stopped => StartStep::Resume,
            DevEnvStatus::Stopping => StartStep::AwaitStop,
            _ => StartStep::Await,
        };
        self.last = Some(status.clone());
        Ok(step)
    }
}

// ── Orchestration ────────────────────────────────────────────────

impl<T: Transport> Session<T> {
    /// Bring a dev environment to RUNNING.
    ///
    /// Returns the running environment, or `None` if the overall timeout
    /// ([`ClientConfig::start_timeout`](crate::ClientConfig::start_timeout))
    /// passed or `cancel` fired first. A timeout is reported through
    /// `progress.notify_error`; a cancellation is not. Cancelling does not
    /// retract a start command already sent.
    ///
    /// If `wanted` is RUNNING and the environment already is, it is returned
    /// without polling.
    pub async fn start_dev_environment_with_progress(
        &self,
        target: &DevEnvironmentId,
        wanted: &DevEnvStatus,
        progress: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<Option<DevEnvironment>, CoreError> {
        let config = self.config();
        if config.poll_interval.is_zero() {
            return Err(CoreError::Config {
                message: "poll_interval must be greater than zero".into(),
            });
        }
        let timeout = config.start_timeout;
        let deadline = Instant::now()
            .checked_add(timeout)
            .ok_or_else(|| CoreError::Config {
                message: format!("start_timeout of {}s is out of range", timeout.as_secs()),
            })?;

        let last = match self.get_dev_environment(target).await {
            Ok(env) if wanted.is_running() && env.status.is_running() => {
                debug!(%target, "dev environment already running");
                return Ok(Some(env));
            }
            Ok(env) => Some(env.status),
            Err(e) => {
                warn!(%target, error = %e, "initial status check failed");
                None
            }
        };

        progress.report(CHECKING);
        let tracker = StartTracker::new(target.id.clone(), last);

        tokio::select! {
            outcome = self.poll_until_running(target, tracker, progress, cancel, deadline) => outcome,
            () = sleep_until(deadline) => {
                warn!(%target, ?timeout, "timed out waiting for dev environment");
                progress.notify_error(&format!(
                    "Timed out waiting for dev environment {} to start",
                    target.id
                ));
                Ok(None)
            }
        }
    }

    async fn poll_until_running(
        &self,
        target: &DevEnvironmentId,
        mut tracker: StartTracker,
        progress: &dyn ProgressReporter,
        cancel: &CancellationToken,
        deadline: Instant,
    ) -> Result<Option<DevEnvironment>, CoreError> {
        let mut ticker = interval(self.config().poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(%target, "start cancelled");
                    return Ok(None);
                }
                _ = ticker.tick() => {}
            }
            if Instant::now() >= deadline {
                continue;
            }

            let env = self.get_dev_environment(target).await?;
            match tracker.observe(&env.status)? {
                StartStep::Ready => {
                    info!(%target, "dev environment running");
                    return Ok(Some(env));
                }
                StartStep::Resume => {
                    progress.report(RESUMING);
                    self.start_dev_environment(target).await?;
                }
                StartStep::AwaitStop => progress.report(WAITING_FOR_STOP),
                StartStep::Await => progress.report(WAITING),
            }
        }
    }
}
