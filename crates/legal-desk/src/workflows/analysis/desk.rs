use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::backend::{AnalysisBackend, DocumentUpload, RemoteAnalysis, RemoteAnalysisError};
use super::simulator::{
    IncrementSource, ProgressSimulator, ProgressSnapshot, RunTicket, TickOutcome,
};
use super::upload::{validate_upload, UploadCandidate, UploadRejection};
use super::views::AnalysisReport;
use crate::config::DeskConfig;

/// Timer settings for a simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub tick: Duration,
    pub completion_delay: Duration,
}

impl From<&DeskConfig> for Pacing {
    fn from(config: &DeskConfig) -> Self {
        Self {
            tick: config.progress_tick,
            completion_delay: config.completion_delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationEnd {
    Presented(AnalysisReport),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Upload(#[from] UploadRejection),
    #[error(transparent)]
    Remote(#[from] RemoteAnalysisError),
}

/// Per-visitor analysis state: the simulator plus the channel its snapshots are
/// published on. Renderers subscribe instead of being called from the timer.
#[derive(Debug, Clone)]
pub struct AnalysisDesk {
    simulator: Arc<Mutex<ProgressSimulator>>,
    updates: Arc<watch::Sender<ProgressSnapshot>>,
}

impl Default for AnalysisDesk {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisDesk {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(ProgressSnapshot::default());
        Self {
            simulator: Arc::new(Mutex::new(ProgressSimulator::default())),
            updates: Arc::new(updates),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().snapshot()
    }

    pub fn is_analyzing(&self) -> bool {
        self.lock().is_analyzing()
    }

    pub fn report(&self) -> Option<AnalysisReport> {
        self.lock().report().cloned()
    }

    /// Validates the upload and moves the simulator into `Running`.
    pub fn start_simulated(&self, candidate: &UploadCandidate) -> Result<RunTicket, UploadRejection> {
        let (ticket, snapshot) = {
            let mut simulator = self.lock();
            if simulator.is_analyzing() {
                return Err(UploadRejection::AnalysisInProgress);
            }
            validate_upload(candidate)?;
            let ticket = simulator.begin(candidate.file_name.clone())?;
            (ticket, simulator.snapshot())
        };

        info!(file = %candidate.file_name, size = candidate.size_bytes, "simulated analysis started");
        self.updates.send_replace(snapshot);
        Ok(ticket)
    }

    pub fn spawn_simulation<I>(
        &self,
        ticket: RunTicket,
        pacing: Pacing,
        increments: I,
    ) -> JoinHandle<SimulationEnd>
    where
        I: IncrementSource + 'static,
    {
        let desk = self.clone();
        tokio::spawn(async move { desk.run_simulation(ticket, pacing, increments).await })
    }

    /// Drives ticks until completion, then presents the report after the completion delay.
    /// Ends early as soon as the run is reset or replaced.
    pub async fn run_simulation<I>(
        &self,
        ticket: RunTicket,
        pacing: Pacing,
        mut increments: I,
    ) -> SimulationEnd
    where
        I: IncrementSource,
    {
        // A zero period is rejected by tokio.
        let mut interval = tokio::time::interval(pacing.tick.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick resolves immediately; progress starts one period after upload.
        interval.tick().await;

        loop {
            interval.tick().await;
            let increment = increments.next_increment();
            let outcome = self.lock().tick(ticket, increment);
            match outcome {
                TickOutcome::Progressed(snapshot) => {
                    self.updates.send_replace(snapshot);
                }
                TickOutcome::Completed(snapshot) => {
                    self.updates.send_replace(snapshot);
                    break;
                }
                TickOutcome::Stale => {
                    debug!("analysis run superseded, stopping ticks");
                    return SimulationEnd::Cancelled;
                }
            }
        }

        tokio::time::sleep(pacing.completion_delay).await;
        self.present(ticket, Local::now().date_naive())
    }

    fn present(&self, ticket: RunTicket, analysed_on: NaiveDate) -> SimulationEnd {
        let (report, snapshot) = {
            let mut simulator = self.lock();
            let report = simulator.present(ticket, analysed_on);
            (report, simulator.snapshot())
        };

        match report {
            Some(report) => {
                info!(document = %report.document, "analysis report ready");
                self.updates.send_replace(snapshot);
                SimulationEnd::Presented(report)
            }
            None => SimulationEnd::Cancelled,
        }
    }

    /// Validates the upload like a simulated run, then sends it to the remote endpoint
    /// while holding the analyzing guard. The guard is released whether the request
    /// succeeds or fails.
    pub async fn analyze_remote<B>(
        &self,
        backend: &B,
        upload: &DocumentUpload,
    ) -> Result<RemoteAnalysis, AnalysisError>
    where
        B: AnalysisBackend + ?Sized,
    {
        let candidate = upload.candidate();
        let (ticket, snapshot) = {
            let mut simulator = self.lock();
            if simulator.is_analyzing() {
                return Err(UploadRejection::AnalysisInProgress.into());
            }
            validate_upload(&candidate)?;
            let ticket = simulator.begin_remote(upload.file_name.clone())?;
            (ticket, simulator.snapshot())
        };
        self.updates.send_replace(snapshot);

        let result = backend.analyze(upload).await;

        let snapshot = {
            let mut simulator = self.lock();
            simulator.finish_remote(ticket);
            simulator.snapshot()
        };
        self.updates.send_replace(snapshot);

        match &result {
            Ok(analysis) => info!(
                file = %upload.file_name,
                word_count = analysis.word_count,
                "remote analysis returned"
            ),
            Err(err) => warn!(file = %upload.file_name, detail = err.detail(), "remote analysis failed"),
        }

        result.map_err(AnalysisError::from)
    }

    /// Cancels any run and clears the result. Pending timer callbacks become no-ops.
    pub fn reset(&self) -> bool {
        let (cancelled, snapshot) = {
            let mut simulator = self.lock();
            let cancelled = simulator.reset();
            (cancelled, simulator.snapshot())
        };
        if cancelled {
            info!("active analysis cancelled");
        }
        self.updates.send_replace(snapshot);
        cancelled
    }

    fn lock(&self) -> MutexGuard<'_, ProgressSimulator> {
        self.simulator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
