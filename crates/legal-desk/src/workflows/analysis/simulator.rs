use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::upload::UploadRejection;
use super::views::AnalysisReport;

pub const ANALYSIS_STEPS: [&str; 8] = [
    "Uploading document...",
    "Extracting text content...",
    "Analyzing legal structure...",
    "Identifying key clauses...",
    "Checking compliance requirements...",
    "Evaluating risk factors...",
    "Generating recommendations...",
    "Finalizing report...",
];

pub const COMPLETION_LABEL: &str = "Analysis complete!";

pub const MIN_INCREMENT: f32 = 5.0;
pub const MAX_INCREMENT: f32 = 20.0;

const STEP_SPAN: f32 = 100.0 / ANALYSIS_STEPS.len() as f32;
const LAST_STEP: usize = ANALYSIS_STEPS.len() - 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSession {
    pub file_name: String,
    pub progress_percent: f32,
    pub current_step_index: usize,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Running,
    /// Progress reached 100; the report is shown after the completion delay.
    Completed,
    Presented,
    AwaitingRemote,
}

/// Identifies one run. Ticks and presentations carrying an older ticket are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Progressed(ProgressSnapshot),
    Completed(ProgressSnapshot),
    /// The run was reset or replaced; the caller should stop ticking.
    Stale,
}

/// Render-ready view of the simulator state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub phase: AnalysisPhase,
    pub is_analyzing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub progress_percent: f32,
    pub step_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        ProgressSimulator::default().snapshot()
    }
}

/// Pure state machine behind the document analysis modal. It never touches a timer;
/// callers feed it ticks and increments.
#[derive(Debug, Clone, Default)]
pub struct ProgressSimulator {
    phase: AnalysisPhase,
    session: Option<AnalysisSession>,
    report: Option<AnalysisReport>,
    generation: u64,
}

impl ProgressSimulator {
    /// Guard against concurrent uploads. Derived from the phase so it cannot go stale.
    pub fn is_analyzing(&self) -> bool {
        matches!(
            self.phase,
            AnalysisPhase::Running | AnalysisPhase::AwaitingRemote
        )
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&AnalysisSession> {
        self.session.as_ref()
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub fn begin(&mut self, file_name: impl Into<String>) -> Result<RunTicket, UploadRejection> {
        self.start(file_name.into(), AnalysisPhase::Running)
    }

    pub fn begin_remote(
        &mut self,
        file_name: impl Into<String>,
    ) -> Result<RunTicket, UploadRejection> {
        self.start(file_name.into(), AnalysisPhase::AwaitingRemote)
    }

    fn start(
        &mut self,
        file_name: String,
        phase: AnalysisPhase,
    ) -> Result<RunTicket, UploadRejection> {
        if self.is_analyzing() {
            return Err(UploadRejection::AnalysisInProgress);
        }

        self.generation += 1;
        self.phase = phase;
        self.report = None;
        self.session = Some(AnalysisSession {
            file_name,
            progress_percent: 0.0,
            current_step_index: 0,
            is_active: true,
        });

        Ok(RunTicket {
            generation: self.generation,
        })
    }

    pub fn tick(&mut self, ticket: RunTicket, increment: f32) -> TickOutcome {
        if ticket.generation != self.generation || self.phase != AnalysisPhase::Running {
            return TickOutcome::Stale;
        }
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Stale;
        };

        let increment = if increment.is_finite() {
            increment.max(0.0)
        } else {
            0.0
        };
        session.progress_percent += increment;

        if session.progress_percent >= 100.0 {
            session.progress_percent = 100.0;
            session.is_active = false;
            self.phase = AnalysisPhase::Completed;
            return TickOutcome::Completed(self.snapshot());
        }

        let next_threshold = (session.current_step_index + 1) as f32 * STEP_SPAN;
        if session.current_step_index < LAST_STEP && session.progress_percent > next_threshold {
            session.current_step_index += 1;
        }

        TickOutcome::Progressed(self.snapshot())
    }

    /// Attaches the result view once the completion delay has elapsed.
    pub fn present(&mut self, ticket: RunTicket, analysed_on: NaiveDate) -> Option<AnalysisReport> {
        if ticket.generation != self.generation || self.phase != AnalysisPhase::Completed {
            return None;
        }
        let session = self.session.as_ref()?;

        let report = AnalysisReport::new(&session.file_name, analysed_on);
        self.report = Some(report.clone());
        self.phase = AnalysisPhase::Presented;
        Some(report)
    }

    /// Releases the guard held by a remote request. Returns false if the run was reset meanwhile.
    pub fn finish_remote(&mut self, ticket: RunTicket) -> bool {
        if ticket.generation != self.generation || self.phase != AnalysisPhase::AwaitingRemote {
            return false;
        }
        self.phase = AnalysisPhase::Idle;
        self.session = None;
        true
    }

    /// Returns to idle and invalidates outstanding tickets. Reports whether a run was active.
    pub fn reset(&mut self) -> bool {
        let was_analyzing = self.is_analyzing();
        self.generation += 1;
        self.phase = AnalysisPhase::Idle;
        self.session = None;
        self.report = None;
        was_analyzing
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let (file_name, progress_percent, step_index) = match &self.session {
            Some(session) => (
                Some(session.file_name.clone()),
                session.progress_percent,
                session.current_step_index,
            ),
            None => (None, 0.0, 0),
        };

        let step_label = match self.phase {
            AnalysisPhase::Idle | AnalysisPhase::AwaitingRemote => None,
            AnalysisPhase::Running => Some(ANALYSIS_STEPS[step_index]),
            AnalysisPhase::Completed | AnalysisPhase::Presented => Some(COMPLETION_LABEL),
        };

        ProgressSnapshot {
            phase: self.phase,
            is_analyzing: self.is_analyzing(),
            file_name,
            progress_percent,
            step_index,
            step_label,
            report: self.report.clone(),
        }
    }
}

/// Supplies the per-tick progress increment.
pub trait IncrementSource: Send {
    fn next_increment(&mut self) -> f32;
}

/// Uniform increments in `[MIN_INCREMENT, MAX_INCREMENT)`.
#[derive(Debug)]
pub struct RandomIncrements {
    rng: StdRng,
}

impl RandomIncrements {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIncrements {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementSource for RandomIncrements {
    fn next_increment(&mut self) -> f32 {
        self.rng.gen_range(MIN_INCREMENT..MAX_INCREMENT)
    }
}

/// Replays a fixed sequence, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedIncrements {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedIncrements {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl IncrementSource for FixedIncrements {
    fn next_increment(&mut self) -> f32 {
        if self.values.is_empty() {
            return MIN_INCREMENT;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
