//! In-memory model of the student quiz-taking flow: one-way question
//! progression, the countdown, and the proctoring escalations that can
//! force a submission.
//!
//! The original delivery surface runs this on a single-threaded browser
//! loop; the model here is therefore a plain synchronous state machine.
//! It owns no I/O -- completion emits a [`Action::Submit`] carrying the
//! buffered answers, and the caller performs the actual grading call.
//! Every completion path funnels through one guarded transition, so at
//! most one submit command is ever emitted no matter how many signals
//! (timer expiry, third strike, fullscreen exit) fire in the same tick.

pub mod proctor;

use chrono::Utc;
use uuid::Uuid;

use crate::models::answer::StudentAnswer;
use proctor::{Escalation, ProctorMonitor, Violation};

/// Countdown budget granted per question at quiz start.
pub const SECONDS_PER_QUESTION: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    /// Last question answered and advanced past.
    Finished,
    /// The countdown reached zero.
    TimeExpired,
    /// Third tab-switch strike.
    TabSwitchLimit,
    /// Fullscreen was abandoned mid-quiz.
    FullscreenExit,
    /// Explicit submit action by the student.
    Manual,
}

/// What the caller should do after poking the state machine.
#[derive(Debug)]
pub enum Action {
    None,
    /// Fullscreen could not be acquired; the quiz has not started.
    FullscreenRequired,
    /// Tab switch detected; show the strike count.
    TabSwitchWarning { strikes: u32, limit: u32 },
    /// Session is over: send these answers to the grading endpoint.
    /// Emitted exactly once per session.
    Submit {
        reason: SubmitReason,
        answers: Vec<StudentAnswer>,
    },
}

#[derive(Debug)]
pub struct QuizSession {
    student_id: String,
    question_ids: Vec<Uuid>,
    phase: Phase,
    current: usize,
    answers: Vec<StudentAnswer>,
    time_left: i64,
    question_elapsed: i64,
    monitor: ProctorMonitor,
}

impl QuizSession {
    pub fn new(student_id: impl Into<String>, question_ids: Vec<Uuid>) -> Self {
        let time_left = SECONDS_PER_QUESTION * question_ids.len() as i64;
        Self {
            student_id: student_id.into(),
            question_ids,
            phase: Phase::NotStarted,
            current: 0,
            answers: Vec::new(),
            time_left,
            question_elapsed: 0,
            monitor: ProctorMonitor::new(),
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn time_left(&self) -> i64 {
        self.time_left
    }

    pub fn strikes(&self) -> u32 {
        self.monitor.strikes()
    }

    pub fn answers(&self) -> &[StudentAnswer] {
        &self.answers
    }

    /// Starting the quiz requires fullscreen. Without it the session
    /// stays in `NotStarted` and the caller surfaces a warning.
    pub fn start(&mut self, fullscreen_acquired: bool) -> Action {
        if self.phase != Phase::NotStarted {
            return Action::None;
        }
        if !fullscreen_acquired {
            return Action::FullscreenRequired;
        }
        self.phase = Phase::InProgress;
        self.question_elapsed = 0;
        Action::None
    }

    /// Records a selection for the active question, replacing any prior
    /// selection for it. Past questions are unreachable: progression is
    /// one-way and `select` only ever touches the current slot.
    pub fn select(&mut self, option: &str) {
        if self.phase != Phase::InProgress {
            return;
        }
        let Some(&question_id) = self.question_ids.get(self.current) else {
            return;
        };
        let answer = StudentAnswer {
            question_id,
            answer: option.to_string(),
            time_spent: self.question_elapsed,
            timestamp: Utc::now(),
        };
        if let Some(existing) = self
            .answers
            .iter_mut()
            .find(|a| a.question_id == question_id)
        {
            *existing = answer;
        } else {
            self.answers.push(answer);
        }
    }

    /// Moves to the next question, making whatever was (or was not)
    /// selected for the current one final. Advancing past the last
    /// question completes the session.
    pub fn advance(&mut self) -> Action {
        if self.phase != Phase::InProgress {
            return Action::None;
        }
        if self.current + 1 >= self.question_ids.len() {
            return self.complete(SubmitReason::Finished);
        }
        self.current += 1;
        self.time_left = SECONDS_PER_QUESTION;
        self.question_elapsed = 0;
        Action::None
    }

    /// One-second timer tick. No pause/resume: once counting, it counts
    /// until completion or dismount.
    pub fn tick(&mut self) -> Action {
        if self.phase != Phase::InProgress {
            return Action::None;
        }
        self.question_elapsed += 1;
        self.time_left -= 1;
        if self.time_left <= 0 {
            return self.complete(SubmitReason::TimeExpired);
        }
        Action::None
    }

    /// Explicit submission by the student.
    pub fn submit(&mut self) -> Action {
        if self.phase != Phase::InProgress {
            return Action::None;
        }
        self.complete(SubmitReason::Manual)
    }

    /// Feeds a proctoring signal through the monitor. Ignored outside
    /// `InProgress`, which is what makes simultaneous triggers safe:
    /// the first escalation completes the session and every later one
    /// falls through to `Action::None`.
    pub fn report_violation(&mut self, violation: Violation) -> Action {
        if self.phase != Phase::InProgress {
            return Action::None;
        }
        match self.monitor.observe(violation) {
            Escalation::Warn { strikes, limit } => Action::TabSwitchWarning { strikes, limit },
            Escalation::Terminate(Violation::TabHidden) => {
                self.complete(SubmitReason::TabSwitchLimit)
            }
            Escalation::Terminate(Violation::FullscreenExit) => {
                self.complete(SubmitReason::FullscreenExit)
            }
        }
    }

    fn complete(&mut self, reason: SubmitReason) -> Action {
        if self.phase == Phase::Completed {
            return Action::None;
        }
        self.phase = Phase::Completed;
        Action::Submit {
            reason,
            answers: self.answers.clone(),
        }
    }
}
