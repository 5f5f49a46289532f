//! Pull-based frame sequencing.
//!
//! A [`FrameSequencer`] owns one playback run over a caller-supplied schedule
//! of timestamps. The driver calls [`FrameSequencer::init`] once and then
//! [`FrameSequencer::step`] until the schedule is exhausted:
//!
//! ```text
//! Ready --init--> Running --step (last timestamp)--> Done
//! ```
//!
//! A timestamp with no data yields the previous frame unchanged.

use log::debug;
use wxa_core::{Result, Timestamp, WxaError};

/// Produces frame artifacts for one kind of time-indexed data.
pub trait Animator {
    type Frame: Clone;

    /// Compute any run-wide state and the first frame.
    fn init(&mut self, schedule: &[Timestamp]) -> Result<Self::Frame>;

    /// The frame for `t`, or `None` if the source has nothing at `t`.
    fn animate(&mut self, previous: &Self::Frame, t: Timestamp) -> Option<Self::Frame>;
}

/// Where a sequencer is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Done,
}

/// Drives an [`Animator`] over an ordered schedule of timestamps.
pub struct FrameSequencer<A: Animator> {
    animator: A,
    schedule: Vec<Timestamp>,
    position: usize,
    current: Option<A::Frame>,
    phase: Phase,
}

impl<A: Animator> FrameSequencer<A> {
    pub fn new(animator: A, schedule: Vec<Timestamp>) -> Self {
        Self {
            animator,
            schedule,
            position: 0,
            current: None,
            phase: Phase::Ready,
        }
    }

    /// Start (or restart) the run and return the first frame.
    pub fn init(&mut self) -> Result<A::Frame> {
        let first = self.animator.init(&self.schedule)?;
        self.position = 0;
        self.current = Some(first.clone());
        self.phase = if self.schedule.is_empty() {
            Phase::Done
        } else {
            Phase::Running
        };
        Ok(first)
    }

    /// Advance to the next scheduled timestamp and return its frame.
    pub fn step(&mut self) -> Result<(Timestamp, A::Frame)> {
        match self.phase {
            Phase::Ready => return Err(WxaError::SequencerNotStarted),
            Phase::Done => return Err(WxaError::SequencerFinished),
            Phase::Running => {}
        }
        let (Some(&t), Some(previous)) = (self.schedule.get(self.position), self.current.take())
        else {
            self.phase = Phase::Done;
            return Err(WxaError::SequencerFinished);
        };
        let frame = match self.animator.animate(&previous, t) {
            Some(frame) => frame,
            None => {
                debug!("no data at {}, holding previous frame", t);
                previous
            }
        };
        self.position += 1;
        if self.position == self.schedule.len() {
            self.phase = Phase::Done;
        }
        self.current = Some(frame.clone());
        Ok((t, frame))
    }

    /// Run from the start to the end of the schedule, collecting every frame
    /// after the first.
    pub fn run(&mut self) -> Result<(A::Frame, Vec<(Timestamp, A::Frame)>)> {
        let first = self.init()?;
        let mut frames = Vec::with_capacity(self.schedule.len());
        while self.phase == Phase::Running {
            frames.push(self.step()?);
        }
        Ok((first, frames))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The most recently produced frame.
    pub fn current(&self) -> Option<&A::Frame> {
        self.current.as_ref()
    }

    pub fn remaining(&self) -> usize {
        match self.phase {
            Phase::Done => 0,
            _ => self.schedule.len() - self.position,
        }
    }

    pub fn schedule(&self) -> &[Timestamp] {
        &self.schedule
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }
}
