//! Run/pause/reset semantics around a [`StepEngine`].
//!
//! The controller is the only writer of the `(dataset, state)` pair. It holds
//! at most one pending tick deadline; starting twice, or toggling
//! start/pause quickly, can never leave two ticks scheduled. Time is passed
//! in by the caller, which keeps the controller independent of any runtime:
//! [`crate::Driver`] supplies real (tokio) time, tests supply their own.

use crate::cluster::StepEngine;
use crate::config::{MAX_TICK_INTERVAL, VisualizerConfig, tick_interval};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::generator::{DatasetGenerator, ViewTransform};
use crate::geometry::Point2D;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunState {
    Stopped,
    Running,
}

/// What a single applied step produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub step: usize,
    pub focus: Option<usize>,
    pub finished: bool,
}

/// Read-only view handed to the renderer.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a, S> {
    pub dataset: &'a Dataset,
    pub state: &'a S,
    pub focus: Option<usize>,
    pub run_state: RunState,
    pub steps: usize,
}

pub struct RunController<E: StepEngine> {
    engine: E,
    generator: DatasetGenerator,
    rng: StdRng,
    config: VisualizerConfig,
    dataset: Dataset,
    state: E::State,
    run_state: RunState,
    next_tick: Option<Instant>,
    steps: usize,
}

impl<E: StepEngine> RunController<E> {
    /// Generate the first dataset from `config` and initialise `engine` on it.
    /// The engine's own parameters replace the matching fields of `config`.
    pub fn new(mut engine: E, mut config: VisualizerConfig) -> Result<Self> {
        engine.write_config(&mut config);
        config.validate()?;

        let (mut generator, mut rng) = match config.seed {
            Some(seed) => (
                DatasetGenerator::with_seed(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (DatasetGenerator::new(), StdRng::from_entropy()),
        };
        let raw = generator.generate(config.shape, config.point_count)?;
        let (dataset, state) = engine.initialize(&raw, &mut rng);

        tracing::info!(
            engine = engine.name(),
            points = dataset.len(),
            shape = ?config.shape,
            "controller ready"
        );

        Ok(Self {
            engine,
            generator,
            rng,
            config,
            dataset,
            state,
            run_state: RunState::Stopped,
            next_tick: None,
            steps: 0,
        })
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn is_done(&self) -> bool {
        self.engine.is_done(&self.state)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &E::State {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Deadline of the single pending tick, if running.
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// `1000ms / speed`.
    pub fn interval(&self) -> Duration {
        // `speed` is validated on every path into `config`.
        tick_interval(self.config.speed).unwrap_or(MAX_TICK_INTERVAL)
    }

    pub fn snapshot(&self) -> Snapshot<'_, E::State> {
        Snapshot {
            dataset: &self.dataset,
            state: &self.state,
            focus: self.engine.focus(&self.state),
            run_state: self.run_state,
            steps: self.steps,
        }
    }

    /// Begin ticking. Returns `false` when already running or when the
    /// engine has nothing left to do.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        if self.is_done() {
            tracing::warn!(engine = self.engine.name(), "run already finished, reset first");
            return false;
        }

        self.run_state = RunState::Running;
        self.next_tick = Some(now + self.interval());
        tracing::info!(speed = self.config.speed, "run started");
        true
    }

    pub fn pause(&mut self) {
        if self.is_running() {
            tracing::info!(steps = self.steps, "run paused");
        }
        self.run_state = RunState::Stopped;
        self.next_tick = None;
    }

    /// Stop, draw a fresh dataset and reinitialise the engine.
    pub fn reset(&mut self) -> Result<()> {
        self.pause();
        let raw = self
            .generator
            .generate(self.config.shape, self.config.point_count)?;
        (self.dataset, self.state) = self.engine.initialize(&raw, &mut self.rng);
        self.steps = 0;
        tracing::info!(points = self.dataset.len(), "run reset");
        Ok(())
    }

    /// Apply the pending tick if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<TickReport> {
        let due = self.next_tick?;
        if now < due {
            return None;
        }

        let report = self.advance();
        if report.finished {
            self.run_state = RunState::Stopped;
            self.next_tick = None;
            tracing::info!(steps = self.steps, "run finished");
        } else {
            // Catch up without bursting if the caller fell behind.
            let next = due + self.interval();
            self.next_tick = Some(if next > now { next } else { now + self.interval() });
        }
        Some(report)
    }

    /// Manual single step, independent of the schedule.
    pub fn step_once(&mut self) -> TickReport {
        let report = self.advance();
        if report.finished && self.is_running() {
            self.pause();
        }
        report
    }

    fn advance(&mut self) -> TickReport {
        if !self.is_done() {
            (self.dataset, self.state) = self.engine.step(&self.dataset, &self.state);
            self.steps += 1;
        }
        TickReport {
            step: self.steps,
            focus: self.engine.focus(&self.state),
            finished: self.is_done(),
        }
    }

    /// Change the tick rate, rescheduling any pending tick from `now`.
    pub fn set_speed(&mut self, speed: f64, now: Instant) -> Result<()> {
        let interval = tick_interval(speed)?;
        self.config.speed = speed;
        if self.next_tick.is_some() {
            self.next_tick = Some(now + interval);
        }
        Ok(())
    }

    /// Paint points around `center` (data space) with the configured brush.
    ///
    /// A finished run is reopened so the new points get classified by the
    /// next steps; existing labels are kept.
    pub fn inject(&mut self, center: Point2D, transform: &ViewTransform) -> Result<usize> {
        let before = self.dataset.len();
        self.dataset =
            self.generator
                .inject(&self.dataset, center, transform, self.config.brush_radius)?;
        let added = self.dataset.len() - before;
        if added > 0 {
            self.state = self.engine.resume(&self.state);
        }
        Ok(added)
    }

    /// Swap in a reconfigured engine. The run stops and the new engine
    /// starts over on the current points.
    pub fn replace_engine(&mut self, engine: E) {
        self.pause();
        self.engine = engine;
        self.engine.write_config(&mut self.config);
        (self.dataset, self.state) = self.engine.initialize(&self.dataset, &mut self.rng);
        self.steps = 0;
        tracing::info!(engine = self.engine.name(), "engine reconfigured");
    }

    /// Adopt a new configuration. Generator settings apply from the next
    /// [`reset`](Self::reset); a change to the engine's parameters rebuilds
    /// the engine at once, as [`replace_engine`](Self::replace_engine) does.
    pub fn reconfigure(&mut self, config: VisualizerConfig) -> Result<()> {
        config.validate()?;

        let mut current = config.clone();
        self.engine.write_config(&mut current);
        if current != config {
            let engine = self.engine.with_config(&config)?;
            self.config = config;
            self.replace_engine(engine);
        } else {
            self.config = config;
        }
        Ok(())
    }
}
