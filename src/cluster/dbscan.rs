use super::engine::StepEngine;
use crate::config::{VisualizerConfig, validate_epsilon, validate_min_points};
use crate::dataset::{Dataset, NOISE, Point};
use crate::error::Result;
use crate::geometry::NeighborIndex;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    FindUnvisited,
    CheckNeighbors,
    ExpandCluster,
    Done,
}

/// Progress of one DBSCAN pass over a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DbscanState {
    cursor: usize,
    cluster_counter: i32,
    queue: VecDeque<usize>,
    // Mirrors `queue` for constant-time dedup.
    queued: HashSet<usize>,
    phase: Phase,
    focus: Option<usize>,
    steps: usize,
}

impl DbscanState {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            cluster_counter: 0,
            queue: VecDeque::new(),
            queued: HashSet::new(),
            phase: Phase::FindUnvisited,
            focus: None,
            steps: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of clusters discovered so far; also the id of the newest one.
    pub fn cluster_counter(&self) -> i32 {
        self.cluster_counter
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn queue(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().copied()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }
}

impl Default for DbscanState {
    fn default() -> Self {
        Self::new()
    }
}

/// DBSCAN run as a sequence of externally triggered steps.
///
/// Each call to [`DbscanEngine::step`] performs exactly one phase of the
/// canonical pass: locating the next unvisited point, classifying it, or
/// expanding the active cluster by one queued point. Neighborhoods are
/// strict (`distance < epsilon`) and include the point itself; they are
/// served from a [`NeighborIndex`] that is rebuilt only when the dataset's
/// coordinates or `epsilon` change.
#[derive(Clone, Debug)]
pub struct DbscanEngine {
    epsilon: f64,
    min_points: usize,
    index: NeighborIndex,
}

impl DbscanEngine {
    pub fn new(epsilon: f64, min_points: usize) -> Result<Self> {
        validate_epsilon(epsilon)?;
        validate_min_points(min_points)?;

        Ok(Self {
            epsilon,
            min_points,
            index: NeighborIndex::empty(),
        })
    }

    pub fn from_config(config: &VisualizerConfig) -> Result<Self> {
        Self::new(config.epsilon, config.min_points)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    pub fn initialize(&mut self, dataset: &Dataset) -> (Dataset, DbscanState) {
        let data = dataset.reset_labels();
        self.refresh_index(&data);
        (data, DbscanState::new())
    }

    pub fn is_done(&self, state: &DbscanState) -> bool {
        state.is_done()
    }

    /// Advance the pass by one phase, returning new copies of both halves of
    /// the snapshot. A finished state is returned unchanged.
    pub fn step(&mut self, dataset: &Dataset, state: &DbscanState) -> (Dataset, DbscanState) {
        let mut data = dataset.clone();
        let mut next = state.clone();

        if state.is_done() {
            return (data, next);
        }

        self.refresh_index(&data);
        next.steps += 1;

        match state.phase {
            Phase::FindUnvisited => self.find_unvisited(&data, &mut next),
            Phase::CheckNeighbors => self.check_neighbors(&mut data, &mut next),
            Phase::ExpandCluster => self.expand_cluster(&mut data, &mut next),
            Phase::Done => unreachable!(),
        }

        (data, next)
    }

    /// Reset `dataset` and step until the pass finishes.
    pub fn run_to_completion(&mut self, dataset: &Dataset) -> (Dataset, DbscanState) {
        let (mut data, mut state) = self.initialize(dataset);
        while !state.is_done() {
            (data, state) = self.step(&data, &state);
        }
        (data, state)
    }

    fn refresh_index(&mut self, dataset: &Dataset) {
        if !self.index.is_current(dataset, self.epsilon) {
            tracing::debug!(
                points = dataset.len(),
                epsilon = self.epsilon,
                "rebuilding neighbor index"
            );
            self.index = NeighborIndex::build(dataset, self.epsilon);
        }
    }

    fn find_unvisited(&self, data: &Dataset, next: &mut DbscanState) {
        let found = data
            .iter()
            .enumerate()
            .skip(next.cursor)
            .find(|(_, p)| !p.visited)
            .map(|(i, _)| i);

        match found {
            Some(idx) => {
                next.cursor = idx;
                next.focus = Some(idx);
                next.phase = Phase::CheckNeighbors;
                tracing::debug!(point = idx, "focus on unvisited point");
            }
            None => {
                next.focus = None;
                next.phase = Phase::Done;
                tracing::debug!(
                    clusters = next.cluster_counter,
                    steps = next.steps,
                    "dbscan pass complete"
                );
            }
        }
    }

    fn check_neighbors(&self, data: &mut Dataset, next: &mut DbscanState) {
        let idx = next.cursor;
        if idx >= data.len() {
            next.phase = Phase::FindUnvisited;
            return;
        }

        let points = data.points_mut();
        points[idx].visited = true;
        let neighbors = self.index.neighbors(idx);

        if neighbors.len() < self.min_points {
            points[idx].cluster = Some(NOISE);
            next.cursor += 1;
            next.phase = Phase::FindUnvisited;
            tracing::debug!(point = idx, neighbors = neighbors.len(), "marked noise");
            return;
        }

        next.cluster_counter += 1;
        let id = next.cluster_counter;
        points[idx].cluster = Some(id);
        claim_neighbors(points, &neighbors, id, next);
        next.phase = Phase::ExpandCluster;
        tracing::debug!(
            point = idx,
            cluster = id,
            queued = next.queue.len(),
            "core point opens cluster"
        );
    }

    fn expand_cluster(&self, data: &mut Dataset, next: &mut DbscanState) {
        let Some(idx) = next.queue.pop_front() else {
            next.cursor += 1;
            next.phase = Phase::FindUnvisited;
            return;
        };
        next.queued.remove(&idx);
        next.focus = Some(idx);

        let id = next.cluster_counter;
        let points = data.points_mut();
        if points[idx].is_claimable() {
            points[idx].cluster = Some(id);
        }
        if points[idx].visited {
            return;
        }

        points[idx].visited = true;
        let neighbors = self.index.neighbors(idx);
        if neighbors.len() >= self.min_points {
            claim_neighbors(points, &neighbors, id, next);
        }
    }
}

// Unclassified and noise neighbors join cluster `id`; the unvisited ones are
// queued once.
fn claim_neighbors(points: &mut [Point], neighbors: &[usize], id: i32, next: &mut DbscanState) {
    for &n in neighbors {
        if !points[n].is_claimable() {
            continue;
        }
        points[n].cluster = Some(id);
        if !points[n].visited && next.queued.insert(n) {
            next.queue.push_back(n);
        }
    }
}

impl StepEngine for DbscanEngine {
    type State = DbscanState;

    fn initialize(&mut self, dataset: &Dataset, _rng: &mut StdRng) -> (Dataset, DbscanState) {
        DbscanEngine::initialize(self, dataset)
    }

    fn step(&mut self, dataset: &Dataset, state: &DbscanState) -> (Dataset, DbscanState) {
        DbscanEngine::step(self, dataset, state)
    }

    fn is_done(&self, state: &DbscanState) -> bool {
        state.is_done()
    }

    fn resume(&self, state: &DbscanState) -> DbscanState {
        let mut next = state.clone();
        if next.is_done() {
            next.phase = Phase::FindUnvisited;
        }
        next
    }

    fn with_config(&self, config: &VisualizerConfig) -> Result<Self> {
        DbscanEngine::from_config(config)
    }

    fn write_config(&self, config: &mut VisualizerConfig) {
        config.epsilon = self.epsilon;
        config.min_points = self.min_points;
    }

    fn focus(&self, state: &DbscanState) -> Option<usize> {
        state.focus
    }

    fn name(&self) -> &'static str {
        "dbscan"
    }
}
