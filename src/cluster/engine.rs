use crate::config::VisualizerConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use rand::rngs::StdRng;
use std::fmt::Debug;

/// An algorithm that can be advanced one discrete step at a time.
///
/// `step` is a function of the `(dataset, state)` pair it is handed: it never
/// mutates its inputs and returns fresh copies, so any earlier snapshot can
/// be kept and stepped again.
pub trait StepEngine {
    type State: Clone + Debug;

    /// Clear all labels on `dataset` and produce the starting state.
    fn initialize(&mut self, dataset: &Dataset, rng: &mut StdRng) -> (Dataset, Self::State);

    /// Advance by exactly one unit of work.
    fn step(&mut self, dataset: &Dataset, state: &Self::State) -> (Dataset, Self::State);

    /// Whether no further step can change anything. Engines without a
    /// terminal state keep the default.
    fn is_done(&self, _state: &Self::State) -> bool {
        false
    }

    /// Hand back a state that also covers points appended to a dataset
    /// after `state` was produced.
    fn resume(&self, state: &Self::State) -> Self::State {
        state.clone()
    }

    /// A copy of this engine running with `config`'s parameters.
    fn with_config(&self, config: &VisualizerConfig) -> Result<Self>
    where
        Self: Sized;

    /// Record this engine's parameters in `config`.
    fn write_config(&self, config: &mut VisualizerConfig);

    /// Point to highlight in the current snapshot, if any.
    fn focus(&self, _state: &Self::State) -> Option<usize> {
        None
    }

    fn name(&self) -> &'static str;
}
