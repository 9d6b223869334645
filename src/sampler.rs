//! Monte-Carlo estimates of average path length and diameter.
//!
//! Every trial owns its RNG, derived from the trial index, so a fixed seed
//! gives the same answer no matter how rayon schedules the work.

use petgraph::graph::{NodeIndex, UnGraph};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::progress::Ticker;
use crate::traversal::{eccentricity, shortest_path_length};

const PATH_STREAM: u64 = 0x7061_7468;
const DIAMETER_STREAM: u64 = 0x6469_616d;

/// Where each trial's randomness comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Seeding {
    #[default]
    Entropy,
    Fixed(u64),
}

impl Seeding {
    fn trial_rng(self, stream: u64, trial: usize) -> StdRng {
        match self {
            Seeding::Entropy => StdRng::seed_from_u64(rand::random()),
            Seeding::Fixed(seed) => StdRng::seed_from_u64(mix(mix(seed ^ stream) ^ trial as u64)),
        }
    }
}

// splitmix64 finaliser
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSample {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub distance: Option<usize>,
}

/// Pooled outcome of a batch of path-length or eccentricity trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingResult {
    pub attempted: usize,
    pub valid: usize,
    pub total_distance: usize,
    pub max_distance: usize,
}

impl SamplingResult {
    fn from_sample(sample: Option<PathSample>) -> Self {
        match sample.and_then(|s| s.distance) {
            Some(d) => SamplingResult {
                attempted: 1,
                valid: 1,
                total_distance: d,
                max_distance: d,
            },
            None => SamplingResult {
                attempted: 1,
                ..Default::default()
            },
        }
    }

    fn from_eccentricity(e: usize) -> Self {
        SamplingResult {
            attempted: 1,
            valid: 1,
            total_distance: e,
            max_distance: e,
        }
    }

    fn merge(self, other: Self) -> Self {
        SamplingResult {
            attempted: self.attempted + other.attempted,
            valid: self.valid + other.valid,
            total_distance: self.total_distance + other.total_distance,
            max_distance: self.max_distance.max(other.max_distance),
        }
    }

    /// Mean of the valid distances, or `f64::INFINITY` if there were none.
    pub fn mean(&self) -> f64 {
        if self.valid == 0 {
            f64::INFINITY
        } else {
            self.total_distance as f64 / self.valid as f64
        }
    }
}

pub struct GraphSampler<'g, N, E> {
    graph: &'g UnGraph<N, E>,
    seeding: Seeding,
    ticker: Option<Ticker>,
}

impl<'g, N: Sync, E: Sync> GraphSampler<'g, N, E> {
    pub fn new(graph: &'g UnGraph<N, E>) -> Self {
        GraphSampler {
            graph,
            seeding: Seeding::Entropy,
            ticker: None,
        }
    }

    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_seeding(Seeding::Fixed(seed))
    }

    /// Reports every finished trial to `ticker`.
    pub fn with_progress(mut self, ticker: Ticker) -> Self {
        self.ticker = Some(ticker);
        self
    }

    /// Draws one pair of distinct nodes and measures the hop distance between them.
    ///
    /// Returns `None` when the graph has fewer than two nodes.
    pub fn path_sample(&self, trial: usize) -> Option<PathSample> {
        let n = self.graph.node_count();
        if n < 2 {
            return None;
        }
        let mut rng = self.seeding.trial_rng(PATH_STREAM, trial);
        let pair = index::sample(&mut rng, n, 2);
        let source = NodeIndex::new(pair.index(0));
        let target = NodeIndex::new(pair.index(1));
        Some(PathSample {
            source,
            target,
            distance: shortest_path_length(self.graph, source, target),
        })
    }

    /// Runs `sample_count` independent pair trials and pools them.
    ///
    /// Pairs with no connecting path are counted as attempted but not valid.
    pub fn sample_path_lengths(&self, sample_count: usize) -> SamplingResult {
        let result = (0..sample_count)
            .into_par_iter()
            .map(|trial| {
                let sample = self.path_sample(trial);
                self.tick();
                SamplingResult::from_sample(sample)
            })
            .reduce(SamplingResult::default, SamplingResult::merge);

        if result.valid < result.attempted {
            debug!(
                discarded = result.attempted - result.valid,
                "pairs without a path excluded from the mean"
            );
        }
        result
    }

    pub fn estimate_average_path_length(&self, sample_count: usize) -> f64 {
        self.sample_path_lengths(sample_count).mean()
    }

    /// Eccentricity of the node picked by probe `trial`.
    pub fn probe(&self, trial: usize) -> Result<usize> {
        let n = self.graph.node_count();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        let mut rng = self.seeding.trial_rng(DIAMETER_STREAM, trial);
        let source = NodeIndex::new(rng.gen_range(0..n));
        Ok(eccentricity(self.graph, source))
    }

    /// Runs `probe_count` eccentricity probes and pools them.
    ///
    /// `max_distance` is the diameter estimate; `mean()` is the average
    /// eccentricity of the probed sources.
    pub fn sample_eccentricities(&self, probe_count: usize) -> Result<SamplingResult> {
        if probe_count == 0 {
            return Err(Error::InvalidConfig(
                "diameter estimation needs at least one probe".to_string(),
            ));
        }
        if self.graph.node_count() == 0 {
            return Err(Error::EmptyGraph);
        }

        (0..probe_count)
            .into_par_iter()
            .map(|trial| {
                let e = self.probe(trial);
                self.tick();
                e.map(SamplingResult::from_eccentricity)
            })
            .try_reduce(SamplingResult::default, |a, b| Ok(a.merge(b)))
    }

    /// Largest eccentricity seen over `probe_count` random sources.
    ///
    /// This never exceeds the true diameter.
    pub fn estimate_diameter(&self, probe_count: usize) -> Result<usize> {
        Ok(self.sample_eccentricities(probe_count)?.max_distance)
    }

    fn tick(&self) {
        if let Some(ticker) = &self.ticker {
            ticker.tick();
        }
    }
}

/// Average path length over `sample_count` random pairs, seeded from entropy.
pub fn estimate_average_path_length<N: Sync, E: Sync>(
    graph: &UnGraph<N, E>,
    sample_count: usize,
) -> f64 {
    GraphSampler::new(graph).estimate_average_path_length(sample_count)
}

/// Diameter lower bound from `probe_count` random BFS sources, seeded from entropy.
pub fn estimate_diameter<N: Sync, E: Sync>(graph: &UnGraph<N, E>, probe_count: usize) -> Result<usize> {
    GraphSampler::new(graph).estimate_diameter(probe_count)
}
