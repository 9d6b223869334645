//! Exploratory statistics for social interaction graphs: cluster
//! connectivity, centrality rankings and sampled path-length/diameter
//! estimates on the largest connected component.

pub mod centrality;
pub mod clusters;
pub mod error;
pub mod graph;
pub mod progress;
pub mod sampler;
pub mod traversal;

pub use centrality::{RankedNode, degree_centrality, eigenvector_centrality, top_connected};
pub use clusters::{ClusterConnectivity, ClusterLabels};
pub use error::{Error, Result};
pub use graph::InteractionGraph;
pub use progress::{Progress, Ticker};
pub use sampler::{
    GraphSampler, PathSample, SamplingResult, Seeding, estimate_average_path_length,
    estimate_diameter,
};
