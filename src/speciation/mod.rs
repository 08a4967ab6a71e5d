//! Speciation for NEAT-style neuroevolution.
//!
//! Partitions a population into species by genetic distance, keeps specie
//! identity stable across generations, and steers the compatibility
//! threshold toward a target specie count.
//!
//! # Core Traits
//!
//! - [`Genome`]: A population member with fitness, complexity and position
//! - [`DistanceMetric`]: Distance and centroid computation over positions
//!
//! # Key Types
//!
//! - [`Specie`]: One cluster with on-demand aggregate statistics
//! - [`SpecieSet`]: Ordered species of one generation
//! - [`SpeciationStrategy`]: Nearest-centroid clustering with creation on miss
//! - [`ThresholdController`]: Adaptive compatibility threshold
//! - [`SpeciationRunner`]: One speciation step per generation
//!
//! # References
//!
//! - Stanley & Miikkulainen (2002), "Evolving Neural Networks through
//!   Augmenting Topologies"
//! - MacQueen (1967), "Some Methods for Classification and Analysis of
//!   Multivariate Observations"

mod config;
mod coordinate;
mod error;
mod metric;
mod runner;
mod set;
mod specie;
mod strategy;
mod threshold;
mod types;

pub use config::{SpeciationConfig, ThresholdConfig};
pub use coordinate::CoordinateVector;
pub use error::{Result, SpeciationError};
pub use metric::{DistanceMetric, EuclideanDistance, ManhattanDistance};
pub use runner::{GenerationOutcome, SpeciationRunner};
pub use set::SpecieSet;
pub use specie::{Specie, SpecieStats};
pub use strategy::SpeciationStrategy;
pub use threshold::ThresholdController;
pub use types::{Genome, SpecieId};
