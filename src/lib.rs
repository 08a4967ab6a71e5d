//! Speciation for NEAT-style neuroevolution.
//!
//! Provides the clustering layer of a population-based topology search:
//!
//! - **Species and specie sets**: Clusters of genomes with stable ids,
//!   compact indices and on-demand fitness/complexity statistics.
//! - **Speciation strategy**: Nearest-centroid clustering with creation on
//!   miss, continuing specie identity across generations through centroids.
//! - **Threshold control**: Damped proportional adjustment of the
//!   compatibility threshold toward a target specie count.
//!
//! # Architecture
//!
//! Genome representation, distance computation, reproduction and offspring
//! allocation belong to the caller. The crate sees genomes only through the
//! [`speciation::Genome`] trait and positions through
//! [`speciation::DistanceMetric`], and hands each generation's
//! [`speciation::SpecieSet`] downstream as a read-only snapshot.

pub mod speciation;
