//! Core trait definitions for speciation.
//!
//! [`Genome`] is the contract between the speciation engine and the
//! external population. Genomes are never owned here: species hold
//! references into the population snapshot for one generation.

use super::coordinate::CoordinateVector;

/// Identifier of a specie, unique for the lifetime of a population.
///
/// Ids come from a monotonically increasing counter and are never reused,
/// even after the specie goes extinct.
pub type SpecieId = u32;

/// A member of the evolving population.
///
/// # Implementing
///
/// ```ignore
/// struct NetGenome {
///     weights: CoordinateVector,
///     fitness: f64,
///     nodes: usize,
/// }
///
/// impl Genome for NetGenome {
///     fn fitness(&self) -> f64 { self.fitness }
///     fn complexity(&self) -> f64 { (self.nodes + self.weights.len()) as f64 }
///     fn position(&self) -> &CoordinateVector { &self.weights }
/// }
/// ```
///
/// # Thread Safety
///
/// `Genome` must be `Send + Sync` because distance computations may run
/// across rayon workers when the `parallel` feature is enabled.
pub trait Genome: Send + Sync {
    /// Evaluated fitness. Speciation requires evaluation to be complete.
    fn fitness(&self) -> f64;

    /// Structural complexity, e.g. node plus connection count.
    fn complexity(&self) -> f64;

    /// Position in genetic-distance space.
    fn position(&self) -> &CoordinateVector;
}
