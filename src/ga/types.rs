//! Core trait definitions for the GA engine.
//!
//! The two central traits, [`Individual`] and [`GaProblem`], define the
//! contract between the generational loop and a concrete problem such as
//! route search.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable.
/// Lower fitness is considered better (minimization).
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Returns a value representing the worst possible fitness.
    ///
    /// Reported by individuals that have not been evaluated yet.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution in the GA population.
///
/// Individuals carry their own fitness. A fitness is *stale* from creation
/// until [`set_fitness`](Individual::set_fitness) is called, and again after
/// [`invalidate`](Individual::invalidate); the engine invalidates every
/// individual produced by crossover or mutation and re-evaluates only stale
/// ones.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct MySolution {
///     genes: Vec<f64>,
///     fitness: Option<f64>,
/// }
///
/// impl Individual for MySolution {
///     type Fitness = f64;
///     fn fitness(&self) -> f64 { self.fitness.unwrap_or(f64::INFINITY) }
///     fn set_fitness(&mut self, f: f64) { self.fitness = Some(f); }
///     fn is_evaluated(&self) -> bool { self.fitness.is_some() }
///     fn invalidate(&mut self) { self.fitness = None; }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Current fitness; [`Fitness::worst`] while stale.
    fn fitness(&self) -> Self::Fitness;

    /// Stores a freshly computed fitness.
    fn set_fitness(&mut self, fitness: Self::Fitness);

    /// Whether the stored fitness is current.
    fn is_evaluated(&self) -> bool;

    /// Marks the stored fitness as stale.
    fn invalidate(&mut self);
}

/// Defines a GA optimization problem.
///
/// 1. **Initialization**: how to create random individuals
/// 2. **Evaluation**: how to compute fitness
/// 3. **Crossover**: how to recombine two parents into two children
/// 4. **Mutation**: how to perturb an individual
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel using rayon. Randomness is only ever drawn on the
/// driving thread, never inside [`evaluate`](GaProblem::evaluate).
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness.
    ///
    /// This is typically the most expensive operation and must not depend
    /// on shared mutable state.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Recombines two parents into two children.
    ///
    /// The default implementation returns clones of the parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        _rng: &mut R,
    ) -> (Self::Individual, Self::Individual) {
        (parent1.clone(), parent2.clone())
    }

    /// Mutates an individual in place.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}
}
