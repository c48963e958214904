//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat.

use super::config::GaConfig;
use super::create_rng;
use super::types::{Fitness, GaProblem, Individual};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Result of a GA optimization run.
///
/// Contains the best solution found, along with statistics about the
/// evolutionary process.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Best fitness of the initial population.
    pub initial_best_fitness: I::Fitness,

    /// Best fitness of the last population.
    ///
    /// Without elitism this can be worse than `best_fitness`.
    pub final_best_fitness: I::Fitness,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped on the wall-clock limit.
    pub timed_out: bool,

    /// Best-so-far fitness after initialization and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config);
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`] first
    /// to get a descriptive error).
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> GaResult<P::Individual> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA will
    /// stop before the next generation and return the best solution found
    /// so far.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GaResult<P::Individual> {
        let mut rng = create_rng(config.seed.unwrap_or_else(rand::random));
        Self::run_with_rng(problem, config, &mut rng, cancel)
    }

    /// Runs the GA drawing all randomness from `rng`.
    ///
    /// Every draw happens on the calling thread, so a seeded generator gives
    /// the same result with or without parallel evaluation.
    pub fn run_with_rng<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GaResult<P::Individual> {
        if let Err(msg) = config.validate() {
            panic!("invalid GaConfig: {msg}");
        }

        let started = Instant::now();
        let elite_count = config.elite_count();

        // 1. Initialize population
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(rng))
            .collect();

        // 2. Evaluate initial population
        evaluate_stale(problem, &mut population, config.parallel);

        // 3. Track best
        let mut best = find_best(&population).clone();
        let initial_best_fitness = best.fitness();
        let mut fitness_history = Vec::with_capacity(config.max_generations.min(1024) + 1);
        fitness_history.push(best.fitness().to_f64());

        let mut generations = 0usize;
        let mut cancelled = false;
        let mut timed_out = false;

        // 4. Evolutionary loop
        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    timed_out = true;
                    break;
                }
            }

            // Elites are the best of the current generation, kept as is
            if elite_count > 0 {
                population.sort_by(|a, b| {
                    a.fitness()
                        .partial_cmp(&b.fitness())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }

            // Breeding pool, one selection per slot
            let mut pool: Vec<P::Individual> = (0..config.population_size)
                .map(|_| population[config.selection.select(&population, rng)].clone())
                .collect();

            // Crossover on consecutive pairs; an odd last member passes through
            for pair in pool.chunks_exact_mut(2) {
                if rng.random_bool(config.crossover_rate) {
                    let (mut c1, mut c2) = problem.crossover(&pair[0], &pair[1], rng);
                    c1.invalidate();
                    c2.invalidate();
                    pair[0] = c1;
                    pair[1] = c2;
                }
            }

            for ind in pool.iter_mut() {
                if rng.random_bool(config.mutation_rate) {
                    problem.mutate(ind, rng);
                    ind.invalidate();
                }
            }

            population = if elite_count > 0 {
                let mut next = population[..elite_count].to_vec();
                next.extend(pool.into_iter().take(config.population_size - elite_count));
                next
            } else {
                pool
            };

            evaluate_stale(problem, &mut population, config.parallel);

            let gen_best = find_best(&population);
            if gen_best.fitness() < best.fitness() {
                best = gen_best.clone();
            }

            fitness_history.push(best.fitness().to_f64());
            generations = gen + 1;

            if generations % 10 == 0 {
                tracing::debug!(
                    generation = generations,
                    best = best.fitness().to_f64(),
                    current = gen_best.fitness().to_f64(),
                    "ga progress"
                );
            }
        }

        GaResult {
            best_fitness: best.fitness(),
            final_best_fitness: find_best(&population).fitness(),
            initial_best_fitness,
            best,
            generations,
            cancelled,
            timed_out,
            fitness_history,
        }
    }
}

/// Evaluate every individual whose fitness is stale.
fn evaluate_stale<P: GaProblem>(problem: &P, population: &mut [P::Individual], parallel: bool) {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            population
                .par_iter_mut()
                .filter(|ind| !ind.is_evaluated())
                .for_each(|ind| {
                    let f = problem.evaluate(ind);
                    ind.set_fitness(f);
                });
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Find the individual with the best (lowest) fitness.
///
/// # Panics
/// Panics on an empty population, which a validated config never produces.
fn find_best<I: Individual>(population: &[I]) -> &I {
    population
        .iter()
        .reduce(|best, ind| if ind.fitness() < best.fitness() { ind } else { best })
        .expect("population must not be empty")
}

// ============================================================================
// Tests
// ============================================================================
