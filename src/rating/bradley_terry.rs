use std::collections::BTreeMap;

use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use ndarray::Array2;

use super::convergence::{calculate_l1_change, has_converged, should_continue};
use super::types::{Comparison, DenseIndex, SolverStrategy, Strength};
use crate::config::settings::RatingSettings;
use crate::errors::RatingError;

// Keeps the uniformised chain aperiodic
const UNIFORMIZATION_SLACK: f64 = 1.1;

#[derive(Debug, Clone)]
pub struct StrengthFit {
    pub strengths: Vec<Strength>,
    pub strategy: SolverStrategy,
    pub iterations: usize,
}

/// Fits Bradley-Terry strengths with iterative Luce spectral ranking.
///
/// The sparse representation is tried first. If it fails to converge or
/// produces an unusable distribution, the same fixed point is rebuilt on a
/// dense pairwise win matrix and resumed from the sparse attempt's last
/// finite parameters. A second failure is reported as numerical instability.
pub fn fit_strengths(
    entity_count: usize,
    comparisons: &[Comparison],
    config: &RatingSettings,
) -> Result<StrengthFit, RatingError> {
    info!(
        "Fitting strengths for {} entities over {} comparisons",
        entity_count,
        comparisons.len()
    );

    if entity_count < 2 || comparisons.is_empty() {
        return Err(RatingError::insufficient(
            "at least two entities and one comparison are required to fit strengths",
        ));
    }

    let sparse = SparseChain::new(entity_count, comparisons, config);
    let (fit, strategy) = match run_ilsr(&sparse, vec![0.0; entity_count], config) {
        Ok(fit) => (fit, SolverStrategy::Sparse),
        Err(failure) => {
            warn!(
                "Sparse solver failed ({}), retrying with the dense pairwise matrix",
                failure.reason
            );
            let dense = DenseChain::new(entity_count, comparisons, config.regularization_alpha);
            let start = failure.resume_point();
            let fit = run_ilsr(&dense, start, config)
                .map_err(|f| instability(entity_count, comparisons.len(), f.reason))?;
            (fit, SolverStrategy::Dense)
        }
    };

    let strengths = exponentiate(&fit.params)
        .ok_or_else(|| instability(entity_count, comparisons.len(), "strengths are not finite".to_string()))?;

    info!(
        "  → {} solver converged in {} iterations",
        strategy.as_str(),
        fit.iterations
    );

    Ok(StrengthFit {
        strengths,
        strategy,
        iterations: fit.iterations,
    })
}

fn instability(entity_count: usize, comparison_count: usize, reason: String) -> RatingError {
    RatingError::NumericalInstability {
        entity_count,
        comparison_count,
        reason,
    }
}

/// A continuous-time Markov chain whose stationary distribution is the next
/// strength estimate, given the current weights.
trait LsrChain {
    fn stationary_distribution(&self, weights: &[f64]) -> Result<Vec<f64>, String>;
}

struct LsrFit {
    params: Vec<f64>,
    iterations: usize,
}

struct SolveFailure {
    reason: String,
    last_params: Vec<f64>,
}

impl SolveFailure {
    fn resume_point(&self) -> Vec<f64> {
        if self.last_params.iter().all(|p| p.is_finite()) {
            self.last_params.clone()
        } else {
            vec![0.0; self.last_params.len()]
        }
    }
}

fn run_ilsr(chain: &impl LsrChain, initial: Vec<f64>, config: &RatingSettings) -> Result<LsrFit, SolveFailure> {
    let mut params = initial;
    let mut iteration = 0;

    while should_continue(iteration, config.solver_max_iterations) {
        let weights = exp_transform(&params);
        let next = chain
            .stationary_distribution(&weights)
            .and_then(|distribution| log_transform(&distribution))
            .map_err(|reason| SolveFailure {
                reason,
                last_params: params.clone(),
            })?;

        iteration += 1;
        let converged = has_converged(&params, &next, config.solver_tolerance);
        params = next;

        if converged {
            return Ok(LsrFit {
                params,
                iterations: iteration,
            });
        }
    }

    Err(SolveFailure {
        reason: format!("did not converge after {} iterations", iteration),
        last_params: params,
    })
}

/// Log-parameters to weights centred on 1.
fn exp_transform(params: &[f64]) -> Vec<f64> {
    let mean = params.iter().sum::<f64>() / params.len() as f64;
    let weights: Vec<f64> = params.iter().map(|p| (p - mean).exp()).collect();
    let total: f64 = weights.iter().sum();
    let n = params.len() as f64;

    weights.iter().map(|w| n * w / total).collect()
}

/// Weights to log-parameters with zero mean.
fn log_transform(weights: &[f64]) -> Result<Vec<f64>, String> {
    if let Some(position) = weights.iter().position(|w| !(w.is_finite() && *w > 0.0)) {
        return Err(format!(
            "stationary distribution has no usable mass for entity {}",
            position
        ));
    }

    let logs: Vec<f64> = weights.iter().map(|w| w.ln()).collect();
    let mean = logs.iter().sum::<f64>() / logs.len() as f64;
    Ok(logs.iter().map(|l| l - mean).collect())
}

fn exponentiate(params: &[f64]) -> Option<Vec<Strength>> {
    let strengths: Vec<Strength> = params.iter().map(|p| p.exp()).collect();
    strengths
        .iter()
        .all(|s| s.is_finite() && *s > 0.0)
        .then_some(strengths)
}

/// Win counts kept as adjacency lists, walked by power iteration.
struct SparseChain {
    /// `beaten_by[l]` lists every winner over `l` with the number of wins.
    beaten_by: Vec<Vec<(DenseIndex, f64)>>,
    alpha: f64,
    max_steps: usize,
    tolerance: f64,
}

impl SparseChain {
    fn new(entity_count: usize, comparisons: &[Comparison], config: &RatingSettings) -> Self {
        let mut counts: Vec<BTreeMap<DenseIndex, f64>> = vec![BTreeMap::new(); entity_count];
        for comparison in comparisons {
            *counts[comparison.loser].entry(comparison.winner).or_insert(0.0) += 1.0;
        }

        Self {
            beaten_by: counts.into_iter().map(|m| m.into_iter().collect()).collect(),
            alpha: config.regularization_alpha,
            max_steps: config.stationary_max_iterations,
            tolerance: config.stationary_tolerance,
        }
    }

    fn transition_rates(&self, weights: &[f64]) -> Vec<Vec<(DenseIndex, f64)>> {
        self.beaten_by
            .iter()
            .enumerate()
            .map(|(loser, winners)| {
                winners
                    .iter()
                    .map(|&(winner, count)| (winner, count / (weights[winner] + weights[loser])))
                    .collect()
            })
            .collect()
    }

    fn step(&self, pi: &[f64], rates: &[Vec<(DenseIndex, f64)>], outflow: &[f64], lambda: f64) -> Vec<f64> {
        let total: f64 = pi.iter().sum();
        let mut next: Vec<f64> = pi
            .iter()
            .zip(outflow)
            .map(|(p, out)| p * (1.0 - out / lambda) + self.alpha * (total - p) / lambda)
            .collect();

        for (source, targets) in rates.iter().enumerate() {
            for &(target, rate) in targets {
                next[target] += pi[source] * rate / lambda;
            }
        }

        let mass: f64 = next.iter().sum();
        next.iter_mut().for_each(|p| *p /= mass);
        next
    }
}

impl LsrChain for SparseChain {
    fn stationary_distribution(&self, weights: &[f64]) -> Result<Vec<f64>, String> {
        let n = weights.len();
        let rates = self.transition_rates(weights);
        let outflow: Vec<f64> = rates
            .iter()
            .map(|targets| self.alpha * (n - 1) as f64 + targets.iter().map(|(_, r)| r).sum::<f64>())
            .collect();

        let lambda = outflow.iter().copied().fold(0.0_f64, f64::max) * UNIFORMIZATION_SLACK;
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err("chain has no usable transitions".to_string());
        }

        let total: f64 = weights.iter().sum();
        let mut pi: Vec<f64> = weights.iter().map(|w| w / total).collect();

        for _ in 0..self.max_steps {
            let next = self.step(&pi, &rates, &outflow, lambda);
            let change = calculate_l1_change(&pi, &next);
            pi = next;

            if change <= self.tolerance {
                return Ok(pi);
            }
        }

        Err(format!(
            "stationary distribution did not settle after {} steps",
            self.max_steps
        ))
    }
}

/// Pairwise win-count matrix with an exact stationary solve.
struct DenseChain {
    /// `wins[[i, j]]` is how often `i` beat `j`.
    wins: Array2<f64>,
    alpha: f64,
}

impl DenseChain {
    fn new(entity_count: usize, comparisons: &[Comparison], alpha: f64) -> Self {
        let mut wins = Array2::<f64>::zeros((entity_count, entity_count));
        for comparison in comparisons {
            wins[[comparison.winner, comparison.loser]] += 1.0;
        }
        Self { wins, alpha }
    }

    fn generator(&self, weights: &[f64]) -> Array2<f64> {
        let n = weights.len();
        let mut generator = Array2::<f64>::from_elem((n, n), self.alpha);

        for loser in 0..n {
            for winner in 0..n {
                if loser != winner {
                    generator[[loser, winner]] +=
                        self.wins[[winner, loser]] / (weights[winner] + weights[loser]);
                }
            }
        }

        for i in 0..n {
            generator[[i, i]] = 0.0;
            let outflow = generator.row(i).sum();
            generator[[i, i]] = -outflow;
        }

        generator
    }
}

impl LsrChain for DenseChain {
    fn stationary_distribution(&self, weights: &[f64]) -> Result<Vec<f64>, String> {
        let n = weights.len();
        let generator = self.generator(weights);

        // pi Q = 0 with the last balance equation swapped for sum(pi) = 1
        let system = DMatrix::from_fn(n, n, |r, c| {
            if r == n - 1 { 1.0 } else { generator[[c, r]] }
        });
        let mut rhs = DVector::<f64>::zeros(n);
        rhs[n - 1] = 1.0;

        let solution = system
            .lu()
            .solve(&rhs)
            .ok_or_else(|| "generator matrix is singular".to_string())?;

        Ok(solution.iter().copied().collect())
    }
}
