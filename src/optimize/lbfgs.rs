use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Sufficient-decrease constant of the Armijo condition.
const ARMIJO: f64 = 1e-4;

/// Tolerance for treating a coordinate as sitting on its bound.
const BOUND_EPSILON: f64 = 1e-12;

/// Tuning of the bounded quasi-Newton minimizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimizerParams {
    /// Maximum number of accepted steps.
    pub max_iter: usize,
    /// Number of correction pairs kept for the inverse-Hessian approximation.
    pub memory: usize,
    /// Relative finite-difference step used to estimate the gradient.
    pub gradient_step: f64,
    /// Largest coordinate move of the first (steepest-descent) step.
    pub initial_step: f64,
    /// Stop once the projected gradient's largest component falls below this.
    pub pgtol: f64,
    /// Stop once the relative decrease of one step falls below this.
    pub ftol: f64,
    /// Maximum number of step halvings per line search.
    pub max_line_search: usize,
}

impl Default for MinimizerParams {
    fn default() -> Self {
        Self {
            max_iter: 100,
            memory: 10,
            gradient_step: 1e-5,
            initial_step: 0.1,
            pgtol: 1e-5,
            ftol: 2.2e-9,
            max_line_search: 20,
        }
    }
}

/// Result of a minimization.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

/// Correction pair `(s, y, 1 / s·y)`.
struct Correction {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

/// Counts objective evaluations.
struct Counted<F> {
    f: F,
    evaluations: usize,
}

impl<F: Fn(&[f64]) -> f64> Counted<F> {
    fn eval(&mut self, x: &[f64]) -> f64 {
        self.evaluations += 1;
        (self.f)(x)
    }

    /// Forward-difference gradient at `x`, stepping backward where a forward step would leave the box.
    fn gradient(&mut self, x: &[f64], fx: f64, bounds: &[(f64, f64)], step: f64) -> Vec<f64> {
        let mut probe = x.to_vec();
        (0..x.len())
            .map(|i| {
                let mut h = step * x[i].abs().max(1.0);
                if x[i] + h > bounds[i].1 { h = -h }
                probe[i] = x[i] + h;
                let derivative = (self.eval(&probe) - fx) / h;
                probe[i] = x[i];
                if derivative.is_finite() { derivative } else { 0.0 }
            })
            .collect()
    }
}

/// Minimize `f` over the box `bounds` (one `(lower, upper)` pair per coordinate) starting from `x0`,
/// using projected limited-memory BFGS with finite-difference gradients and a backtracking line
/// search. The starting point is projected into the box first.
///
/// The returned point always has the dimensionality of `x0` and lies inside the box.
pub fn minimize<F>(f: F, x0: &[f64], bounds: &[(f64, f64)], params: &MinimizerParams) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    assert_eq!(x0.len(), bounds.len(), "bounds must match the dimensionality of the guess");

    let mut objective = Counted { f, evaluations: 0 };
    let mut x = x0.to_vec();
    project(&mut x, bounds);
    let mut fx = objective.eval(&x);

    if x.is_empty() {
        return Minimum { x, value: fx, iterations: 0, evaluations: objective.evaluations, converged: true }
    }

    let mut g = objective.gradient(&x, fx, bounds, params.gradient_step);
    let mut history = VecDeque::<Correction>::with_capacity(params.memory);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iter {
        if projected_gradient_norm(&x, &g, bounds) < params.pgtol {
            converged = true;
            break;
        }

        let mut direction = two_loop(&g, &history);
        freeze_active(&mut direction, &x, bounds);
        if !(dot(&g, &direction) < 0.0) {
            // Curvature information points uphill; restart from steepest descent.
            history.clear();
            direction = g.iter().map(|gi| -gi).collect();
            freeze_active(&mut direction, &x, bounds);
            if !(dot(&g, &direction) < 0.0) {
                converged = true;
                break;
            }
        }
        if history.is_empty() {
            let largest = direction.iter().fold(0.0_f64, |m, d| m.max(d.abs()));
            if largest > 0.0 {
                direction.iter_mut().for_each(|d| *d *= params.initial_step / largest);
            }
        }

        let Some((next, f_next)) = line_search(&mut objective, &x, fx, &g, &direction, bounds, params) else {
            trace!("minimizer: line search failed at iteration {iterations}, f = {fx:.6e}");
            break;
        };
        let g_next = objective.gradient(&next, f_next, bounds, params.gradient_step);

        let s = next.iter().zip(&x).map(|(a, b)| a - b).collect::<Vec<_>>();
        let y = g_next.iter().zip(&g).map(|(a, b)| a - b).collect::<Vec<_>>();
        let sy = dot(&s, &y);
        if sy > f64::EPSILON * dot(&y, &y) {
            if history.len() == params.memory { history.pop_front(); }
            if params.memory > 0 { history.push_back(Correction { s, y, rho: 1.0 / sy }); }
        }

        let decrease = (fx - f_next) / fx.abs().max(f_next.abs()).max(1.0);
        x = next;
        fx = f_next;
        g = g_next;
        iterations += 1;
        trace!("minimizer: iteration {iterations}, f = {fx:.6e}");

        if decrease <= params.ftol {
            converged = true;
            break;
        }
    }

    Minimum { x, value: fx, iterations, evaluations: objective.evaluations, converged }
}

/// Armijo backtracking along `direction`, projecting every trial point into the box.
fn line_search<F: Fn(&[f64]) -> f64>(
    objective: &mut Counted<F>,
    x: &[f64],
    fx: f64,
    g: &[f64],
    direction: &[f64],
    bounds: &[(f64, f64)],
    params: &MinimizerParams,
) -> Option<(Vec<f64>, f64)> {
    let mut t = 1.0;
    for _ in 0..params.max_line_search {
        let mut trial = x.iter().zip(direction).map(|(xi, di)| xi + t * di).collect::<Vec<_>>();
        project(&mut trial, bounds);
        if trial.as_slice() == x { return None }

        let f_trial = objective.eval(&trial);
        let predicted = g.iter().zip(trial.iter().zip(x)).map(|(gi, (a, b))| gi * (a - b)).sum::<f64>();
        if f_trial.is_finite() && f_trial <= fx + ARMIJO * predicted {
            return Some((trial, f_trial));
        }
        t *= 0.5;
    }
    None
}

/// Apply the inverse-Hessian approximation to `-g`.
fn two_loop(g: &[f64], history: &VecDeque<Correction>) -> Vec<f64> {
    let mut q = g.to_vec();
    let mut alphas = Vec::with_capacity(history.len());
    for c in history.iter().rev() {
        let alpha = c.rho * dot(&c.s, &q);
        q.iter_mut().zip(&c.y).for_each(|(qi, yi)| *qi -= alpha * yi);
        alphas.push(alpha);
    }

    if let Some(last) = history.back() {
        let gamma = dot(&last.s, &last.y) / dot(&last.y, &last.y);
        q.iter_mut().for_each(|qi| *qi *= gamma);
    }

    for (c, alpha) in history.iter().zip(alphas.into_iter().rev()) {
        let beta = c.rho * dot(&c.y, &q);
        q.iter_mut().zip(&c.s).for_each(|(qi, si)| *qi += (alpha - beta) * si);
    }

    q.into_iter().map(|qi| -qi).collect()
}

/// Zero the components of `direction` that push against an active bound.
fn freeze_active(direction: &mut [f64], x: &[f64], bounds: &[(f64, f64)]) {
    for ((d, &xi), &(lo, hi)) in direction.iter_mut().zip(x).zip(bounds) {
        if (xi <= lo + BOUND_EPSILON && *d < 0.0) || (xi >= hi - BOUND_EPSILON && *d > 0.0) {
            *d = 0.0;
        }
    }
}

/// Largest component of `x - P(x - g)`.
fn projected_gradient_norm(x: &[f64], g: &[f64], bounds: &[(f64, f64)]) -> f64 {
    x.iter().zip(g).zip(bounds)
        .map(|((&xi, &gi), &(lo, hi))| (xi - (xi - gi).clamp(lo, hi)).abs())
        .fold(0.0, f64::max)
}

#[inline]
fn project(x: &mut [f64], bounds: &[(f64, f64)]) {
    x.iter_mut().zip(bounds).for_each(|(xi, &(lo, hi))| *xi = xi.clamp(lo, hi));
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
