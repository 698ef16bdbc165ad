use crate::agent::Agent;

/// Sort `population` by descending fitness. Unscored agents sort last.
pub fn rank(population: &mut [Agent]) {
    population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
}

/// Truncation selection: rank and keep the best `survival_fraction` of the population, but never
/// fewer than one agent of a non-empty population.
pub fn select(population: &mut Vec<Agent>, survival_fraction: f64) {
    rank(population);
    let keep = ((population.len() as f64 * survival_fraction) as usize).max(1);
    population.truncate(keep);
}
