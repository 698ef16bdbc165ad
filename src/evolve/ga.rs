use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    agent::{Agent, RepairScheme},
    error::{PackingError, Result},
    evolve::{
        crossover::crossover,
        fitness::evaluate,
        mutation::{mutate, MutationParams},
        selection::{rank, select},
        GaConfig, Problem,
    },
};

/// Per-generation observations, in population order after ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    pub generation: usize,
    /// Fitness of every scored agent, best first.
    pub fitness: Vec<f64>,
    /// Circle count of every scored agent, in the same order.
    pub lengths: Vec<usize>,
    /// Repair verdict of every agent of the bred and mutated population.
    pub repaired: Vec<bool>,
    /// Agents left after repair.
    pub survivors: usize,
}

/// Outcome of a run.
#[derive(Clone, Debug)]
pub struct RunResult {
    /// Best agent of the last scored generation.
    pub best: Agent,
    pub history: Vec<GenerationReport>,
}

/// State handed to an observer after every generation.
pub struct Generation<'a> {
    pub report: &'a GenerationReport,
    /// The repaired population, before the next scoring.
    pub population: &'a [Agent],
}

/// Run the genetic algorithm to completion.
pub fn run(problem: &Problem, config: &GaConfig) -> Result<RunResult> {
    run_with_observer(problem, config, |_| {})
}

/// Run the genetic algorithm, passing every repaired generation to `observer`.
pub fn run_with_observer<F>(problem: &Problem, config: &GaConfig, mut observer: F) -> Result<RunResult>
where
    F: FnMut(&Generation<'_>),
{
    problem.validate()?;
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let region = &problem.region;
    let repair = config.repair_params();
    let mutation = MutationParams { probability: config.mutation_probability, offset: config.mutation_offset };

    info!("initializing {} agents with {} circles each", config.population, config.initial_length);
    let mut population = (0..config.population)
        .map(|_| Agent::random(
            region, problem.bounding_box.clone(), problem.radius, config.segments, config.initial_length, &mut rng,
        ))
        .collect::<Vec<_>>();

    let repaired = map_agents(&mut population, &mut rng, config.parallel, |agent, rng| {
        agent.repair(region, RepairScheme::Recursive, &repair, rng)
    });
    retain_repaired(&mut population, &repaired);
    info!("{} of {} agents survived initial repair", population.len(), config.population);
    if population.is_empty() { return Err(PackingError::EmptyPopulation) }

    let mut best = None;
    let mut history = Vec::with_capacity(config.generations);

    for generation in 0..config.generations {
        score_population(&mut population, problem, config, &mut rng);
        best = population.first().cloned();
        let fitness = population.iter().map(Agent::fitness).collect::<Vec<_>>();
        let lengths = population.iter().map(Agent::length).collect::<Vec<_>>();
        debug!("generation {generation}: fitness {fitness:?}");

        select(&mut population, config.survival_fraction);
        let offspring = crossover(&mut population, region, &mut rng);
        debug!("generation {generation}: {} survivors bred {} children", population.len(), offspring.len());
        population.extend(offspring);

        map_agents(&mut population, &mut rng, config.parallel, |agent, rng| {
            mutate(agent, region, &mutation, rng)
        })
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

        let repaired = map_agents(&mut population, &mut rng, config.parallel, |agent, rng| {
            agent.repair(region, RepairScheme::Standard, &repair, rng)
        });
        retain_repaired(&mut population, &repaired);

        let report = GenerationReport { generation, fitness, lengths, repaired, survivors: population.len() };
        info!(
            "generation {generation}: best fitness {:.4}, {} agents survived repair",
            report.fitness.first().copied().unwrap_or(f64::NAN), report.survivors,
        );
        observer(&Generation { report: &report, population: &population });
        history.push(report);

        if population.is_empty() { return Err(PackingError::EmptyPopulation) }
        if population.len() <= 3 {
            info!("stopping after generation {generation}: only {} agents left", population.len());
            break;
        }
    }

    let best = match best {
        Some(best) => best,
        None => {
            score_population(&mut population, problem, config, &mut rng);
            population.first().cloned().ok_or(PackingError::EmptyPopulation)?
        }
    };
    info!("best agent: fitness {:.4}, {} circles", best.fitness(), best.length());

    Ok(RunResult { best, history })
}

/// Score every agent and rank the population, best first.
fn score_population(population: &mut [Agent], problem: &Problem, config: &GaConfig, rng: &mut StdRng) {
    map_agents(population, rng, config.parallel, |agent, rng| {
        evaluate(agent, &problem.region, &config.weights, config.initial_length, rng);
    });
    rank(population);
}

fn retain_repaired(population: &mut Vec<Agent>, repaired: &[bool]) {
    let mut verdicts = repaired.iter();
    population.retain(|_| verdicts.next().copied().unwrap_or(false));
}

/// Apply `f` to every agent, each with its own generator seeded from `rng`, and collect the results
/// in population order. The outcome does not depend on `parallel`.
fn map_agents<T, F>(agents: &mut [Agent], rng: &mut StdRng, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&mut Agent, &mut StdRng) -> T + Sync + Send,
{
    let seeds = agents.iter().map(|_| rng.random::<u64>()).collect::<Vec<_>>();
    if parallel {
        agents.par_iter_mut()
            .zip(seeds.into_par_iter())
            .map(|(agent, seed)| f(agent, &mut StdRng::seed_from_u64(seed)))
            .collect()
    } else {
        agents.iter_mut()
            .zip(seeds)
            .map(|(agent, seed)| f(agent, &mut StdRng::seed_from_u64(seed)))
            .collect()
    }
}
