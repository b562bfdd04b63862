//! Generational genetic search with cross-validated fitness.

use std::collections::BTreeMap;

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::error::Result;
use crate::eval::KFold;
use crate::model::{Classifier, ModelKind};

use super::error::SearchError;
use super::genome::{default_space, Genome};
use super::space::SearchSpace;

/// Generational parameters.
///
/// Defaults mirror the published evolutionary protocol: population 24,
/// offspring 12, 5 generations, 5-fold CV, patience 12.
#[derive(Clone, Debug)]
pub struct GeneticConfig {
    pub population: usize,
    pub offspring: usize,
    pub generations: usize,
    pub early_stop: usize,
    pub cv_folds: usize,
    pub tournament: usize,
    pub crossover_rate: f64,
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population: 24,
            offspring: 12,
            generations: 5,
            early_stop: 12,
            cv_folds: 5,
            tournament: 3,
            crossover_rate: 0.1,
            seed: 0,
        }
    }
}

/// Result of a finished search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// The fittest genome seen.
    pub best: Genome,
    /// Cross-validated accuracy of `best`.
    pub best_fitness: f64,
    /// Number of genome evaluations performed.
    pub evaluated: usize,
    /// Best fitness after initialization and after each generation.
    pub history: Vec<f64>,
}

/// Genetic model/hyperparameter search over one feature matrix.
#[derive(Clone, Debug)]
pub struct GeneticSearch {
    config: GeneticConfig,
    kinds: Vec<ModelKind>,
    spaces: BTreeMap<ModelKind, SearchSpace>,
}

impl GeneticSearch {
    /// Search over `kinds` with their default hyperparameter spaces.
    pub fn new(kinds: Vec<ModelKind>, config: GeneticConfig) -> std::result::Result<Self, SearchError> {
        if kinds.is_empty() {
            return Err(SearchError::NoCandidates);
        }
        let spaces = kinds.iter().map(|&k| (k, default_space(k))).collect();
        Ok(Self { config, kinds, spaces })
    }

    /// Replace the space of one model kind (tests use shrunken grids).
    pub fn with_space(mut self, kind: ModelKind, space: SearchSpace) -> Self {
        self.spaces.insert(kind, space);
        self
    }

    /// Run the search against a feature matrix and labels.
    pub fn run(&self, x: &Array2<f64>, y: &[usize]) -> Result<SearchOutcome> {
        for kind in &self.kinds {
            let space = self.spaces.get(kind).ok_or(SearchError::EmptySpace)?;
            if space.is_empty() {
                return Err(SearchError::EmptySpace.into());
            }
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut evaluated = 0usize;

        // Seed the population round-robin across candidate kinds.
        let mut population: Vec<(Genome, f64)> = Vec::with_capacity(self.config.population);
        for i in 0..self.config.population.max(1) {
            let kind = self.kinds[i % self.kinds.len()];
            let genome = Genome::sample(kind, &self.spaces[&kind], &mut rng);
            let fitness = self.fitness(&genome, x, y)?;
            evaluated += 1;
            population.push((genome, fitness));
        }
        sort_by_fitness(&mut population);

        let mut history = vec![population[0].1];
        let mut stall = 0usize;

        for _generation in 0..self.config.generations {
            let mut offspring = Vec::with_capacity(self.config.offspring);
            for _ in 0..self.config.offspring {
                let parent = self.tournament(&population, &mut rng);
                let mut child = if rng.random::<f64>() < self.config.crossover_rate {
                    let other = self.tournament(&population, &mut rng);
                    self.crossover(&parent, &other, &mut rng)
                } else {
                    self.mutate(&parent, &mut rng)
                };
                // A clone without variation wastes an evaluation.
                if child == parent {
                    child = self.mutate(&parent, &mut rng);
                }
                let fitness = self.fitness(&child, x, y)?;
                evaluated += 1;
                offspring.push((child, fitness));
            }

            let previous_best = population[0].1;
            population.extend(offspring);
            sort_by_fitness(&mut population);
            population.truncate(self.config.population.max(1));

            let best = population[0].1;
            history.push(best);
            if best > previous_best + 1e-12 {
                stall = 0;
            } else {
                stall += 1;
                if stall >= self.config.early_stop {
                    break;
                }
            }
        }

        let (best, best_fitness) =
            population.into_iter().next().ok_or(SearchError::NoSurvivors)?;
        Ok(SearchOutcome { best, best_fitness, evaluated, history })
    }

    /// Mean k-fold CV accuracy of a genome.
    fn fitness(&self, genome: &Genome, x: &Array2<f64>, y: &[usize]) -> Result<f64> {
        let folds = KFold::new(self.config.cv_folds.max(2))
            .with_seed(self.config.seed)
            .split(x.nrows());

        let mut total = 0.0;
        let mut counted = 0usize;
        for (train_idx, test_idx) in folds {
            if train_idx.is_empty() || test_idx.is_empty() {
                continue;
            }
            let train_x = x.select(Axis(0), &train_idx);
            let train_y: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
            let test_x = x.select(Axis(0), &test_idx);
            let test_y: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();

            let mut model = genome.build(self.config.seed)?;
            model.fit(&train_x, &train_y)?;
            let predictions = model.predict(&test_x);
            let correct =
                predictions.iter().zip(test_y.iter()).filter(|(p, t)| p == t).count();
            total += correct as f64 / test_y.len() as f64;
            counted += 1;
        }
        if counted == 0 {
            return Ok(0.0);
        }
        Ok(total / counted as f64)
    }

    fn tournament(&self, population: &[(Genome, f64)], rng: &mut StdRng) -> Genome {
        let mut best: Option<&(Genome, f64)> = None;
        for _ in 0..self.config.tournament.max(1) {
            let pick = &population[rng.random_range(0..population.len())];
            if best.map_or(true, |b| pick.1 > b.1) {
                best = Some(pick);
            }
        }
        best.map(|(g, _)| g.clone()).unwrap_or_else(|| population[0].0.clone())
    }

    /// Uniform crossover over shared genes; parents of different kinds
    /// cannot recombine, so the first parent passes through mutated.
    fn crossover(&self, a: &Genome, b: &Genome, rng: &mut StdRng) -> Genome {
        if a.kind != b.kind {
            return self.mutate(a, rng);
        }
        let mut params = BTreeMap::new();
        for (name, value) in &a.params {
            let inherited = if rng.random::<f64>() < 0.5 {
                value.clone()
            } else {
                b.params.get(name).cloned().unwrap_or_else(|| value.clone())
            };
            params.insert(name.clone(), inherited);
        }
        Genome { kind: a.kind, params }
    }

    /// Resample one gene from its domain.
    fn mutate(&self, genome: &Genome, rng: &mut StdRng) -> Genome {
        let mut child = genome.clone();
        let space = &self.spaces[&genome.kind];
        if space.is_empty() {
            return child;
        }
        let gene = rng.random_range(0..space.len());
        if let Some((name, domain)) = space.iter().nth(gene) {
            child.params.insert(name.clone(), domain.sample(rng));
        }
        child
    }
}

fn sort_by_fitness(population: &mut [(Genome, f64)]) {
    population.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::space::ParamDomain;
    use ndarray::Array2;

    fn tiny_config() -> GeneticConfig {
        GeneticConfig {
            population: 6,
            offspring: 4,
            generations: 3,
            early_stop: 12,
            cv_folds: 3,
            tournament: 2,
            crossover_rate: 0.2,
            seed: 7,
        }
    }

    fn small_forest_space() -> SearchSpace {
        let mut space = SearchSpace::new();
        space.add("n_estimators", ParamDomain::Discrete { low: 5, high: 10 });
        space.add("max_depth", ParamDomain::Discrete { low: 2, high: 6 });
        space.add(
            "criterion",
            ParamDomain::Categorical { choices: vec!["gini".into(), "entropy".into()] },
        );
        space
    }

    fn separable_data() -> (Array2<f64>, Vec<usize>) {
        let n = 30;
        let mut flat = Vec::with_capacity(n * 2);
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let label = usize::from(i % 2 == 1);
            let base = if label == 1 { 1.0 } else { 0.0 };
            flat.push(base + (i as f64) * 0.001);
            flat.push(base - (i as f64) * 0.001);
            y.push(label);
        }
        (Array2::from_shape_vec((n, 2), flat).unwrap(), y)
    }

    #[test]
    fn test_no_candidates_is_rejected() {
        assert!(matches!(
            GeneticSearch::new(vec![], GeneticConfig::default()),
            Err(SearchError::NoCandidates)
        ));
    }

    #[test]
    fn test_search_finds_a_strong_genome() {
        let (x, y) = separable_data();
        let search = GeneticSearch::new(vec![ModelKind::Knn, ModelKind::GaussianNb], tiny_config())
            .unwrap();
        let outcome = search.run(&x, &y).unwrap();
        assert!(outcome.best_fitness > 0.9, "fitness {}", outcome.best_fitness);
        assert!(outcome.evaluated >= tiny_config().population);
    }

    #[test]
    fn test_search_is_deterministic_under_seed() {
        let (x, y) = separable_data();
        let make = || {
            GeneticSearch::new(vec![ModelKind::Knn], tiny_config())
                .unwrap()
                .run(&x, &y)
                .unwrap()
        };
        let a = make();
        let b = make();
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_history_best_is_non_decreasing() {
        let (x, y) = separable_data();
        let search = GeneticSearch::new(vec![ModelKind::RandomForest], tiny_config())
            .unwrap()
            .with_space(ModelKind::RandomForest, small_forest_space());
        let outcome = search.run(&x, &y).unwrap();
        for pair in outcome.history.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-12);
        }
    }

    #[test]
    fn test_winner_params_stay_in_domain() {
        let (x, y) = separable_data();
        let search = GeneticSearch::new(vec![ModelKind::Knn], tiny_config()).unwrap();
        let outcome = search.run(&x, &y).unwrap();
        assert!(default_space(ModelKind::Knn).validate(&outcome.best.params).is_ok());
    }
}
