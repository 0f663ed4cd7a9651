use quadra_db::models::Draw;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::ensemble::HybridEnsemble;
use crate::error::EngineError;
use crate::hits::{classify, count_hits};
use crate::models::airandom::AiRandom;
use crate::models::correlation::CorrelationModel;
use crate::models::frequency::FrequencyModel;
use crate::models::pattern::PatternModel;
use crate::models::transition::TransitionModel;
use crate::models::{parse_digits, DEFAULT_WINDOW};
use crate::permute::permutation_count;

/// Gain straight (correspondance exacte), en yens.
pub const STRAIGHT_PRIZE: i64 = 900_000;
/// Gain box (même multiset de chiffres), en yens.
pub const BOX_PRIZE: i64 = 37_500;
/// Prix unitaire d'un billet, en yens.
pub const DEFAULT_UNIT_PRICE: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Famille fréquence (« kako ») : chiffre le plus fréquent + deuxième rang.
    Kako,
    Transition,
    Correlation,
    Pattern,
    Hybrid,
    AiRandom,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Kako,
        Algorithm::Transition,
        Algorithm::Correlation,
        Algorithm::Pattern,
        Algorithm::Hybrid,
        Algorithm::AiRandom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Kako => "kako",
            Algorithm::Transition => "transition",
            Algorithm::Correlation => "correlation",
            Algorithm::Pattern => "pattern",
            Algorithm::Hybrid => "hybrid",
            Algorithm::AiRandom => "ai-random",
        }
    }

    /// La famille fréquence achète le jeu complet de permutations (stratégie
    /// box) ; les autres algorithmes achètent un billet par prédiction.
    /// Cette asymétrie de coût est volontairement conservée : ce sont deux
    /// stratégies d'achat différentes que le backtest compare.
    pub fn buys_permutation_set(&self) -> bool {
        matches!(self, Algorithm::Kako)
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kako" => Ok(Algorithm::Kako),
            "transition" => Ok(Algorithm::Transition),
            "correlation" => Ok(Algorithm::Correlation),
            "pattern" => Ok(Algorithm::Pattern),
            "hybrid" => Ok(Algorithm::Hybrid),
            "ai-random" | "airandom" => Ok(Algorithm::AiRandom),
            other => Err(format!("algorithme inconnu : '{other}'")),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ligne du journal détaillé : un tirage évalué.
#[derive(Debug, Clone, Serialize)]
pub struct DrawDetail {
    pub draw_number: u32,
    pub draw_date: String,
    pub winning_number: String,
    pub predictions: Vec<String>,
    pub straight_hits: usize,
    /// Gains box hors straight.
    pub box_hits: usize,
    pub cost: i64,
    pub payout: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub algorithm: String,
    pub total_predictions: usize,
    pub straight_wins: usize,
    /// Gains box hors straight.
    pub box_wins: usize,
    pub total_cost: i64,
    pub total_return: i64,
    /// Prédictions gagnantes (straight ou box) pour 100 prédictions.
    pub win_rate: f64,
    pub straight_rate: f64,
    pub box_rate: f64,
    /// (gain − coût) / coût × 100 ; 0 si coût nul.
    pub roi: f64,
    pub details: Vec<DrawDetail>,
}

/// Rejoue une plage historique : pour chaque tirage précédé d'exactement
/// `window_size` tirages, génère les prédictions de l'algorithme demandé,
/// les classe contre le numéro réellement sorti et cumule coûts et gains.
///
/// Les tirages sont indépendants entre eux (la graine effective d'un tirage
/// est `seed ⊕ numéro de tirage`), ce qui permet l'évaluation en parallèle
/// avec des totaux identiques quel que soit l'ordre d'exécution.
pub struct BacktestSimulator {
    pub window_size: usize,
    pub unit_price: i64,
    pub seed: u64,
}

impl Default for BacktestSimulator {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW,
            unit_price: DEFAULT_UNIT_PRICE,
            seed: 0,
        }
    }
}

impl BacktestSimulator {
    /// `draws` en ordre chronologique (du plus ancien au plus récent).
    pub fn run(&self, algorithm: Algorithm, draws: &[Draw]) -> Result<BacktestResult, EngineError> {
        if self.window_size == 0 {
            return Err(EngineError::InsufficientData { required: 1, got: 0 });
        }

        // Validation amont : un numéro malformé est fatal et signalé
        // immédiatement, jamais réessayé.
        for draw in draws {
            parse_digits(&draw.winning_number)?;
        }

        let scored: Vec<Option<DrawDetail>> = (self.window_size..draws.len())
            .into_par_iter()
            .map(|i| self.score_draw(algorithm, draws, i))
            .collect::<Result<Vec<_>, _>>()?;

        let mut details: Vec<DrawDetail> = scored.into_iter().flatten().collect();
        // Le journal détaillé est rapporté en ordre de numéro de tirage.
        details.sort_by_key(|d| d.draw_number);

        Ok(aggregate(algorithm, details))
    }

    /// Évalue le tirage à l'indice `i`. `None` = tirage ignoré (fenêtre
    /// incomplète ou modèle sans données) : c'est une politique documentée,
    /// pas une erreur — la situation est normale en début de plage.
    fn score_draw(
        &self,
        algorithm: Algorithm,
        draws: &[Draw],
        i: usize,
    ) -> Result<Option<DrawDetail>, EngineError> {
        if i < self.window_size {
            return Ok(None);
        }
        let draw = &draws[i];
        let window: Vec<Draw> = draws[i - self.window_size..i].iter().rev().cloned().collect();
        let last_draw = &draws[i - 1];
        let mut rng = StdRng::seed_from_u64(self.seed ^ u64::from(draw.draw_number));

        let predictions =
            match self.predictions_for(algorithm, &window, last_draw, draw.draw_number, &mut rng) {
                Ok(p) => p,
                Err(EngineError::InsufficientData { .. }) => return Ok(None),
                Err(e) => return Err(e),
            };
        if predictions.is_empty() {
            return Ok(None);
        }

        let outcomes = classify(&predictions, &draw.winning_number)?;
        let counts = count_hits(&outcomes);

        let cost = if algorithm.buys_permutation_set() {
            let mut tickets = 0usize;
            for p in &predictions {
                tickets += permutation_count(p)?;
            }
            tickets as i64 * self.unit_price
        } else {
            predictions.len() as i64 * self.unit_price
        };
        let payout =
            counts.straight as i64 * STRAIGHT_PRIZE + counts.box_only as i64 * BOX_PRIZE;

        Ok(Some(DrawDetail {
            draw_number: draw.draw_number,
            draw_date: draw.draw_date.clone(),
            winning_number: draw.winning_number.clone(),
            predictions,
            straight_hits: counts.straight,
            box_hits: counts.box_only,
            cost,
            payout,
        }))
    }

    fn predictions_for(
        &self,
        algorithm: Algorithm,
        window: &[Draw],
        last_draw: &Draw,
        draw_number: u32,
        rng: &mut StdRng,
    ) -> Result<Vec<String>, EngineError> {
        match algorithm {
            Algorithm::Kako => {
                let first = FrequencyModel::most_frequent_digits(window)?;
                let second = FrequencyModel::second_most_frequent(window)?;
                let mut predictions = vec![first];
                if !predictions.contains(&second) {
                    predictions.push(second);
                }
                Ok(predictions)
            }
            Algorithm::Transition => Ok(vec![TransitionModel::predict_next(window, last_draw)?]),
            Algorithm::Correlation => {
                Ok(vec![CorrelationModel::predict_by_correlation(window, rng)?])
            }
            Algorithm::Pattern => Ok(vec![PatternModel::predict_by_pattern(window, rng)?]),
            Algorithm::Hybrid => HybridEnsemble::generate(window, Some(last_draw), rng),
            Algorithm::AiRandom => Ok(vec![AiRandom::predict_for_draw(draw_number)]),
        }
    }
}

fn aggregate(algorithm: Algorithm, details: Vec<DrawDetail>) -> BacktestResult {
    let mut total_predictions = 0usize;
    let mut straight_wins = 0usize;
    let mut box_wins = 0usize;
    let mut total_cost = 0i64;
    let mut total_return = 0i64;

    for d in &details {
        total_predictions += d.predictions.len();
        straight_wins += d.straight_hits;
        box_wins += d.box_hits;
        total_cost += d.cost;
        total_return += d.payout;
    }

    let rate = |wins: usize| {
        if total_predictions == 0 {
            0.0
        } else {
            wins as f64 / total_predictions as f64 * 100.0
        }
    };
    let win_rate = rate(straight_wins + box_wins);
    let straight_rate = rate(straight_wins);
    let box_rate = rate(box_wins);
    let roi = if total_cost == 0 {
        0.0
    } else {
        (total_return - total_cost) as f64 / total_cost as f64 * 100.0
    };

    BacktestResult {
        algorithm: algorithm.name().to_string(),
        total_predictions,
        straight_wins,
        box_wins,
        total_cost,
        total_return,
        win_rate,
        straight_rate,
        box_rate,
        roi,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Série chronologique (du plus ancien au plus récent).
    fn chronological(numbers: &[&str]) -> Vec<Draw> {
        numbers
            .iter()
            .enumerate()
            .map(|(i, s)| Draw {
                draw_number: i as u32 + 1,
                draw_date: format!("2024-{:02}-{:02}", i / 28 + 1, i % 28 + 1),
                winning_number: (*s).to_string(),
            })
            .collect()
    }

    fn simulator(window_size: usize) -> BacktestSimulator {
        BacktestSimulator {
            window_size,
            unit_price: DEFAULT_UNIT_PRICE,
            seed: 42,
        }
    }

    #[test]
    fn test_not_enough_history_scores_nothing() {
        let draws = chronological(&["1234"; 50]);
        let result = simulator(100).run(Algorithm::Kako, &draws).unwrap();
        assert_eq!(result.details.len(), 0);
        assert_eq!(result.total_predictions, 0);
        assert_eq!(result.win_rate, 0.0, "taux nuls sans prédiction");
        assert_eq!(result.roi, 0.0, "ROI nul sans coût");
    }

    #[test]
    fn test_110_draws_window_100_scores_ten() {
        // Fenêtre de 50/50 entre 1111 et 2222 : kako prédit "1111" (égalité →
        // chiffre le plus bas) et "2222" ; les tirages testés "3456" ratent tout.
        let mut numbers: Vec<&str> = (0..100).map(|i| if i % 2 == 0 { "1111" } else { "2222" }).collect();
        numbers.extend(std::iter::repeat("3456").take(10));
        let draws = chronological(&numbers);

        let result = simulator(100).run(Algorithm::Kako, &draws).unwrap();
        assert_eq!(result.details.len(), 10, "les tirages 101 à 110 sont évalués");
        assert_eq!(result.straight_wins, 0);
        assert_eq!(result.box_wins, 0);
        assert_eq!(result.total_return, 0);
        assert!(result.total_cost > 0);
        assert_eq!(result.roi, -100.0, "tout perdu → ROI exactement -100 %");
    }

    #[test]
    fn test_kako_box_purchase_cost() {
        // "1111" et "2222" n'ont qu'une permutation chacun : 2 billets par tirage.
        let mut numbers: Vec<&str> = (0..100).map(|i| if i % 2 == 0 { "1111" } else { "2222" }).collect();
        numbers.extend(std::iter::repeat("3456").take(10));
        let draws = chronological(&numbers);

        let result = simulator(100).run(Algorithm::Kako, &draws).unwrap();
        assert_eq!(result.total_predictions, 20);
        assert_eq!(result.total_cost, 20 * DEFAULT_UNIT_PRICE);
    }

    #[test]
    fn test_uniform_history_straight_wins() {
        // 101 tirages identiques : fréquence et transition prédisent "1234",
        // le 101e tirage "1234" est un gain straight.
        let draws = chronological(&["1234"; 101]);

        for algorithm in [Algorithm::Transition, Algorithm::Correlation] {
            let result = simulator(100).run(algorithm, &draws).unwrap();
            assert_eq!(result.details.len(), 1);
            assert_eq!(result.straight_wins, 1, "algorithme {algorithm}");
            assert_eq!(result.total_return, STRAIGHT_PRIZE);
        }

        // Kako : "1234" gagne straight, le deuxième rang retombe sur "1234"
        // (un seul chiffre distinct par position) et la liste est dédupliquée.
        let result = simulator(100).run(Algorithm::Kako, &draws).unwrap();
        assert_eq!(result.total_predictions, 1);
        assert_eq!(result.straight_wins, 1);
        // Achat box de "1234" : 24 permutations.
        assert_eq!(result.total_cost, 24 * DEFAULT_UNIT_PRICE);
    }

    #[test]
    fn test_box_payout() {
        // Fenêtre constante "1234" puis tirage test "4321" : prédiction
        // "1234", gain box seul.
        let mut numbers = vec!["1234"; 100];
        numbers.push("4321");
        let draws = chronological(&numbers);

        let result = simulator(100).run(Algorithm::Transition, &draws).unwrap();
        assert_eq!(result.straight_wins, 0);
        assert_eq!(result.box_wins, 1);
        assert_eq!(result.total_return, BOX_PRIZE);
        assert_eq!(result.win_rate, 100.0);
        assert_eq!(result.straight_rate, 0.0);
        assert_eq!(result.box_rate, 100.0);
    }

    #[test]
    fn test_seed_reproducible_across_runs() {
        let numbers: Vec<String> = (0..120)
            .map(|i| format!("{:04}", (i * 2687 + 411) % 10_000))
            .collect();
        let refs: Vec<&str> = numbers.iter().map(|s| s.as_str()).collect();
        let draws = chronological(&refs);

        let a = simulator(100).run(Algorithm::Hybrid, &draws).unwrap();
        let b = simulator(100).run(Algorithm::Hybrid, &draws).unwrap();
        assert_eq!(a.total_predictions, b.total_predictions);
        assert_eq!(a.total_cost, b.total_cost);
        assert_eq!(a.total_return, b.total_return);
        let preds_a: Vec<_> = a.details.iter().map(|d| d.predictions.clone()).collect();
        let preds_b: Vec<_> = b.details.iter().map(|d| d.predictions.clone()).collect();
        assert_eq!(preds_a, preds_b, "mêmes graines → mêmes prédictions");
    }

    #[test]
    fn test_detail_log_ordered_by_draw_number() {
        let numbers: Vec<String> = (0..115).map(|i| format!("{:04}", (i * 7919) % 10_000)).collect();
        let refs: Vec<&str> = numbers.iter().map(|s| s.as_str()).collect();
        let draws = chronological(&refs);

        let result = simulator(100).run(Algorithm::AiRandom, &draws).unwrap();
        assert!(result
            .details
            .windows(2)
            .all(|w| w[0].draw_number < w[1].draw_number));
    }

    #[test]
    fn test_ai_random_uses_draw_number_seed() {
        let mut numbers = vec!["1234"; 100];
        numbers.push("5678");
        let draws = chronological(&numbers);

        let result = simulator(100).run(Algorithm::AiRandom, &draws).unwrap();
        assert_eq!(result.details.len(), 1);
        assert_eq!(
            result.details[0].predictions[0],
            crate::models::airandom::AiRandom::predict_for_draw(101),
            "la prédiction IA est reproductible par numéro de tirage"
        );
    }

    #[test]
    fn test_malformed_draw_is_fatal() {
        let mut draws = chronological(&["1234"; 110]);
        draws[105].winning_number = "12ab".to_string();
        assert!(matches!(
            simulator(100).run(Algorithm::Kako, &draws),
            Err(EngineError::MalformedDraw { .. })
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        let draws = chronological(&["1234"; 10]);
        assert!(simulator(0).run(Algorithm::Kako, &draws).is_err());
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("kako".parse::<Algorithm>().unwrap(), Algorithm::Kako);
        assert_eq!("AI-Random".parse::<Algorithm>().unwrap(), Algorithm::AiRandom);
        assert!("foo".parse::<Algorithm>().is_err());
    }
}
