use chrono::Datelike;
use quadra_db::models::Draw;
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::EngineError;
use crate::models::correlation::CorrelationModel;
use crate::models::frequency::{position_counts, top_digits, FrequencyModel};
use crate::models::pattern::PatternModel;
use crate::models::transition::TransitionModel;
use crate::models::{DIGITS, POSITIONS};

/// Cardinalité maximale de la liste hybride.
pub const MAX_PREDICTIONS: usize = 12;
/// Invocations du modèle de motifs (tirages aléatoires distincts).
const PATTERN_RUNS: usize = 3;
/// Essais de variation par emplacement avant d'abandonner l'emplacement.
const VARIATION_ATTEMPTS: usize = 10;
/// Probabilité de piocher dans le top 3 de la position plutôt qu'uniformément.
const TOP_DIGIT_PROB: f64 = 0.7;

/// Ensemble hybride : applique les modèles dans un ordre fixe et n'ajoute
/// chaque résultat que s'il est absent de la liste accumulée. L'ordre est
/// significatif (les premières entrées portent le plus de confiance) :
/// transition, corrélation, motifs ×3, fréquence historique, puis variations
/// aléatoires jusqu'à la limite.
pub struct HybridEnsemble;

impl HybridEnsemble {
    pub fn generate(
        window: &[Draw],
        last_draw: Option<&Draw>,
        rng: &mut StdRng,
    ) -> Result<Vec<String>, EngineError> {
        // Sans fenêtre, aucun modèle ne peut contribuer.
        let counts = position_counts(window)?;

        let mut predictions: Vec<String> = Vec::with_capacity(MAX_PREDICTIONS);

        // 1. Transition (ignorée sans dernier tirage).
        if let Some(last) = last_draw {
            if let Ok(p) = TransitionModel::predict_next(window, last) {
                push_unique(&mut predictions, p);
            }
        }

        // 2. Corrélation.
        if let Ok(p) = CorrelationModel::predict_by_correlation(window, rng) {
            push_unique(&mut predictions, p);
        }

        // 3. Motifs, trois tirages.
        for _ in 0..PATTERN_RUNS {
            if let Ok(p) = PatternModel::predict_by_pattern(window, rng) {
                push_unique(&mut predictions, p);
            }
        }

        // 4. Prédiction historique par fréquence.
        if let Ok(p) = FrequencyModel::most_frequent_digits(window) {
            push_unique(&mut predictions, p);
        }

        // 5. Variations aléatoires pour les emplacements restants.
        let tops: Vec<Vec<u8>> = (0..POSITIONS).map(|p| top_digits(&counts[p], 3)).collect();
        while predictions.len() < MAX_PREDICTIONS {
            let mut placed = false;
            for _ in 0..VARIATION_ATTEMPTS {
                let candidate = variation(&tops, rng);
                if push_unique(&mut predictions, candidate) {
                    placed = true;
                    break;
                }
            }
            if !placed {
                // Emplacement abandonné : la liste finale peut être plus courte.
                break;
            }
        }

        Ok(predictions)
    }
}

fn push_unique(predictions: &mut Vec<String>, candidate: String) -> bool {
    if predictions.len() >= MAX_PREDICTIONS || predictions.contains(&candidate) {
        return false;
    }
    predictions.push(candidate);
    true
}

/// Par position : 70 % un chiffre du top 3 de la position, sinon uniforme.
fn variation(tops: &[Vec<u8>], rng: &mut StdRng) -> String {
    (0..POSITIONS)
        .map(|p| {
            let digit = if !tops[p].is_empty() && rng.random_bool(TOP_DIGIT_PROB) {
                tops[p][rng.random_range(0..tops[p].len())]
            } else {
                rng.random_range(0..DIGITS as u8)
            };
            (b'0' + digit) as char
        })
        .collect()
}

/// Graine déterministe basée sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::make_test_draws;
    use rand::SeedableRng;

    #[test]
    fn test_no_duplicates_and_cap() {
        let draws = make_test_draws(&["1234", "5678", "9012", "3456", "7890"]);
        let last = draws[0].clone();
        let mut rng = StdRng::seed_from_u64(42);
        let predictions = HybridEnsemble::generate(&draws, Some(&last), &mut rng).unwrap();

        assert!(predictions.len() <= MAX_PREDICTIONS);
        for i in 0..predictions.len() {
            for j in (i + 1)..predictions.len() {
                assert_ne!(predictions[i], predictions[j], "doublon dans la liste hybride");
            }
        }
    }

    #[test]
    fn test_deterministic_models_lead() {
        let draws = make_test_draws(&["1234", "1234", "5678", "1234", "1234"]);
        let last = draws[0].clone();
        let mut rng = StdRng::seed_from_u64(1);
        let predictions = HybridEnsemble::generate(&draws, Some(&last), &mut rng).unwrap();

        // Avec un dernier tirage fourni, la première entrée est la sortie
        // (déterministe) du modèle de transition.
        let expected = crate::models::transition::TransitionModel::predict_next(&draws, &last).unwrap();
        assert_eq!(predictions[0], expected);
    }

    #[test]
    fn test_transition_skipped_without_last_draw() {
        let draws = make_test_draws(&["1234", "5678", "9012"]);
        let mut rng = StdRng::seed_from_u64(3);
        let predictions = HybridEnsemble::generate(&draws, None, &mut rng).unwrap();
        assert!(!predictions.is_empty());
    }

    #[test]
    fn test_seed_reproducible() {
        let draws = make_test_draws(&["1234", "5678", "9012", "4567"]);
        let last = draws[0].clone();
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        let a = HybridEnsemble::generate(&draws, Some(&last), &mut rng1).unwrap();
        let b = HybridEnsemble::generate(&draws, Some(&last), &mut rng2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fills_toward_cap_with_diverse_window() {
        let draws = make_test_draws(&[
            "1234", "5678", "9012", "3456", "7890", "2468", "1357", "8642",
        ]);
        let last = draws[0].clone();
        let mut rng = StdRng::seed_from_u64(7);
        let predictions = HybridEnsemble::generate(&draws, Some(&last), &mut rng).unwrap();
        // Chaque position a au moins 3 chiffres distincts observés : les
        // variations remplissent normalement la liste jusqu'à la limite.
        assert!(predictions.len() >= 6, "liste trop courte : {predictions:?}");
    }

    #[test]
    fn test_empty_window_insufficient() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            HybridEnsemble::generate(&[], None, &mut rng),
            Err(EngineError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_all_predictions_well_formed() {
        let draws = make_test_draws(&["0918", "2746", "1355", "0001"]);
        let mut rng = StdRng::seed_from_u64(11);
        let predictions = HybridEnsemble::generate(&draws, Some(&draws[0].clone()), &mut rng).unwrap();
        for p in &predictions {
            assert_eq!(p.len(), 4);
            assert!(p.bytes().all(|b| b.is_ascii_digit()), "prédiction invalide '{p}'");
        }
    }

    #[test]
    fn test_date_seed_format() {
        let seed = date_seed();
        let s = seed.to_string();
        assert_eq!(s.len(), 8, "la graine du jour devrait avoir 8 chiffres : {s}");
    }
}
