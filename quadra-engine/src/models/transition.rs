use quadra_db::models::Draw;

use super::frequency::{argmax_lowest, position_counts};
use super::{digits_of, digits_to_string, DIGITS, POSITIONS};
use crate::error::EngineError;

/// Probabilités de transition empiriques : pour chaque position, la table
/// `table[position][chiffre précédent][chiffre suivant]` est apprise sur les
/// paires de tirages consécutifs de la fenêtre, en ordre chronologique.
pub struct TransitionModel;

impl TransitionModel {
    /// Prédit le prochain numéro à partir du dernier tirage connu.
    ///
    /// Pour chaque position, on prend le chiffre suivant le plus fréquent
    /// après le chiffre du dernier tirage (égalité → chiffre le plus bas).
    /// Démarrage à froid (chiffre jamais vu en amont d'une transition) :
    /// repli sur la fréquence inconditionnelle de la position.
    pub fn predict_next(window: &[Draw], last_draw: &Draw) -> Result<String, EngineError> {
        let counts = position_counts(window)?;

        let mut table = [[[0u32; DIGITS]; DIGITS]; POSITIONS];
        // window[t] est plus récent que window[t + 1] : la paire chronologique
        // est donc (window[t], window[t - 1]).
        for t in 1..window.len() {
            let from = digits_of(&window[t])?;
            let to = digits_of(&window[t - 1])?;
            for p in 0..POSITIONS {
                table[p][from[p] as usize][to[p] as usize] += 1;
            }
        }

        let last = digits_of(last_draw)?;
        let mut digits = [0u8; POSITIONS];
        for p in 0..POSITIONS {
            let row = &table[p][last[p] as usize];
            digits[p] = if row.iter().all(|&c| c == 0) {
                argmax_lowest(&counts[p])
            } else {
                argmax_lowest(row)
            };
        }
        Ok(digits_to_string(&digits))
    }
}
