use quadra_db::models::Draw;
use rand::rngs::StdRng;
use rand::Rng;

use super::{digits_of, digits_to_string, DIGITS, POSITIONS};
use crate::error::EngineError;

/// Corrélations croisées : co-occurrences de paires (position, chiffre) entre
/// positions distinctes d'un même tirage. La prédiction est construite
/// position par position en privilégiant les chiffres qui renforcent ceux
/// déjà choisis. Les collisions de chiffres sont défavorisées, pas interdites :
/// l'appelant ne doit pas supposer une sortie à chiffres tous distincts.
pub struct CorrelationModel;

impl CorrelationModel {
    pub fn predict_by_correlation(window: &[Draw], rng: &mut StdRng) -> Result<String, EngineError> {
        if window.is_empty() {
            return Err(EngineError::InsufficientData { required: 1, got: 0 });
        }

        // joint[i][j][di][dj] = co-occurrences de (position i, chiffre di)
        // avec (position j, chiffre dj), pour toute paire ordonnée i ≠ j.
        let mut joint = [[[[0u32; DIGITS]; DIGITS]; POSITIONS]; POSITIONS];
        for draw in window {
            let digits = digits_of(draw)?;
            for i in 0..POSITIONS {
                for j in 0..POSITIONS {
                    if i != j {
                        joint[i][j][digits[i] as usize][digits[j] as usize] += 1;
                    }
                }
            }
        }

        let mut chosen: Vec<u8> = Vec::with_capacity(POSITIONS);
        let mut used = [false; DIGITS];

        for p in 0..POSITIONS {
            let mut best_digit: Option<u8> = None;
            let mut best_score = 0u64;

            for d in 0..DIGITS as u8 {
                if used[d as usize] {
                    continue;
                }
                let score: u64 = if chosen.is_empty() {
                    // Première position : masse jointe totale de (p, d).
                    (0..POSITIONS)
                        .filter(|&j| j != p)
                        .map(|j| joint[p][j][d as usize].iter().map(|&c| c as u64).sum::<u64>())
                        .sum()
                } else {
                    chosen
                        .iter()
                        .enumerate()
                        .map(|(q, &cq)| joint[q][p][cq as usize][d as usize] as u64)
                        .sum()
                };
                if best_digit.is_none() || score > best_score {
                    best_digit = Some(d);
                    best_score = score;
                }
            }

            // 4 positions pour 10 chiffres : il reste toujours un candidat.
            let candidate = best_digit.expect("au moins un chiffre hors de l'ensemble utilisé");
            let digit = if best_score == 0 {
                // Aucune co-occurrence observée : choix uniforme hors des
                // chiffres déjà utilisés.
                let free: Vec<u8> = (0..DIGITS as u8).filter(|&d| !used[d as usize]).collect();
                free[rng.random_range(0..free.len())]
            } else {
                candidate
            };

            used[digit as usize] = true;
            chosen.push(digit);
        }

        let digits = [chosen[0], chosen[1], chosen[2], chosen[3]];
        Ok(digits_to_string(&digits))
    }
}
