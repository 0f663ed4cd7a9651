use quadra_db::models::Draw;

use super::{digits_of, digits_to_string, DIGITS, POSITIONS};
use crate::error::EngineError;

/// Fréquences par position : compteurs fixes indexés 0-9, jamais de
/// dictionnaires clés par chiffre. Les égalités se résolvent toujours au
/// chiffre le plus bas — règle explicite, pas un accident d'itération.
pub struct FrequencyModel;

/// Compte les occurrences de chaque chiffre à chaque position sur la fenêtre.
pub fn position_counts(window: &[Draw]) -> Result<[[u32; DIGITS]; POSITIONS], EngineError> {
    if window.is_empty() {
        return Err(EngineError::InsufficientData { required: 1, got: 0 });
    }
    let mut counts = [[0u32; DIGITS]; POSITIONS];
    for draw in window {
        let digits = digits_of(draw)?;
        for p in 0..POSITIONS {
            counts[p][digits[p] as usize] += 1;
        }
    }
    Ok(counts)
}

/// Chiffre le plus fréquent d'une ligne de compteurs ; égalité → chiffre le plus bas.
pub(crate) fn argmax_lowest(row: &[u32; DIGITS]) -> u8 {
    let mut best = 0u8;
    for d in 1..DIGITS as u8 {
        if row[d as usize] > row[best as usize] {
            best = d;
        }
    }
    best
}

/// Les `k` chiffres observés les plus fréquents d'une ligne, par compte
/// décroissant puis chiffre croissant. Les chiffres jamais vus sont exclus,
/// donc le résultat peut être plus court que `k`.
pub(crate) fn top_digits(row: &[u32; DIGITS], k: usize) -> Vec<u8> {
    let mut seen: Vec<u8> = (0..DIGITS as u8).filter(|&d| row[d as usize] > 0).collect();
    seen.sort_by(|&a, &b| {
        row[b as usize]
            .cmp(&row[a as usize])
            .then(a.cmp(&b))
    });
    seen.truncate(k);
    seen
}

impl FrequencyModel {
    /// Le chiffre le plus fréquent de chaque position sur la fenêtre.
    pub fn most_frequent_digits(window: &[Draw]) -> Result<String, EngineError> {
        let counts = position_counts(window)?;
        let mut digits = [0u8; POSITIONS];
        for p in 0..POSITIONS {
            digits[p] = argmax_lowest(&counts[p]);
        }
        Ok(digits_to_string(&digits))
    }

    /// Le deuxième chiffre le plus fréquent de chaque position. Si une
    /// position n'a vu qu'un seul chiffre distinct, on retombe sur le premier.
    pub fn second_most_frequent(window: &[Draw]) -> Result<String, EngineError> {
        let counts = position_counts(window)?;
        let mut digits = [0u8; POSITIONS];
        for p in 0..POSITIONS {
            let ranked = top_digits(&counts[p], 2);
            digits[p] = if ranked.len() >= 2 { ranked[1] } else { ranked[0] };
        }
        Ok(digits_to_string(&digits))
    }
}
