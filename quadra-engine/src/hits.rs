use crate::error::EngineError;
use crate::models::parse_digits;

/// Issue d'une prédiction face au numéro gagnant. Un gain straight est aussi
/// un gain box (même multiset de chiffres).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitOutcome {
    pub prediction: String,
    pub is_straight: bool,
    pub is_box: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitCounts {
    pub straight: usize,
    /// Tous les gains box, straight inclus.
    pub box_total: usize,
    /// Gains box hors straight.
    pub box_only: usize,
}

fn sorted_digits(number: &str) -> String {
    let mut bytes: Vec<u8> = number.bytes().collect();
    bytes.sort_unstable();
    // Entrée déjà validée : uniquement des chiffres ASCII.
    String::from_utf8(bytes).unwrap_or_default()
}

/// Classe chaque prédiction : straight par égalité exacte, box par égalité
/// des chaînes de chiffres triés (O(1) par prédiction, sans énumération de
/// permutations). Fonction pure, O(n) au total.
pub fn classify(predictions: &[String], winning_number: &str) -> Result<Vec<HitOutcome>, EngineError> {
    parse_digits(winning_number)?;
    let winning_sorted = sorted_digits(winning_number);

    predictions
        .iter()
        .map(|p| {
            parse_digits(p)?;
            let is_straight = p == winning_number;
            let is_box = sorted_digits(p) == winning_sorted;
            Ok(HitOutcome {
                prediction: p.clone(),
                is_straight,
                is_box,
            })
        })
        .collect()
}

pub fn count_hits(outcomes: &[HitOutcome]) -> HitCounts {
    let straight = outcomes.iter().filter(|o| o.is_straight).count();
    let box_total = outcomes.iter().filter(|o| o.is_box).count();
    HitCounts {
        straight,
        box_total,
        box_only: box_total - straight,
    }
}
