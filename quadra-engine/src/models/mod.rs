pub mod airandom;
pub mod correlation;
pub mod frequency;
pub mod pattern;
pub mod transition;

use quadra_db::models::Draw;

use crate::error::EngineError;

/// Nombre de positions d'un numéro Numbers4.
pub const POSITIONS: usize = 4;
/// Chiffres possibles par position (0-9).
pub const DIGITS: usize = 10;
/// Taille de fenêtre par défaut pour tous les modèles.
pub const DEFAULT_WINDOW: usize = 100;

// Convention commune à tout le moteur : `window[0]` = le tirage le plus
// récent. Une fenêtre plus courte que la taille requise est une condition
// d'insuffisance documentée, jamais complétée silencieusement.

/// Décompose un numéro en ses 4 chiffres ; toute autre forme est un tirage
/// malformé (donnée amont corrompue, erreur fatale).
pub fn parse_digits(number: &str) -> Result<[u8; POSITIONS], EngineError> {
    let bytes = number.as_bytes();
    if bytes.len() != POSITIONS || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::MalformedDraw {
            value: number.to_string(),
        });
    }
    Ok([
        bytes[0] - b'0',
        bytes[1] - b'0',
        bytes[2] - b'0',
        bytes[3] - b'0',
    ])
}

pub fn digits_of(draw: &Draw) -> Result<[u8; POSITIONS], EngineError> {
    parse_digits(&draw.winning_number)
}

pub(crate) fn digits_to_string(digits: &[u8; POSITIONS]) -> String {
    digits.iter().map(|&d| (b'0' + d) as char).collect()
}

/// Construit un historique synthétique à partir de numéros gagnants,
/// `numbers[0]` = le plus récent (numéros de tirage décroissants).
pub fn make_test_draws(numbers: &[&str]) -> Vec<Draw> {
    let n = numbers.len() as u32;
    numbers
        .iter()
        .enumerate()
        .map(|(i, s)| Draw {
            draw_number: n - i as u32,
            draw_date: format!("2024-01-{:02}", ((n as usize - i - 1) % 28) + 1),
            winning_number: (*s).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digits_ok() {
        assert_eq!(parse_digits("1234").unwrap(), [1, 2, 3, 4]);
        assert_eq!(parse_digits("0007").unwrap(), [0, 0, 0, 7]);
    }

    #[test]
    fn test_parse_digits_malformed() {
        for bad in ["123", "12345", "12a4", "", "１２３４"] {
            match parse_digits(bad) {
                Err(EngineError::MalformedDraw { value }) => assert_eq!(value, bad),
                other => panic!("attendu MalformedDraw pour '{bad}', obtenu {other:?}"),
            }
        }
    }

    #[test]
    fn test_digits_to_string_roundtrip() {
        assert_eq!(digits_to_string(&[0, 1, 0, 2]), "0102");
    }

    #[test]
    fn test_make_test_draws_most_recent_first() {
        let draws = make_test_draws(&["1234", "5678", "9012"]);
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].winning_number, "1234");
        assert!(draws[0].draw_number > draws[1].draw_number);
        assert!(draws[1].draw_number > draws[2].draw_number);
    }
}
