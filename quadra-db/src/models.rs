use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub draw_number: u32,
    pub draw_date: String,
    pub winning_number: String,
}

/// Un numéro gagnant Numbers4 fait exactement 4 chiffres ASCII.
/// Les zéros de tête sont significatifs ("0102" ≠ "102"), d'où le stockage en texte.
pub fn validate_winning_number(number: &str) -> Result<()> {
    if number.len() != 4 || !number.bytes().all(|b| b.is_ascii_digit()) {
        bail!("Numéro gagnant invalide : '{}' (attendu exactement 4 chiffres)", number);
    }
    Ok(())
}
