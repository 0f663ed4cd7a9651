use anyhow::{bail, Context, Result};
use quadra_db::rusqlite::Connection;
use std::path::Path;

use quadra_db::db::insert_draw;
use quadra_db::models::{validate_winning_number, Draw};

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Les tableurs perdent souvent les zéros de tête : un champ numérique de
/// 1 à 4 chiffres est complété à gauche ("102" → "0102"). Tout le reste est
/// rejeté, les zéros de tête étant significatifs.
pub fn normalize_winning_number(raw: &str) -> Result<String> {
    let s = raw.trim();
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        bail!("Numéro gagnant invalide : '{}'", raw);
    }
    let padded = format!("{:0>4}", s);
    validate_winning_number(&padded)?;
    Ok(padded)
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let raw_number = get(0)?;
    let draw_number: u32 = raw_number
        .parse()
        .with_context(|| format!("Numéro de tirage invalide : '{}'", raw_number))?;
    let draw_date = get(1)?;
    let winning_number = normalize_winning_number(&get(2)?)?;

    Ok(Draw {
        draw_number,
        draw_date,
        winning_number,
    })
}

/// Importe un CSV `numéro de tirage,date,numéro gagnant` (avec en-tête).
pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        eprintln!("Erreur insertion ligne {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
