use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use quadra_engine::models::{DIGITS, POSITIONS};

use crate::import::ImportResult;

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  {} enregistrements lus", result.total_records);
    println!("  {} insérés", result.inserted);
    println!("  {} doublons ignorés", result.skipped);
    if result.errors > 0 {
        println!("  {} erreurs", result.errors);
    }
}

/// Table des fréquences par position : une ligne par chiffre, le maximum de
/// chaque position en surbrillance.
pub fn display_stats(counts: &[[u32; DIGITS]; POSITIONS], window: usize) {
    println!("\n== Fréquences par position (fenêtre : {window} tirages) ==\n");

    let max_per_position: Vec<u32> = (0..POSITIONS)
        .map(|p| counts[p].iter().copied().max().unwrap_or(0))
        .collect();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Chiffre", "Pos 1", "Pos 2", "Pos 3", "Pos 4"]);

    for d in 0..DIGITS {
        let mut row = vec![Cell::new(d)];
        for p in 0..POSITIONS {
            let count = counts[p][d];
            let cell = if count == max_per_position[p] && count > 0 {
                Cell::new(count).fg(Color::Green)
            } else {
                Cell::new(count)
            };
            row.push(cell);
        }
        table.add_row(row);
    }

    println!("{table}");
}
