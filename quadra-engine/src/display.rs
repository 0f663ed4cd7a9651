use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use quadra_db::models::Draw;

use crate::backtest::{BacktestResult, DrawDetail};
use crate::permute::permutation_count;

pub fn display_predictions(predictions: &[String]) {
    println!("\n== Prédictions de l'ensemble hybride ==\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéro", "Jeu box"]);

    for (i, prediction) in predictions.iter().enumerate() {
        let box_size = permutation_count(prediction)
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "—".to_string());
        table.add_row(vec![format!("{}", i + 1), prediction.clone(), box_size]);
    }

    println!("{table}");
    println!("(les premières entrées portent le plus de confiance)");
}

pub fn display_backtest_results(results: &[BacktestResult]) {
    println!("\n== Résultats du backtest ==\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Algorithme",
            "Préd.",
            "Straight",
            "Box",
            "Taux gain %",
            "Coût (¥)",
            "Gain (¥)",
            "ROI %",
        ]);

    for r in results {
        let roi_cell = if r.roi >= 0.0 {
            Cell::new(format!("{:+.2}", r.roi)).fg(Color::Green)
        } else {
            Cell::new(format!("{:+.2}", r.roi)).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&r.algorithm),
            Cell::new(r.total_predictions),
            Cell::new(r.straight_wins),
            Cell::new(r.box_wins),
            Cell::new(format!("{:.2}", r.win_rate)),
            Cell::new(r.total_cost),
            Cell::new(r.total_return),
            roi_cell,
        ]);
    }

    println!("{table}");
}

/// Les tirages gagnants du journal détaillé (bornés à `limit` lignes).
pub fn display_backtest_hits(result: &BacktestResult, limit: usize) {
    let hits: Vec<&DrawDetail> = result
        .details
        .iter()
        .filter(|d| d.straight_hits > 0 || d.box_hits > 0)
        .collect();

    if hits.is_empty() {
        println!("\n[{}] aucun tirage gagnant sur la plage.", result.algorithm);
        return;
    }

    println!("\n== Tirages gagnants ({}) ==\n", result.algorithm);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Sorti", "Straight", "Box", "Gain (¥)"]);

    for d in hits.iter().take(limit) {
        table.add_row(vec![
            d.draw_number.to_string(),
            d.draw_date.clone(),
            d.winning_number.clone(),
            d.straight_hits.to_string(),
            d.box_hits.to_string(),
            d.payout.to_string(),
        ]);
    }

    println!("{table}");
    if hits.len() > limit {
        println!("({} autres tirages gagnants non affichés)", hits.len() - limit);
    }
}

pub fn display_draws(draws: &[Draw]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéro sorti"]);

    for draw in draws {
        table.add_row(vec![
            draw.draw_number.to_string(),
            draw.draw_date.clone(),
            draw.winning_number.clone(),
        ]);
    }

    println!("{table}");
}
