use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quadra_db::db::{count_draws, db_path, fetch_date_range, fetch_last_draws, migrate, open_db};
use quadra_engine::backtest::{Algorithm, BacktestResult, BacktestSimulator, DEFAULT_UNIT_PRICE};
use quadra_engine::display;
use quadra_engine::ensemble::{date_seed, HybridEnsemble};
use quadra_engine::models::DEFAULT_WINDOW;

#[derive(Parser)]
#[command(name = "quadra-engine", about = "Prédiction et backtest Numbers4")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Générer les prédictions de l'ensemble hybride pour le prochain tirage
    Predict {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Graine pour la reproductibilité (défaut : date du jour YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Rejouer une plage historique et mesurer taux de gain et ROI
    Backtest {
        /// Date de début (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Date de fin (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Algorithmes à comparer, séparés par des virgules, ou "all"
        #[arg(short, long, default_value = "all")]
        algorithms: String,

        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Prix unitaire d'un billet (yens)
        #[arg(long, default_value_t = DEFAULT_UNIT_PRICE)]
        unit_price: i64,

        /// Graine de base pour les modèles aléatoires
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Fichier JSON de sortie pour les résultats détaillés
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Afficher les tirages gagnants de chaque algorithme
        #[arg(long)]
        hits: bool,
    },

    /// Historique des derniers tirages
    History {
        /// Nombre de tirages
        #[arg(short, long, default_value = "10")]
        last: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Predict { window, seed } => cmd_predict(&conn, window, seed),
        Command::Backtest {
            from,
            to,
            algorithms,
            window,
            unit_price,
            seed,
            output,
            hits,
        } => cmd_backtest(&conn, &from, &to, &algorithms, window, unit_price, seed, output, hits),
        Command::History { last } => cmd_history(&conn, last),
    }
}

fn cmd_predict(conn: &quadra_db::rusqlite::Connection, window: usize, seed: Option<u64>) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : quadra-cli import");
    }

    let effective_window = window.min(n as usize);
    let draws = fetch_last_draws(conn, effective_window as u32)?;
    let last_draw = draws.first().cloned();

    let effective_seed = seed.unwrap_or_else(|| {
        let ds = date_seed();
        println!("(Graine du jour : {ds})");
        ds
    });
    let mut rng = StdRng::seed_from_u64(effective_seed);

    let predictions = HybridEnsemble::generate(&draws, last_draw.as_ref(), &mut rng)
        .context("Impossible de générer les prédictions")?;

    if let Some(last) = &last_draw {
        println!(
            "Dernier tirage connu : n°{} du {} → {}",
            last.draw_number, last.draw_date, last.winning_number
        );
    }
    display::display_predictions(&predictions);

    Ok(())
}

fn parse_algorithms(list: &str) -> Result<Vec<Algorithm>> {
    if list.trim().eq_ignore_ascii_case("all") {
        return Ok(Algorithm::ALL.to_vec());
    }
    let mut algorithms = Vec::new();
    for part in list.split(',') {
        let algorithm: Algorithm = part
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("Liste d'algorithmes invalide : '{list}'"))?;
        if !algorithms.contains(&algorithm) {
            algorithms.push(algorithm);
        }
    }
    Ok(algorithms)
}

#[allow(clippy::too_many_arguments)]
fn cmd_backtest(
    conn: &quadra_db::rusqlite::Connection,
    from: &str,
    to: &str,
    algorithms_list: &str,
    window: usize,
    unit_price: i64,
    seed: u64,
    output: Option<PathBuf>,
    show_hits: bool,
) -> Result<()> {
    for (label, value) in [("from", from), ("to", to)] {
        chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("Date --{label} invalide : '{value}' (attendu YYYY-MM-DD)"))?;
    }

    let algorithms = parse_algorithms(algorithms_list)?;
    let draws = fetch_date_range(conn, from, to)?;
    if draws.is_empty() {
        bail!("Aucun tirage entre {from} et {to}. Lancez d'abord : quadra-cli import");
    }

    println!(
        "Backtest de {} algorithme(s) sur {} tirages (fenêtre {}, billet {}¥)...",
        algorithms.len(),
        draws.len(),
        window,
        unit_price
    );

    let simulator = BacktestSimulator {
        window_size: window,
        unit_price,
        seed,
    };

    let pb = ProgressBar::new(algorithms.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut results: Vec<BacktestResult> = Vec::with_capacity(algorithms.len());
    for algorithm in &algorithms {
        pb.set_message(algorithm.name().to_string());
        let result = simulator
            .run(*algorithm, &draws)
            .with_context(|| format!("Échec du backtest pour '{algorithm}'"))?;
        results.push(result);
        pb.inc(1);
    }
    pb.finish_with_message("Backtest terminé");

    display::display_backtest_results(&results);

    if show_hits {
        for result in &results {
            display::display_backtest_hits(result, 20);
        }
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Impossible d'écrire {:?}", output_path))?;
        println!("\nRésultats sauvegardés dans : {}", output_path.display());
    }

    Ok(())
}

fn cmd_history(conn: &quadra_db::rusqlite::Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : quadra-cli import");
    }
    let draws = fetch_last_draws(conn, last)?;
    display::display_draws(&draws);
    Ok(())
}
