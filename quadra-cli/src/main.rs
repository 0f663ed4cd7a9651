mod display;
mod import;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use quadra_db::db::{count_draws, db_path, fetch_last_draws, insert_draw, migrate, open_db};
use quadra_db::models::{validate_winning_number, Draw};
use quadra_engine::models::frequency::{position_counts, FrequencyModel};

use crate::display::{display_import_summary, display_stats};
use crate::import::normalize_winning_number;

#[derive(Parser)]
#[command(name = "quadra-cli", about = "Gestion de l'historique des tirages Numbers4")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV (numéro,date,numéro gagnant)
        #[arg(short, long, default_value = "assets/numbers4.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les fréquences de chiffres par position
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Ajouter un tirage manuellement
    Add,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Add => cmd_add(&conn),
    }
}

fn cmd_import(conn: &quadra_db::rusqlite::Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &quadra_db::rusqlite::Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : quadra-cli import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    quadra_engine::display::display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &quadra_db::rusqlite::Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : quadra-cli import");
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws(conn, effective_window)?;

    let counts = position_counts(&draws).context("Impossible de calculer les fréquences")?;
    display_stats(&counts, draws.len());

    let most_frequent = FrequencyModel::most_frequent_digits(&draws)?;
    let second = FrequencyModel::second_most_frequent(&draws)?;
    println!("Plus fréquent : {most_frequent}   Deuxième rang : {second}");

    Ok(())
}

fn cmd_add(conn: &quadra_db::rusqlite::Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let draw_number: u32 = prompt("Numéro du tirage (ex: 5501) : ")?
        .parse()
        .context("Numéro de tirage invalide")?;
    let draw_date = prompt("Date (YYYY-MM-DD) : ")?;
    let raw_number = prompt("Numéro gagnant (4 chiffres) : ")?;

    let winning_number = normalize_winning_number(&raw_number)?;
    validate_winning_number(&winning_number)?;

    let draw = Draw {
        draw_number,
        draw_date,
        winning_number,
    };

    println!("\nTirage à insérer :");
    quadra_engine::display::display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}
