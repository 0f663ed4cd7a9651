use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_number     INTEGER PRIMARY KEY,
    draw_date       TEXT NOT NULL,
    winning_number  TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("quadra.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_number, draw_date, winning_number)
         VALUES (?1, ?2, ?3)",
        rusqlite::params![draw.draw_number, draw.draw_date, draw.winning_number],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        draw_number: row.get(0)?,
        draw_date: row.get(1)?,
        winning_number: row.get(2)?,
    })
}

/// Les `limit` derniers tirages, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT draw_number, draw_date, winning_number
         FROM draws ORDER BY draw_number DESC LIMIT ?1",
    )?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Les `limit` tirages strictement antérieurs au tirage `draw_number`,
/// du plus récent au plus ancien. C'est la requête de fenêtre du moteur.
pub fn fetch_before(conn: &Connection, draw_number: u32, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT draw_number, draw_date, winning_number
         FROM draws WHERE draw_number < ?1 ORDER BY draw_number DESC LIMIT ?2",
    )?;
    let draws = stmt
        .query_map(rusqlite::params![draw_number, limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Tous les tirages entre deux dates incluses, du plus ancien au plus récent
/// (l'ordre attendu par le simulateur de backtest).
pub fn fetch_date_range(conn: &Connection, from: &str, to: &str) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT draw_number, draw_date, winning_number
         FROM draws WHERE draw_date >= ?1 AND draw_date <= ?2 ORDER BY draw_number ASC",
    )?;
    let draws = stmt
        .query_map(rusqlite::params![from, to], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}
