//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise `dbal_core` end to end against an in-memory database.
//! - Keep output deterministic for quick local sanity checks.

use dbal_core::{attributes, open_db_in_memory, Repository};
use std::error::Error;

fn main() {
    if let Err(err) = run() {
        eprintln!("dbal_core smoke failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    conn.execute_batch(
        "CREATE TABLE smoke (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);",
    )?;

    let mut repo = Repository::new(&conn);
    repo.set_table("smoke");
    for name in ["alpha", "beta", "gamma"] {
        repo.insert(&attributes([("name", name)]))?;
    }
    repo.delete(&attributes([("name", "beta")]))?;

    let rows = repo.find_all()?;
    println!("dbal_core version={}", dbal_core::core_version());
    println!("dbal_core rows={}", serde_json::to_string(&rows)?);
    Ok(())
}
