// ==========================================
// Gestión ORBAT Milsim - Seed de demo
// ==========================================
// Resetea la base indicada (o la de por defecto) y la puebla con un
// ORBAT de demostración: un regimiento, dos compañías, pelotones,
// escuadras y personal, incluida una escuadra ya completa para probar
// el flujo de conflicto/intercambio desde el tablero.
// ==========================================

use std::sync::{Arc, Mutex};

use milsim_orbat::app::get_default_db_path;
use milsim_orbat::db;
use milsim_orbat::domain::Assignment;
use milsim_orbat::repository::{MemberRepository, UnitRepository};

fn main() -> anyhow::Result<()> {
    milsim_orbat::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("reseteando base de demo en {}", db_path);

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    if std::path::Path::new(&db_path).exists() {
        std::fs::remove_file(&db_path)?;
    }

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let units = UnitRepository::new(conn.clone());
    let members = MemberRepository::new(conn);

    // ===== Jerarquía =====
    let regiment = units.insert_regiment("75th Ranger RGT")?;
    let alfa = units.insert_company("Compañía Alfa", regiment)?;
    let bravo = units.insert_company("Compañía Bravo", regiment)?;

    let alfa_1 = units.insert_platoon("Pelotón 1", alfa)?;
    let alfa_2 = units.insert_platoon("Pelotón 2", alfa)?;
    let bravo_1 = units.insert_platoon("Pelotón 1", bravo)?;

    let esc_alfa = units.insert_squad("Escuadra Alfa", alfa_1)?;
    let esc_bravo = units.insert_squad("Escuadra Bravo", alfa_1)?;
    let esc_charlie = units.insert_squad("Escuadra Charlie", alfa_2)?;
    let esc_delta = units.insert_squad("Escuadra Delta", bravo_1)?;

    // ===== Personal =====
    // Escuadra Alfa completa (5/5) para poder demostrar el intercambio
    for (nick, rank) in [
        ("viper", "SGT"),
        ("ghost", "CPL"),
        ("reaper", "SPC"),
        ("havoc", "PVT"),
        ("dusty", "PVT"),
    ] {
        members.insert(nick, rank, true, Assignment::Squad(esc_alfa))?;
    }

    for (nick, rank) in [("condor", "SGT"), ("lince", "CPL"), ("brutus", "PVT")] {
        members.insert(nick, rank, true, Assignment::Squad(esc_bravo))?;
    }
    for (nick, rank) in [("nomada", "SGT"), ("trueno", "PVT")] {
        members.insert(nick, rank, true, Assignment::Squad(esc_charlie))?;
    }
    members.insert("falcon", "SGT", true, Assignment::Squad(esc_delta))?;

    // Agregados a mandos y reserva
    members.insert("halcon", "CPT", true, Assignment::Company(alfa))?;
    members.insert("cuervo", "MAJ", true, Assignment::Regiment(regiment))?;
    members.insert("novato", "PVT", true, Assignment::Unassigned)?;

    tracing::info!("demo lista: 1 regimiento, 2 compañías, 4 escuadras, 14 miembros");
    tracing::info!("la Escuadra Alfa (id={esc_alfa}) está completa: traslade a alguien para ver el conflicto");
    Ok(())
}
