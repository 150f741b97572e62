// ==========================================
// Gestión ORBAT Milsim - Repositorio de unidades
// ==========================================
// Línea roja: el repository no contiene lógica de negocio,
// sólo mapeo de datos
// ==========================================
// Las unidades se crean/editan por la vía administrativa y cambian
// rara vez; para el Transfer Engine son de sólo lectura.
// ==========================================

use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Transaction};
use std::sync::{Arc, Mutex};

use crate::domain::unit::{Company, Platoon, Regiment, Squad, SquadAncestry};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// UnitRepository - Jerarquía de mando
// ==========================================
pub struct UnitRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UnitRepository {
    /// Crea el repositorio sobre la conexión compartida
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Obtiene la conexión
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // Consultas
    // ==========================================

    /// Primer regimiento del roster (la sede del mando es un singleton en la práctica)
    pub fn first_regiment(&self) -> RepositoryResult<Option<Regiment>> {
        let conn = self.get_conn()?;
        let regiment = conn
            .query_row(
                "SELECT regiment_id, name FROM regiment ORDER BY regiment_id LIMIT 1",
                [],
                |row| {
                    Ok(Regiment {
                        regiment_id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(regiment)
    }

    /// Busca una escuadra por id
    pub fn find_squad(&self, squad_id: i64) -> RepositoryResult<Option<Squad>> {
        let conn = self.get_conn()?;
        let squad = conn
            .query_row(
                "SELECT squad_id, name, platoon_id FROM squad WHERE squad_id = ?1",
                params![squad_id],
                |row| {
                    Ok(Squad {
                        squad_id: row.get(0)?,
                        name: row.get(1)?,
                        platoon_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(squad)
    }

    /// Resuelve la ascendencia completa de una escuadra
    pub fn squad_ancestry(&self, squad_id: i64) -> RepositoryResult<Option<SquadAncestry>> {
        let conn = self.get_conn()?;
        Self::squad_ancestry_on(&conn, squad_id)
    }

    /// Variante sobre transacción, para componer con el Transfer Engine
    pub fn squad_ancestry_tx(tx: &Transaction<'_>, squad_id: i64) -> RepositoryResult<Option<SquadAncestry>> {
        Self::squad_ancestry_on(tx, squad_id)
    }

    /// Ascendencia escuadra → pelotón → compañía → regimiento (un solo join)
    fn squad_ancestry_on(conn: &Connection, squad_id: i64) -> RepositoryResult<Option<SquadAncestry>> {
        let ancestry = conn
            .query_row(
                r#"
                SELECT s.squad_id, s.platoon_id, p.company_id, c.regiment_id
                FROM squad s
                JOIN platoon p ON p.platoon_id = s.platoon_id
                JOIN company c ON c.company_id = p.company_id
                WHERE s.squad_id = ?1
                "#,
                params![squad_id],
                |row| {
                    Ok(SquadAncestry {
                        squad_id: row.get(0)?,
                        platoon_id: row.get(1)?,
                        company_id: row.get(2)?,
                        regiment_id: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(ancestry)
    }

    /// Compañías de un regimiento
    pub fn list_companies(&self, regiment_id: i64) -> RepositoryResult<Vec<Company>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT company_id, name, regiment_id FROM company \
             WHERE regiment_id = ?1 ORDER BY company_id",
        )?;
        let companies = stmt
            .query_map(params![regiment_id], |row| {
                Ok(Company {
                    company_id: row.get(0)?,
                    name: row.get(1)?,
                    regiment_id: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(companies)
    }

    /// Pelotones de una compañía
    pub fn list_platoons(&self, company_id: i64) -> RepositoryResult<Vec<Platoon>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT platoon_id, name, company_id FROM platoon \
             WHERE company_id = ?1 ORDER BY platoon_id",
        )?;
        let platoons = stmt
            .query_map(params![company_id], |row| {
                Ok(Platoon {
                    platoon_id: row.get(0)?,
                    name: row.get(1)?,
                    company_id: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(platoons)
    }

    /// Escuadras de un pelotón
    pub fn list_squads(&self, platoon_id: i64) -> RepositoryResult<Vec<Squad>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT squad_id, name, platoon_id FROM squad \
             WHERE platoon_id = ?1 ORDER BY squad_id",
        )?;
        let squads = stmt
            .query_map(params![platoon_id], |row| {
                Ok(Squad {
                    squad_id: row.get(0)?,
                    name: row.get(1)?,
                    platoon_id: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(squads)
    }

    // ==========================================
    // Escrituras (vía administrativa / seed / tests)
    // ==========================================

    /// Inserta un regimiento y devuelve su id
    pub fn insert_regiment(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO regiment (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// Inserta una compañía y devuelve su id
    pub fn insert_company(&self, name: &str, regiment_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO company (name, regiment_id) VALUES (?1, ?2)",
            params![name, regiment_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Inserta un pelotón y devuelve su id
    pub fn insert_platoon(&self, name: &str, company_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO platoon (name, company_id) VALUES (?1, ?2)",
            params![name, company_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Inserta una escuadra y devuelve su id
    pub fn insert_squad(&self, name: &str, platoon_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO squad (name, platoon_id) VALUES (?1, ?2)",
            params![name, platoon_id],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
