// ==========================================
// Gestión ORBAT Milsim - Repositorio de personal
// ==========================================
// Línea roja: el repository no contiene lógica de negocio,
// sólo mapeo de datos
// ==========================================
// Aquí vive el ÚNICO punto de mapeo entre la unión `Assignment` del
// dominio y las columnas desnormalizadas por nivel de la tabla member
// (squad_id/platoon_id/company_id/regiment_id). Los ancestros se derivan
// en este límite de almacenamiento, nunca en el dominio ni en el motor.
// ==========================================

use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use std::sync::{Arc, Mutex};

use crate::domain::member::{Assignment, Member, SquadOccupant};
use crate::repository::error::{RepositoryError, RepositoryResult};

/// Columnas desnormalizadas de asignación, en orden
/// (squad_id, platoon_id, company_id, regiment_id)
type AssignmentColumns = (Option<i64>, Option<i64>, Option<i64>, Option<i64>);

// ==========================================
// MemberRepository - Personal
// ==========================================
pub struct MemberRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MemberRepository {
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
    // Mapeo fila ↔ dominio
    // ==========================================

    /// Reconstruye la unión de asignación desde las columnas por nivel.
    ///
    /// Precedencia hoja → raíz: si hay squad_id la asignación es a escuadra
    /// y el resto de columnas son redundancia derivada; si no, el nodo más
    /// profundo presente es el destino real ("agregado al mando de X").
    fn assignment_from_columns(cols: AssignmentColumns) -> Assignment {
        let (squad_id, platoon_id, company_id, regiment_id) = cols;
        if let Some(id) = squad_id {
            Assignment::Squad(id)
        } else if let Some(id) = platoon_id {
            Assignment::Platoon(id)
        } else if let Some(id) = company_id {
            Assignment::Company(id)
        } else if let Some(id) = regiment_id {
            Assignment::Regiment(id)
        } else {
            Assignment::Unassigned
        }
    }

    fn map_member_row(row: &Row<'_>) -> SqliteResult<Member> {
        let cols: AssignmentColumns = (row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?);
        Ok(Member {
            member_id: row.get(0)?,
            nickname: row.get(1)?,
            rank: row.get(2)?,
            active: row.get::<_, i64>(3)? != 0,
            assignment: Self::assignment_from_columns(cols),
        })
    }

    /// Deriva las columnas desnormalizadas de una asignación.
    ///
    /// Para niveles intermedios los ancestros se resuelven con un join sobre
    /// las tablas de unidades; si el nodo destino no existe se devuelve
    /// NotFound (el motor lo traduce a su propio error).
    fn denormalized_columns(
        conn: &Connection,
        assignment: Assignment,
    ) -> RepositoryResult<AssignmentColumns> {
        match assignment {
            Assignment::Unassigned => Ok((None, None, None, None)),
            Assignment::Regiment(id) => {
                let exists: Option<i64> = conn
                    .query_row(
                        "SELECT regiment_id FROM regiment WHERE regiment_id = ?1",
                        params![id],
                        |row| row.get(0),
                    )
                    .optional()?;
                match exists {
                    Some(r) => Ok((None, None, None, Some(r))),
                    None => Err(RepositoryError::NotFound {
                        entity: "Regiment".to_string(),
                        id: id.to_string(),
                    }),
                }
            }
            Assignment::Company(id) => {
                let row: Option<(i64, i64)> = conn
                    .query_row(
                        "SELECT company_id, regiment_id FROM company WHERE company_id = ?1",
                        params![id],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?;
                match row {
                    Some((c, r)) => Ok((None, None, Some(c), Some(r))),
                    None => Err(RepositoryError::NotFound {
                        entity: "Company".to_string(),
                        id: id.to_string(),
                    }),
                }
            }
            Assignment::Platoon(id) => {
                let row: Option<(i64, i64, i64)> = conn
                    .query_row(
                        r#"
                        SELECT p.platoon_id, p.company_id, c.regiment_id
                        FROM platoon p
                        JOIN company c ON c.company_id = p.company_id
                        WHERE p.platoon_id = ?1
                        "#,
                        params![id],
                        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                    )
                    .optional()?;
                match row {
                    Some((p, c, r)) => Ok((None, Some(p), Some(c), Some(r))),
                    None => Err(RepositoryError::NotFound {
                        entity: "Platoon".to_string(),
                        id: id.to_string(),
                    }),
                }
            }
            Assignment::Squad(id) => {
                let row: Option<(i64, i64, i64, i64)> = conn
                    .query_row(
                        r#"
                        SELECT s.squad_id, s.platoon_id, p.company_id, c.regiment_id
                        FROM squad s
                        JOIN platoon p ON p.platoon_id = s.platoon_id
                        JOIN company c ON c.company_id = p.company_id
                        WHERE s.squad_id = ?1
                        "#,
                        params![id],
                        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                    )
                    .optional()?;
                match row {
                    Some((s, p, c, r)) => Ok((Some(s), Some(p), Some(c), Some(r))),
                    None => Err(RepositoryError::NotFound {
                        entity: "Squad".to_string(),
                        id: id.to_string(),
                    }),
                }
            }
        }
    }

    const SELECT_MEMBER: &'static str = "SELECT member_id, nickname, rank, active, \
         squad_id, platoon_id, company_id, regiment_id FROM member";

    // ==========================================
    // Consultas
    // ==========================================

    /// Busca un miembro por id
    pub fn find_by_id(&self, member_id: i64) -> RepositoryResult<Option<Member>> {
        let conn = self.get_conn()?;
        Self::find_by_id_on(&conn, member_id)
    }

    /// Variante sobre transacción, para componer con el Transfer Engine
    pub fn find_by_id_tx(tx: &Transaction<'_>, member_id: i64) -> RepositoryResult<Option<Member>> {
        Self::find_by_id_on(tx, member_id)
    }

    fn find_by_id_on(conn: &Connection, member_id: i64) -> RepositoryResult<Option<Member>> {
        let sql = format!("{} WHERE member_id = ?1", Self::SELECT_MEMBER);
        let member = conn
            .query_row(&sql, params![member_id], Self::map_member_row)
            .optional()?;
        Ok(member)
    }

    /// Ocupantes de una escuadra (proyección para el payload de conflicto)
    pub fn list_occupants(&self, squad_id: i64) -> RepositoryResult<Vec<SquadOccupant>> {
        let conn = self.get_conn()?;
        Self::list_occupants_on(&conn, squad_id)
    }

    /// Variante sobre transacción: el recuento de ocupantes que decide el
    /// traslado SIEMPRE se lee dentro de la transacción exclusiva, nunca
    /// desde una lectura previa (prohibido cachear, ver spec de concurrencia)
    pub fn list_occupants_tx(
        tx: &Transaction<'_>,
        squad_id: i64,
    ) -> RepositoryResult<Vec<SquadOccupant>> {
        Self::list_occupants_on(tx, squad_id)
    }

    fn list_occupants_on(conn: &Connection, squad_id: i64) -> RepositoryResult<Vec<SquadOccupant>> {
        let mut stmt = conn.prepare(
            "SELECT member_id, nickname, rank FROM member \
             WHERE squad_id = ?1 ORDER BY member_id",
        )?;
        let occupants = stmt
            .query_map(params![squad_id], |row| {
                Ok(SquadOccupant {
                    id: row.get(0)?,
                    nickname: row.get(1)?,
                    rank: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(occupants)
    }

    /// Número de miembros destinados directamente en la escuadra
    pub fn count_in_squad(&self, squad_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM member WHERE squad_id = ?1",
            params![squad_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Miembros sin destino (todas las columnas de asignación a NULL)
    pub fn list_unassigned(&self) -> RepositoryResult<Vec<Member>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE squad_id IS NULL AND platoon_id IS NULL \
             AND company_id IS NULL AND regiment_id IS NULL ORDER BY member_id",
            Self::SELECT_MEMBER
        );
        let mut stmt = conn.prepare(&sql)?;
        let members = stmt
            .query_map([], Self::map_member_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(members)
    }

    /// Miembros agregados a un mando (asignados por encima del nivel escuadra)
    pub fn list_hq_attached(&self) -> RepositoryResult<Vec<Member>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE squad_id IS NULL AND regiment_id IS NOT NULL ORDER BY member_id",
            Self::SELECT_MEMBER
        );
        let mut stmt = conn.prepare(&sql)?;
        let members = stmt
            .query_map([], Self::map_member_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(members)
    }

    // ==========================================
    // Escrituras
    // ==========================================

    /// Alta de un miembro (vía administrativa / seed / tests)
    pub fn insert(
        &self,
        nickname: &str,
        rank: &str,
        active: bool,
        assignment: Assignment,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let (squad_id, platoon_id, company_id, regiment_id) =
            Self::denormalized_columns(&conn, assignment)?;
        conn.execute(
            r#"
            INSERT INTO member (nickname, rank, active, squad_id, platoon_id, company_id, regiment_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![nickname, rank, active as i64, squad_id, platoon_id, company_id, regiment_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Reasigna un miembro dentro de una transacción del Transfer Engine.
    ///
    /// Las cuatro columnas desnormalizadas se reescriben SIEMPRE juntas para
    /// que la redundancia pelotón/compañía/regimiento no pueda quedar
    /// incoherente con la escuadra.
    pub fn update_assignment_tx(
        tx: &Transaction<'_>,
        member_id: i64,
        assignment: Assignment,
    ) -> RepositoryResult<()> {
        let (squad_id, platoon_id, company_id, regiment_id) =
            Self::denormalized_columns(tx, assignment)?;
        let rows = tx.execute(
            r#"
            UPDATE member
            SET squad_id = ?2, platoon_id = ?3, company_id = ?4, regiment_id = ?5,
                updated_at = datetime('now')
            WHERE member_id = ?1
            "#,
            params![member_id, squad_id, platoon_id, company_id, regiment_id],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Member".to_string(),
                id: member_id.to_string(),
            });
        }
        Ok(())
    }
}
