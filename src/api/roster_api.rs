// ==========================================
// Gestión ORBAT Milsim - API del tablero ORBAT
// ==========================================
// Responsabilidad: vista de sólo lectura del organigrama que pinta el
// tablero público (columnas por escuadra + tarjetas de personal).
// Sin invariantes: todas las reglas viven en el Transfer Engine.
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::domain::member::SquadOccupant;
use crate::repository::member_repo::MemberRepository;
use crate::repository::unit_repo::UnitRepository;

// ==========================================
// Nodos del tablero (nombres wire en castellano)
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadNode {
    pub id: i64,
    pub nombre: String,
    pub miembros: Vec<SquadOccupant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatoonNode {
    pub id: i64,
    pub nombre: String,
    pub escuadras: Vec<SquadNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyNode {
    pub id: i64,
    pub nombre: String,
    pub pelotones: Vec<PlatoonNode>,
}

/// Tablero completo: el regimiento con su árbol, más los agregados a
/// mandos (asignados por encima de escuadra) y la reserva sin destino
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbatBoard {
    pub regimiento_id: i64,
    pub regimiento: String,
    pub companias: Vec<CompanyNode>,
    pub agregados_mando: Vec<SquadOccupant>,
    pub sin_destino: Vec<SquadOccupant>,
}

// ==========================================
// RosterApi
// ==========================================
pub struct RosterApi {
    units: Arc<UnitRepository>,
    members: Arc<MemberRepository>,
}

impl RosterApi {
    pub fn new(units: Arc<UnitRepository>, members: Arc<MemberRepository>) -> Self {
        Self { units, members }
    }

    /// Construye el tablero del primer regimiento (None si el roster está vacío)
    pub fn get_board(&self) -> ApiResult<Option<OrbatBoard>> {
        let regiment = match self.units.first_regiment()? {
            Some(r) => r,
            None => return Ok(None),
        };

        let mut companias = Vec::new();
        for company in self.units.list_companies(regiment.regiment_id)? {
            let mut pelotones = Vec::new();
            for platoon in self.units.list_platoons(company.company_id)? {
                let mut escuadras = Vec::new();
                for squad in self.units.list_squads(platoon.platoon_id)? {
                    let miembros = self.members.list_occupants(squad.squad_id)?;
                    escuadras.push(SquadNode {
                        id: squad.squad_id,
                        nombre: squad.name,
                        miembros,
                    });
                }
                pelotones.push(PlatoonNode {
                    id: platoon.platoon_id,
                    nombre: platoon.name,
                    escuadras,
                });
            }
            companias.push(CompanyNode {
                id: company.company_id,
                nombre: company.name,
                pelotones,
            });
        }

        let agregados_mando = self
            .members
            .list_hq_attached()?
            .into_iter()
            .map(|m| SquadOccupant {
                id: m.member_id,
                nickname: m.nickname,
                rank: m.rank,
            })
            .collect();

        let sin_destino = self
            .members
            .list_unassigned()?
            .into_iter()
            .map(|m| SquadOccupant {
                id: m.member_id,
                nickname: m.nickname,
                rank: m.rank,
            })
            .collect();

        Ok(Some(OrbatBoard {
            regimiento_id: regiment.regiment_id,
            regimiento: regiment.name,
            companias,
            agregados_mando,
            sin_destino,
        }))
    }
}
