// ==========================================
// Gestión ORBAT Milsim - Capa API
// ==========================================
// Responsabilidad: superficie de negocio que monta la capa de serving
// externa (endpoint HTTP, autenticación y routing son colaboradores)
// ==========================================

pub mod error;
pub mod roster_api;
pub mod transfer_api;

// Reexporta los tipos centrales
pub use error::{ApiError, ApiResult};
pub use roster_api::{CompanyNode, OrbatBoard, PlatoonNode, RosterApi, SquadNode};
pub use transfer_api::{TransferApi, TransferApiResponse, TransferRequest};
