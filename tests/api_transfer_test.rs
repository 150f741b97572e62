// ==========================================
// Test end-to-end de la API de traslados
// ==========================================
// Responsabilidad: verificar el contrato wire completo que consume el
// tablero (payloads, categorías de estado y mensajes de error)
// ==========================================


#[cfg(test)]
mod api_transfer_test {
    use milsim_orbat::api::{ApiError, TransferApiResponse, TransferRequest};
    use milsim_orbat::app::AppState;
    use milsim_orbat::repository::{MemberRepository, UnitRepository};

    use crate::test_helpers::{create_test_db, enlist, fill_squad, open_shared, seed_minimal_orbat, OrbatIds};

    // ==========================================
    // Auxiliares
    // ==========================================

    fn setup() -> (tempfile::NamedTempFile, AppState, MemberRepository, OrbatIds) {
        let (temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        let units = UnitRepository::new(conn.clone());
        let members = MemberRepository::new(conn.clone());
        let ids = seed_minimal_orbat(&units);
        let state = AppState::from_connection(db_path, conn);
        (temp, state, members, ids)
    }

    fn request(persona: i64, destino: i64, reemplazo: Option<i64>) -> TransferRequest {
        TransferRequest {
            persona_id: persona,
            escuadra_destino_id: destino,
            persona_a_reemplazar_id: reemplazo,
        }
    }

    // ==========================================
    // Test 1: movimiento directo → 200 con eco de ids
    // ==========================================

    #[test]
    fn test_movido_devuelve_200_con_eco() {
        let (_temp, state, members, ids) = setup();
        let m1 = enlist(&members, "ghost", "CPL", ids.squad_a);

        let resp = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, ids.squad_b, None))
            .unwrap();
        assert_eq!(resp.http_status(), 200);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["moved"], m1);
        assert_eq!(v["escuadra_destino_id"], ids.squad_b);
    }

    // ==========================================
    // Test 2: escuadra llena → 409 con los 5 ocupantes
    // ==========================================

    #[test]
    fn test_conflicto_devuelve_409_con_ocupantes() {
        let (_temp, state, members, ids) = setup();
        let bravo = fill_squad(&members, ids.squad_b, "bravo");
        let m1 = enlist(&members, "ghost", "CPL", ids.squad_a);

        let resp = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, ids.squad_b, None))
            .unwrap();
        assert_eq!(resp.http_status(), 409);
        match &resp {
            TransferApiResponse::Conflict { miembros } => {
                let got: Vec<i64> = miembros.iter().map(|m| m.id).collect();
                assert_eq!(got, bravo);
            }
            other => panic!("se esperaba Conflict, llegó {:?}", other),
        }

        // Nada se ha movido: el segundo intento devuelve lo mismo
        let resp2 = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, ids.squad_b, None))
            .unwrap();
        assert!(resp2.is_conflict());
    }

    // ==========================================
    // Test 3: intercambio → 200 con replaced y replaced_moved_to
    // ==========================================

    #[test]
    fn test_intercambio_echo_de_destinos() {
        let (_temp, state, members, ids) = setup();
        let bravo = fill_squad(&members, ids.squad_b, "bravo");
        let m1 = enlist(&members, "ghost", "CPL", ids.squad_a);

        let resp = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, ids.squad_b, Some(bravo[3])))
            .unwrap();
        assert_eq!(resp.http_status(), 200);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["moved"], m1);
        assert_eq!(v["replaced"], bravo[3]);
        assert_eq!(v["replaced_moved_to"], ids.squad_a);
    }

    #[test]
    fn test_intercambio_desde_reserva_echo_null() {
        let (_temp, state, members, ids) = setup();
        let bravo = fill_squad(&members, ids.squad_b, "bravo");
        let m1 = members
            .insert("novato", "PVT", true, milsim_orbat::domain::Assignment::Unassigned)
            .unwrap();

        let resp = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, ids.squad_b, Some(bravo[0])))
            .unwrap();
        let v = serde_json::to_value(&resp).unwrap();
        // El tablero retira la tarjeta cuando replaced_moved_to es null
        assert!(v["replaced_moved_to"].is_null());
    }

    // ==========================================
    // Test 4: errores de entrada, distinguidos
    // ==========================================

    #[test]
    fn test_not_found_distingue_miembro_y_escuadra() {
        let (_temp, state, members, ids) = setup();
        let m1 = enlist(&members, "ghost", "CPL", ids.squad_a);

        let err = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(4040, ids.squad_b, None))
            .unwrap_err();
        match err {
            ApiError::NotFound(msg) => assert!(msg.contains("4040")),
            other => panic!("se esperaba NotFound, llegó {:?}", other),
        }

        let err = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, 5050, None))
            .unwrap_err();
        match err {
            ApiError::NotFound(msg) => assert!(msg.contains("5050")),
            other => panic!("se esperaba NotFound, llegó {:?}", other),
        }
    }

    #[test]
    fn test_reemplazo_invalido_es_error_propio() {
        let (_temp, state, members, ids) = setup();
        fill_squad(&members, ids.squad_b, "bravo");
        let m1 = enlist(&members, "ghost", "CPL", ids.squad_a);
        let intruso = enlist(&members, "intruso", "PVT", ids.squad_a);

        let err = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, ids.squad_b, Some(intruso)))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidReplacement(_)));
    }

    #[test]
    fn test_ids_no_positivos_son_entrada_invalida() {
        let (_temp, state, _members, ids) = setup();
        let err = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(0, ids.squad_b, None))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    // ==========================================
    // Test 5: la auditoría acompaña al flujo completo
    // ==========================================

    #[test]
    fn test_flujo_completo_con_auditoria() {
        let (_temp, state, members, ids) = setup();
        let bravo = fill_squad(&members, ids.squad_b, "bravo");
        let m1 = enlist(&members, "ghost", "CPL", ids.squad_a);

        // Conflicto (sin auditoría) y luego intercambio (dos entradas)
        let resp = state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, ids.squad_b, None))
            .unwrap();
        assert!(resp.is_conflict());
        assert_eq!(state.action_log_repo.count().unwrap(), 0);

        state
            .transfer_api
            .transferir_personal("cpt.vega", &request(m1, ids.squad_b, Some(bravo[2])))
            .unwrap();
        assert_eq!(state.action_log_repo.count().unwrap(), 2);

        let recent = state.action_log_repo.list_recent(10).unwrap();
        assert!(recent.iter().all(|l| l.action_type == "Swap"));
        assert!(recent.iter().all(|l| l.actor == "cpt.vega"));
    }
}
