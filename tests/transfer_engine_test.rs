// ==========================================
// Test de integración del Transfer Engine
// ==========================================
// Responsabilidad: verificar sobre base real (fichero temporal) el
// invariante de capacidad, la coherencia desnormalizada y la auditoría
// ==========================================


#[cfg(test)]
mod transfer_engine_test {
    use std::sync::Arc;

    use milsim_orbat::domain::Assignment;
    use milsim_orbat::engine::{TransferEngine, TransferError, TransferOutcome};
    use milsim_orbat::repository::{ActionLogRepository, MemberRepository, UnitRepository};

    use crate::test_helpers::{create_test_db, enlist, fill_squad, open_shared, seed_minimal_orbat, OrbatIds};

    // ==========================================
    // Auxiliares
    // ==========================================

    struct Env {
        _temp: tempfile::NamedTempFile,
        conn: std::sync::Arc<std::sync::Mutex<rusqlite::Connection>>,
        engine: TransferEngine,
        members: MemberRepository,
        audit: Arc<ActionLogRepository>,
        ids: OrbatIds,
    }

    fn setup() -> Env {
        let (temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        let units = UnitRepository::new(conn.clone());
        let members = MemberRepository::new(conn.clone());
        let audit = Arc::new(ActionLogRepository::new(conn.clone()));
        let engine = TransferEngine::new(conn.clone(), audit.clone());
        let ids = seed_minimal_orbat(&units);
        Env {
            _temp: temp,
            conn,
            engine,
            members,
            audit,
            ids,
        }
    }

    /// Columnas desnormalizadas crudas de un miembro
    fn raw_columns(env: &Env, member_id: i64) -> (Option<i64>, Option<i64>, Option<i64>, Option<i64>) {
        let conn = env.conn.lock().unwrap();
        conn.query_row(
            "SELECT squad_id, platoon_id, company_id, regiment_id FROM member WHERE member_id = ?1",
            [member_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap()
    }

    // ==========================================
    // Test 1: el traslado reescribe TODA la ascendencia desnormalizada
    // ==========================================

    #[test]
    fn test_traslado_mantiene_ascendencia_desnormalizada() {
        let env = setup();
        let m1 = enlist(&env.members, "ghost", "CPL", env.ids.squad_a);

        env.engine
            .request_transfer("cpt.vega", m1, env.ids.squad_b, None)
            .unwrap();

        let (squad, platoon, company, regiment) = raw_columns(&env, m1);
        assert_eq!(squad, Some(env.ids.squad_b));
        assert_eq!(platoon, Some(env.ids.platoon));
        assert_eq!(company, Some(env.ids.company));
        assert_eq!(regiment, Some(env.ids.regiment));
    }

    // ==========================================
    // Test 2: cadena de traslados sin romper nunca el invariante
    // ==========================================

    #[test]
    fn test_invariante_de_capacidad_en_cadena() {
        let env = setup();
        fill_squad(&env.members, env.ids.squad_b, "bravo");
        let extras: Vec<i64> = (0..3)
            .map(|i| enlist(&env.members, &format!("alfa-{i}"), "PVT", env.ids.squad_a))
            .collect();

        // Tres intentos consecutivos contra la escuadra llena: todos conflicto
        for m in &extras {
            let outcome = env
                .engine
                .request_transfer("cpt.vega", *m, env.ids.squad_b, None)
                .unwrap();
            assert!(matches!(outcome, TransferOutcome::CapacityConflict { .. }));
            assert_eq!(env.members.count_in_squad(env.ids.squad_b).unwrap(), 5);
        }

        // El invariante se mantiene tras cualquier transacción completada
        assert!(env.members.count_in_squad(env.ids.squad_b).unwrap() <= 5);
        assert_eq!(env.members.count_in_squad(env.ids.squad_a).unwrap(), 3);
    }

    // ==========================================
    // Test 3: el swap conserva recuentos y hereda el origen
    // ==========================================

    #[test]
    fn test_swap_integra_origen_y_auditoria() {
        let env = setup();
        let m1 = enlist(&env.members, "ghost", "CPL", env.ids.squad_a);
        let bravo = fill_squad(&env.members, env.ids.squad_b, "bravo");
        let m2 = bravo[1];

        let outcome = env
            .engine
            .request_transfer("cpt.vega", m1, env.ids.squad_b, Some(m2))
            .unwrap();
        match outcome {
            TransferOutcome::Swapped {
                replaced_destination,
                ..
            } => assert_eq!(replaced_destination, Assignment::Squad(env.ids.squad_a)),
            other => panic!("se esperaba Swapped, llegó {:?}", other),
        }

        assert_eq!(env.members.count_in_squad(env.ids.squad_b).unwrap(), 5);
        assert_eq!(env.members.count_in_squad(env.ids.squad_a).unwrap(), 1);

        // El reemplazado tiene la ascendencia de la escuadra A, no restos de B
        let (squad, platoon, company, regiment) = raw_columns(&env, m2);
        assert_eq!(squad, Some(env.ids.squad_a));
        assert_eq!(platoon, Some(env.ids.platoon));
        assert_eq!(company, Some(env.ids.company));
        assert_eq!(regiment, Some(env.ids.regiment));

        // Dos entradas de auditoría (una por miembro afectado), tipo Swap
        assert_eq!(env.audit.count().unwrap(), 2);
        let logs = env.audit.find_by_member_id(m2).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action_type, "Swap");
        assert_eq!(logs[0].actor, "cpt.vega");
    }

    // ==========================================
    // Test 4: swap con origen vacío deja al reemplazado sin columnas
    // ==========================================

    #[test]
    fn test_swap_origen_vacio_limpia_columnas() {
        let env = setup();
        let m1 = env
            .members
            .insert("novato", "PVT", true, Assignment::Unassigned)
            .unwrap();
        let bravo = fill_squad(&env.members, env.ids.squad_b, "bravo");
        let m2 = bravo[0];

        env.engine
            .request_transfer("cpt.vega", m1, env.ids.squad_b, Some(m2))
            .unwrap();

        assert_eq!(raw_columns(&env, m2), (None, None, None, None));
        assert_eq!(env.members.count_in_squad(env.ids.squad_b).unwrap(), 5);
    }

    // ==========================================
    // Test 5: los fallos de entrada no mutan nada
    // ==========================================

    #[test]
    fn test_not_found_no_muta() {
        let env = setup();
        let m1 = enlist(&env.members, "ghost", "CPL", env.ids.squad_a);

        let err = env
            .engine
            .request_transfer("cpt.vega", 9999, env.ids.squad_b, None)
            .unwrap_err();
        assert!(matches!(err, TransferError::MemberNotFound(9999)));

        let err = env
            .engine
            .request_transfer("cpt.vega", m1, 9999, None)
            .unwrap_err();
        assert!(matches!(err, TransferError::SquadNotFound(9999)));

        assert_eq!(env.members.count_in_squad(env.ids.squad_a).unwrap(), 1);
        assert_eq!(env.audit.count().unwrap(), 0);
    }
}
