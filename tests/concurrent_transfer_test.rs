// ==========================================
// Test de control de concurrencia
// ==========================================
// Responsabilidad: verificar que dos traslados concurrentes al mismo
// destino no pueden superar juntos la capacidad (carrera clásica de
// comprobar-y-actuar sobre el recuento de ocupantes)
// ==========================================


#[cfg(test)]
mod concurrent_transfer_test {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use milsim_orbat::engine::{TransferEngine, TransferOutcome};
    use milsim_orbat::repository::{ActionLogRepository, MemberRepository, UnitRepository};

    use crate::test_helpers::{create_test_db, enlist, open_shared, seed_minimal_orbat};

    // ==========================================
    // Test 1: carrera hacia la última plaza
    // ==========================================

    #[test]
    fn test_dos_traslados_concurrentes_una_sola_plaza() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        let units = UnitRepository::new(conn.clone());
        let members = MemberRepository::new(conn.clone());
        let audit = Arc::new(ActionLogRepository::new(conn.clone()));
        let engine = Arc::new(TransferEngine::new(conn.clone(), audit));

        let ids = seed_minimal_orbat(&units);

        // Destino con 4 ocupantes: queda exactamente una plaza
        for i in 0..4 {
            enlist(&members, &format!("bravo-{i}"), "PVT", ids.squad_b);
        }
        let candidate_1 = enlist(&members, "alfa-1", "PVT", ids.squad_a);
        let candidate_2 = enlist(&members, "alfa-2", "PVT", ids.squad_a);

        let barrier = Arc::new(Barrier::new(2));
        let mut handles = Vec::new();
        for member_id in [candidate_1, candidate_2] {
            let engine = engine.clone();
            let barrier = barrier.clone();
            let squad_b = ids.squad_b;
            handles.push(thread::spawn(move || {
                barrier.wait();
                engine.request_transfer("cpt.vega", member_id, squad_b, None)
            }));
        }

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();

        // Exactamente uno entra; el otro recibe el conflicto con los 5 ocupantes
        let moved = results
            .iter()
            .filter(|r| matches!(r, TransferOutcome::Moved { .. }))
            .count();
        let conflicts: Vec<_> = results
            .iter()
            .filter_map(|r| match r {
                TransferOutcome::CapacityConflict { occupants } => Some(occupants),
                _ => None,
            })
            .collect();
        assert_eq!(moved, 1);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].len(), 5);

        // Invariante final: nunca más de 5
        assert_eq!(members.count_in_squad(ids.squad_b).unwrap(), 5);
        assert_eq!(members.count_in_squad(ids.squad_a).unwrap(), 1);
    }

    // ==========================================
    // Test 2: ráfaga de traslados desde varios hilos
    // ==========================================

    #[test]
    fn test_rafaga_nunca_supera_capacidad() {
        let (_temp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        let units = UnitRepository::new(conn.clone());
        let members = MemberRepository::new(conn.clone());
        let audit = Arc::new(ActionLogRepository::new(conn.clone()));
        let engine = Arc::new(TransferEngine::new(conn.clone(), audit));

        let ids = seed_minimal_orbat(&units);

        // 8 candidatos compiten por 5 plazas de una escuadra vacía
        let candidates: Vec<i64> = (0..8)
            .map(|i| enlist(&members, &format!("alfa-{i}"), "PVT", ids.squad_a))
            .collect();

        let barrier = Arc::new(Barrier::new(candidates.len()));
        let handles: Vec<_> = candidates
            .iter()
            .map(|member_id| {
                let engine = engine.clone();
                let barrier = barrier.clone();
                let (member_id, squad_b) = (*member_id, ids.squad_b);
                thread::spawn(move || {
                    barrier.wait();
                    engine.request_transfer("cpt.vega", member_id, squad_b, None)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();

        let moved = results
            .iter()
            .filter(|r| matches!(r, TransferOutcome::Moved { .. }))
            .count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, TransferOutcome::CapacityConflict { .. }))
            .count();

        assert_eq!(moved, 5);
        assert_eq!(conflicts, 3);
        assert_eq!(members.count_in_squad(ids.squad_b).unwrap(), 5);
    }
}
