use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::*;
use crate::testing::{session, FakeFactory};

fn registry() -> (SessionRegistry, FakeFactory) {
    let factory = FakeFactory::new();
    let registry = SessionRegistry::new(
        Box::new(factory.clone()),
        ServiceCatalog::default(),
        Rect::new(-10000.0, -10000.0, 1.0, 1.0),
    );
    (registry, factory)
}

fn finished(id: &str, surface: &SurfaceRef, url: &str) -> SurfaceEvent {
    SurfaceEvent {
        session_id: SessionId::from(id),
        surface_id: surface.id(),
        kind: SurfaceEventKind::PageLoad {
            state: PageLoadState::Finished,
            url: url.into(),
        },
    }
}

// =============================================================================
// CREATE / GET
// =============================================================================

#[test]
fn create_is_idempotent() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");

    let first = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    let second = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(factory.created_count(), 1);
}

#[test]
fn get_does_not_reset_status() {
    let (mut reg, _) = registry();
    let meta = session("a", "w1");
    let surface = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    reg.handle_event(finished("a", &surface, "https://web.whatsapp.com/"), Instant::now());
    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Connected);

    reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Connected);
}

#[test]
fn new_surface_starts_connecting_and_parked() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    reg.create_or_get_surface(&meta, WorkspaceType::Telegram).unwrap();

    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Connecting);
    let fake = factory.latest(&meta.id).unwrap();
    assert_eq!(fake.url, "https://web.telegram.org");
    assert_eq!(fake.isolation_key, meta.partition);
    assert_eq!(fake.bounds.get(), Some(Rect::new(-10000.0, -10000.0, 1.0, 1.0)));
}

#[test]
fn isolation_key_cannot_be_shared() {
    let (mut reg, _) = registry();
    let a = session("a", "w1");
    let mut b = session("b", "w1");
    b.partition = a.partition.clone();

    reg.create_or_get_surface(&a, WorkspaceType::Whatsapp).unwrap();
    let err = match reg.create_or_get_surface(&b, WorkspaceType::Whatsapp) {
        Err(e) => e,
        Ok(_) => panic!("shared isolation key accepted"),
    };
    assert!(matches!(err, SurfaceError::IsolationKeyInUse { ref owner, .. } if owner == "a"));
    assert!(!reg.contains(&b.id));
}

#[test]
fn creation_failure_keeps_metadata_for_retry() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    factory.fail.set(true);

    assert!(reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).is_err());
    assert!(reg.contains(&meta.id));
    assert!(matches!(reg.surface(&meta.id), SurfaceSlot::Absent));
    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Disconnected);

    factory.fail.set(false);
    let surface = reg
        .recreate_if_needed(&meta.id, WorkspaceType::Whatsapp)
        .unwrap()
        .expect("metadata kept");
    assert_eq!(surface.session_id(), &meta.id);
}

// =============================================================================
// DESTROY / RECREATE
// =============================================================================

#[test]
fn destroy_removes_everything_and_is_safe_twice() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();

    assert!(reg.destroy(&meta.id));
    assert!(factory.latest(&meta.id).unwrap().destroyed.get());
    assert!(reg.metadata(&meta.id).is_none());
    assert!(matches!(reg.surface(&meta.id), SurfaceSlot::Absent));

    assert!(!reg.destroy(&meta.id));
}

#[test]
fn external_destruction_is_reported_as_destroyed() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();

    factory.latest(&meta.id).unwrap().destroyed.set(true);
    assert!(matches!(reg.surface(&meta.id), SurfaceSlot::Destroyed));
}

#[test]
fn recreation_preserves_identity_and_resets_status() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    let original = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    reg.handle_event(finished("a", &original, "https://web.whatsapp.com/"), Instant::now());
    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Connected);

    factory.latest(&meta.id).unwrap().destroyed.set(true);
    let fresh = reg
        .recreate_if_needed(&meta.id, WorkspaceType::Whatsapp)
        .unwrap()
        .unwrap();

    assert_ne!(fresh.id(), original.id());
    assert_eq!(fresh.session_id(), &meta.id);
    assert_eq!(fresh.isolation_key(), meta.partition);
    let stored = reg.metadata(&meta.id).unwrap();
    assert_eq!(stored.partition, meta.partition);
    assert_eq!(stored.status, SessionStatus::Connecting);
}

#[test]
fn recreate_returns_live_surface_unchanged() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    let original = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();

    let same = reg
        .recreate_if_needed(&meta.id, WorkspaceType::Whatsapp)
        .unwrap()
        .unwrap();
    assert_eq!(same.id(), original.id());
    assert_eq!(factory.created_count(), 1);
}

#[test]
fn recreate_unknown_session_is_none() {
    let (mut reg, _) = registry();
    let result = reg
        .recreate_if_needed(&SessionId::from("ghost"), WorkspaceType::Whatsapp)
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn isolation_keys_stay_unique_across_cycles() {
    let (mut reg, factory) = registry();
    let sessions: Vec<_> = (0..5).map(|i| session(&format!("s{i}"), "w1")).collect();

    for round in 0..4 {
        for (i, meta) in sessions.iter().enumerate() {
            match (round + i) % 3 {
                0 => {
                    reg.create_or_get_surface(meta, WorkspaceType::Whatsapp).unwrap();
                }
                1 => {
                    if let Some(s) = factory.latest(&meta.id) {
                        s.destroyed.set(true);
                    }
                    let _ = reg.recreate_if_needed(&meta.id, WorkspaceType::Whatsapp);
                }
                _ => {
                    reg.destroy(&meta.id);
                }
            }
        }

        let keys: Vec<String> = reg.list_all().into_iter().map(|s| s.partition).collect();
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(keys.len(), unique.len(), "round {round}");
    }
}

// =============================================================================
// LISTING
// =============================================================================

#[test]
fn list_by_workspace_filters() {
    let (mut reg, _) = registry();
    for (id, ws) in [("a", "w1"), ("b", "w2"), ("c", "w1")] {
        reg.create_or_get_surface(&session(id, ws), WorkspaceType::Whatsapp)
            .unwrap();
    }
    let ids: Vec<_> = reg
        .list_by_workspace(&WorkspaceId::from("w1"))
        .into_iter()
        .map(|s| s.id.to_string())
        .collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(reg.list_all().len(), 3);
}

// =============================================================================
// STATUS FROM EVENTS
// =============================================================================

#[test]
fn load_lifecycle_drives_status() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    let surface = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    let now = Instant::now();

    reg.handle_event(finished("a", &surface, "https://web.whatsapp.com/"), now);
    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Connected);

    let fake = factory.latest(&meta.id).unwrap();
    assert!(fake.scripts.borrow()[0].contains("wtstation-cosmetic"));

    reg.handle_event(
        SurfaceEvent {
            session_id: meta.id.clone(),
            surface_id: surface.id(),
            kind: SurfaceEventKind::LoadFailed {
                reason: "offline".into(),
            },
        },
        now,
    );
    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Disconnected);

    let changes: Vec<_> = reg.drain_changes().into_iter().map(|c| c.status).collect();
    assert_eq!(
        changes,
        vec![
            SessionStatus::Connecting,
            SessionStatus::Connected,
            SessionStatus::Disconnected
        ]
    );
    assert!(reg.drain_changes().is_empty());
}

#[test]
fn error_page_counts_as_failure() {
    let (mut reg, _) = registry();
    let meta = session("a", "w1");
    let surface = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    reg.handle_event(finished("a", &surface, "chrome-error://chromewebdata/"), Instant::now());
    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Disconnected);
    assert_eq!(reg.poll_probes(Instant::now() + Duration::from_secs(60)), 0);
}

#[test]
fn qr_probe_runs_after_delay_and_sets_qr_pending() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    let surface = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    let t0 = Instant::now();

    reg.handle_event(finished("a", &surface, "https://web.whatsapp.com/"), t0);
    assert_eq!(reg.poll_probes(t0), 0);
    assert_eq!(reg.poll_probes(t0 + QR_PROBE_DELAY - Duration::from_millis(1)), 0);

    assert_eq!(reg.poll_probes(t0 + QR_PROBE_DELAY), 1);
    assert_eq!(factory.latest(&meta.id).unwrap().probes.borrow().len(), 1);

    reg.handle_event(
        SurfaceEvent {
            session_id: meta.id.clone(),
            surface_id: surface.id(),
            kind: SurfaceEventKind::ProbeResult(Some("data:image/png;base64,QR".into())),
        },
        t0 + QR_PROBE_DELAY,
    );
    let stored = reg.metadata(&meta.id).unwrap();
    assert_eq!(stored.status, SessionStatus::QrPending);
    assert_eq!(stored.qr_code.as_deref(), Some("data:image/png;base64,QR"));

    // Scanning makes the QR disappear on the next probe.
    reg.handle_event(
        SurfaceEvent {
            session_id: meta.id.clone(),
            surface_id: surface.id(),
            kind: SurfaceEventKind::ProbeResult(None),
        },
        t0 + Duration::from_secs(10),
    );
    let stored = reg.metadata(&meta.id).unwrap();
    assert_eq!(stored.status, SessionStatus::Connected);
    assert!(stored.qr_code.is_none());
}

#[test]
fn telegram_never_probes() {
    let (mut reg, factory) = registry();
    let meta = session("t", "w9");
    let surface = reg.create_or_get_surface(&meta, WorkspaceType::Telegram).unwrap();
    let t0 = Instant::now();
    reg.handle_event(finished("t", &surface, "https://web.telegram.org/"), t0);

    assert_eq!(reg.poll_probes(t0 + Duration::from_secs(60)), 0);
    let fake = factory.latest(&meta.id).unwrap();
    assert!(fake.scripts.borrow().is_empty());
}

#[test]
fn events_from_replaced_surface_are_ignored() {
    let (mut reg, factory) = registry();
    let meta = session("a", "w1");
    let old = reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    factory.latest(&meta.id).unwrap().destroyed.set(true);
    reg.recreate_if_needed(&meta.id, WorkspaceType::Whatsapp).unwrap();

    reg.handle_event(finished("a", &old, "https://web.whatsapp.com/"), Instant::now());
    assert_eq!(reg.metadata(&meta.id).unwrap().status, SessionStatus::Connecting);
}

#[test]
fn touch_updates_last_active() {
    let (mut reg, _) = registry();
    let meta = session("a", "w1");
    reg.create_or_get_surface(&meta, WorkspaceType::Whatsapp).unwrap();
    reg.touch(&meta.id, 42);
    assert_eq!(reg.metadata(&meta.id).unwrap().last_active_at, 42);
}
