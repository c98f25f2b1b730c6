use spycat_core::db::open_db_in_memory;
use spycat_core::{
    AgencyStore, ErrorKind, StaticBreedDirectory, StoreError, TargetDraft, TargetPatch,
};

fn store() -> AgencyStore<StaticBreedDirectory> {
    let conn = open_db_in_memory().unwrap();
    AgencyStore::new(conn, StaticBreedDirectory::new())
}

fn draft(name: &str, country: &str) -> TargetDraft {
    TargetDraft {
        name: name.to_string(),
        country: country.to_string(),
        notes: String::new(),
    }
}

fn notes(text: &str) -> TargetPatch {
    TargetPatch {
        notes: Some(text.to_string()),
        complete: None,
    }
}

fn complete() -> TargetPatch {
    TargetPatch {
        notes: None,
        complete: Some(true),
    }
}

#[test]
fn notes_can_be_updated_while_incomplete() {
    let mut store = store();
    let mission = store.create_mission(&[draft("Courier", "IT")]).unwrap();
    let target_id = mission.targets[0].id;

    let updated = store.update_target(target_id, &notes("spotted at the station")).unwrap();
    assert_eq!(updated.notes, "spotted at the station");
    assert!(!updated.complete);

    let reloaded = store.get_mission(mission.id).unwrap();
    assert_eq!(reloaded.targets[0].notes, "spotted at the station");
}

#[test]
fn empty_patch_is_a_no_op() {
    let mut store = store();
    let mission = store.create_mission(&[draft("Quiet", "SE")]).unwrap();
    let target = &mission.targets[0];

    let result = store
        .update_target(target.id, &TargetPatch::default())
        .unwrap();
    assert_eq!(&result, target);
}

#[test]
fn completing_a_non_last_target_leaves_the_mission_open() {
    let mut store = store();
    let mission = store
        .create_mission(&[draft("T1", "US"), draft("T2", "FR")])
        .unwrap();

    store.update_target(mission.targets[0].id, &complete()).unwrap();

    let reloaded = store.get_mission(mission.id).unwrap();
    assert!(!reloaded.complete);
    assert!(reloaded.targets[0].complete);
    assert!(!reloaded.targets[1].complete);
}

#[test]
fn completing_the_last_target_completes_the_mission_atomically() {
    let mut store = store();
    let mission = store
        .create_mission(&[draft("T1", "US"), draft("T2", "FR")])
        .unwrap();

    store.update_target(mission.targets[0].id, &complete()).unwrap();
    let last = store.update_target(mission.targets[1].id, &complete()).unwrap();
    assert!(last.complete);

    let reloaded = store.get_mission(mission.id).unwrap();
    assert!(reloaded.complete);
    assert!(!reloaded.is_active());
}

#[test]
fn completed_target_rejects_further_updates() {
    let mut store = store();
    let mission = store
        .create_mission(&[draft("Done", "UK"), draft("Open", "UK")])
        .unwrap();
    let done_id = mission.targets[0].id;

    store.update_target(done_id, &complete()).unwrap();

    let err = store.update_target(done_id, &notes("too late")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(err, StoreError::CompletedTargetImmutable(id) if id == done_id));

    let reloaded = store.get_mission(mission.id).unwrap();
    assert_eq!(reloaded.targets[0].notes, "");
}

#[test]
fn completed_mission_freezes_all_its_targets() {
    let mut store = store();
    let mission = store
        .create_mission(&[draft("T1", "US"), draft("T2", "FR")])
        .unwrap();
    let first_id = mission.targets[0].id;
    let second_id = mission.targets[1].id;

    store.update_target(first_id, &complete()).unwrap();
    store.update_target(second_id, &complete()).unwrap();

    // The first target was already frozen by its own completion; the guard
    // on the owning mission is what blocks any target of a closed mission.
    let err = store.update_target(first_id, &notes("reopen")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(
        err,
        StoreError::CompletedMissionImmutable(id) if id == mission.id
    ));

    let reloaded = store.get_mission(mission.id).unwrap();
    assert_eq!(reloaded.targets[0].notes, "");
    assert!(reloaded.targets[0].complete);
}

#[test]
fn notes_and_completion_can_land_in_one_patch() {
    let mut store = store();
    let mission = store.create_mission(&[draft("Solo", "JP")]).unwrap();

    let updated = store
        .update_target(
            mission.targets[0].id,
            &TargetPatch {
                notes: Some("wrapped up".to_string()),
                complete: Some(true),
            },
        )
        .unwrap();
    assert_eq!(updated.notes, "wrapped up");
    assert!(updated.complete);

    // Sole target completed, so the mission closed in the same operation.
    assert!(store.get_mission(mission.id).unwrap().complete);
}

#[test]
fn unknown_target_returns_not_found() {
    let mut store = store();
    let err = store.update_target(404, &notes("ghost")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, StoreError::TargetNotFound(404)));
}

#[test]
fn marking_complete_false_does_not_close_the_mission() {
    let mut store = store();
    let mission = store.create_mission(&[draft("Solo", "BR")]).unwrap();

    let updated = store
        .update_target(
            mission.targets[0].id,
            &TargetPatch {
                notes: None,
                complete: Some(false),
            },
        )
        .unwrap();
    assert!(!updated.complete);
    assert!(!store.get_mission(mission.id).unwrap().complete);
}
