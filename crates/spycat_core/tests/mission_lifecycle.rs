use spycat_core::db::{open_db, open_db_in_memory};
use spycat_core::{
    AgencyStore, ErrorKind, NewCat, StaticBreedDirectory, StoreError, TargetDraft, TargetPatch,
};
use std::sync::{Arc, Barrier};
use std::thread;

fn store() -> AgencyStore<StaticBreedDirectory> {
    let conn = open_db_in_memory().unwrap();
    let breeds = StaticBreedDirectory::with_breeds(["Siamese", "Bengal"]);
    AgencyStore::new(conn, breeds)
}

fn cat(store: &mut AgencyStore<StaticBreedDirectory>, name: &str) -> spycat_core::Cat {
    store
        .create_cat(&NewCat {
            name: name.to_string(),
            years_of_experience: 1,
            breed: "Siamese".to_string(),
            salary: 2500.0,
        })
        .unwrap()
}

fn targets(count: usize) -> Vec<TargetDraft> {
    (0..count)
        .map(|i| TargetDraft {
            name: format!("Target {i}"),
            country: "US".to_string(),
            notes: String::new(),
        })
        .collect()
}

fn complete_all_targets(store: &mut AgencyStore<StaticBreedDirectory>, mission_id: i64) {
    let mission = store.get_mission(mission_id).unwrap();
    for target in mission.targets {
        store
            .update_target(
                target.id,
                &TargetPatch {
                    notes: None,
                    complete: Some(true),
                },
            )
            .unwrap();
    }
}

#[test]
fn mission_is_created_with_its_targets_unassigned_and_incomplete() {
    let mut store = store();

    let mission = store.create_mission(&targets(2)).unwrap();
    assert_eq!(mission.cat_id, None);
    assert!(!mission.complete);
    assert!(mission.is_active());
    assert_eq!(mission.targets.len(), 2);
    assert!(mission.targets.iter().all(|t| !t.complete));
    assert!(mission.targets.iter().all(|t| t.mission_id == mission.id));

    let loaded = store.get_mission(mission.id).unwrap();
    assert_eq!(loaded, mission);
}

#[test]
fn target_count_must_be_between_one_and_three() {
    let mut store = store();

    for count in [0, 4, 7] {
        let err = store.create_mission(&targets(count)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err, StoreError::TargetCountOutOfRange(c) if c == count));
    }
    assert!(store.list_missions().unwrap().is_empty());

    for count in [1, 2, 3] {
        let mission = store.create_mission(&targets(count)).unwrap();
        assert_eq!(mission.targets.len(), count);
    }
}

#[test]
fn list_missions_materializes_targets() {
    let mut store = store();
    let first = store.create_mission(&targets(1)).unwrap();
    let second = store.create_mission(&targets(3)).unwrap();

    let missions = store.list_missions().unwrap();
    assert_eq!(missions.len(), 2);
    assert_eq!(missions[0].id, first.id);
    assert_eq!(missions[0].targets.len(), 1);
    assert_eq!(missions[1].id, second.id);
    assert_eq!(missions[1].targets.len(), 3);
}

#[test]
fn assignment_requires_existing_mission_and_cat() {
    let mut store = store();
    let mission = store.create_mission(&targets(1)).unwrap();
    let agent = cat(&mut store, "Agent");

    let err = store.assign_mission(999, agent.id).unwrap_err();
    assert!(matches!(err, StoreError::MissionNotFound(999)));

    let err = store.assign_mission(mission.id, 999).unwrap_err();
    assert!(matches!(err, StoreError::CatNotFound(999)));
}

#[test]
fn cat_holds_at_most_one_active_mission() {
    let mut store = store();
    let agent = cat(&mut store, "Exclusive");
    let first = store.create_mission(&targets(1)).unwrap();
    let second = store.create_mission(&targets(1)).unwrap();

    store.assign_mission(first.id, agent.id).unwrap();

    let err = store.assign_mission(second.id, agent.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(
        err,
        StoreError::CatOnActiveMission { cat_id, mission_id }
            if cat_id == agent.id && mission_id == first.id
    ));
    assert_eq!(store.get_mission(second.id).unwrap().cat_id, None);
}

#[test]
fn reassigning_the_same_mission_is_idempotent() {
    let mut store = store();
    let agent = cat(&mut store, "Steady");
    let mission = store.create_mission(&targets(1)).unwrap();

    store.assign_mission(mission.id, agent.id).unwrap();
    store.assign_mission(mission.id, agent.id).unwrap();
    assert_eq!(store.get_mission(mission.id).unwrap().cat_id, Some(agent.id));
}

#[test]
fn completed_mission_frees_the_cat_for_a_new_one() {
    let mut store = store();
    let agent = cat(&mut store, "Serial");
    let first = store.create_mission(&targets(1)).unwrap();
    let second = store.create_mission(&targets(1)).unwrap();

    store.assign_mission(first.id, agent.id).unwrap();
    complete_all_targets(&mut store, first.id);
    assert!(store.get_mission(first.id).unwrap().complete);

    store.assign_mission(second.id, agent.id).unwrap();

    // The completed mission keeps its historical assignee.
    assert_eq!(store.get_mission(first.id).unwrap().cat_id, Some(agent.id));
    assert_eq!(store.get_mission(second.id).unwrap().cat_id, Some(agent.id));
}

#[test]
fn assignment_can_be_handed_over_to_another_cat() {
    let mut store = store();
    let first_cat = cat(&mut store, "First");
    let second_cat = cat(&mut store, "Second");
    let mission = store.create_mission(&targets(1)).unwrap();

    store.assign_mission(mission.id, first_cat.id).unwrap();
    store.assign_mission(mission.id, second_cat.id).unwrap();

    assert_eq!(
        store.get_mission(mission.id).unwrap().cat_id,
        Some(second_cat.id)
    );
    // The handover frees the first cat.
    let other = store.create_mission(&targets(1)).unwrap();
    store.assign_mission(other.id, first_cat.id).unwrap();
}

#[test]
fn delete_is_blocked_while_assigned_even_after_completion() {
    let mut store = store();
    let agent = cat(&mut store, "Anchor");
    let mission = store.create_mission(&targets(1)).unwrap();
    store.assign_mission(mission.id, agent.id).unwrap();

    let err = store.delete_mission(mission.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    complete_all_targets(&mut store, mission.id);
    assert!(store.get_mission(mission.id).unwrap().complete);

    let err = store.delete_mission(mission.id).unwrap_err();
    assert!(matches!(
        err,
        StoreError::MissionStillAssigned { mission_id, cat_id }
            if mission_id == mission.id && cat_id == agent.id
    ));
    assert!(store.get_mission(mission.id).is_ok());
}

#[test]
fn deleting_an_unassigned_mission_cascades_to_targets() {
    let mut store = store();
    let mission = store.create_mission(&targets(3)).unwrap();
    let target_id = mission.targets[0].id;

    store.delete_mission(mission.id).unwrap();

    assert!(matches!(
        store.get_mission(mission.id).unwrap_err(),
        StoreError::MissionNotFound(_)
    ));
    let err = store
        .update_target(target_id, &TargetPatch::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::TargetNotFound(id) if id == target_id));
}

#[test]
fn concurrent_assigners_for_one_cat_yield_a_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agency.db");

    let mut setup = AgencyStore::new(
        open_db(&path).unwrap(),
        StaticBreedDirectory::with_breeds(["Siamese"]),
    );
    let cat_id = cat(&mut setup, "Contested").id;
    let first = setup.create_mission(&targets(1)).unwrap();
    let second = setup.create_mission(&targets(1)).unwrap();
    drop(setup);

    // Two stores on separate connections race for the same cat; the write
    // lock serializes them, so the loser must observe the winner's commit.
    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for mission_id in [first.id, second.id] {
        let barrier = Arc::clone(&barrier);
        let path = path.clone();
        handles.push(thread::spawn(move || {
            let mut store = AgencyStore::new(open_db(&path).unwrap(), StaticBreedDirectory::new());
            barrier.wait();
            store.assign_mission(mission_id, cat_id)
        }));
    }

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    let wins = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(wins, 1, "exactly one assigner must win");
    let conflict = results.into_iter().find_map(Result::err).unwrap();
    assert!(matches!(
        conflict,
        StoreError::CatOnActiveMission { cat_id: loser, .. } if loser == cat_id
    ));

    let mut check = AgencyStore::new(open_db(&path).unwrap(), StaticBreedDirectory::new());
    let assigned = check
        .list_missions()
        .unwrap()
        .into_iter()
        .filter(|mission| mission.cat_id == Some(cat_id))
        .count();
    assert_eq!(assigned, 1);
}

#[test]
fn delete_unknown_mission_returns_not_found() {
    let mut store = store();
    let err = store.delete_mission(12).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
