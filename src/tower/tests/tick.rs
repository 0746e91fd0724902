use crate::aircraft::{Aircraft, AircraftCharacteristics, AircraftHandle};
use crate::error::TowerError;
use crate::queue::{AircraftQueue, LandingQueue, TakeoffQueue};
use crate::task::TaskType::{Away, Land, Load, Takeoff, Wait};
use crate::terminal::TerminalKind::{AirplaneTerminal, HelicopterTerminal};
use crate::tower::ControlTower;
use crate::tower::tests::utils::{
    empty_tower, handle, helicopter, id, landing, loading, plane, takeoff, terminal, tower,
};
use std::collections::BTreeMap;

#[test]
fn test_first_landing_on_second_tick() {
    let tasks = "LAND,WAIT,LOAD@75,TAKEOFF,AWAY,AWAY".parse().unwrap();
    let qfa = AircraftHandle::new(
        Aircraft::new("QFA481", AircraftCharacteristics::AirbusA320, tasks, 13_600.0, 140).unwrap(),
    );
    let mut tower = tower(vec![terminal(AirplaneTerminal, 1, 1)], vec![qfa.clone()]);
    assert_eq!(vec![id("QFA481")], landing(&tower));

    tower.tick().unwrap();
    assert_eq!(Land, qfa.current_task());
    assert_eq!(vec![id("QFA481")], landing(&tower));
    assert_eq!(None, tower.find_gate_of_aircraft(&qfa));
    assert_eq!(1, tower.ticks_elapsed());

    tower.tick().unwrap();
    assert_eq!(Wait, qfa.current_task());
    assert!(landing(&tower).is_empty());
    assert!(tower.find_gate_of_aircraft(&qfa).is_some());
    assert_eq!(0, qfa.borrow().cargo());
    assert_eq!(2, tower.ticks_elapsed());
}

#[test]
fn test_full_lifecycle() {
    let qfa = plane("QFA481", "LAND,WAIT,LOAD@75,TAKEOFF,AWAY,AWAY");
    let mut tower = tower(vec![terminal(AirplaneTerminal, 1, 1)], vec![qfa.clone()]);
    tower.tick().unwrap();
    tower.tick().unwrap();

    // WAIT completes by itself, 113 passengers take two ticks to board
    tower.tick().unwrap();
    assert_eq!(Load, qfa.current_task());
    assert_eq!(vec![(id("QFA481"), 2)], loading(&tower));

    tower.tick().unwrap();
    assert_eq!(vec![(id("QFA481"), 1)], loading(&tower));
    assert_eq!(113, qfa.borrow().cargo());
    assert_eq!(100, qfa.borrow().fuel_percent_remaining());

    tower.tick().unwrap();
    assert_eq!(Takeoff, qfa.current_task());
    assert!(loading(&tower).is_empty());
    assert_eq!(None, tower.find_gate_of_aircraft(&qfa));
    assert_eq!(vec![id("QFA481")], takeoff(&tower));

    tower.tick().unwrap();
    assert_eq!(Away, qfa.current_task());
    assert!(takeoff(&tower).is_empty());

    tower.tick().unwrap();
    tower.tick().unwrap();
    assert_eq!(Land, qfa.current_task());
    assert_eq!(vec![id("QFA481")], landing(&tower));
    assert_eq!(80, qfa.borrow().fuel_percent_remaining());
    assert_eq!(8, tower.ticks_elapsed());
}

#[test]
fn test_successful_landing_tick_lands_twice() {
    let mut tower = tower(
        vec![terminal(AirplaneTerminal, 1, 2)],
        vec![
            plane("QFA481", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY"),
            plane("UTD302", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY"),
            plane("VH-BFK", "TAKEOFF,AWAY,AWAY,LAND,LOAD@10"),
            plane("VH-XYZ", "TAKEOFF,AWAY,AWAY,LAND,LOAD@10"),
        ],
    );

    tower.tick().unwrap();
    assert_eq!(vec![id("VH-XYZ")], takeoff(&tower));

    tower.tick().unwrap();
    assert!(landing(&tower).is_empty());
    assert_eq!(Wait, handle(&tower, "QFA481").current_task());
    assert_eq!(Wait, handle(&tower, "UTD302").current_task());
    // both landings used the runway, nobody took off
    assert_eq!(vec![id("VH-XYZ")], takeoff(&tower));
}

#[test]
fn test_failed_landing_falls_back_to_takeoff() {
    let mut tower = tower(
        vec![terminal(HelicopterTerminal, 1, 2)],
        vec![
            plane("QFA481", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY"),
            plane("VH-BFK", "TAKEOFF,AWAY,AWAY,LAND,LOAD@10"),
            plane("VH-XYZ", "TAKEOFF,AWAY,AWAY,LAND,LOAD@10"),
        ],
    );

    tower.tick().unwrap();
    tower.tick().unwrap();
    assert_eq!(vec![id("QFA481")], landing(&tower));
    assert!(takeoff(&tower).is_empty());
    assert_eq!(Away, handle(&tower, "VH-XYZ").current_task());
}

#[test]
fn test_single_landing_then_fallback_only_when_nothing_lands() {
    let mut tower = tower(
        vec![terminal(AirplaneTerminal, 1, 1)],
        vec![
            plane("QFA481", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY"),
            plane("UTD302", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY"),
            plane("VH-BFK", "TAKEOFF,AWAY,AWAY,LAND,LOAD@10"),
            plane("VH-XYZ", "TAKEOFF,AWAY,AWAY,LAND,LOAD@10"),
        ],
    );

    tower.tick().unwrap();
    tower.tick().unwrap();
    // one gate: first landing succeeds, second finds no gate
    assert_eq!(vec![id("UTD302")], landing(&tower));
    assert_eq!(vec![id("VH-XYZ")], takeoff(&tower));
}

#[test]
fn test_odd_ticks_only_take_off() {
    let mut tower = tower(
        vec![terminal(AirplaneTerminal, 1, 3)],
        vec![plane("QFA481", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY")],
    );
    tower.tick().unwrap();
    assert_eq!(vec![id("QFA481")], landing(&tower));
    tower.tick().unwrap();
    tower.tick().unwrap();
    assert_eq!(Load, handle(&tower, "QFA481").current_task());
}

#[test]
fn test_alternation_counts_from_construction() {
    let qfa = plane("QFA481", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY");
    let mut tower = empty_tower(7);
    tower.add_terminal(terminal(AirplaneTerminal, 1, 1));
    tower.add_aircraft(qfa.clone()).unwrap();

    tower.tick().unwrap();
    assert_eq!(Land, qfa.current_task());
    tower.tick().unwrap();
    assert_eq!(Wait, qfa.current_task());
    assert_eq!(9, tower.ticks_elapsed());
}

#[test]
fn test_away_and_wait_advance_every_tick() {
    let away = plane("AWAY01", "AWAY,AWAY,AWAY,LAND,LOAD@10,TAKEOFF");
    let heli = helicopter("HELI01", "WAIT,WAIT,LOAD@50,TAKEOFF,AWAY,LAND");
    let mut tower = tower(
        vec![terminal(HelicopterTerminal, 1, 1)],
        vec![away.clone(), heli.clone()],
    );

    tower.tick().unwrap();
    assert_eq!(1, away.borrow().task_list().position());
    assert_eq!(1, heli.borrow().task_list().position());

    tower.tick().unwrap();
    assert_eq!(Away, away.current_task());
    assert_eq!(Load, heli.current_task());
    assert_eq!(vec![(id("HELI01"), 1)], loading(&tower));

    tower.tick().unwrap();
    assert_eq!(Land, away.current_task());
    assert_eq!(Takeoff, heli.current_task());
}

#[test]
fn test_refiling_is_idempotent() {
    let mut tower = tower(
        vec![terminal(AirplaneTerminal, 1, 2)],
        vec![
            plane("QFA481", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY"),
            plane("VH-BFK", "TAKEOFF,AWAY,LAND,LOAD@10"),
            plane("UTD302", "LOAD@10,TAKEOFF,AWAY,LAND"),
        ],
    );
    tower.place_all_aircraft_in_queues();
    tower.place_all_aircraft_in_queues();

    assert_eq!(vec![id("QFA481")], landing(&tower));
    assert_eq!(vec![id("VH-BFK")], takeoff(&tower));
    assert_eq!(vec![(id("UTD302"), 1)], loading(&tower));
    assert_eq!(
        "ControlTower: 1 terminals, 3 total aircraft (1 LAND, 1 TAKEOFF, 1 LOAD)",
        tower.to_string()
    );
}

#[test]
fn test_encode_queues() {
    let tower = tower(
        vec![terminal(AirplaneTerminal, 1, 2)],
        vec![
            plane("QFA481", "LAND,WAIT,LOAD@10,TAKEOFF,AWAY"),
            plane("UTD302", "LOAD@10,TAKEOFF,AWAY,LAND"),
        ],
    );
    assert_eq!(
        "LandingQueue:1\nQFA481\nTakeoffQueue:0\n\nLoadingAircraft:1\nUTD302:1",
        tower.encode_queues()
    );

    let snapshot = tower.snapshot();
    assert_eq!(vec![id("QFA481")], snapshot.landing);
    assert_eq!(vec![(id("UTD302"), 1)], snapshot.loading);
    assert_eq!(2, snapshot.aircraft);
}

#[test]
fn test_loader_without_gate_is_invariant_violation() {
    let loader = plane("UTD302", "LOAD@10,TAKEOFF,AWAY,LAND");
    let mut loading_aircraft = BTreeMap::new();
    loading_aircraft.insert(loader.clone(), 1);
    let mut tower = ControlTower::new(
        0,
        vec![loader],
        LandingQueue::new(),
        TakeoffQueue::new(),
        loading_aircraft,
    );
    tower.add_terminal(terminal(AirplaneTerminal, 1, 1));

    assert!(matches!(
        tower.tick(),
        Err(TowerError::InvariantViolation(_))
    ));
}

#[test]
fn test_constructed_queues_are_used() {
    let qfa = plane("QFA481", "TAKEOFF,AWAY,LAND,LOAD@10");
    let takeoff_queue = [qfa.clone()].into_iter().collect::<TakeoffQueue>();
    let mut tower = ControlTower::new(
        3,
        vec![qfa.clone()],
        LandingQueue::new(),
        takeoff_queue,
        BTreeMap::new(),
    );

    tower.tick().unwrap();
    assert_eq!(Away, qfa.current_task());
    assert!(tower.takeoff_queue().is_empty());
}
