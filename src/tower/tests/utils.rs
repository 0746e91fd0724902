use crate::aircraft::{Aircraft, AircraftCharacteristics, AircraftHandle};
use crate::queue::AircraftQueue;
use crate::terminal::{Gate, Terminal, TerminalKind};
use crate::tower::ControlTower;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn aircraft(
    callsign: &str,
    characteristics: AircraftCharacteristics,
    tasks: &str,
    fuel_percent: u32,
) -> AircraftHandle {
    let fuel = characteristics.fuel_capacity() * fuel_percent as f64 / 100.0;
    Aircraft::new(callsign, characteristics, tasks.parse().unwrap(), fuel, 0)
        .unwrap()
        .into()
}

pub fn plane(callsign: &str, tasks: &str) -> AircraftHandle {
    aircraft(callsign, AircraftCharacteristics::AirbusA320, tasks, 50)
}

pub fn freighter(callsign: &str, tasks: &str) -> AircraftHandle {
    aircraft(callsign, AircraftCharacteristics::Boeing7478F, tasks, 50)
}

pub fn helicopter(callsign: &str, tasks: &str) -> AircraftHandle {
    aircraft(callsign, AircraftCharacteristics::RobinsonR44, tasks, 50)
}

pub fn terminal(kind: TerminalKind, number: u32, gates: u32) -> Terminal {
    let mut terminal = Terminal::new(kind, number);
    for n in 1..=gates {
        terminal.add_gate(Gate::new(n)).unwrap();
    }
    terminal
}

pub fn empty_tower(ticks_elapsed: u64) -> ControlTower {
    ControlTower::new(
        ticks_elapsed,
        vec![],
        Default::default(),
        Default::default(),
        BTreeMap::new(),
    )
}

pub fn tower(terminals: Vec<Terminal>, aircraft: Vec<AircraftHandle>) -> ControlTower {
    let mut tower = empty_tower(0);
    terminals.into_iter().for_each(|t| tower.add_terminal(t));
    for a in aircraft {
        tower.add_aircraft(a).unwrap();
    }
    tower
}

pub fn landing(tower: &ControlTower) -> Vec<Arc<str>> {
    tower
        .landing_queue()
        .aircraft_in_order()
        .iter()
        .map(|a| a.callsign().clone())
        .collect()
}

pub fn takeoff(tower: &ControlTower) -> Vec<Arc<str>> {
    tower
        .takeoff_queue()
        .aircraft_in_order()
        .iter()
        .map(|a| a.callsign().clone())
        .collect()
}

pub fn loading(tower: &ControlTower) -> Vec<(Arc<str>, u32)> {
    tower
        .loading_aircraft()
        .iter()
        .map(|(a, ticks)| (a.callsign().clone(), *ticks))
        .collect()
}

pub fn handle(tower: &ControlTower, callsign: &str) -> AircraftHandle {
    tower.find_aircraft(callsign).unwrap().clone()
}

pub fn arb_tasks() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("AWAY,LAND,WAIT,LOAD@60,TAKEOFF"),
        Just("LAND,LOAD@100,TAKEOFF,AWAY"),
        Just("WAIT,WAIT,LOAD@20,TAKEOFF,AWAY,AWAY,LAND"),
        Just("TAKEOFF,AWAY,LAND,WAIT,LOAD@5"),
        Just("LOAD@80,TAKEOFF,AWAY,LAND"),
        Just("AWAY"),
    ]
}

pub fn arb_characteristics() -> impl Strategy<Value = AircraftCharacteristics> {
    prop_oneof![
        Just(AircraftCharacteristics::AirbusA320),
        Just(AircraftCharacteristics::Boeing7478F),
        Just(AircraftCharacteristics::Fokker100),
        Just(AircraftCharacteristics::RobinsonR44),
        Just(AircraftCharacteristics::SikorskySkycrane),
    ]
}
