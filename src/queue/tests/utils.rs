use crate::aircraft::{Aircraft, AircraftCharacteristics, AircraftHandle};
use crate::queue::AircraftQueue;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

fn aircraft(
    callsign: &str,
    characteristics: AircraftCharacteristics,
    fuel_percent: u32,
    emergency: bool,
) -> AircraftHandle {
    let tasks = "LAND,WAIT,LOAD@50,TAKEOFF,AWAY".parse().unwrap();
    let fuel = characteristics.fuel_capacity() * fuel_percent as f64 / 100.0;
    let mut aircraft = Aircraft::new(callsign, characteristics, tasks, fuel, 0).unwrap();
    if emergency {
        aircraft.declare_emergency();
    }
    AircraftHandle::new(aircraft)
}

pub fn passenger(callsign: &str, fuel_percent: u32) -> AircraftHandle {
    aircraft(callsign, AircraftCharacteristics::AirbusA320, fuel_percent, false)
}

pub fn freight(callsign: &str, fuel_percent: u32) -> AircraftHandle {
    aircraft(callsign, AircraftCharacteristics::Boeing7478F, fuel_percent, false)
}

pub fn emergency(callsign: &str, fuel_percent: u32) -> AircraftHandle {
    aircraft(callsign, AircraftCharacteristics::Boeing7478F, fuel_percent, true)
}

pub fn callsigns(aircraft: &[AircraftHandle]) -> Vec<Arc<str>> {
    aircraft.iter().map(|a| a.callsign().clone()).collect()
}

pub fn fill<Q: AircraftQueue>(queue: &mut Q, aircraft: &[AircraftHandle]) {
    aircraft.iter().for_each(|a| queue.add_aircraft(a.clone()));
}

pub fn peek_callsign<Q: AircraftQueue>(queue: &Q) -> Option<Arc<str>> {
    queue.peek_aircraft().map(|a| a.callsign().clone())
}

/// (emergency, fuel percent, passenger)
pub fn arb_profile() -> impl Strategy<Value = (bool, u32, bool)> {
    (
        prop_oneof![Just(false), Just(false), Just(true)],
        prop_oneof![0..=20u32, 21..=100u32],
        prop_oneof![Just(true), Just(false)],
    )
}

pub fn build(index: usize, (is_emergency, fuel, is_passenger): (bool, u32, bool)) -> AircraftHandle {
    let callsign = format!("AC{:02}", index);
    match (is_emergency, is_passenger) {
        (true, true) => {
            let a = passenger(&callsign, fuel);
            a.borrow_mut().declare_emergency();
            a
        }
        (true, false) => emergency(&callsign, fuel),
        (false, true) => passenger(&callsign, fuel),
        (false, false) => freight(&callsign, fuel),
    }
}
