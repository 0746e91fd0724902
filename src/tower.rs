use crate::aircraft::{Aircraft, AircraftHandle, Callsign};
use crate::error::{Result, TowerError};
use crate::queue::{AircraftQueue, LandingQueue, TakeoffQueue};
use crate::task::TaskType;
use crate::terminal::Terminal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Position of a gate: index of the terminal in the tower, then index of the
/// gate in that terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateLocation {
    pub terminal: usize,
    pub gate: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TowerSnapshot {
    pub ticks_elapsed: u64,
    pub terminals: usize,
    pub aircraft: usize,
    pub landing: Vec<Callsign>,
    pub takeoff: Vec<Callsign>,
    pub loading: Vec<(Callsign, u32)>,
}

pub struct ControlTower {
    aircraft: Vec<AircraftHandle>,
    terminals: Vec<Terminal>,
    ticks_elapsed: u64,
    ticks_at_commencement: u64,
    landing_queue: LandingQueue,
    takeoff_queue: TakeoffQueue,
    loading_aircraft: BTreeMap<AircraftHandle, u32>,
}

impl ControlTower {
    pub fn new(
        ticks_elapsed: u64,
        aircraft: Vec<AircraftHandle>,
        landing_queue: LandingQueue,
        takeoff_queue: TakeoffQueue,
        loading_aircraft: BTreeMap<AircraftHandle, u32>,
    ) -> ControlTower {
        ControlTower {
            aircraft,
            terminals: Vec::new(),
            ticks_elapsed,
            ticks_at_commencement: ticks_elapsed,
            landing_queue,
            takeoff_queue,
            loading_aircraft,
        }
    }

    pub fn add_terminal(&mut self, terminal: Terminal) {
        self.terminals.push(terminal);
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn terminal_mut(&mut self, index: usize) -> Option<&mut Terminal> {
        self.terminals.get_mut(index)
    }

    /// Takes the aircraft under this tower's control. An aircraft that is
    /// already on the ground (WAIT or LOAD) is parked at the first suitable
    /// gate.
    pub fn add_aircraft(&mut self, aircraft: AircraftHandle) -> Result<()> {
        if matches!(aircraft.current_task(), TaskType::Wait | TaskType::Load) {
            let location = self
                .find_unoccupied_gate(&aircraft.borrow())
                .ok_or_else(|| TowerError::NoSuitableGate(aircraft.callsign().clone()))?;
            self.park_at(location, &aircraft)?;
        }
        self.aircraft.push(aircraft.clone());
        self.place_aircraft_in_queues(&aircraft);
        Ok(())
    }

    pub fn aircraft(&self) -> &[AircraftHandle] {
        &self.aircraft
    }

    pub fn find_aircraft(&self, callsign: &str) -> Option<&AircraftHandle> {
        self.aircraft.iter().find(|a| &**a.callsign() == callsign)
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    pub fn landing_queue(&self) -> &LandingQueue {
        &self.landing_queue
    }

    pub fn takeoff_queue(&self) -> &TakeoffQueue {
        &self.takeoff_queue
    }

    pub fn loading_aircraft(&self) -> &BTreeMap<AircraftHandle, u32> {
        &self.loading_aircraft
    }

    /// First unoccupied gate in a terminal that takes this kind of aircraft
    /// and is not in an emergency. Terminals are searched in the order they
    /// were added.
    pub fn find_unoccupied_gate(&self, aircraft: &Aircraft) -> Option<GateLocation> {
        self.terminals
            .iter()
            .enumerate()
            .filter(|(_, t)| t.accepts_category(aircraft.category()) && !t.has_emergency())
            .find_map(|(terminal, t)| {
                t.find_unoccupied_gate()
                    .map(|gate| GateLocation { terminal, gate })
            })
    }

    pub fn find_gate_of_aircraft(&self, aircraft: &AircraftHandle) -> Option<GateLocation> {
        self.terminals
            .iter()
            .enumerate()
            .find_map(|(terminal, t)| {
                t.gates()
                    .iter()
                    .position(|g| g.aircraft_at_gate() == Some(aircraft))
                    .map(|gate| GateLocation { terminal, gate })
            })
    }

    fn park_at(&mut self, location: GateLocation, aircraft: &AircraftHandle) -> Result<()> {
        let gate = self
            .terminals
            .get_mut(location.terminal)
            .and_then(|t| t.gate_mut(location.gate))
            .ok_or_else(|| {
                TowerError::InvariantViolation(format!("no gate at {:?}", location))
            })?;
        gate.park_aircraft(aircraft.clone()).map_err(|e| {
            warn!(callsign = %aircraft.callsign(), ?location, "gate found unoccupied refused aircraft");
            TowerError::InvariantViolation(format!(
                "unoccupied gate refused {}: {}",
                aircraft.callsign(),
                e
            ))
        })
    }

    /// Lands the highest priority aircraft in the landing queue if a gate is
    /// free for it. Returns whether an aircraft landed.
    pub fn try_land_aircraft(&mut self) -> Result<bool> {
        let Some(aircraft) = self.landing_queue.peek_aircraft().cloned() else {
            return Ok(false);
        };
        let Some(location) = self.find_unoccupied_gate(&aircraft.borrow()) else {
            debug!(callsign = %aircraft.callsign(), "no suitable gate, landing deferred");
            return Ok(false);
        };

        self.landing_queue.remove_aircraft();
        self.park_at(location, &aircraft)?;
        let mut landed = aircraft.borrow_mut();
        landed.unload();
        landed.task_list_mut().advance();
        debug!(callsign = %aircraft.callsign(), ?location, "landed");
        Ok(true)
    }

    pub fn try_take_off_aircraft(&mut self) {
        if let Some(aircraft) = self.takeoff_queue.remove_aircraft() {
            aircraft.advance_task();
            debug!(callsign = %aircraft.callsign(), "took off");
        }
    }

    /// Counts down every loading aircraft. Aircraft that finish leave their
    /// gate and move on to their next task.
    pub fn load_aircraft(&mut self) -> Result<()> {
        let mut finished = Vec::new();
        for (aircraft, remaining) in self.loading_aircraft.iter_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                finished.push(aircraft.clone());
            }
        }

        for aircraft in finished {
            self.loading_aircraft.remove(&aircraft);
            let location = self.find_gate_of_aircraft(&aircraft).ok_or_else(|| {
                warn!(callsign = %aircraft.callsign(), "loaded aircraft is not at any gate");
                TowerError::InvariantViolation(format!(
                    "{} finished loading but is not parked at a gate",
                    aircraft.callsign()
                ))
            })?;
            if let Some(gate) = self.terminals[location.terminal].gate_mut(location.gate) {
                gate.aircraft_leaves();
            }
            aircraft.advance_task();
            debug!(callsign = %aircraft.callsign(), ?location, "finished loading");
        }
        Ok(())
    }

    /// Files the aircraft under its current task. Aircraft already in the
    /// right place are left alone.
    pub fn place_aircraft_in_queues(&mut self, aircraft: &AircraftHandle) {
        match aircraft.current_task() {
            TaskType::Land if !self.landing_queue.contains_aircraft(aircraft) => {
                debug!(callsign = %aircraft.callsign(), "joined landing queue");
                self.landing_queue.add_aircraft(aircraft.clone());
            }
            TaskType::Takeoff if !self.takeoff_queue.contains_aircraft(aircraft) => {
                debug!(callsign = %aircraft.callsign(), "joined takeoff queue");
                self.takeoff_queue.add_aircraft(aircraft.clone());
            }
            TaskType::Load if !self.loading_aircraft.contains_key(aircraft) => {
                let ticks = aircraft.borrow().load_duration_ticks();
                debug!(callsign = %aircraft.callsign(), ticks, "started loading");
                self.loading_aircraft.insert(aircraft.clone(), ticks);
            }
            _ => {}
        }
    }

    pub fn place_all_aircraft_in_queues(&mut self) {
        for aircraft in self.aircraft.clone() {
            self.place_aircraft_in_queues(&aircraft);
        }
    }

    // the first tick after construction is tick 1, so landings happen on
    // ticks 2, 4, 6...
    fn is_landing_tick(&self) -> bool {
        let tick = self.ticks_elapsed - self.ticks_at_commencement + 1;
        tick % 2 == 0
    }

    /// Advances the simulation by one tick.
    ///
    /// Every second tick the tower tries to land an aircraft, and a second
    /// one straight after if the first landed. If nothing could land, or on
    /// the other ticks, one aircraft may take off instead.
    pub fn tick(&mut self) -> Result<()> {
        for aircraft in &self.aircraft {
            aircraft.borrow_mut().tick();
        }

        for aircraft in &self.aircraft {
            if matches!(aircraft.current_task(), TaskType::Away | TaskType::Wait) {
                aircraft.advance_task();
            }
        }

        self.load_aircraft()?;

        if self.is_landing_tick() {
            if self.try_land_aircraft()? {
                self.try_land_aircraft()?;
            } else {
                self.try_take_off_aircraft();
            }
        } else {
            self.try_take_off_aircraft();
        }

        self.place_all_aircraft_in_queues();

        self.ticks_elapsed += 1;
        debug!(ticks_elapsed = self.ticks_elapsed, "tick complete");
        Ok(())
    }

    pub fn declare_emergency(&mut self, callsign: &str) -> bool {
        self.find_aircraft(callsign)
            .map(|a| a.borrow_mut().declare_emergency())
            .is_some()
    }

    pub fn clear_emergency(&mut self, callsign: &str) -> bool {
        self.find_aircraft(callsign)
            .map(|a| a.borrow_mut().clear_emergency())
            .is_some()
    }

    pub fn declare_terminal_emergency(&mut self, index: usize) -> bool {
        self.terminal_mut(index)
            .map(|t| t.declare_emergency())
            .is_some()
    }

    pub fn clear_terminal_emergency(&mut self, index: usize) -> bool {
        self.terminal_mut(index)
            .map(|t| t.clear_emergency())
            .is_some()
    }

    /// `LoadingAircraft:count` followed by `callsign:ticks` pairs.
    pub fn encode_loading(&self) -> String {
        let entries = self
            .loading_aircraft
            .iter()
            .map(|(a, ticks)| format!("{}:{}", a.callsign(), ticks))
            .collect::<Vec<_>>()
            .join(",");
        format!("LoadingAircraft:{}\n{}", self.loading_aircraft.len(), entries)
    }

    pub fn encode_queues(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.landing_queue.encode(),
            self.takeoff_queue.encode(),
            self.encode_loading()
        )
    }

    pub fn snapshot(&self) -> TowerSnapshot {
        let callsigns = |queue: &dyn AircraftQueue| -> Vec<Callsign> {
            queue
                .aircraft_in_order()
                .iter()
                .map(|a| a.callsign().clone())
                .collect()
        };
        TowerSnapshot {
            ticks_elapsed: self.ticks_elapsed,
            terminals: self.terminals.len(),
            aircraft: self.aircraft.len(),
            landing: callsigns(&self.landing_queue),
            takeoff: callsigns(&self.takeoff_queue),
            loading: self
                .loading_aircraft
                .iter()
                .map(|(a, ticks)| (a.callsign().clone(), *ticks))
                .collect(),
        }
    }
}

impl fmt::Display for ControlTower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ControlTower: {} terminals, {} total aircraft ({} LAND, {} TAKEOFF, {} LOAD)",
            self.terminals.len(),
            self.aircraft.len(),
            self.landing_queue.len(),
            self.takeoff_queue.len(),
            self.loading_aircraft.len()
        )
    }
}
