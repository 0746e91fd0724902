use crate::aircraft::{Aircraft, AircraftCharacteristics, AircraftHandle, Callsign};
use crate::error::{Result, malformed_scenario};
use crate::queue::{AircraftQueue, LandingQueue, TakeoffQueue};
use crate::task::{Task, TaskList, TaskType};
use crate::terminal::{Gate, Terminal, TerminalKind};
use crate::tower::ControlTower;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct AircraftRecord {
    callsign: Callsign,
    characteristics: AircraftCharacteristics,
    tasks: Vec<Task>,
    fuel_amount: f64,
    #[serde(default)]
    emergency: bool,
    #[serde(default)]
    cargo: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct GateRecord {
    number: u32,
    #[serde(default)]
    aircraft: Option<Callsign>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TerminalRecord {
    kind: TerminalKind,
    number: u32,
    #[serde(default)]
    emergency: bool,
    gates: Vec<GateRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LoadingRecord {
    callsign: Callsign,
    ticks: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct QueuesRecord {
    #[serde(default)]
    landing: Vec<Callsign>,
    #[serde(default)]
    takeoff: Vec<Callsign>,
    #[serde(default)]
    loading: Vec<LoadingRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Scenario {
    #[serde(default)]
    ticks_elapsed: u64,
    aircraft: Vec<AircraftRecord>,
    #[serde(default)]
    terminals: Vec<TerminalRecord>,
    #[serde(default)]
    queues: QueuesRecord,
}

impl Scenario {
    fn build(self) -> Result<ControlTower> {
        let mut handles: HashMap<Callsign, AircraftHandle> = HashMap::new();
        let mut aircraft = Vec::with_capacity(self.aircraft.len());
        for record in self.aircraft {
            if handles.contains_key(&record.callsign) {
                return Err(malformed_scenario(format!(
                    "duplicate callsign {}",
                    record.callsign
                )));
            }
            let tasks = TaskList::new(record.tasks)?;
            let mut a = Aircraft::new(
                record.callsign.clone(),
                record.characteristics,
                tasks,
                record.fuel_amount,
                record.cargo,
            )?;
            if record.emergency {
                a.declare_emergency();
            }
            let handle = AircraftHandle::new(a);
            handles.insert(record.callsign, handle.clone());
            aircraft.push(handle);
        }

        let lookup = |callsign: &Callsign, place: &str| {
            handles
                .get(callsign)
                .cloned()
                .ok_or_else(|| malformed_scenario(format!("unknown callsign {} in {}", callsign, place)))
        };
        let expect_task = |handle: &AircraftHandle, task: TaskType, place: &str| {
            if handle.current_task() == task {
                Ok(())
            } else {
                Err(malformed_scenario(format!(
                    "{} is on {} but listed in {}",
                    handle.callsign(),
                    handle.current_task(),
                    place
                )))
            }
        };

        let mut terminals = Vec::with_capacity(self.terminals.len());
        let mut numbers = HashSet::new();
        let mut parked = HashSet::new();
        for record in self.terminals {
            if !numbers.insert((record.kind, record.number)) {
                return Err(malformed_scenario(format!(
                    "duplicate terminal {} {}",
                    record.kind, record.number
                )));
            }
            let mut terminal = Terminal::new(record.kind, record.number);
            if record.emergency {
                terminal.declare_emergency();
            }
            for gate_record in record.gates {
                let mut gate = Gate::new(gate_record.number);
                if let Some(callsign) = &gate_record.aircraft {
                    let handle = lookup(callsign, "gates")?;
                    if !parked.insert(callsign.clone()) {
                        return Err(malformed_scenario(format!(
                            "{} is parked at more than one gate",
                            callsign
                        )));
                    }
                    if !terminal.accepts_category(handle.borrow().category()) {
                        return Err(malformed_scenario(format!(
                            "{} cannot park at {}",
                            callsign, terminal
                        )));
                    }
                    gate.park_aircraft(handle)?;
                }
                terminal
                    .add_gate(gate)
                    .map_err(|e| malformed_scenario(e.to_string()))?;
            }
            terminals.push(terminal);
        }

        for a in &aircraft {
            let on_ground = matches!(a.current_task(), TaskType::Wait | TaskType::Load);
            match (on_ground, parked.contains(a.callsign())) {
                (true, false) => {
                    return Err(malformed_scenario(format!(
                        "{} is on {} but not parked at a gate",
                        a.callsign(),
                        a.current_task()
                    )));
                }
                (false, true) => {
                    return Err(malformed_scenario(format!(
                        "{} is on {} but parked at a gate",
                        a.callsign(),
                        a.current_task()
                    )));
                }
                _ => {}
            }
        }

        let mut landing = LandingQueue::new();
        for callsign in &self.queues.landing {
            let handle = lookup(callsign, "landing queue")?;
            expect_task(&handle, TaskType::Land, "landing queue")?;
            enqueue_once(&mut landing, handle)?;
        }
        let mut takeoff = TakeoffQueue::new();
        for callsign in &self.queues.takeoff {
            let handle = lookup(callsign, "takeoff queue")?;
            expect_task(&handle, TaskType::Takeoff, "takeoff queue")?;
            enqueue_once(&mut takeoff, handle)?;
        }
        let mut loading = BTreeMap::new();
        for record in &self.queues.loading {
            let handle = lookup(&record.callsign, "loading aircraft")?;
            expect_task(&handle, TaskType::Load, "loading aircraft")?;
            if record.ticks == 0 {
                return Err(malformed_scenario(format!(
                    "{} has no loading ticks remaining",
                    record.callsign
                )));
            }
            if loading.insert(handle, record.ticks).is_some() {
                return Err(malformed_scenario(format!(
                    "{} listed twice in loading aircraft",
                    record.callsign
                )));
            }
        }

        let mut tower = ControlTower::new(self.ticks_elapsed, aircraft, landing, takeoff, loading);
        terminals.into_iter().for_each(|t| tower.add_terminal(t));
        tower.place_all_aircraft_in_queues();
        Ok(tower)
    }

    fn capture(tower: &ControlTower) -> Scenario {
        let aircraft = tower
            .aircraft()
            .iter()
            .map(|handle| {
                let a = handle.borrow();
                AircraftRecord {
                    callsign: a.callsign().clone(),
                    characteristics: a.characteristics(),
                    tasks: a.task_list().rotated(),
                    fuel_amount: a.fuel_amount(),
                    emergency: a.has_emergency(),
                    cargo: a.cargo(),
                }
            })
            .collect();

        let terminals = tower
            .terminals()
            .iter()
            .map(|t| TerminalRecord {
                kind: t.kind(),
                number: t.number(),
                emergency: t.has_emergency(),
                gates: t
                    .gates()
                    .iter()
                    .map(|g| GateRecord {
                        number: g.number(),
                        aircraft: g.aircraft_at_gate().map(|a| a.callsign().clone()),
                    })
                    .collect(),
            })
            .collect();

        let callsigns = |queue: &[AircraftHandle]| -> Vec<Callsign> {
            queue.iter().map(|a| a.callsign().clone()).collect()
        };
        Scenario {
            ticks_elapsed: tower.ticks_elapsed(),
            aircraft,
            terminals,
            queues: QueuesRecord {
                landing: callsigns(tower.landing_queue().arrivals()),
                takeoff: callsigns(tower.takeoff_queue().arrivals()),
                loading: tower
                    .loading_aircraft()
                    .iter()
                    .map(|(a, ticks)| LoadingRecord {
                        callsign: a.callsign().clone(),
                        ticks: *ticks,
                    })
                    .collect(),
            },
        }
    }
}

fn enqueue_once(queue: &mut impl AircraftQueue, aircraft: AircraftHandle) -> Result<()> {
    if queue.contains_aircraft(&aircraft) {
        return Err(malformed_scenario(format!(
            "{} listed twice in {}",
            aircraft.callsign(),
            queue.name()
        )));
    }
    queue.add_aircraft(aircraft);
    Ok(())
}

impl ControlTower {
    /// Reads a scenario and builds a tower from it. The tower is checked to
    /// be consistent before any aircraft is filed into a queue.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        Self::load_from_str(&data).inspect(|tower| {
            info!(path = %path.display(), "{}", tower);
        })
    }

    pub fn load_from_str(data: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(data)?;
        scenario.build()
    }

    pub fn save_to_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Scenario::capture(self))?)
    }

    /// Writes the tower in the format `load_from_file` reads. Task lists are
    /// written starting at the current task.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.save_to_string()?)?;
        info!(path = %path.display(), ticks_elapsed = self.ticks_elapsed(), "scenario saved");
        Ok(())
    }
}
