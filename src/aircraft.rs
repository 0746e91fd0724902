use crate::error::{Result, TowerError};
use crate::task::{TaskList, TaskType};
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell, RefMut};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

pub type Callsign = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AircraftCategory {
    Airplane,
    Helicopter,
}

impl fmt::Display for AircraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AircraftCategory::Airplane => write!(f, "AIRPLANE"),
            AircraftCategory::Helicopter => write!(f, "HELICOPTER"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftCharacteristics {
    #[serde(rename = "AIRBUS_A320")]
    AirbusA320,
    #[serde(rename = "BOEING_747_8F")]
    Boeing7478F,
    #[serde(rename = "BOEING_787")]
    Boeing787,
    #[serde(rename = "FOKKER_100")]
    Fokker100,
    #[serde(rename = "ROBINSON_R44")]
    RobinsonR44,
    #[serde(rename = "SIKORSKY_SKYCRANE")]
    SikorskySkycrane,
}

impl AircraftCharacteristics {
    // category, fuel capacity (litres), passenger capacity, freight capacity (kg)
    fn row(self) -> (AircraftCategory, f64, u32, u32) {
        use AircraftCategory::*;
        match self {
            AircraftCharacteristics::AirbusA320 => (Airplane, 27_200.0, 150, 0),
            AircraftCharacteristics::Boeing7478F => (Airplane, 226_117.0, 0, 137_756),
            AircraftCharacteristics::Boeing787 => (Airplane, 126_206.0, 242, 0),
            AircraftCharacteristics::Fokker100 => (Airplane, 13_365.0, 97, 0),
            AircraftCharacteristics::RobinsonR44 => (Helicopter, 190.0, 4, 0),
            AircraftCharacteristics::SikorskySkycrane => (Helicopter, 3_328.0, 0, 9_100),
        }
    }

    pub fn category(self) -> AircraftCategory {
        self.row().0
    }

    pub fn fuel_capacity(self) -> f64 {
        self.row().1
    }

    pub fn passenger_capacity(self) -> u32 {
        self.row().2
    }

    pub fn freight_capacity(self) -> u32 {
        self.row().3
    }

    pub fn is_passenger(self) -> bool {
        self.passenger_capacity() > 0
    }

    /// Passengers for passenger aircraft, kilograms of freight otherwise.
    pub fn cargo_capacity(self) -> u32 {
        if self.is_passenger() {
            self.passenger_capacity()
        } else {
            self.freight_capacity()
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AircraftCharacteristics::AirbusA320 => "AIRBUS_A320",
            AircraftCharacteristics::Boeing7478F => "BOEING_747_8F",
            AircraftCharacteristics::Boeing787 => "BOEING_787",
            AircraftCharacteristics::Fokker100 => "FOKKER_100",
            AircraftCharacteristics::RobinsonR44 => "ROBINSON_R44",
            AircraftCharacteristics::SikorskySkycrane => "SIKORSKY_SKYCRANE",
        }
    }
}

impl fmt::Display for AircraftCharacteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Aircraft {
    callsign: Callsign,
    characteristics: AircraftCharacteristics,
    tasks: TaskList,
    fuel_amount: f64,
    emergency: bool,
    cargo: u32,
}

impl Aircraft {
    pub const AWAY_FUEL_BURN: f64 = 0.1;

    pub fn new(
        callsign: impl Into<Callsign>,
        characteristics: AircraftCharacteristics,
        tasks: TaskList,
        fuel_amount: f64,
        cargo: u32,
    ) -> Result<Aircraft> {
        let callsign = callsign.into();
        if !(0.0..=characteristics.fuel_capacity()).contains(&fuel_amount) {
            return Err(TowerError::MalformedScenario(format!(
                "{} fuel {} outside 0..={}",
                callsign,
                fuel_amount,
                characteristics.fuel_capacity()
            )));
        }
        if cargo > characteristics.cargo_capacity() {
            return Err(TowerError::MalformedScenario(format!(
                "{} cargo {} exceeds capacity {}",
                callsign,
                cargo,
                characteristics.cargo_capacity()
            )));
        }
        Ok(Aircraft {
            callsign,
            characteristics,
            tasks,
            fuel_amount,
            emergency: false,
            cargo,
        })
    }

    pub fn callsign(&self) -> &Callsign {
        &self.callsign
    }

    pub fn characteristics(&self) -> AircraftCharacteristics {
        self.characteristics
    }

    pub fn category(&self) -> AircraftCategory {
        self.characteristics.category()
    }

    pub fn is_passenger(&self) -> bool {
        self.characteristics.is_passenger()
    }

    pub fn task_list(&self) -> &TaskList {
        &self.tasks
    }

    pub fn task_list_mut(&mut self) -> &mut TaskList {
        &mut self.tasks
    }

    pub fn current_task(&self) -> TaskType {
        self.tasks.current_task().kind()
    }

    pub fn fuel_amount(&self) -> f64 {
        self.fuel_amount
    }

    pub fn fuel_percent_remaining(&self) -> u32 {
        (100.0 * self.fuel_amount / self.characteristics.fuel_capacity()).round() as u32
    }

    pub fn has_emergency(&self) -> bool {
        self.emergency
    }

    pub fn declare_emergency(&mut self) {
        self.emergency = true;
    }

    pub fn clear_emergency(&mut self) {
        self.emergency = false;
    }

    pub fn cargo(&self) -> u32 {
        self.cargo
    }

    fn cargo_to_load(&self) -> u32 {
        let capacity = self.characteristics.cargo_capacity();
        let percent = self.tasks.current_task().load_percent();
        ((capacity as f64 * percent as f64 / 100.0).round() as u32).min(capacity)
    }

    /// Ticks needed to load the cargo for the current task. Always at least one.
    pub fn load_duration_ticks(&self) -> u32 {
        let amount = self.cargo_to_load();
        if self.is_passenger() {
            // log10(0) is -inf, which saturates to 0 before the max
            ((amount as f64).log10().round() as u32).max(1)
        } else {
            match amount {
                0..1_000 => 1,
                1_000..50_000 => 2,
                _ => 3,
            }
        }
    }

    pub fn tick(&mut self) {
        let capacity = self.characteristics.fuel_capacity();
        match self.current_task() {
            TaskType::Away => {
                self.fuel_amount = (self.fuel_amount - Self::AWAY_FUEL_BURN * capacity).max(0.0);
            }
            TaskType::Load => {
                let refuel = capacity / self.load_duration_ticks() as f64;
                self.fuel_amount = (self.fuel_amount + refuel).min(capacity);
                self.cargo = self.cargo_to_load();
            }
            _ => {}
        }
    }

    pub fn unload(&mut self) {
        self.cargo = 0;
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} at {}% fuel, {}",
            self.category(),
            self.callsign,
            self.characteristics,
            self.fuel_percent_remaining(),
            self.tasks.current_task()
        )?;
        if self.emergency {
            write!(f, " (EMERGENCY)")?;
        }
        Ok(())
    }
}

/// Shared reference to an aircraft held by the tower, its queues and gates.
/// Equality, ordering and hashing go by callsign only.
#[derive(Clone)]
pub struct AircraftHandle {
    callsign: Callsign,
    inner: Rc<RefCell<Aircraft>>,
}

impl AircraftHandle {
    pub fn new(aircraft: Aircraft) -> AircraftHandle {
        AircraftHandle {
            callsign: aircraft.callsign.clone(),
            inner: Rc::new(RefCell::new(aircraft)),
        }
    }

    pub fn callsign(&self) -> &Callsign {
        &self.callsign
    }

    pub fn borrow(&self) -> Ref<'_, Aircraft> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Aircraft> {
        self.inner.borrow_mut()
    }

    pub fn current_task(&self) -> TaskType {
        self.inner.borrow().current_task()
    }

    pub fn advance_task(&self) {
        self.inner.borrow_mut().task_list_mut().advance();
    }
}

impl From<Aircraft> for AircraftHandle {
    fn from(aircraft: Aircraft) -> Self {
        AircraftHandle::new(aircraft)
    }
}

impl PartialEq for AircraftHandle {
    fn eq(&self, other: &Self) -> bool {
        self.callsign == other.callsign
    }
}

impl Eq for AircraftHandle {}

impl Hash for AircraftHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.callsign.hash(state);
    }
}

impl PartialOrd for AircraftHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AircraftHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.callsign.cmp(&other.callsign)
    }
}

impl fmt::Debug for AircraftHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AircraftHandle({})", self.callsign)
    }
}

impl fmt::Display for AircraftHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.callsign)
    }
}
