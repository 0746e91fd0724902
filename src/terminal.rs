use crate::aircraft::{AircraftCategory, AircraftHandle};
use crate::error::{Result, TowerError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalKind {
    AirplaneTerminal,
    HelicopterTerminal,
}

impl TerminalKind {
    pub fn accepts(self, category: AircraftCategory) -> bool {
        matches!(
            (self, category),
            (TerminalKind::AirplaneTerminal, AircraftCategory::Airplane)
                | (TerminalKind::HelicopterTerminal, AircraftCategory::Helicopter)
        )
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalKind::AirplaneTerminal => write!(f, "AirplaneTerminal"),
            TerminalKind::HelicopterTerminal => write!(f, "HelicopterTerminal"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gate {
    number: u32,
    aircraft: Option<AircraftHandle>,
}

impl Gate {
    pub fn new(number: u32) -> Gate {
        Gate {
            number,
            aircraft: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn is_occupied(&self) -> bool {
        self.aircraft.is_some()
    }

    pub fn aircraft_at_gate(&self) -> Option<&AircraftHandle> {
        self.aircraft.as_ref()
    }

    pub fn park_aircraft(&mut self, aircraft: AircraftHandle) -> Result<()> {
        match &self.aircraft {
            Some(parked) => Err(TowerError::NoSpace(format!(
                "gate {} already occupied by {}",
                self.number, parked
            ))),
            None => {
                self.aircraft = Some(aircraft);
                Ok(())
            }
        }
    }

    pub fn aircraft_leaves(&mut self) -> Option<AircraftHandle> {
        self.aircraft.take()
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.aircraft {
            Some(aircraft) => write!(f, "Gate {} [{}]", self.number, aircraft),
            None => write!(f, "Gate {} [empty]", self.number),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Terminal {
    kind: TerminalKind,
    number: u32,
    gates: Vec<Gate>,
    emergency: bool,
}

impl Terminal {
    pub const MAX_NUM_GATES: usize = 6;

    pub fn new(kind: TerminalKind, number: u32) -> Terminal {
        Terminal {
            kind,
            number,
            gates: Vec::new(),
            emergency: false,
        }
    }

    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn add_gate(&mut self, gate: Gate) -> Result<()> {
        if self.gates.len() == Self::MAX_NUM_GATES {
            return Err(TowerError::NoSpace(format!(
                "maximum number of gates reached ({}) in {} {}",
                Self::MAX_NUM_GATES,
                self.kind,
                self.number
            )));
        }
        self.gates.push(gate);
        Ok(())
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate_mut(&mut self, index: usize) -> Option<&mut Gate> {
        self.gates.get_mut(index)
    }

    /// Index of the first unoccupied gate in addition order.
    pub fn find_unoccupied_gate(&self) -> Option<usize> {
        self.gates.iter().position(|g| !g.is_occupied())
    }

    pub fn accepts_category(&self, category: AircraftCategory) -> bool {
        self.kind.accepts(category)
    }

    pub fn declare_emergency(&mut self) {
        self.emergency = true;
    }

    pub fn clear_emergency(&mut self) {
        self.emergency = false;
    }

    pub fn has_emergency(&self) -> bool {
        self.emergency
    }

    /// Percentage of occupied gates, rounded; zero for a terminal without gates.
    pub fn occupancy_level(&self) -> u32 {
        if self.gates.is_empty() {
            return 0;
        }
        let occupied = self.gates.iter().filter(|g| g.is_occupied()).count();
        (100.0 * occupied as f64 / self.gates.len() as f64).round() as u32
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {} gates", self.kind, self.number, self.gates.len())?;
        if self.emergency {
            write!(f, " (EMERGENCY)")?;
        }
        Ok(())
    }
}
