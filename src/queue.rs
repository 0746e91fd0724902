use crate::aircraft::AircraftHandle;
use std::fmt;

pub mod landing;
pub mod takeoff;

pub use landing::{LandingPriority, LandingQueue};
pub use takeoff::{FirstInFirstOut, TakeoffQueue};

/// A queue of aircraft waiting for the runway. Which aircraft counts as the
/// front of the queue is up to the implementation.
pub trait AircraftQueue {
    fn add_aircraft(&mut self, aircraft: AircraftHandle);

    /// Removes and returns the aircraft at the front, or `None` when empty.
    fn remove_aircraft(&mut self) -> Option<AircraftHandle>;

    fn peek_aircraft(&self) -> Option<&AircraftHandle>;

    /// Every queued aircraft in the order they would be removed. The queue
    /// itself is left untouched.
    fn aircraft_in_order(&self) -> Vec<AircraftHandle>;

    fn contains_aircraft(&self, aircraft: &AircraftHandle) -> bool;

    fn len(&self) -> usize;

    fn name(&self) -> &'static str;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `QueueName:count` followed by a line of comma separated callsigns.
    fn encode(&self) -> String {
        let callsigns = self
            .aircraft_in_order()
            .iter()
            .map(|a| a.callsign().to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}:{}\n{}", self.name(), self.len(), callsigns)
    }
}

/// Picks which queued aircraft goes next. `queue` is in insertion order.
pub trait OrderingPolicy: Default {
    const NAME: &'static str;

    fn select(&self, queue: &[AircraftHandle]) -> Option<usize>;
}

/// Insertion-ordered sequence of aircraft with removal order decided by `P`.
#[derive(Debug, Clone, Default)]
pub struct PolicyQueue<P> {
    aircraft: Vec<AircraftHandle>,
    policy: P,
}

impl<P: OrderingPolicy> PolicyQueue<P> {
    pub fn new() -> Self {
        PolicyQueue {
            aircraft: Vec::new(),
            policy: P::default(),
        }
    }

    /// Queued aircraft in the order they were added.
    pub fn arrivals(&self) -> &[AircraftHandle] {
        &self.aircraft
    }
}

impl<P: OrderingPolicy> AircraftQueue for PolicyQueue<P> {
    fn add_aircraft(&mut self, aircraft: AircraftHandle) {
        self.aircraft.push(aircraft);
    }

    fn remove_aircraft(&mut self) -> Option<AircraftHandle> {
        self.policy
            .select(&self.aircraft)
            .map(|i| self.aircraft.remove(i))
    }

    fn peek_aircraft(&self) -> Option<&AircraftHandle> {
        self.policy
            .select(&self.aircraft)
            .map(|i| &self.aircraft[i])
    }

    fn aircraft_in_order(&self) -> Vec<AircraftHandle> {
        let mut remaining = self.aircraft.clone();
        let mut ordered = Vec::with_capacity(remaining.len());
        while let Some(i) = self.policy.select(&remaining) {
            ordered.push(remaining.remove(i));
        }
        ordered
    }

    fn contains_aircraft(&self, aircraft: &AircraftHandle) -> bool {
        self.aircraft.contains(aircraft)
    }

    fn len(&self) -> usize {
        self.aircraft.len()
    }

    fn name(&self) -> &'static str {
        P::NAME
    }
}

impl<P: OrderingPolicy> FromIterator<AircraftHandle> for PolicyQueue<P> {
    fn from_iter<I: IntoIterator<Item = AircraftHandle>>(iter: I) -> Self {
        PolicyQueue {
            aircraft: iter.into_iter().collect(),
            policy: P::default(),
        }
    }
}

impl<P: OrderingPolicy> fmt::Display for PolicyQueue<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let callsigns = self
            .aircraft_in_order()
            .iter()
            .map(|a| a.callsign().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} [{}]", P::NAME, callsigns)
    }
}
