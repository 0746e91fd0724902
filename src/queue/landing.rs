use crate::aircraft::{Aircraft, AircraftHandle};
use crate::queue::{OrderingPolicy, PolicyQueue};

pub type LandingQueue = PolicyQueue<LandingPriority>;

/// Urgency first: emergencies, then aircraft low on fuel, then passenger
/// aircraft, then everyone else. Ties go to whoever queued first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandingPriority;

impl LandingPriority {
    pub const LOW_FUEL_PERCENT: u32 = 20;

    pub fn band(aircraft: &Aircraft) -> u8 {
        if aircraft.has_emergency() {
            0
        } else if aircraft.fuel_percent_remaining() <= Self::LOW_FUEL_PERCENT {
            1
        } else if aircraft.is_passenger() {
            2
        } else {
            3
        }
    }
}

impl OrderingPolicy for LandingPriority {
    const NAME: &'static str = "LandingQueue";

    fn select(&self, queue: &[AircraftHandle]) -> Option<usize> {
        queue
            .iter()
            .enumerate()
            .min_by_key(|(i, aircraft)| (Self::band(&aircraft.borrow()), *i))
            .map(|(i, _)| i)
    }
}
