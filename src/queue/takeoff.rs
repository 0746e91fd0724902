use crate::aircraft::AircraftHandle;
use crate::queue::{OrderingPolicy, PolicyQueue};

pub type TakeoffQueue = PolicyQueue<FirstInFirstOut>;

#[derive(Debug, Clone, Copy, Default)]
pub struct FirstInFirstOut;

impl OrderingPolicy for FirstInFirstOut {
    const NAME: &'static str = "TakeoffQueue";

    fn select(&self, queue: &[AircraftHandle]) -> Option<usize> {
        if queue.is_empty() { None } else { Some(0) }
    }
}
