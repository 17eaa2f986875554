use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Arrival,
    Departure,
}

impl Event {
    // Arrivals win exact ties so the queue is sampled before the server frees up.
    fn priority(&self) -> u8 {
        match self {
            Event::Arrival => 0,
            Event::Departure => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledEvent {
    pub time: f64,
    pub event: Event,
}

impl ScheduledEvent {
    fn cmp_schedule(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.event.priority().cmp(&other.event.priority()))
    }
}

/// Logical clock plus the single-slot pending-event set.
///
/// At most one arrival and one departure are pending at any time. Advancing
/// consumes the selected slot; handlers reschedule it if more work follows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventClock {
    time: f64,
    next_arrival: Option<f64>,
    next_departure: Option<f64>,
}

impl EventClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn next_arrival(&self) -> Option<f64> {
        self.next_arrival
    }

    pub fn next_departure(&self) -> Option<f64> {
        self.next_departure
    }

    pub fn schedule_arrival(&mut self, time: f64) {
        debug_assert!(self.next_arrival.is_none(), "arrival already pending");
        self.next_arrival = Some(time);
    }

    pub fn schedule_departure(&mut self, time: f64) {
        debug_assert!(self.next_departure.is_none(), "departure already pending");
        self.next_departure = Some(time);
    }

    pub fn clear_arrival(&mut self) {
        self.next_arrival = None;
    }

    pub fn clear_departure(&mut self) {
        self.next_departure = None;
    }

    pub fn has_pending(&self) -> bool {
        self.next_arrival.is_some() || self.next_departure.is_some()
    }

    /// Moves the clock to the earliest pending event and consumes it.
    /// Returns `None` once nothing is pending.
    pub fn advance(&mut self) -> Option<ScheduledEvent> {
        let arrival = self.next_arrival.map(|time| ScheduledEvent {
            time,
            event: Event::Arrival,
        });
        let departure = self.next_departure.map(|time| ScheduledEvent {
            time,
            event: Event::Departure,
        });

        let next = arrival
            .into_iter()
            .chain(departure)
            .min_by(|a, b| a.cmp_schedule(b))?;

        debug_assert!(next.time >= self.time, "clock moved backwards");
        self.time = next.time;
        match next.event {
            Event::Arrival => self.next_arrival = None,
            Event::Departure => self.next_departure = None,
        }
        Some(next)
    }
}
