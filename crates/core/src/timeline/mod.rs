/// Monotonic time accumulator that feeds the shader time uniform.
#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    pub time_seconds: f32,
}

impl PlaybackClock {
    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    /// Non-finite and negative deltas are ignored so time never runs back.
    pub fn advance(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.time_seconds += delta;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent<E> {
    pub time_seconds: f32,
    pub payload: E,
}

impl<E> ScheduledEvent<E> {
    pub fn new(time_seconds: f32, payload: E) -> Self {
        Self {
            time_seconds,
            payload,
        }
    }
}

/// One-shot event queue keyed on its own clock. Each event fires exactly once,
/// on the first tick at or after its time.
#[derive(Debug)]
pub struct Scheduler<E> {
    clock: PlaybackClock,
    events: Vec<ScheduledEvent<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            clock: PlaybackClock::default(),
            events: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f32 {
        self.clock.time_seconds
    }

    /// Queues `payload` to fire `delay` seconds from now.
    pub fn schedule_in(&mut self, delay: f32, payload: E) {
        let at = self.now() + delay.max(0.0);
        self.events.push(ScheduledEvent::new(at, payload));
        self.events
            .sort_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds));
    }

    /// Advances the clock and returns every event that became due, in order.
    pub fn tick(&mut self, delta: f32) -> Vec<E> {
        self.clock.advance(delta);
        let now = self.now();
        let due = self
            .events
            .iter()
            .take_while(|event| event.time_seconds <= now)
            .count();
        self.events
            .drain(..due)
            .map(|event| event.payload)
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_idle(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ignores_backwards_steps() {
        let mut clock = PlaybackClock::default();
        clock.advance(0.5);
        clock.advance(-1.0);
        clock.advance(f32::INFINITY);
        assert_eq!(clock.time_seconds, 0.5);

        clock.reset();
        assert_eq!(clock.time_seconds, 0.0);
    }

    #[test]
    fn events_fire_once_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(0.4, "late");
        scheduler.schedule_in(0.1, "early");

        assert!(scheduler.tick(0.05).is_empty());
        assert_eq!(scheduler.tick(0.1), vec!["early"]);
        assert_eq!(scheduler.tick(0.3), vec!["late"]);
        assert!(scheduler.tick(1.0).is_empty());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut scheduler = Scheduler::new();
        scheduler.tick(2.0);
        scheduler.schedule_in(0.5, 1);

        assert!(scheduler.tick(0.25).is_empty());
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.tick(0.25), vec![1]);
    }
}
