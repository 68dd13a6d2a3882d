//! Test utilities for rotary core functionality

pub mod event_log {
    //! Listener that records every event of an encoder

    use std::boxed::Box;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    use crate::listener::{ListenerId, ListenerResult, RegistryError};
    use crate::rotary::RotaryCore;
    use crate::types::{Click, ClickPhase, DoubleClick, RepeatCount, ValueChanged};

    /// Anything a core can dispatch
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RecordedEvent {
        Value(ValueChanged),
        Click(Click),
        DoubleClick(DoubleClick),
        Repeat(RepeatCount),
    }

    /// Shared, cloneable event recorder
    #[derive(Clone, Default)]
    pub struct EventLog {
        events: Arc<Mutex<Vec<RecordedEvent>>>,
    }

    impl EventLog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register one listener on each of the four channels.
        ///
        /// The listener closures are leaked; this is only meant for tests.
        pub fn attach<const N: usize>(
            &self,
            core: &mut RotaryCore<'_, N>,
        ) -> Result<[ListenerId; 4], RegistryError> {
            let log = self.events.clone();
            let on_value: &'static (dyn Fn(ValueChanged) -> ListenerResult + Sync) =
                Box::leak(Box::new(move |e: ValueChanged| -> ListenerResult {
                    log.lock().unwrap().push(RecordedEvent::Value(e));
                    Ok(())
                }));
            let log = self.events.clone();
            let on_click: &'static (dyn Fn(Click) -> ListenerResult + Sync) =
                Box::leak(Box::new(move |e: Click| -> ListenerResult {
                    log.lock().unwrap().push(RecordedEvent::Click(e));
                    Ok(())
                }));
            let log = self.events.clone();
            let on_double: &'static (dyn Fn(DoubleClick) -> ListenerResult + Sync) =
                Box::leak(Box::new(move |e: DoubleClick| -> ListenerResult {
                    log.lock().unwrap().push(RecordedEvent::DoubleClick(e));
                    Ok(())
                }));
            let log = self.events.clone();
            let on_repeat: &'static (dyn Fn(RepeatCount) -> ListenerResult + Sync) =
                Box::leak(Box::new(move |e: RepeatCount| -> ListenerResult {
                    log.lock().unwrap().push(RecordedEvent::Repeat(e));
                    Ok(())
                }));

            Ok([
                core.add_value_listener(on_value)?,
                core.add_click_listener(on_click)?,
                core.add_double_click_listener(on_double)?,
                core.add_repeat_listener(on_repeat)?,
            ])
        }

        pub fn events(&self) -> Vec<RecordedEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn clear(&self) {
            self.events.lock().unwrap().clear();
        }

        /// Values of all `ValueChanged` events, in order
        pub fn values(&self) -> Vec<i32> {
            self.filter_map(|e| match e {
                RecordedEvent::Value(v) => Some(v.value),
                _ => None,
            })
        }

        /// `(phase, duration)` of all clicks, in order
        pub fn clicks(&self) -> Vec<(ClickPhase, u32)> {
            self.filter_map(|e| match e {
                RecordedEvent::Click(c) => Some((c.phase, c.duration_ms)),
                _ => None,
            })
        }

        pub fn double_clicks(&self) -> usize {
            self.filter_map(|e| match e {
                RecordedEvent::DoubleClick(_) => Some(()),
                _ => None,
            })
            .len()
        }

        /// Counts of all `RepeatCount` events, in order
        pub fn repeats(&self) -> Vec<u16> {
            self.filter_map(|e| match e {
                RecordedEvent::Repeat(r) => Some(r.count),
                _ => None,
            })
        }

        fn filter_map<T>(&self, f: impl Fn(&RecordedEvent) -> Option<T>) -> Vec<T> {
            self.events.lock().unwrap().iter().filter_map(f).collect()
        }
    }
}

pub mod quadrature {
    //! CLK/DT sample sequences

    use std::vec::Vec;

    use crate::types::Direction;

    /// One full-step detent starting and ending at the `11` rest position
    pub const fn full_step(direction: Direction) -> [(bool, bool); 4] {
        match direction {
            Direction::Clockwise => [(true, false), (false, false), (false, true), (true, true)],
            Direction::CounterClockwise => {
                [(false, true), (false, false), (true, false), (true, true)]
            }
        }
    }

    /// One half-step cycle (two turns) starting and ending at `11`
    pub const fn half_step(direction: Direction) -> [(bool, bool); 4] {
        match direction {
            Direction::Clockwise => [(false, true), (false, false), (true, false), (true, true)],
            Direction::CounterClockwise => {
                [(true, false), (false, false), (false, true), (true, true)]
            }
        }
    }

    /// `cycles` repetitions of a cycle
    pub fn repeat(cycle: [(bool, bool); 4], cycles: usize) -> Vec<(bool, bool)> {
        cycle.iter().copied().cycle().take(cycles * cycle.len()).collect()
    }

    /// Complement both lines, as seen by an encoder wired with inverted logic
    pub fn complemented(samples: &[(bool, bool)]) -> Vec<(bool, bool)> {
        samples.iter().map(|&(clk, dt)| (!clk, !dt)).collect()
    }
}

pub mod button_simulator {
    //! Button gesture simulation against a core with a virtual 100 ms tick

    use heapless::{String, Vec};

    use crate::controller::{GestureOutcome, TICK_PERIOD_MS};
    use crate::rotary::RotaryCore;
    use crate::types::ButtonLevel;

    /// Button edge at a point in virtual time
    #[derive(Debug, Clone, Copy)]
    pub struct ButtonEvent {
        pub time_ms: u32,
        pub level: ButtonLevel,
    }

    /// Button pattern for simulation
    #[derive(Debug, Clone)]
    pub struct ButtonPattern {
        pub events: Vec<ButtonEvent, 64>,
        pub description: String<32>,
    }

    impl ButtonPattern {
        /// `presses` clicks of `hold_ms`, a new press every `gap_ms`, starting at `start_ms`
        pub fn burst(start_ms: u32, presses: usize, gap_ms: u32, hold_ms: u32) -> Self {
            let mut events = Vec::new();
            for i in 0..presses as u32 {
                let at = start_ms + i * gap_ms;
                events
                    .push(ButtonEvent { time_ms: at, level: ButtonLevel::Pressed })
                    .expect("pattern too long");
                events
                    .push(ButtonEvent { time_ms: at + hold_ms, level: ButtonLevel::Released })
                    .expect("pattern too long");
            }
            Self {
                events,
                description: String::try_from("Burst").unwrap(),
            }
        }

        /// Single click of `hold_ms`
        pub fn single_click(start_ms: u32, hold_ms: u32) -> Self {
            let mut pattern = Self::burst(start_ms, 1, 0, hold_ms);
            pattern.description = String::try_from("Single click").unwrap();
            pattern
        }

        /// Two clicks `gap_ms` apart
        pub fn double_click(start_ms: u32, gap_ms: u32, hold_ms: u32) -> Self {
            let mut pattern = Self::burst(start_ms, 2, gap_ms, hold_ms);
            pattern.description = String::try_from("Double click").unwrap();
            pattern
        }

        /// Concatenate patterns, keeping their absolute times
        pub fn sequence(patterns: &[ButtonPattern]) -> Self {
            let mut events = Vec::new();
            for pattern in patterns {
                for event in &pattern.events {
                    events.push(*event).expect("pattern too long");
                }
            }
            events.sort_unstable_by_key(|e: &ButtonEvent| e.time_ms);
            Self {
                events,
                description: String::try_from("Sequence").unwrap(),
            }
        }

        /// Time of the last edge
        pub fn end_ms(&self) -> u32 {
            self.events.last().map_or(0, |e| e.time_ms)
        }
    }

    /// Play a pattern into the core, ticking every [`TICK_PERIOD_MS`] from
    /// `TICK_PERIOD_MS` up to `until_ms`. Edges sharing a timestamp with a
    /// tick are delivered first. Returns every tick outcome that produced an event.
    pub fn run_pattern<const N: usize>(
        core: &RotaryCore<'_, N>,
        pattern: &ButtonPattern,
        until_ms: u32,
    ) -> std::vec::Vec<(u32, GestureOutcome)> {
        let mut outcomes = std::vec::Vec::new();
        let mut edges = pattern.events.iter().peekable();
        let mut tick = TICK_PERIOD_MS;

        while tick <= until_ms {
            while let Some(edge) = edges.next_if(|e| e.time_ms <= tick) {
                core.on_button_edge(edge.level, edge.time_ms);
            }
            let outcome = core.on_tick(tick);
            if outcome.is_event() {
                outcomes.push((tick, outcome));
            }
            tick += TICK_PERIOD_MS;
        }
        for edge in edges {
            if edge.time_ms <= until_ms {
                core.on_button_edge(edge.level, edge.time_ms);
            }
        }
        outcomes
    }
}
