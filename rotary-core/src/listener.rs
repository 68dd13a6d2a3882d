//! Ordered multi-subscriber dispatch for encoder events
//!
//! Listeners are borrowed trait objects stored in fixed-capacity
//! `heapless::Vec`s, so neither registration nor dispatch allocates.
//! Dispatch runs on the caller's context, which may be an interrupt handler:
//! a listener failure is counted and logged, never propagated.

use heapless::Vec;
use portable_atomic::{AtomicU32, Ordering};

use crate::types::{Click, DoubleClick, RepeatCount, ValueChanged};

/// Failure reported by a listener
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ListenerError(pub &'static str);

impl ListenerError {
    /// Reported when a listener panics (std builds only)
    pub const PANICKED: ListenerError = ListenerError("listener panicked");
}

/// Return type of every listener
pub type ListenerResult = Result<(), ListenerError>;

/// A registered callback for events of type `E`
pub type Listener<'a, E> = &'a (dyn Fn(E) -> ListenerResult + Sync);

/// Registry misuse errors
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// The handle is not registered on this channel
    NotFound,
    /// The channel has no free slot
    Full,
}

#[cfg(feature = "std")]
impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::NotFound => write!(f, "listener is not installed"),
            RegistryError::Full => write!(f, "listener channel is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegistryError {}

/// Event channels
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelKind {
    ValueChanged,
    Click,
    DoubleClick,
    RepeatCount,
}

/// Handle returned on registration, used for removal
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ListenerId {
    channel: ChannelKind,
    seq: u16,
}

impl ListenerId {
    pub const fn channel(&self) -> ChannelKind {
        self.channel
    }
}

/// One ordered listener list
pub struct Channel<'a, E, const N: usize> {
    kind: ChannelKind,
    next_seq: u16,
    entries: Vec<(ListenerId, Listener<'a, E>), N>,
}

impl<'a, E: Copy, const N: usize> Channel<'a, E, N> {
    pub const fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            next_seq: 0,
            entries: Vec::new(),
        }
    }

    /// Append a listener; it runs after every listener already registered
    pub fn add(&mut self, listener: Listener<'a, E>) -> Result<ListenerId, RegistryError> {
        if self.entries.is_full() {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} channel full ({} listeners)", self.kind, N);
            return Err(RegistryError::Full);
        }
        // the counter wraps; never hand out a handle that is still registered
        while self.entries.iter().any(|(entry, _)| entry.seq == self.next_seq) {
            self.next_seq = self.next_seq.wrapping_add(1);
        }
        let id = ListenerId {
            channel: self.kind,
            seq: self.next_seq,
        };
        self.entries
            .push((id, listener))
            .map_err(|_| RegistryError::Full)?;
        self.next_seq = self.next_seq.wrapping_add(1);
        Ok(id)
    }

    /// Remove a listener by handle, keeping the order of the others
    pub fn remove(&mut self, id: ListenerId) -> Result<(), RegistryError> {
        let Some(index) = self.entries.iter().position(|(entry, _)| *entry == id) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("remove: unknown {} listener {}", id.channel, id.seq);
            return Err(RegistryError::NotFound);
        };
        self.entries.remove(index);
        Ok(())
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke every listener in registration order.
    ///
    /// Returns the number of listeners that failed.
    pub fn dispatch(&self, event: E, failures: &AtomicU32) -> usize {
        let mut failed = 0;
        for (_id, listener) in self.entries.iter() {
            if let Err(_err) = invoke(*listener, event) {
                failed += 1;
                failures.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "defmt")]
                defmt::warn!("{} listener {} failed: {}", _id.channel, _id.seq, _err);
            }
        }
        failed
    }
}

#[cfg(feature = "std")]
fn invoke<E>(listener: Listener<'_, E>, event: E) -> ListenerResult {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| listener(event)))
        .unwrap_or(Err(ListenerError::PANICKED))
}

#[cfg(not(feature = "std"))]
fn invoke<E>(listener: Listener<'_, E>, event: E) -> ListenerResult {
    listener(event)
}

/// The four event channels of one encoder
pub struct ListenerRegistry<'a, const N: usize = 4> {
    pub value: Channel<'a, ValueChanged, N>,
    pub click: Channel<'a, Click, N>,
    pub double_click: Channel<'a, DoubleClick, N>,
    pub repeat: Channel<'a, RepeatCount, N>,
    failures: AtomicU32,
}

impl<'a, const N: usize> ListenerRegistry<'a, N> {
    pub const fn new() -> Self {
        Self {
            value: Channel::new(ChannelKind::ValueChanged),
            click: Channel::new(ChannelKind::Click),
            double_click: Channel::new(ChannelKind::DoubleClick),
            repeat: Channel::new(ChannelKind::RepeatCount),
            failures: AtomicU32::new(0),
        }
    }

    pub fn dispatch_value(&self, event: ValueChanged) -> usize {
        self.value.dispatch(event, &self.failures)
    }

    pub fn dispatch_click(&self, event: Click) -> usize {
        self.click.dispatch(event, &self.failures)
    }

    pub fn dispatch_double_click(&self, event: DoubleClick) -> usize {
        self.double_click.dispatch(event, &self.failures)
    }

    pub fn dispatch_repeat(&self, event: RepeatCount) -> usize {
        self.repeat.dispatch(event, &self.failures)
    }

    /// Total listener failures isolated so far
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }
}

impl<'a, const N: usize> Default for ListenerRegistry<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}
