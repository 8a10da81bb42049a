//! Synchronous observer bus.
//!
//! Each shadow model gets its own change-notification channel, fired
//! from inside the mutating call rather than handed off to a queue or
//! background task — by the time a dispatcher handler returns, every
//! registered observer has already seen the update.

/// Which shadow model changed, and which rows of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Clip { track: usize, scene: usize },
    ClipReset,
    Track { index: usize },
    TrackReset,
    Scene { index: usize },
    Mixer { index: usize },
    MixerResized,
    Transport,
    RingOffset,
    Connection,
}

type Listener = Box<dyn Fn(&ChangeEvent) + Send>;

#[derive(Default)]
pub struct ObserverBus {
    listeners: Vec<Listener>,
}

impl ObserverBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&ChangeEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Invoke every registered listener, in registration order, for the
    /// given event. Called synchronously from within a mutator.
    pub fn notify(&self, event: ChangeEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn listeners_fire_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = ObserverBus::new();

        let log_a = log.clone();
        bus.subscribe(move |_| log_a.lock().unwrap().push('a'));
        let log_b = log.clone();
        bus.subscribe(move |_| log_b.lock().unwrap().push('b'));

        bus.notify(ChangeEvent::Transport);
        assert_eq!(*log.lock().unwrap(), vec!['a', 'b']);
    }

    #[test]
    fn notify_without_listeners_is_a_no_op() {
        let bus = ObserverBus::new();
        bus.notify(ChangeEvent::ClipReset);
    }
}
