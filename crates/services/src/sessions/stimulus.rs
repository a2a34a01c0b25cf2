use std::sync::{Arc, Mutex, PoisonError};

/// Audio cue playback, provided by the host page.
///
/// Fire-and-forget: only one stimulus is active at a time and starting a new one
/// implicitly stops the previous one.
pub trait StimulusPlayer {
    fn play(&mut self, stimulus_ref: &str);
    fn stop(&mut self);
}

impl<P: StimulusPlayer + ?Sized> StimulusPlayer for Box<P> {
    fn play(&mut self, stimulus_ref: &str) {
        (**self).play(stimulus_ref);
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Player that does nothing, for hosts without audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl StimulusPlayer for SilentPlayer {
    fn play(&mut self, _stimulus_ref: &str) {}
    fn stop(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StimulusEvent {
    Play(String),
    Stop,
}

/// Player that keeps a shared log of every call.
///
/// Clones share the same log, so a host (or a test) can keep one clone while
/// the trainer owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    events: Arc<Mutex<Vec<StimulusEvent>>>,
}

impl RecordingPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<StimulusEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stimulus refs passed to `play`, in order.
    #[must_use]
    pub fn played(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                StimulusEvent::Play(stimulus) => Some(stimulus),
                StimulusEvent::Stop => None,
            })
            .collect()
    }

    /// The stimulus currently playing, if any.
    #[must_use]
    pub fn active(&self) -> Option<String> {
        match self.events().last() {
            Some(StimulusEvent::Play(stimulus)) => Some(stimulus.clone()),
            _ => None,
        }
    }

    fn push(&self, event: StimulusEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl StimulusPlayer for RecordingPlayer {
    fn play(&mut self, stimulus_ref: &str) {
        self.push(StimulusEvent::Play(stimulus_ref.to_string()));
    }

    fn stop(&mut self) {
        self.push(StimulusEvent::Stop);
    }
}
