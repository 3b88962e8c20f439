//! Lazily loaded `SoundBank`
//!
//! A [`SoundBank`] is cheap to construct: it only remembers its source. The
//! first cue lookup reads and decodes the whole bank, binds every cue to its
//! category, and caches the result. Loading is one-shot:
//!
//! ```text
//! Unloaded -> Loading -> Loaded
//!                     -> Failed   (terminal, the error is replayed)
//! ```
//!
//! Threads that arrive while another thread is loading wait for the outcome.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use indexmap::IndexMap;
use parking_lot::{Condvar, Mutex};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::cue::Cue;
use super::registry::{AudioEngine, CategoryHandle, WaveBankRegistry};
use super::source::{BankSource, FileSource};
use super::spatial::{AudioEmitter, AudioListener};
use crate::config::LoadOptions;
use crate::error::{Error, Result};
use crate::formats::xsb::{SoundBankData, parse_soundbank_bytes};

/// Public view of the load state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

/// A decoded bank with its cues bound to categories
#[derive(Debug)]
pub struct LoadedBank {
    pub data: SoundBankData,
    pub cues: IndexMap<String, Arc<Cue>>,
}

enum LoadState {
    Unloaded,
    Loading(ThreadId),
    Loaded(Arc<LoadedBank>),
    Failed(Error),
}

pub struct SoundBank {
    source: Box<dyn BankSource>,
    engine: Arc<dyn AudioEngine>,
    options: LoadOptions,
    state: Mutex<LoadState>,
    load_finished: Condvar,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for SoundBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundBank")
            .field("source", &self.source.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SoundBank {
    /// Create a bank over `source`. Nothing is read until the first lookup.
    pub fn new(source: impl BankSource + 'static, engine: Arc<dyn AudioEngine>) -> Self {
        Self::with_options(source, engine, LoadOptions::default())
    }

    pub fn with_options(
        source: impl BankSource + 'static,
        engine: Arc<dyn AudioEngine>,
        options: LoadOptions,
    ) -> Self {
        Self {
            source: Box::new(source),
            engine,
            options,
            state: Mutex::new(LoadState::Unloaded),
            load_finished: Condvar::new(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Bank backed by a file path
    pub fn open<P: AsRef<std::path::Path>>(path: P, engine: Arc<dyn AudioEngine>) -> Self {
        Self::new(FileSource::new(path), engine)
    }

    /// Use a fixed seed for variation choices
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    #[must_use]
    pub fn state(&self) -> BankState {
        match &*self.state.lock() {
            LoadState::Unloaded => BankState::Unloaded,
            LoadState::Loading(_) => BankState::Loading,
            LoadState::Loaded(_) => BankState::Loaded,
            LoadState::Failed(_) => BankState::Failed,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state() == BankState::Loaded
    }

    /// Bank name from the header, once loaded
    #[must_use]
    pub fn name(&self) -> Option<String> {
        match &*self.state.lock() {
            LoadState::Loaded(bank) => Some(bank.data.name().to_string()),
            _ => None,
        }
    }

    /// Cue names in table order. Loads the bank if needed.
    pub fn cue_names(&self) -> Result<Vec<String>> {
        Ok(self.ensure_loaded()?.cues.keys().cloned().collect())
    }

    /// Look up a cue by exact name. Loads the bank if needed.
    pub fn get_cue(&self, name: &str) -> Result<Arc<Cue>> {
        let bank = self.ensure_loaded()?;
        bank.cues
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownCue(name.to_string()))
    }

    pub fn play_cue(&self, name: &str) -> Result<Arc<Cue>> {
        let cue = self.get_cue(name)?;
        cue.play(&*self.engine, &mut *self.rng.lock())?;
        Ok(cue)
    }

    pub fn play_cue_3d(
        &self,
        name: &str,
        listener: &AudioListener,
        emitter: &AudioEmitter,
    ) -> Result<Arc<Cue>> {
        let cue = self.get_cue(name)?;
        cue.play_3d(&*self.engine, &mut *self.rng.lock(), listener, emitter)?;
        Ok(cue)
    }

    /// Advance every cue. Does nothing until the bank has loaded.
    pub fn tick(&self) {
        let bank = match &*self.state.lock() {
            LoadState::Loaded(bank) => Arc::clone(bank),
            _ => return,
        };
        for cue in bank.cues.values() {
            cue.update(&*self.engine);
        }
    }

    /// Decoded bank, loading it on first use
    pub fn loaded(&self) -> Result<Arc<LoadedBank>> {
        self.ensure_loaded()
    }

    fn ensure_loaded(&self) -> Result<Arc<LoadedBank>> {
        let current = thread::current().id();
        let mut state = self.state.lock();
        loop {
            match &*state {
                LoadState::Loaded(bank) => return Ok(Arc::clone(bank)),
                LoadState::Failed(err) => return Err(err.clone()),
                LoadState::Loading(owner) if *owner == current => {
                    return Err(Error::ReentrantLoad(self.source.name().to_string()));
                }
                LoadState::Loading(_) => self.load_finished.wait(&mut state),
                LoadState::Unloaded => break,
            }
        }
        *state = LoadState::Loading(current);
        drop(state);

        let guard = LoadingGuard {
            bank: self,
            finished: false,
        };
        let result = self.load().map(Arc::new);
        guard.finish(match &result {
            Ok(bank) => LoadState::Loaded(Arc::clone(bank)),
            Err(err) => {
                tracing::warn!("Failed to load SoundBank '{}': {}", self.source.name(), err);
                LoadState::Failed(err.clone())
            }
        });
        result
    }

    fn load(&self) -> Result<LoadedBank> {
        let bytes = self.source.read_all()?;
        let wave_banks: &dyn WaveBankRegistry = &*self.engine;
        let data = parse_soundbank_bytes(&bytes, wave_banks, &self.options)?;

        let mut cues = IndexMap::with_capacity(data.cues.len());
        let mut bindings: Vec<(CategoryHandle, Arc<Cue>)> = Vec::with_capacity(data.cues.len());
        for (name, definition) in &data.cues {
            let category = self
                .engine
                .category(definition.category)
                .ok_or(Error::UnknownCategory(definition.category.0))?;
            let cue = Arc::new(Cue::new(definition.clone()));
            bindings.push((category, Arc::clone(&cue)));
            cues.insert(name.clone(), cue);
        }

        // Every category resolved, so registration cannot fail halfway
        for (category, cue) in bindings {
            self.engine.register_cue(category, cue);
        }

        tracing::info!(
            "Loaded SoundBank '{}' from {} ({} cues)",
            data.name(),
            self.source.name(),
            cues.len()
        );
        Ok(LoadedBank { data, cues })
    }
}

/// Publishes the outcome of a load and wakes the waiting threads.
///
/// Dropped without [`LoadingGuard::finish`] (the loader unwound), it leaves
/// the bank `Failed` so no caller waits on a load that will never end.
struct LoadingGuard<'a> {
    bank: &'a SoundBank,
    finished: bool,
}

impl LoadingGuard<'_> {
    fn finish(mut self, outcome: LoadState) {
        self.publish(outcome);
        self.finished = true;
    }

    fn publish(&self, outcome: LoadState) {
        *self.bank.state.lock() = outcome;
        self.bank.load_finished.notify_all();
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let name = self.bank.source.name().to_string();
            tracing::warn!("SoundBank '{name}' panicked while loading");
            self.publish(LoadState::Failed(Error::LoadPanicked(name)));
        }
    }
}
