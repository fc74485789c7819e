//! Run mechanics toggles
//!
//! Double jump, bridges and coins are switched on and off by an external
//! sync service at arbitrary times. The simulation never sees those pushes
//! directly: it reads a [`MechanicsConfig`] snapshot once at the top of each
//! step through [`MechanicsSource`].

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of the mechanics toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MechanicsConfig {
    /// Allow a second jump while airborne
    pub double_jump: bool,
    /// Pits are spanned by bridge decks instead of left open
    pub bridges: bool,
    /// Coins join the spawn pool
    pub coins: bool,
}

impl MechanicsConfig {
    pub const DISABLED: Self = Self {
        double_jump: false,
        bridges: false,
        coins: false,
    };

    /// Read toggles from a loosely-typed payload.
    ///
    /// Anything that is not a JSON boolean (missing keys, strings, numbers,
    /// null, a non-object payload) reads as disabled.
    pub fn from_value(value: &Value) -> Self {
        let flag = |key: &str| value.get(key).and_then(Value::as_bool).unwrap_or(false);
        Self {
            double_jump: flag("doubleJump"),
            bridges: flag("bridges"),
            coins: flag("coins"),
        }
    }

    /// Parse a raw payload; unparseable text reads as all disabled
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                log::warn!("Ignoring malformed mechanics payload: {err}");
                Self::DISABLED
            }
        }
    }
}

/// Where the simulation reads its mechanics snapshot from
pub trait MechanicsSource {
    fn read(&self) -> MechanicsConfig;
}

impl MechanicsSource for MechanicsConfig {
    fn read(&self) -> MechanicsConfig {
        *self
    }
}

impl<T: MechanicsSource + ?Sized> MechanicsSource for &T {
    fn read(&self) -> MechanicsConfig {
        (**self).read()
    }
}

/// Latest-value store shared between the sync listener and the simulation.
///
/// Clones share the same value; the listener writes with [`SharedMechanics::set`]
/// or [`SharedMechanics::apply_json`] whenever the remote value changes.
#[derive(Debug, Clone, Default)]
pub struct SharedMechanics {
    inner: Arc<RwLock<MechanicsConfig>>,
}

impl SharedMechanics {
    pub fn new(initial: MechanicsConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn set(&self, config: MechanicsConfig) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if *guard != config {
            log::info!("Runner mechanics updated: {config:?}");
        }
        *guard = config;
    }

    /// Replace the stored value from a raw remote payload
    pub fn apply_json(&self, json: &str) {
        self.set(MechanicsConfig::from_json(json));
    }
}

impl MechanicsSource for SharedMechanics {
    fn read(&self) -> MechanicsConfig {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}
