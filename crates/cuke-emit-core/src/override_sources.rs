//! Override providers.
//!
//! - [`EnvOverrides`] reads the process environment, which is where existing
//!   override tooling puts these values.
//! - [`MapOverrides`] holds values in memory (config files, CLI flags, tests).
//! - [`LayeredOverrides`] consults several providers in priority order.

use std::collections::BTreeMap;
use std::env::VarError;
use std::fmt;
use std::sync::Arc;

use cuke_emit_proto::OverrideProvider;
use tracing::warn;

/// Reads overrides from environment variables of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOverrides;

impl EnvOverrides {
    /// Resolves `name` through `lookup`, which has the shape of
    /// [`std::env::var`].
    ///
    /// A value that is not valid UTF-8 counts as unset.
    pub fn get_with(
        name: &str,
        lookup: impl Fn(&str) -> Result<String, VarError>,
    ) -> Option<String> {
        match lookup(name) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                warn!(key = name, "Ignoring override with a non-UTF-8 value");
                None
            }
        }
    }
}

impl OverrideProvider for EnvOverrides {
    fn get(&self, name: &str) -> Option<String> {
        Self::get_with(name, |key| std::env::var(key))
    }
}

/// A fixed set of overrides held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapOverrides {
    values: BTreeMap<String, String>,
}

impl MapOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, replacing any earlier value for the same key.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl OverrideProvider for MapOverrides {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Providers consulted in order; the first one that has a key wins.
#[derive(Clone, Default)]
pub struct LayeredOverrides {
    layers: Vec<Arc<dyn OverrideProvider>>,
}

impl LayeredOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider with lower priority than every existing layer.
    pub fn with_layer(mut self, provider: Arc<dyn OverrideProvider>) -> Self {
        self.layers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl OverrideProvider for LayeredOverrides {
    fn get(&self, name: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(name))
    }
}

impl fmt::Debug for LayeredOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredOverrides")
            .field("layers", &self.layers.len())
            .finish()
    }
}
