use std::collections::HashMap;

use strum::IntoEnumIterator;
use tracing::debug;

use super::{PlayerClass, PlayerKind};

/// All player implementations the application knows about, built once at
/// startup and shared read-only afterwards.
///
/// When several classes are registered under the same name, the one
/// registered last is the one names resolve to.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    registered: Vec<PlayerClass>,
    by_name: HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct PlayerRegistryBuilder {
    registered: Vec<PlayerClass>,
}

impl PlayerRegistryBuilder {
    pub fn register(mut self, cls: impl Into<PlayerClass>) -> Self {
        self.registered.push(cls.into());
        self
    }

    pub fn register_builtin(self) -> Self {
        PlayerKind::iter().fold(self, |builder, kind| builder.register(kind))
    }

    pub fn build(self) -> PlayerRegistry {
        let mut by_name: HashMap<String, usize> = HashMap::new();
        for (idx, cls) in self.registered.iter().enumerate() {
            if let Some(prev) = by_name.insert(cls.name.clone(), idx) {
                debug!(
                    name = %cls.name,
                    "player {:?} replaces earlier registration {:?}",
                    cls.kind,
                    self.registered[prev].kind
                );
            }
        }
        PlayerRegistry {
            registered: self.registered,
            by_name,
        }
    }
}

impl PlayerRegistry {
    pub fn builder() -> PlayerRegistryBuilder {
        PlayerRegistryBuilder::default()
    }

    pub fn with_builtin_players() -> PlayerRegistry {
        PlayerRegistry::builder().register_builtin().build()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerClass> {
        self.by_name.get(name).map(|idx| &self.registered[*idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The effective class for every registered name, in the order the
    /// winning registrations were made.
    pub fn players(&self) -> impl Iterator<Item = &PlayerClass> {
        self.registered
            .iter()
            .enumerate()
            .filter(|(idx, cls)| self.by_name.get(&cls.name) == Some(idx))
            .map(|(_, cls)| cls)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
