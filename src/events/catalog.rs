//! Event catalog: the built-in events for every category, plus a readiness
//! gate for callers that start before the data has finished loading.

use crate::core::error::{HgError, Result};
use crate::core::types::EventId;
use crate::events::arena::ArenaEvent;
use crate::events::battle::BattleCatalog;
use crate::events::event::{Event, EventKind};
use crate::events::weapon::{WeaponEvent, WeaponTable};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Bloodbath,
    Player,
    Arena,
    Weapon,
}

impl EventCategory {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "bloodbath" => Ok(Self::Bloodbath),
            "player" => Ok(Self::Player),
            "arena" => Ok(Self::Arena),
            "weapon" => Ok(Self::Weapon),
            other => Err(HgError::UnknownCategory(other.to_string())),
        }
    }
}

/// A catalog lookup result
#[derive(Debug, Clone, Copy)]
pub enum CatalogEntry<'a> {
    Event(&'a Event),
    Arena(&'a ArenaEvent),
    Weapon(&'a WeaponEvent),
}

#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    bloodbath: Vec<Event>,
    player: Vec<Event>,
    arena: Vec<ArenaEvent>,
    weapons: WeaponTable,
    battles: BattleCatalog,
    index: AHashMap<(EventCategory, String), usize>,
}

impl EventCatalog {
    pub fn new(
        bloodbath: Vec<Event>,
        player: Vec<Event>,
        arena: Vec<ArenaEvent>,
        weapons: WeaponTable,
        battles: BattleCatalog,
    ) -> Self {
        let mut catalog = Self {
            bloodbath: tag_kind(bloodbath, EventKind::Normal),
            player: tag_kind(player, EventKind::Normal),
            arena,
            weapons,
            battles,
            index: AHashMap::new(),
        };
        catalog.rebuild_index();
        catalog
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (category, events) in [
            (EventCategory::Bloodbath, &self.bloodbath),
            (EventCategory::Player, &self.player),
        ] {
            for (i, event) in events.iter().enumerate() {
                if let Some(id) = &event.id {
                    self.index.insert((category, id.0.clone()), i);
                }
            }
        }
        for (i, arena) in self.arena.iter().enumerate() {
            self.index.insert((EventCategory::Arena, arena.id.0.clone()), i);
        }
    }

    /// Load `bloodbath.json`, `player.json`, `arena.json`, `weapons.json` and
    /// `battles.json` from a directory. Missing files yield empty categories.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let bloodbath: Vec<Event> = read_json_or_default(&dir.join("bloodbath.json"))?;
        let player: Vec<Event> = read_json_or_default(&dir.join("player.json"))?;
        let arena: Vec<ArenaEvent> = read_json_or_default(&dir.join("arena.json"))?;
        let weapons: WeaponTable = read_json_or_default(&dir.join("weapons.json"))?;
        let battles: BattleCatalog = read_json_or_default(&dir.join("battles.json"))?;
        info!(
            bloodbath = bloodbath.len(),
            player = player.len(),
            arena = arena.len(),
            weapons = weapons.weapons.len(),
            "Loaded event catalog from {}",
            dir.display()
        );
        Ok(Self::new(bloodbath, player, arena, weapons, battles))
    }

    /// Events of a flat category. Arena and weapon categories hold nested
    /// events and return an empty slice here; see [`Self::arena`] and
    /// [`Self::weapons`].
    pub fn events(&self, category: EventCategory) -> &[Event] {
        match category {
            EventCategory::Bloodbath => &self.bloodbath,
            EventCategory::Player => &self.player,
            EventCategory::Arena | EventCategory::Weapon => &[],
        }
    }

    pub fn arena(&self) -> &[ArenaEvent] {
        &self.arena
    }

    pub fn weapons(&self) -> &WeaponTable {
        &self.weapons
    }

    pub fn battles(&self) -> &BattleCatalog {
        &self.battles
    }

    pub fn get(&self, category: EventCategory, id: &str) -> Option<CatalogEntry<'_>> {
        if category == EventCategory::Weapon {
            return self.weapons.get(id).map(CatalogEntry::Weapon);
        }
        let i = *self.index.get(&(category, id.to_string()))?;
        match category {
            EventCategory::Bloodbath => self.bloodbath.get(i).map(CatalogEntry::Event),
            EventCategory::Player => self.player.get(i).map(CatalogEntry::Event),
            EventCategory::Arena => self.arena.get(i).map(CatalogEntry::Arena),
            EventCategory::Weapon => None,
        }
    }

    /// All ids in a category, in catalog order
    pub fn ids(&self, category: EventCategory) -> Vec<EventId> {
        match category {
            EventCategory::Bloodbath | EventCategory::Player => self
                .events(category)
                .iter()
                .filter_map(|e| e.id.clone())
                .collect(),
            EventCategory::Arena => self.arena.iter().map(|a| a.id.clone()).collect(),
            EventCategory::Weapon => self.weapons.weapons.keys().map(EventId::new).collect(),
        }
    }
}

fn tag_kind(events: Vec<Event>, kind: EventKind) -> Vec<Event> {
    events
        .into_iter()
        .map(|mut e| {
            e.kind = kind;
            e
        })
        .collect()
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Shared handle to a catalog that may still be loading
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    rx: watch::Receiver<Option<Arc<EventCatalog>>>,
}

impl CatalogHandle {
    /// Handle to an already loaded catalog
    pub fn ready(catalog: EventCatalog) -> Self {
        let (_tx, rx) = watch::channel(Some(Arc::new(catalog)));
        Self { rx }
    }

    /// Start loading a catalog directory in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_load(dir: PathBuf) -> Self {
        let (tx, rx) = watch::channel(None);
        tokio::task::spawn_blocking(move || match EventCatalog::load_dir(&dir) {
            Ok(catalog) => {
                let _ = tx.send(Some(Arc::new(catalog)));
            }
            Err(e) => error!("Failed to load event catalog from {}: {}", dir.display(), e),
        });
        Self { rx }
    }

    pub fn is_ready(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait until the catalog has loaded.
    pub async fn wait_for_ready(&self) -> Result<Arc<EventCatalog>> {
        let mut rx = self.rx.clone();
        let guard = rx
            .wait_for(|c| c.is_some())
            .await
            .map_err(|_| HgError::CatalogUnavailable("catalog loader stopped".to_string()))?;
        let loaded = Option::clone(&guard);
        loaded.ok_or_else(|| HgError::CatalogUnavailable("catalog missing".to_string()))
    }
}
