//! Game state for one guild

use crate::core::config::GameOptions;
use crate::core::types::{EventId, GuildId, PlayerId};
use crate::events::arena::ArenaEvent;
use crate::events::catalog::EventCategory;
use crate::events::event::Event;
use crate::events::validate::{self, ValidationError};
use crate::events::weapon::{WeaponEvent, WeaponTable};
use crate::game::day::Day;
use crate::game::forced::ForcedOutcome;
use crate::game::grammar::select_plural;
use crate::game::player::Player;
use crate::game::team::Team;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One game: its roster, teams and day progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub name: String,
    pub in_progress: bool,
    pub ended: bool,
    pub included_users: Vec<Player>,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub forced_outcomes: Vec<ForcedOutcome>,
    pub num_alive: u32,
    /// The most recently simulated day
    pub day: Day,
    /// Shell for the upcoming day; may already hold staged events
    pub next_day: Day,
}

impl Default for Game {
    fn default() -> Self {
        Self::new("Hungry Games", Vec::new(), Vec::new())
    }
}

impl Game {
    pub fn new(name: &str, players: Vec<Player>, teams: Vec<Team>) -> Self {
        let num_alive = players.iter().filter(|p| p.living).count() as u32;
        Self {
            name: name.to_string(),
            in_progress: false,
            ended: false,
            included_users: players,
            teams,
            forced_outcomes: Vec::new(),
            num_alive,
            day: Day::default(),
            next_day: Day::new(0),
        }
    }

    pub fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.included_users.iter().position(|p| &p.id == id)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.included_users.iter().find(|p| &p.id == id)
    }

    pub fn num_total(&self) -> u32 {
        self.included_users.len() as u32
    }

    pub fn teams_alive(&self) -> usize {
        self.teams.iter().filter(|t| t.is_alive()).count()
    }

    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.included_users.iter().filter(|p| p.living)
    }

    /// Whether the game has a winner (or nobody left)
    pub fn is_over(&self, options: &GameOptions) -> bool {
        if self.num_alive <= 1 {
            return true;
        }
        options.team_size > 0 && !self.teams.is_empty() && self.teams_alive() <= 1
    }
}

/// Events authored by a guild, merged into the built-in catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomEvents {
    #[serde(default)]
    pub bloodbath: Vec<Event>,
    #[serde(default)]
    pub player: Vec<Event>,
    #[serde(default)]
    pub arena: Vec<ArenaEvent>,
    #[serde(default)]
    pub weapon: BTreeMap<String, WeaponEvent>,
}

/// Ids a guild has switched off.
///
/// Arena and weapon sub-outcomes are listed as `"<parentId>/<outcomeId>"`.
/// Whole arena events are listed by their own id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisabledEvents {
    #[serde(default)]
    pub bloodbath: BTreeSet<String>,
    #[serde(default)]
    pub player: BTreeSet<String>,
    #[serde(default)]
    pub arena: BTreeSet<String>,
    #[serde(default)]
    pub weapon: BTreeSet<String>,
}

impl DisabledEvents {
    fn set(&self, category: EventCategory) -> &BTreeSet<String> {
        match category {
            EventCategory::Bloodbath => &self.bloodbath,
            EventCategory::Player => &self.player,
            EventCategory::Arena => &self.arena,
            EventCategory::Weapon => &self.weapon,
        }
    }

    fn set_mut(&mut self, category: EventCategory) -> &mut BTreeSet<String> {
        match category {
            EventCategory::Bloodbath => &mut self.bloodbath,
            EventCategory::Player => &mut self.player,
            EventCategory::Arena => &mut self.arena,
            EventCategory::Weapon => &mut self.weapon,
        }
    }

    pub fn is_disabled(&self, category: EventCategory, id: &str) -> bool {
        self.set(category).contains(id)
    }

    /// Whether an event is switched off. Events without ids cannot be.
    pub fn is_event_disabled(&self, category: EventCategory, event: &Event) -> bool {
        event
            .id_str()
            .map(|id| self.is_disabled(category, id))
            .unwrap_or(false)
    }

    pub fn disable(&mut self, category: EventCategory, id: impl Into<String>) {
        self.set_mut(category).insert(id.into());
    }

    pub fn enable(&mut self, category: EventCategory, id: &str) -> bool {
        self.set_mut(category).remove(id)
    }
}

/// Everything a guild keeps about its game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildGame {
    pub id: GuildId,
    pub options: GameOptions,
    #[serde(default)]
    pub custom_events: CustomEvents,
    #[serde(default)]
    pub disabled_events: DisabledEvents,
    pub current_game: Game,
}

impl GuildGame {
    pub fn new(id: GuildId, options: GameOptions, game: Game) -> Self {
        Self {
            id,
            options,
            custom_events: CustomEvents::default(),
            disabled_events: DisabledEvents::default(),
            current_game: game,
        }
    }

    /// Validate and store an authored event, returning its new id.
    ///
    /// Bloodbath and player events may only grant weapons found in
    /// `weapons` or among the guild's custom weapons. Weapons are keyed by
    /// their singular name; see [`GuildGame::add_custom_weapon`].
    pub fn add_custom_event(
        &mut self,
        category: EventCategory,
        data: &Value,
        weapons: &WeaponTable,
        creator: &str,
        timestamp_ms: u64,
    ) -> Result<EventId, ValidationError> {
        let id = EventId::generate_custom(creator, timestamp_ms);
        match category {
            EventCategory::Bloodbath | EventCategory::Player => {
                let mut event = validate::validate_event(data)?;
                validate::check_weapon_references(
                    &event,
                    &weapons.merged_with(&self.custom_events.weapon),
                )?;
                event.id = Some(id.clone());
                if category == EventCategory::Bloodbath {
                    self.custom_events.bloodbath.push(event);
                } else {
                    self.custom_events.player.push(event);
                }
            }
            EventCategory::Arena => {
                let mut arena = validate::validate_arena_event(data)?;
                arena.id = id.clone();
                self.custom_events.arena.push(arena);
            }
            EventCategory::Weapon => {
                let weapon = validate::validate_weapon_event(data)?;
                let name = weapon.name.as_deref().ok_or(ValidationError::BadData)?;
                let weapon_id = select_plural(name, 'C', false);
                if weapon_id.trim().is_empty() {
                    return Err(ValidationError::BadData);
                }
                return Ok(self.add_custom_weapon(&weapon_id, weapon, creator, timestamp_ms));
            }
        }
        Ok(id)
    }

    /// Store a custom weapon under `weapon_id` and return that id.
    ///
    /// An existing custom weapon with the same id takes the new name and
    /// consumable when given, and gains only the outcomes it does not
    /// already have.
    pub fn add_custom_weapon(
        &mut self,
        weapon_id: &str,
        mut weapon: WeaponEvent,
        creator: &str,
        timestamp_ms: u64,
    ) -> EventId {
        weapon.custom = true;
        for outcome in weapon.outcomes.iter_mut() {
            outcome.custom = true;
            if outcome.id.is_none() {
                outcome.id = Some(EventId::generate_custom(creator, timestamp_ms));
            }
        }
        match self.custom_events.weapon.get_mut(weapon_id) {
            Some(existing) => {
                if weapon.name.is_some() {
                    existing.name = weapon.name;
                }
                if weapon.consumable.is_some() {
                    existing.consumable = weapon.consumable;
                }
                for outcome in weapon.outcomes {
                    if !existing.outcomes.iter().any(|e| e.same_content(&outcome)) {
                        existing.outcomes.push(outcome);
                    }
                }
            }
            None => {
                self.custom_events.weapon.insert(weapon_id.to_string(), weapon);
            }
        }
        EventId::new(weapon_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TeamId;
    use serde_json::json;

    #[test]
    fn test_game_counts_living_players() {
        let mut dead = Player::new("2", "Bob");
        dead.living = false;
        let game = Game::new("Test", vec![Player::new("1", "Alice"), dead], vec![]);
        assert_eq!(game.num_alive, 1);
        assert_eq!(game.num_total(), 2);
        assert_eq!(game.day.num, -1);
        assert!(game.is_over(&GameOptions::default()));
    }

    #[test]
    fn test_single_team_left_ends_team_game() {
        let players = vec![Player::new("1", "A"), Player::new("2", "B")];
        let teams = vec![
            Team::new(TeamId(0), "Team 1", vec![PlayerId::new("1"), PlayerId::new("2")]),
            Team::new(TeamId(1), "Team 2", vec![]),
        ];
        let mut game = Game::new("Test", players, teams);
        game.teams[1].num_alive = 0;
        let options = GameOptions {
            team_size: 2,
            ..Default::default()
        };
        assert!(game.is_over(&options));
        assert!(!game.is_over(&GameOptions::default()));
    }

    #[test]
    fn test_add_custom_event_assigns_id() {
        let mut guild = GuildGame::new(GuildId::new("g"), GameOptions::default(), Game::default());
        let id = guild
            .add_custom_event(
                EventCategory::Player,
                &json!({"message": "{victim} sneezes.", "victim": {"count": 1, "outcome": "nothing"}}),
                &WeaponTable::default(),
                "123456789012345678",
                1_700_000_000_000,
            )
            .unwrap();
        assert!(id.is_custom_format());
        assert_eq!(guild.custom_events.player[0].id.as_ref(), Some(&id));

        assert_eq!(
            guild.add_custom_event(
                EventCategory::Player,
                &json!({}),
                &WeaponTable::default(),
                "123456789012345678",
                1
            ),
            Err(ValidationError::BadMessage)
        );
    }

    fn sword_outcome(message: &str) -> Value {
        json!({
            "message": message,
            "victim": {"count": 1, "outcome": "wounded"},
            "attacker": {"count": 1, "outcome": "nothing"}
        })
    }

    #[test]
    fn test_custom_weapon_keyed_by_name_and_merged() {
        let mut guild = GuildGame::new(GuildId::new("g"), GameOptions::default(), Game::default());
        let creator = "123456789012345678";
        let first = json!({
            "name": "[Csword|swords]",
            "outcomes": [sword_outcome("{attacker} swings at {victim}.")]
        });
        let id = guild
            .add_custom_event(EventCategory::Weapon, &first, &WeaponTable::default(), creator, 1)
            .unwrap();
        assert_eq!(id, EventId::new("sword"));

        let second = json!({
            "name": "[Csword|swords]",
            "consumable": "[Cblade|blades]",
            "outcomes": [
                sword_outcome("{attacker} swings at {victim}."),
                sword_outcome("{attacker} stabs {victim}.")
            ]
        });
        guild
            .add_custom_event(EventCategory::Weapon, &second, &WeaponTable::default(), creator, 2)
            .unwrap();

        let sword = &guild.custom_events.weapon["sword"];
        assert_eq!(guild.custom_events.weapon.len(), 1);
        assert_eq!(sword.outcomes.len(), 2);
        assert_eq!(sword.consumable.as_deref(), Some("[Cblade|blades]"));
        assert!(sword.outcomes.iter().all(|o| o.custom && o.id.is_some()));
    }

    #[test]
    fn test_custom_event_weapon_must_exist() {
        let mut guild = GuildGame::new(GuildId::new("g"), GameOptions::default(), Game::default());
        let creator = "123456789012345678";
        let grant = json!({
            "message": "{victim} finds a sword.",
            "victim": {"count": 1, "outcome": "nothing", "weapon": {"id": "sword", "count": 1}}
        });
        assert_eq!(
            guild.add_custom_event(EventCategory::Player, &grant, &WeaponTable::default(), creator, 1),
            Err(ValidationError::BadVictimWeapon)
        );

        let sword = json!({"name": "sword", "outcomes": [sword_outcome("{attacker} swings at {victim}.")]});
        guild
            .add_custom_event(EventCategory::Weapon, &sword, &WeaponTable::default(), creator, 2)
            .unwrap();
        assert!(guild
            .add_custom_event(EventCategory::Player, &grant, &WeaponTable::default(), creator, 3)
            .is_ok());
    }

    #[test]
    fn test_disable_and_enable() {
        let mut disabled = DisabledEvents::default();
        disabled.disable(EventCategory::Arena, "flood/drown");
        assert!(disabled.is_disabled(EventCategory::Arena, "flood/drown"));
        assert!(!disabled.is_disabled(EventCategory::Weapon, "flood/drown"));
        assert!(disabled.enable(EventCategory::Arena, "flood/drown"));
    }
}
