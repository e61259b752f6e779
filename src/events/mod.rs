//! Event templates and the catalog that holds them

pub mod arena;
pub mod battle;
pub mod catalog;
pub mod event;
pub mod messages;
pub mod outcome;
pub mod validate;
pub mod weapon;

pub use arena::ArenaEvent;
pub use battle::{AttackTemplate, BattleCatalog};
pub use catalog::{CatalogEntry, CatalogHandle, EventCatalog, EventCategory};
pub use event::{Consumes, Event, EventKind, Role, WeaponGrant};
pub use messages::{MessageKind, MessageTemplates};
pub use outcome::{Outcome, OutcomeProbabilities};
pub use weapon::{WeaponEvent, WeaponTable};
