mod class;
mod date;
mod delivery;
mod occurrence;
mod preferences;
mod recurrence;
mod reminder;
mod shared;
mod timespan;
mod user;

pub use class::{ClassDefinition, InstitutionSettings, InvalidClassError};
pub use date::local_to_instant;
pub use delivery::{
    settle_outcomes, ClaimStatus, DeliveryLogEntry, DeliveryStatus, ReminderClaim,
};
pub use occurrence::Occurrence;
pub use preferences::{
    parse_time_of_day, ChannelKind, Channels, NotificationPreferences, QuietHours,
    ALLOWED_LEAD_TIMES,
};
pub use recurrence::Recurrence;
pub use reminder::{fire_plan, FirePlan, ReminderTask, TaskKey};
pub use shared::entity::{Entity, ID};
pub use timespan::TimeSpan;
pub use user::{Role, User};
