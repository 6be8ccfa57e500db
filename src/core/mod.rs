pub mod abilities;
pub mod battle;
pub mod conditions;
pub mod descriptor;
pub mod dispatch;
pub mod effects;
pub mod events;
pub mod factory;
pub mod items;
pub mod log;
pub mod modifier;
pub mod replay;
pub mod state;
pub mod statuses;
pub mod utils;
