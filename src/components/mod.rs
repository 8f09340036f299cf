pub mod app;
pub mod common;
pub mod grid;
pub mod inventory;
pub mod menu;
pub mod player;
pub mod sidebar;
