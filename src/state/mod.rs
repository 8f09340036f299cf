pub mod actions;
pub mod movement;
pub mod session;
pub mod store;
pub mod transfer;

pub use session::{Session, SessionAction};
pub use store::{MovementOptions, Store, StoreAction, StoreContext, Viewer};
