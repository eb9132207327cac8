mod persistence;
mod session;
mod store;

pub use persistence::JsonFileStore;
pub use session::PlanSession;
pub use store::{closest_client, prepare_for_save, MemoryStore, PlanStore};
