use peershare_core::utils::Logger;

pub mod fetcher;
pub mod handler;
pub mod listener;
pub mod storage;

pub static LOGGER: Logger = Logger::verbose("peer");

pub use fetcher::{fetch, fetch_detached};
pub use listener::start;
pub use storage::{add_to_shared, list_shared, PeerDirs};
