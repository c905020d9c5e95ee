mod outcome;
mod reply;
mod request;

pub use outcome::FetchOutcome;
pub use reply::{FirstReply, Reply};
pub use request::{is_safe_name, Request};
