mod cache;
mod info;

pub use cache::TrackerCache;
pub use info::{AreaInstance, PlayerSnapshot};
