//! Area transitions
//!
//! Reacts to zone changes: opens and closes map runs, restarts the session
//! on new areas and hides time spent in towns and hideouts.

mod controller;


pub use controller::{AreaTransition, AreaTransitionController, TrackState};
