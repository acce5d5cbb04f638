mod contextupdate;

pub use contextupdate::context_update_server::{ContextUpdate, ContextUpdateServer};
pub use contextupdate::*;
