//! Commands Layer
//!
//! Message handlers that bridge the UI surfaces to the worker's services.

mod history_cmd;
mod message;
mod page_cmd;
mod router;
mod status_cmd;
mod sync_cmd;

pub use history_cmd::*;
pub use message::{Badge, Request, Response};
pub use page_cmd::*;
pub use router::{handle_json, handle_message};
pub use status_cmd::*;
pub use sync_cmd::*;
