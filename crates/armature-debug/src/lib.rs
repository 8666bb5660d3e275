//! Debug tools for armature - TCP debug server for inspecting and driving
//! skeletal animation at runtime
//!
//! Start the debug server inside a tokio runtime:
//! ```ignore
//! let handler = Arc::new(Mutex::new(AnimationInspector::new(animator, skeleton)));
//! let server = DebugServer::bind(handler, ("127.0.0.1", DEFAULT_PORT)).await?;
//! ```

pub mod protocol;
pub mod server;

pub use protocol::*;
pub use server::{DebugHandler, DebugServer};

/// Default debug server port
pub const DEFAULT_PORT: u16 = 9743;
