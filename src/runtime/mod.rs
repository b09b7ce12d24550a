//! Runtime support for streaming decoder graphs

pub mod cursor;
pub mod edge;
pub mod errors;
pub mod node;
pub mod ports;
pub mod receiver;
pub mod scheduler;
pub mod sender;

pub use cursor::EdgeCursor;
pub use edge::{BitLevel, Edge};
pub use errors::{WorkError, WorkResult};
pub use node::ProcessNode;
pub use ports::{InputPort, OutputPort, channel};
pub use receiver::Receiver;
pub use scheduler::Scheduler;
pub use sender::{ChannelMessage, Sender};
