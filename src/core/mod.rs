pub mod decoder;
pub mod framer;
pub mod receiver;
pub mod scheduler;
pub mod state;

pub use crate::domain::message::{ProtocolMessage, ResultsPhase};
pub use crate::domain::model::{DisplayMode, Frame, ResultEntry};
pub use crate::domain::ports::{ConfigProvider, Renderer, Transport};
pub use crate::utils::error::Result;
