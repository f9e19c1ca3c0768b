pub mod machine;
pub mod service;

pub use machine::{AttemptTicket, LogoDisplay, ResolutionMachine, ResolutionState, Step};
pub use service::LogoService;
