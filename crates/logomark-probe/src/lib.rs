pub mod driver;
pub mod error;
pub mod http;
pub mod source;

pub use driver::{
    drive, drive_with_clock, resume, resume_with_clock, AttemptRecord, DriveReport,
};
pub use error::{ProbeError, Result};
pub use http::HttpProbe;
pub use source::{ImageProbe, ProbeOutcome};
