pub mod composer;
pub mod contraindication;
pub mod messages;
pub mod policy;
pub mod registry;
pub mod titration;
pub mod types;

pub use composer::*;
pub use contraindication::*;
pub use messages::*;
pub use policy::*;
pub use registry::*;
pub use titration::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TitrationError {
    #[error("Unknown medication: {0}")]
    UnknownMedication(String),

    #[error("Invalid dose ladder for {medication}: {reason}")]
    InvalidLadder { medication: String, reason: String },
}
