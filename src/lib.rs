pub mod account;
pub mod browser;
pub mod credentials;
pub mod error;
pub mod flows;
pub mod http;
pub mod logging;
pub mod oauth;
pub mod persist;

pub use error::AuthError;
pub use flows::daikin::{DaikinOptions, DaikinSession};
pub use flows::tado::{Mode, TadoOptions, TadoOutcome};
pub use persist::{CredentialRecord, FileLayout};
