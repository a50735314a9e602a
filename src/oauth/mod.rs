pub mod authorize;
pub mod callback;
pub mod device;
pub mod state;
pub mod token;

pub use authorize::{build_authorize_url, RedirectTarget};
pub use callback::{CallbackListener, CallbackParams, PendingCallback};
pub use device::{poll_for_token, request_device_code, DeviceAuthorization, PollSettings};
pub use state::generate_state;
pub use token::{exchange_code, password_grant, TokenResponse};
