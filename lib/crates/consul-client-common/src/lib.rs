pub mod protocol;
pub mod types;

pub use protocol::{AlertMessage, AlertResponse, NetworkStatus, PROTOCOL_VERSION, ResponseStatus};
pub use types::FailureState;
