//! Account, session and profile operations. Each takes the store connection
//! explicitly; none of them hold state between calls.

pub mod credentials;
pub mod profile;
pub mod sessions;

pub use sessions::Token;
