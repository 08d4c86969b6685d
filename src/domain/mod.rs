pub mod assignment;
pub mod catalog;
pub mod credential;
pub mod dates;
pub mod entitlement;
pub mod payment;
pub mod program;
pub mod user;
pub mod verification;

pub use assignment::*;
pub use catalog::*;
pub use credential::{Credential, CredentialParseError, CredentialSigner};
pub use entitlement::Coverage;
pub use payment::*;
pub use program::*;
pub use user::*;
pub use verification::*;
