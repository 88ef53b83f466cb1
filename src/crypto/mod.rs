pub mod password;

pub use password::Credential;
