pub mod credentials;
pub mod token;
pub mod user;
