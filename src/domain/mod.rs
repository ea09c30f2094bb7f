pub mod credentials;
pub mod error;
pub mod platform;
pub mod requirement;
pub mod test_case;
pub mod workflow;
