pub mod credential_store;
pub mod export;
pub mod generation;
pub mod input_arbiter;
pub mod integration;
pub mod traceability;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
