pub mod gherkin;
pub mod xml;
