use crate::domain::requirement::{RequirementFile, RequirementInput};

/// Owns the rule that a requirement comes from a file or from text, never both.
#[derive(Debug, Clone, Default)]
pub struct InputArbiter {
    input: RequirementInput,
}

impl InputArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_file(&mut self, file: RequirementFile) {
        self.input = RequirementInput::File(file);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input = RequirementInput::Text(text.into());
    }

    pub fn clear(&mut self) {
        self.input = RequirementInput::None;
    }

    pub fn has_requirement(&self) -> bool {
        self.input.has_requirement()
    }

    pub fn input(&self) -> &RequirementInput {
        &self.input
    }

    pub fn file(&self) -> Option<&RequirementFile> {
        match &self.input {
            RequirementInput::File(file) => Some(file),
            _ => None,
        }
    }

    /// Typed text, or "" when the source is a file or nothing.
    pub fn text(&self) -> &str {
        match &self.input {
            RequirementInput::Text(text) => text,
            _ => "",
        }
    }
}
