//! Generation domain - "given a prompt, return text"

mod provider;

pub use provider::Generator;

#[cfg(test)]
pub use provider::mock::MockGenerator;
