//! External configuration tunables for the JIT generator.

use serde::Deserialize;

/// Optional generator tunables sourced from external configuration.
///
/// Absent values leave the generator defaults untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JitConfig {
    #[serde(default)]
    pub jit_opt_level: Option<i32>,
    #[serde(default)]
    pub jit_fast_math: Option<bool>,
}

impl JitConfig {
    /// Parse a configuration blob, e.g. `{"jit_opt_level": 2}`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_stay_unset() {
        let config = JitConfig::from_json("{}").unwrap();
        assert_eq!(config, JitConfig::default());
    }

    #[test]
    fn parse_tunables() {
        let config = JitConfig::from_json(r#"{"jit_opt_level": 2, "jit_fast_math": true}"#).unwrap();
        assert_eq!(config.jit_opt_level, Some(2));
        assert_eq!(config.jit_fast_math, Some(true));
    }
}
