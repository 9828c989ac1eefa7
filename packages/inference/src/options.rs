/// Configuration options for type inference
#[derive(Debug, Clone)]
pub struct InferenceOptions {
    /// Names that are never turned into fields; reserved for values the
    /// renderer injects at runtime
    pub reserved_names: Vec<String>,

    /// Type given to a variable that is only known from usage
    pub default_type: String,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            reserved_names: vec!["Props".to_string(), "Remaining".to_string()],
            default_type: "any".to_string(),
        }
    }
}

impl InferenceOptions {
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.iter().any(|reserved| reserved == name)
    }
}
