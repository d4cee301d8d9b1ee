/// Trait for turning raw text into a canonical, comparable form
pub trait TextNormalizer: Send + Sync {
    /// Normalize transcript or keyword text
    fn normalize(&self, text: &str) -> String;

    /// Get the name of this normalizer for logging
    fn name(&self) -> &'static str;
}
