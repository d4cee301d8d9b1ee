mod keyword_normalizer;
mod text_normalizer;

pub use keyword_normalizer::KeywordNormalizer;
pub use text_normalizer::TextNormalizer;
