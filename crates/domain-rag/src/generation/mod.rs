//! Prompt construction and structured answer generation

mod answer;
mod prompt;
mod synthesizer;

pub use answer::parse_answer;
pub use prompt::PromptBuilder;
pub use synthesizer::AnswerSynthesizer;
