pub mod command;
pub mod decision;
pub mod duckduckgo;
pub mod huggingface;
pub mod openai_compatible;
pub mod openai_images;
pub mod traits;
pub mod youtube;

pub use command::{CommandRecognizer, CommandSynthesizer};
pub use decision::DecisionModel;
pub use duckduckgo::DuckDuckGoSearch;
pub use huggingface::HuggingFaceImageProvider;
pub use openai_compatible::OpenAICompatibleProvider;
pub use openai_images::OpenAIImageProvider;
pub use traits::*;
pub use youtube::YouTubeLocator;
