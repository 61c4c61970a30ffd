//! Strategies adapting external providers to the capability chains.

pub mod automation;
pub mod chat;
pub mod image;
pub mod search;
pub mod speech;

pub use automation::{google_search_url, youtube_search_url, DesktopActions, WebFallback};
pub use chat::{realtime_context, strip_blank_lines, ChatStrategy, Persona};
pub use image::{image_file_name, ImageRequest, ImageStrategy};
pub use search::{format_digest, AnsweredSearch, DigestSearch};
pub use speech::{condense_for_speech, normalize_query, RecognitionStrategy, SttRequest, SynthesisStrategy};

/// Longest file stem derived from user text, in bytes. Keeps generated
/// names well under the common 255-byte file name limit.
pub const MAX_STEM_BYTES: usize = 100;

/// Cut `stem` to at most `MAX_STEM_BYTES` on a char boundary.
pub(crate) fn clip_stem(stem: &str) -> &str {
    if stem.len() <= MAX_STEM_BYTES {
        return stem;
    }
    let mut end = MAX_STEM_BYTES;
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    &stem[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_stem() {
        assert_eq!(clip_stem("short"), "short");
        assert_eq!(clip_stem(&"a".repeat(400)).len(), MAX_STEM_BYTES);
        // 'é' is two bytes; 99 of them would straddle the limit
        let long = "é".repeat(99);
        let clipped = clip_stem(&long);
        assert_eq!(clipped.len(), MAX_STEM_BYTES);
        assert!(clipped.chars().all(|c| c == 'é'));
        let odd = format!("a{}", "é".repeat(60));
        assert_eq!(clip_stem(&odd).len(), 99);
    }
}
