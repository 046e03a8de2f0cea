//! Prompt template for filename classification.

/// Placeholder replaced with the file name.
const FILENAME_SLOT: &str = "{filename}";

const TEMPLATE: &str = r#"You are an expert at organizing video libraries. Analyze the file name "{filename}" and extract its metadata.

Respond with a strict JSON object, no other text:
{"title": "common Chinese release title", "type": "Anime|Movie|Doc|TV", "year": "release year", "season": 1, "episode": 1}

Rules:
1. type: Anime (animation), Movie (feature film), Doc (documentary), TV (live-action series)
2. title: drop any subtitle
3. year: required for movies"#;

/// Build the classification prompt for a file name.
///
/// The output depends only on `filename`.
pub fn build_prompt(filename: &str) -> String {
    TEMPLATE.replace(FILENAME_SLOT, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_filename() {
        let prompt = build_prompt("Attack.on.Titan.S04E05.1080p.mkv");
        assert!(prompt.contains("\"Attack.on.Titan.S04E05.1080p.mkv\""));
        assert!(!prompt.contains(FILENAME_SLOT));
    }

    #[test]
    fn test_prompt_lists_categories_and_fields() {
        let prompt = build_prompt("x.mkv");
        for code in ["Anime", "Movie", "Doc", "TV"] {
            assert!(prompt.contains(code), "missing {code}");
        }
        for field in ["\"title\"", "\"type\"", "\"year\"", "\"season\"", "\"episode\""] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt("a.mkv"), build_prompt("a.mkv"));
        assert_ne!(build_prompt("a.mkv"), build_prompt("b.mkv"));
    }
}
