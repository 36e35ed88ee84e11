/// The default WordPress REST route listing venue posts
pub const DEFAULT_SOURCE_URL: &str = "https://lane7stage.wpenginepowered.com/wp-json/wp/v2/venue";

/// Venues are pulled in a single page of this size.
pub const SOURCE_PAGE_SIZE: u32 = 30;

/// The default base URL of the target CMS REST API
pub const DEFAULT_CMS_BASE_URL: &str = "http://localhost:3000/api";

/// Upper bound used when listing CMS collections for deletion
pub const CMS_LIST_LIMIT: u32 = 1000;

/// The default chat-completion endpoint used for geocoding
pub const DEFAULT_GEOCODE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_GEOCODE_MODEL: &str = "gpt-4o-mini";
pub const GEOCODE_MAX_TOKENS: u32 = 50;
pub const GEOCODE_SYSTEM_PROMPT: &str =
    r#"Return ONLY JSON with latitude/longitude: {"latitude": number, "longitude": number}"#;

/// Local directory holding downloaded images between stages
pub const DEFAULT_IMAGES_DIR: &str = "./scripts/temp_images";

/// Local directory holding the exported snapshot
pub const DEFAULT_OUTPUT_DIR: &str = "./scripts/output";
pub const SNAPSHOT_FILE_NAME: &str = "venues.json";

/// Default pause between venues, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Separator between weekday/hours pairs in `opening_hours`
pub const OPENING_HOURS_SEPARATOR: &str = " | ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_urls_have_no_trailing_slash() {
        for url in [DEFAULT_SOURCE_URL, DEFAULT_CMS_BASE_URL, DEFAULT_GEOCODE_URL] {
            assert!(!url.ends_with('/'), "{url} ends with a slash");
        }
    }

    #[test]
    fn system_prompt_names_both_keys() {
        assert!(GEOCODE_SYSTEM_PROMPT.contains("\"latitude\""));
        assert!(GEOCODE_SYSTEM_PROMPT.contains("\"longitude\""));
    }
}
