use std::fmt;

/// A bearer credential for one of the remote APIs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken {
    token: String,
}

impl ApiToken {
    /// From a raw token string.
    pub fn from_raw(token: &str) -> Self {
        Self {
            token: token.to_owned(),
        }
    }

    /// From an optional configured value. Blank values mean "no token".
    pub fn from_optional(token: Option<&str>) -> Option<Self> {
        token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Self::from_raw)
    }

    pub fn get(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken").field("token", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_absent() {
        assert!(ApiToken::from_optional(None).is_none());
        assert!(ApiToken::from_optional(Some("")).is_none());
        assert!(ApiToken::from_optional(Some("   ")).is_none());
        assert_eq!(
            ApiToken::from_optional(Some(" abc ")).unwrap().get(),
            "abc"
        );
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let token = ApiToken::from_raw("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));
    }
}
