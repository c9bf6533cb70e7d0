use crate::EverhourError;

pub const DEFAULT_API_URL: &str = "https://api.everhour.com";

#[derive(Debug, Clone)]
pub struct EverhourURL(String);

impl AsRef<str> for EverhourURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl EverhourURL {
    /// Validates `base` as an absolute http(s) URL and strips trailing slashes.
    pub fn parse(base: &str) -> Result<Self, EverhourError> {
        let trimmed = base.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(EverhourError::InvalidUrl(base.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Append a path segment, percent-encoding it.
    pub fn append_segment(&self, segment: &str) -> Self {
        self.append_path(&urlencoding::encode(segment))
    }

    pub fn with_query(&self, key: &str, value: &str) -> Self {
        let separator = if self.0.contains('?') { '&' } else { '?' };
        Self(format!(
            "{}{}{}={}",
            self.0,
            separator,
            key,
            urlencoding::encode(value)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_task_listing_url() {
        let url = EverhourURL::parse("https://api.everhour.com/")
            .unwrap()
            .append_path("/projects")
            .append_segment("ev:123")
            .append_path("tasks")
            .with_query("limit", "250")
            .with_query("excludeClosed", "false");

        assert_eq!(
            url.as_ref(),
            "https://api.everhour.com/projects/ev%3A123/tasks?limit=250&excludeClosed=false"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(matches!(
            EverhourURL::parse("api.everhour.com"),
            Err(EverhourError::InvalidUrl(_))
        ));
    }
}
