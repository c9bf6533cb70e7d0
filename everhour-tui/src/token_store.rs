use anyhow::{Context, Result};
use everhour::ApiToken;
use std::path::Path;
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use crate::config::EverhourConfig;

/// Overrides the token file when set.
pub const TOKEN_ENV: &str = "EVERHOUR_API_TOKEN";

pub(crate) fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

/// Token from `EVERHOUR_API_TOKEN`, else from the token file. `None` if neither is set.
pub fn load_token() -> Result<Option<ApiToken>> {
    if let Ok(value) = std::env::var(TOKEN_ENV) {
        let value = value.trim();
        if !value.is_empty() {
            return Ok(Some(ApiToken::new(value)));
        }
    }
    load_token_from(&EverhourConfig::token_path()?)
}

pub fn load_token_from(path: &Path) -> Result<Option<ApiToken>> {
    if !path.exists() {
        return Ok(None);
    }

    let token = std::fs::read_to_string(path).context("Failed to read token file")?;
    let token = token.trim();
    if token.is_empty() {
        return Ok(None);
    }
    Ok(Some(ApiToken::new(token)))
}

pub fn save_token(token: &ApiToken) -> Result<()> {
    save_token_to(&EverhourConfig::token_path()?, token)
}

pub fn save_token_to(path: &Path, token: &ApiToken) -> Result<()> {
    secure_write(path, token.expose())
}

pub fn clear_token() -> Result<()> {
    let path = EverhourConfig::token_path()?;
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");

        assert_eq!(load_token_from(&path).unwrap(), None);
        save_token_to(&path, &ApiToken::new("0123456789abcdef")).unwrap();
        assert_eq!(
            load_token_from(&path).unwrap(),
            Some(ApiToken::new("0123456789abcdef"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        save_token_to(&path, &ApiToken::new("0123456789abcdef")).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
