use std::path::Path;

use serde::Deserialize;

use crate::error::AuthError;

/// Read a username/password pair from a file: the first two non-blank lines.
pub fn read_password_file(path: &Path) -> Result<(String, String), AuthError> {
    let data = std::fs::read_to_string(path)?;
    parse_password_lines(&data)
}

pub fn parse_password_lines(data: &str) -> Result<(String, String), AuthError> {
    let mut lines = data.lines().map(str::trim).filter(|l| !l.is_empty());
    match (lines.next(), lines.next()) {
        (Some(user), Some(pass)) => Ok((user.to_string(), pass.to_string())),
        _ => Err(AuthError::Credentials(
            "password file must contain username on line 1 and password on line 2".to_string(),
        )),
    }
}

/// Client credentials that may be supplied from a file instead of flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
}

impl ClientCredentials {
    fn is_empty(&self) -> bool {
        self.client_id.is_empty()
            && self.client_secret.is_empty()
            && self.refresh_token.is_empty()
            && self.scope.is_empty()
    }

    /// Fill empty fields from `other`, keeping values already set.
    pub fn fill_from(&mut self, other: &ClientCredentials) {
        for (mine, theirs) in [
            (&mut self.client_id, &other.client_id),
            (&mut self.client_secret, &other.client_secret),
            (&mut self.scope, &other.scope),
        ] {
            if mine.is_empty() {
                mine.clone_from(theirs);
            }
        }
    }
}

/// Either the nested Daikin layout or flat top-level keys.
#[derive(Debug, Default, Deserialize)]
struct CredentialsDocument {
    #[serde(default)]
    daikin_onecta: Option<ClientCredentials>,
    #[serde(flatten)]
    top_level: ClientCredentials,
}

impl CredentialsDocument {
    fn resolve(self) -> ClientCredentials {
        match self.daikin_onecta {
            Some(section) if !section.is_empty() => section,
            _ => self.top_level,
        }
    }
}

/// Load client credentials from a JSON or YAML file.
///
/// JSON is detected by a leading `{` or `[`; anything else is parsed as YAML.
pub fn load_client_credentials(path: &Path) -> Result<ClientCredentials, AuthError> {
    let data = std::fs::read_to_string(path)?;
    parse_client_credentials(&data)
}

pub fn parse_client_credentials(data: &str) -> Result<ClientCredentials, AuthError> {
    let trimmed = data.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Credentials("credentials file is empty".to_string()));
    }

    let doc: CredentialsDocument = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        serde_yaml::from_str(trimmed)?
    };
    Ok(doc.resolve())
}
