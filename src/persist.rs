use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// The refresh token plus the client metadata needed to use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub scope: String,
}

/// How the record is laid out in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLayout {
    /// `{"daikin_onecta": {...}}`
    Daikin,
    /// The record as a flat object.
    Tado,
}

#[derive(Serialize)]
struct DaikinFile<'a> {
    daikin_onecta: &'a CredentialRecord,
}

pub fn render_credentials(record: &CredentialRecord, layout: FileLayout) -> Result<String, AuthError> {
    let json = match layout {
        FileLayout::Daikin => serde_json::to_string_pretty(&DaikinFile {
            daikin_onecta: record,
        })?,
        FileLayout::Tado => serde_json::to_string_pretty(record)?,
    };
    Ok(json)
}

/// Write the record to `path`, replacing whatever was there.
pub fn write_credentials(
    path: &Path,
    record: &CredentialRecord,
    layout: FileLayout,
) -> Result<(), AuthError> {
    let data = render_credentials(record, layout)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    restrict_permissions(path)?;
    tracing::debug!(path = %path.display(), "credentials written");
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), AuthError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), AuthError> {
    Ok(())
}
