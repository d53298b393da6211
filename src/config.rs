// Config module: the remote endpoint and the credentials used to talk to it.
// The file is a plain three line secret (base URL, user, password) kept in
// the user's home directory. When it is missing the user is prompted once and
// the answers are written back so later runs are non-interactive.

use crate::error::{Result, TransferError};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the remote server lives and how to authenticate against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub user: String,
    pub pass: String,
}

impl Endpoint {
    /// Build an endpoint, dropping any trailing `/` from the base URL so
    /// that `{base_url}/{name}` never contains a double slash.
    pub fn new(base_url: &str, user: &str, pass: &str) -> Self {
        Endpoint {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            user: user.to_string(),
            pass: pass.to_string(),
        }
    }

    /// Parse the three line config format.
    pub fn parse(content: &str) -> Result<Self> {
        let lines: Vec<&str> = content
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        if lines.len() < 3 {
            return Err(TransferError::Config("invalid config format".into()));
        }
        if lines[0].trim().is_empty() {
            return Err(TransferError::Config("base URL is empty".into()));
        }
        Ok(Endpoint::new(lines[0], lines[1], lines[2]))
    }

    /// Serialize back to the on-disk format.
    pub fn to_file_content(&self) -> String {
        format!("{}\n{}\n{}", self.base_url, self.user, self.pass)
    }

    /// Read the endpoint from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        debug!("loaded config from {}", path.display());
        Endpoint::parse(&content)
    }

    /// Write the endpoint to `path`, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_file_content())?;
        restrict_permissions(path)?;
        Ok(())
    }

    /// Load the config, or obtain it from `prompt` and persist the answers
    /// when the file does not exist yet.
    pub fn load_or_create<F>(path: &Path, prompt: F) -> Result<Self>
    where
        F: FnOnce() -> std::io::Result<Endpoint>,
    {
        if path.exists() {
            return Endpoint::load(path);
        }
        let endpoint = prompt()?;
        endpoint.save(path)?;
        info!("config saved to {}", path.display());
        Ok(endpoint)
    }
}

/// Default config location: `~/.config/transfersh/.config`.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TransferError::Config("unable to determine home directory".into()))?;
    Ok(config_path_in(&home))
}

/// Config file location below a given home directory.
pub fn config_path_in(home: &Path) -> PathBuf {
    home.join(".config").join("transfersh").join(".config")
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_lines() {
        let ep = Endpoint::parse("https://t.example/\nalice\ns3cret").unwrap();
        assert_eq!(ep.base_url, "https://t.example");
        assert_eq!(ep.user, "alice");
        assert_eq!(ep.pass, "s3cret");
    }

    #[test]
    fn test_parse_crlf() {
        let ep = Endpoint::parse("https://t.example\r\nalice\r\npw\r\n").unwrap();
        assert_eq!(ep.user, "alice");
        assert_eq!(ep.pass, "pw");
    }

    #[test]
    fn test_parse_too_few_lines() {
        let err = Endpoint::parse("https://t.example\nalice").unwrap_err();
        assert!(matches!(err, TransferError::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(".config");
        let ep = Endpoint::new("https://t.example", "bob", "pw");
        ep.save(&path).unwrap();
        assert_eq!(Endpoint::load(&path).unwrap(), ep);
        // existing file is loaded without prompting
        let loaded = Endpoint::load_or_create(&path, || panic!("prompted")).unwrap();
        assert_eq!(loaded, ep);
    }

    #[test]
    fn test_create_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transfersh").join(".config");
        let ep = Endpoint::load_or_create(&path, || Ok(Endpoint::new("http://t/", "u", "p"))).unwrap();
        assert_eq!(ep.base_url, "http://t");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "http://t\nu\np");
    }

    #[test]
    fn test_config_path_layout() {
        let path = config_path_in(Path::new("/home/alice"));
        assert_eq!(path, Path::new("/home/alice/.config/transfersh/.config"));
    }
}
