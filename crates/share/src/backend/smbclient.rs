//! SMB share backend driving the `smbclient` executable.
//!
//! Every operation runs one `smbclient -c '<commands>'` invocation against the
//! configured service. Failures are recognised from the `NT_STATUS_*` codes
//! smbclient prints, since its exit status alone is unreliable across versions.

use crate::error::{ErrorKind, Result};
use crate::{RemoteShare, ShareEntry, path::validate as validate_path};
use async_trait::async_trait;
use exn::ResultExt;
use regex::Regex;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::process::Command;

static STATUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"NT_STATUS_[A-Z0-9_]+").unwrap());
// `  name with spaces    DA     1234  Mon Jan  1 00:00:00 2024`
static LISTING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^  (?P<name>.+?)\s+(?P<attributes>[A-Z]*)\s+(?P<size>\d+)\s+\w{3} \w{3}\s+\d+ \d{2}:\d{2}:\d{2} \d{4}\s*$")
        .unwrap()
});

/// Login details for an SMB share.
#[derive(Clone)]
pub struct Credentials {
    pub host: String,
    pub share: String,
    pub domain: Option<String>,
    pub user: String,
    pub password: Option<String>,
}
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("share", &self.share)
            .field("domain", &self.domain)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Share backend that shells out to `smbclient`.
///
/// The password travels through the `PASSWD` environment variable of the
/// child process, never on its command line.
///
/// # Examples
///
/// ```no_run
/// use smbpix_share::backend::{Credentials, SmbClientShare};
///
/// # async fn example() -> smbpix_share::error::Result<()> {
/// let credentials = Credentials {
///     host: "fileserver".into(),
///     share: "studio".into(),
///     domain: Some("WORKGROUP".into()),
///     user: "batch".into(),
///     password: Some("hunter2".into()),
/// };
/// let share = SmbClientShare::new(credentials, None)?;
/// share.connect().await?;
/// # Ok(())
/// # }
/// ```
pub struct SmbClientShare {
    name: String,
    binary: PathBuf,
    credentials: Credentials,
}

impl SmbClientShare {
    /// Create a backend, locating `smbclient` on `PATH` unless an explicit
    /// binary is given.
    ///
    /// # Errors
    ///
    /// [`ClientNotFound`](ErrorKind::ClientNotFound) if no executable exists.
    pub fn new(credentials: Credentials, binary: Option<PathBuf>) -> Result<Self> {
        let binary = match binary {
            Some(path) if path.is_file() => path,
            Some(path) => {
                tracing::error!(path = %path.display(), "Configured smbclient binary does not exist");
                exn::bail!(ErrorKind::ClientNotFound);
            },
            None => which::which("smbclient").or_raise(|| ErrorKind::ClientNotFound)?,
        };
        tracing::debug!(binary = %binary.display(), "Using smbclient executable");
        Ok(Self {
            name: format!("//{}/{}", credentials.host, credentials.share),
            binary,
            credentials,
        })
    }

    /// Verify that the share accepts the credentials.
    ///
    /// # Errors
    ///
    /// [`Unavailable`](ErrorKind::Unavailable) with an empty path (the share
    /// root) when authentication or the connection fails.
    pub async fn connect(&self) -> Result<()> {
        self.run(r#"cd "\""#).await.or_raise(|| ErrorKind::Unavailable(PathBuf::new()))?;
        tracing::info!(share = %self.name, user = %self.credentials.user, "Connected to share");
        Ok(())
    }

    async fn run(&self, commands: &str) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command.arg(&self.name).arg("-U").arg(&self.credentials.user);
        if let Some(domain) = self.credentials.domain.as_deref().filter(|d| !d.is_empty()) {
            command.arg("-W").arg(domain);
        }
        match &self.credentials.password {
            Some(password) => command.env("PASSWD", password),
            None => command.arg("-N"),
        };
        command.arg("-c").arg(commands).kill_on_drop(true);
        tracing::trace!(share = %self.name, commands, "Running smbclient");

        let output = command.output().await.or_raise(|| ErrorKind::Backend("smbclient could not be started".into()))?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if let Some(status) = STATUS.find(&stdout).or_else(|| STATUS.find(&stderr)) {
            exn::bail!(ErrorKind::Backend(status.as_str().to_string()));
        }
        if !output.status.success() {
            exn::bail!(ErrorKind::Backend(format!("smbclient exited with {}", output.status)));
        }
        Ok(stdout)
    }
}

/// Quote a share path for an smbclient command, using backslash separators.
fn remote(path: &Path) -> Result<String> {
    let path = validate_path(path)?;
    let joined = path.iter().map(|c| c.to_string_lossy()).collect::<Vec<_>>().join("\\");
    quote(&joined, &path)
}

fn local(path: &Path) -> Result<String> {
    quote(&path.to_string_lossy(), path)
}

// smbclient's command parser has no escape for double quotes.
fn quote(text: &str, path: &Path) -> Result<String> {
    if text.contains('"') || text.contains(';') {
        exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
    }
    Ok(format!("\"{text}\""))
}

/// Parse the output of `ls` into entries below `directory`.
fn parse_listing(directory: &Path, output: &str) -> Vec<ShareEntry> {
    let mut entries: Vec<_> = output
        .lines()
        .filter_map(|line| LISTING.captures(line))
        .filter(|caps| !matches!(&caps["name"], "." | ".."))
        .map(|caps| {
            let path = directory.join(&caps["name"]);
            if caps["attributes"].contains('D') {
                ShareEntry::directory(path)
            } else {
                ShareEntry::file(path)
            }
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[async_trait]
impl RemoteShare for SmbClientShare {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self, path: &Path) -> Result<Vec<ShareEntry>> {
        let unavailable = || ErrorKind::Unavailable(path.to_path_buf());
        let directory = validate_path(path).or_raise(unavailable)?;
        let output = self.run(&format!("cd {}; ls", remote(&directory).or_raise(unavailable)?)).await.or_raise(unavailable)?;
        Ok(parse_listing(&directory, &output))
    }

    async fn download(&self, path: &Path, local_path: &Path) -> Result<()> {
        let transfer = || ErrorKind::Transfer(path.to_path_buf());
        let command = format!("get {} {}", remote(path).or_raise(transfer)?, local(local_path).or_raise(transfer)?);
        self.run(&command).await.or_raise(transfer)?;
        Ok(())
    }

    async fn upload(&self, data: &[u8], path: &Path) -> Result<()> {
        let transfer = || ErrorKind::Transfer(path.to_path_buf());
        let target = remote(path).or_raise(transfer)?;
        // smbclient only uploads from disk.
        let mut staged = tempfile::Builder::new().prefix(".smbpix-upload-").tempfile().or_raise(transfer)?;
        staged.write_all(data).or_raise(transfer)?;
        staged.flush().or_raise(transfer)?;
        let command = format!("put {} {}", local(staged.path()).or_raise(transfer)?, target);
        self.run(&command).await.or_raise(transfer)?;
        Ok(())
    }

    async fn rename(&self, entry: &ShareEntry, to: &Path) -> Result<()> {
        let rejected = || ErrorKind::Rename(to.to_path_buf());
        let command = format!("rename {} {}", remote(&entry.path).or_raise(rejected)?, remote(to).or_raise(rejected)?);
        self.run(&command).await.or_raise(rejected)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LISTING_OUTPUT: &str = "  .                                   D        0  Mon Mar  4 10:12:01 2024
  ..                                  D        0  Mon Mar  4 10:12:01 2024
  input_poster.psd                    A 48213504  Fri Mar  1 16:40:22 2024
  Spring set                          D        0  Tue Feb 27 09:01:55 2024
  insitu_mock.tif                     AR  204800  Wed Jan 10 11:30:00 2024

\t\t61036288 blocks of size 1024. 20415428 blocks available
";

    #[test]
    fn test_parse_listing() {
        let entries = parse_listing(Path::new("Conversion"), LISTING_OUTPUT);
        assert_eq!(
            entries,
            vec![
                ShareEntry::directory("Conversion/Spring set"),
                ShareEntry::file("Conversion/input_poster.psd"),
                ShareEntry::file("Conversion/insitu_mock.tif"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_listing() {
        let output = "  .    D    0  Mon Mar  4 10:12:01 2024\n  ..   D    0  Mon Mar  4 10:12:01 2024\n";
        assert!(parse_listing(Path::new("Converted"), output).is_empty());
    }

    #[rstest]
    #[case("Conversion/input_a.psd", r#""Conversion\input_a.psd""#)]
    #[case("to_be_renamed/Spring set/a b.jpg", r#""to_be_renamed\Spring set\a b.jpg""#)]
    #[case("/Converted/", r#""Converted""#)]
    fn test_remote_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(remote(Path::new(input)).unwrap(), expected);
    }

    #[rstest]
    #[case("Conversion/say \"cheese\".psd")]
    #[case("Conversion/a;rm b.psd")]
    #[case("../outside.psd")]
    fn test_remote_path_rejected(#[case] input: &str) {
        let err = remote(Path::new(input)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_status_detection() {
        let text = "tree connect failed: NT_STATUS_ACCESS_DENIED\n";
        assert_eq!(STATUS.find(text).unwrap().as_str(), "NT_STATUS_ACCESS_DENIED");
        assert!(STATUS.find(LISTING_OUTPUT).is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            host: "fileserver".into(),
            share: "studio".into(),
            domain: None,
            user: "batch".into(),
            password: Some("hunter2".into()),
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("fileserver"));
    }

    #[test]
    fn test_missing_configured_binary() {
        let credentials = Credentials {
            host: "h".into(),
            share: "s".into(),
            domain: None,
            user: "u".into(),
            password: None,
        };
        let err = SmbClientShare::new(credentials, Some(PathBuf::from("/nonexistent/smbclient"))).err().unwrap();
        assert!(matches!(&*err, ErrorKind::ClientNotFound));
    }
}
