use crate::Config;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SMBPIX_";
const FILE_NAME: &str = "smbpix.toml";

/// Location of the configuration file read when none is given explicitly.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    crate::project_dirs().map(|dirs| dirs.config_dir().join(FILE_NAME))
}

/// Merge defaults, the configuration file and the environment, then validate.
///
/// An explicit `path` must exist. Without one, the default location is used
/// only if a file is present there.
#[tracing::instrument(skip_all, fields(path = tracing::field::Empty))]
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    let file = match path {
        Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
        Some(path) => Some(path.to_path_buf()),
        None => default_path().filter(|path| path.is_file()),
    };
    if let Some(file) = file {
        tracing::Span::current().record("path", tracing::field::display(file.display()));
        figment = merge_file(figment, &file)?;
    }
    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .or_raise(|| ErrorKind::Load)?;
    config.validate()?;
    tracing::debug!(backend = ?config.share.backend, "Loaded configuration");
    Ok(config)
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase);
    let figment = match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(figment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShareBackend;
    use figment::Jail;
    use rstest::rstest;

    const SHARE_TOML: &str = r#"
        [share]
        host = "fileserver"
        share = "studio"
        user = "batch"
    "#;

    #[test]
    fn test_load_toml_over_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "smbpix.toml",
                &format!("{SHARE_TOML}\n[convert]\nformat = \"jpg\"\nquality = 80\nskip = [\"insitu\", \"draft\"]\n"),
            )?;
            let config = load(Some(Path::new("smbpix.toml"))).unwrap();
            assert_eq!(config.share.host, "fileserver");
            assert_eq!(config.convert.format, "jpg");
            assert_eq!(config.convert.quality, 80);
            assert_eq!(config.convert.skip, ["insitu", "draft"]);
            assert_eq!(config.convert.source, PathBuf::from("Conversion"));
            assert_eq!(config.rename.destination, "parent");
            Ok(())
        });
    }

    #[test]
    fn test_load_yaml_and_json() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "smbpix.yml",
                "share:\n  backend: mounted\n  mount: /mnt/studio\nrename:\n  destination: top-two\n",
            )?;
            jail.create_file("smbpix.json", r#"{"share": {"host": "h", "share": "s", "user": "u"}}"#)?;
            let yaml = load(Some(Path::new("smbpix.yml"))).unwrap();
            assert_eq!(yaml.share.backend, ShareBackend::Mounted);
            assert_eq!(yaml.rename.destination, "top-two");
            let json = load(Some(Path::new("smbpix.json"))).unwrap();
            assert_eq!(json.share.user, "u");
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("smbpix.toml", SHARE_TOML)?;
            jail.set_env("SMBPIX_SHARE__PASSWORD", "hunter2");
            jail.set_env("SMBPIX_CONVERT__FORCE_MAX_QUALITY", "true");
            jail.set_env("SMBPIX_RENAME__ROOT", "incoming");
            jail.set_env("SMBPIX_RENAME__SKIP_ALREADY_NAMED", "true");
            let config = load(Some(Path::new("smbpix.toml"))).unwrap();
            assert_eq!(config.share.password.as_deref(), Some("hunter2"));
            assert!(config.convert.force_max_quality);
            assert_eq!(config.rename.root, PathBuf::from("incoming"));
            assert!(config.rename.skip_already_named);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("absent.toml");
        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(p) if *p == path));
    }

    #[rstest]
    #[case("smbpix.ini")]
    #[case("smbpix")]
    fn test_unsupported_extension(#[case] name: &str) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(name);
        std::fs::write(&path, SHARE_TOML).unwrap();
        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_malformed_file() {
        Jail::expect_with(|jail| {
            jail.create_file("smbpix.toml", "[share\nhost = ")?;
            let err = load(Some(Path::new("smbpix.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[test]
    fn test_wrong_type() {
        Jail::expect_with(|jail| {
            jail.create_file("smbpix.toml", &format!("{SHARE_TOML}\n[convert]\nquality = \"high\"\n"))?;
            let err = load(Some(Path::new("smbpix.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[test]
    fn test_incomplete_share_is_invalid() {
        Jail::expect_with(|jail| {
            jail.create_file("smbpix.toml", "[share]\nhost = \"fileserver\"\n")?;
            let err = load(Some(Path::new("smbpix.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid(_)));
            Ok(())
        });
    }
}
