pub mod ban_graduates;
pub mod prompt;
pub mod run;
pub mod status;

use std::path::Path;

use cutover_core::config::{
    CutoverConfig, ENV_SOURCE_SERVICE_KEY, ENV_SOURCE_URL, ENV_TARGET_SERVICE_KEY, ENV_TARGET_URL,
};
use tracing::info;

/// Load configuration from `--config` or the environment, then validate it.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CutoverConfig> {
    let config = read_config(path)?;
    require(config.missing_parameters())?;
    config.validate()?;
    Ok(config)
}

/// Like [`load_config`], but only the target connection has to be present
/// and valid.
pub fn load_target_config(path: Option<&Path>) -> anyhow::Result<CutoverConfig> {
    let config = read_config(path)?;
    require(config.missing_target_parameters())?;
    config.validate_target()?;
    Ok(config)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<CutoverConfig> {
    match path {
        Some(path) => {
            let config = CutoverConfig::load(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(CutoverConfig::from_env()),
    }
}

fn require(missing: Vec<&'static str>) -> anyhow::Result<()> {
    if !missing.is_empty() {
        anyhow::bail!(
            "missing required connection parameters: {}\n\n{}",
            missing.join(", "),
            usage()
        );
    }
    Ok(())
}

fn usage() -> String {
    format!(
        "Provide both stores either in a config file:\n\
         \n    cutover --config cutover.toml run\n\
         \nor through the environment:\n\
         \n    {ENV_SOURCE_URL}=https://old.example.co\
         \n    {ENV_SOURCE_SERVICE_KEY}=...\
         \n    {ENV_TARGET_URL}=https://new.example.co\
         \n    {ENV_TARGET_SERVICE_KEY}=..."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[source]
url = "https://old.example.co"
service_key = "old-key"

[target]
url = "https://new.example.co"
service_key = "new-key"

[cutover]
batch_size = 250
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.target.url, "https://new.example.co");
        assert_eq!(config.cutover.batch_size, 250);
        assert_eq!(config.cutover.page_size, 1000);
    }

    #[test]
    fn missing_parameters_come_with_usage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[source]
url = "https://old.example.co"

[target]
url = "https://new.example.co"
service_key = "new-key"
"#
        )
        .unwrap();

        let msg = load_config(Some(file.path())).unwrap_err().to_string();
        assert!(msg.contains(ENV_SOURCE_SERVICE_KEY));
        assert!(msg.contains("--config cutover.toml"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[source]
url = "https://same.example.co"
service_key = "a"

[target]
url = "https://same.example.co/"
service_key = "b"
"#
        )
        .unwrap();

        let msg = load_config(Some(file.path())).unwrap_err().to_string();
        assert!(msg.contains("same store"));
    }

    #[test]
    fn target_config_needs_no_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[target]
url = "https://new.example.co"
service_key = "new-key"
"#
        )
        .unwrap();

        let config = load_target_config(Some(file.path())).unwrap();
        assert_eq!(config.target.url, "https://new.example.co");
        assert!(config.source.url.is_empty());

        let msg = load_config(Some(file.path())).unwrap_err().to_string();
        assert!(msg.lines().next().unwrap().contains(ENV_SOURCE_URL));
    }

    #[test]
    fn target_config_still_requires_the_target_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[target]
url = "https://new.example.co"
"#
        )
        .unwrap();

        let msg = load_target_config(Some(file.path())).unwrap_err().to_string();
        assert_eq!(
            msg.lines().next().unwrap(),
            format!("missing required connection parameters: {ENV_TARGET_SERVICE_KEY}")
        );
    }
}
