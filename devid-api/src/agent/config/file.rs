use super::{Config, Loader, Saver};
use anyhow::{bail, Context};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

enum Format {
    Json,
    #[cfg(feature = "config-toml")]
    Toml,
}

/// An implementation of [`Loader`] and [`Saver`] backed by a configuration file.
///
/// The format is chosen by the file extension: `.json`, or `.toml` with the
/// `config-toml` feature. Loaded codec options are validated. Saving replaces the
/// file as a whole, and on unix the file is only readable by its owner since it may
/// hold the client secret and the current token.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
    fn format(&self) -> anyhow::Result<Format> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            #[cfg(feature = "config-toml")]
            Some("toml") => Ok(Format::Toml),
            _ => bail!("unsupported config file format: {}", self.path.display()),
        }
    }
    fn read(&self) -> anyhow::Result<Config> {
        let format = self.format()?;
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let config: Config = match format {
            Format::Json => serde_json::from_str(&text)?,
            #[cfg(feature = "config-toml")]
            Format::Toml => toml::from_str(&text)?,
        };
        config.codec.validate()?;
        Ok(config)
    }
    fn write(&self, config: &Config) -> anyhow::Result<()> {
        let text = match self.format()? {
            Format::Json => serde_json::to_string_pretty(config)?,
            #[cfg(feature = "config-toml")]
            Format::Toml => toml::to_string_pretty(config)?,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let staging = self.path.with_extension("tmp");
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&staging)
            .with_context(|| format!("failed to write {}", staging.display()))?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl Loader for FileStore {
    async fn load(
        &self,
    ) -> core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>> {
        Ok(self.read()?)
    }
}

impl Saver for FileStore {
    async fn save(
        &self,
        config: &Config,
    ) -> core::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        Ok(self.write(config)?)
    }
}
