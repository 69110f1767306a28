use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::form::Vehicle;

const CONFIG_DIR_NAME: &str = "fleet-request";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub general: GeneralConfig,
    /// Fleet vehicles offered on the Vehicle step (demo fleet when empty)
    pub vehicles: Vec<Vehicle>,
    pub location: LocationConfig,
    pub photos: PhotoConfig,
    pub submission: SubmissionConfig,
}

impl RequestConfig {
    /// `$XDG_CONFIG_HOME/fleet-request/config.toml` or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load() -> Result<Self, super::error::RequestError> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => {
                info!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, super::error::RequestError> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: RequestConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    pub subtitle: String,
    /// Validate and log requests instead of writing them anywhere
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "New Service Request".to_string(),
            subtitle: "Tell us what your vehicle needs".to_string(),
            dryrun: false,
        }
    }
}

/// What "Use Current Location" resolves to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub current_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            current_address: "1234 Main Street, Tampa, FL 33607".to_string(),
            latitude: 27.9506,
            longitude: -82.4572,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// References handed out by the camera and gallery actions
    pub samples: Vec<String>,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            samples: vec![
                "https://images.unsplash.com/photo-1558618047-3c8c76ca7d13?w=400".to_string(),
                "https://images.unsplash.com/photo-1486326658981-ed68abe5868e?w=400".to_string(),
                "https://images.unsplash.com/photo-1503736334956-4c8f8e92946d?w=400".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Directory that receives one JSON file per submitted request
    pub output_dir: PathBuf,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        let output_dir = dirs::data_local_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join("requests"))
            .unwrap_or_else(|| PathBuf::from("requests"));
        Self { output_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::form::VehicleStatus;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RequestConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.general.title, "New Service Request");
        assert!(config.vehicles.is_empty());
        assert_eq!(config.photos.samples.len(), 3);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[general]
dryrun = true

[location]
current_address = "Port of Tampa, Gate 3"

[[vehicles]]
id = "t9"
vin = "3AKJHHDR5JSJX1234"
make = "Freightliner"
model = "Cascadia"
year = 2021
license_plate = "FL-0042"
status = "maintenance"
"#
        )
        .unwrap();

        let config = RequestConfig::load_from(file.path()).unwrap();
        assert!(config.general.dryrun);
        assert_eq!(config.general.title, "New Service Request");
        assert_eq!(config.location.current_address, "Port of Tampa, Gate 3");
        assert!((config.location.latitude - 27.9506).abs() < 1e-9);
        assert_eq!(config.vehicles.len(), 1);
        assert_eq!(config.vehicles[0].status, VehicleStatus::Maintenance);
        assert_eq!(config.vehicles[0].mileage, 0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general\ntitle = ").unwrap();
        assert!(matches!(
            RequestConfig::load_from(file.path()),
            Err(crate::request::error::RequestError::TomlParse(_))
        ));
    }
}
