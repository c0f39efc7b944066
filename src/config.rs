use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::input::DEFAULT_DEAD_ZONE;
use crate::logging::LogLevel;

/// Options that can be set via CLI or config file
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    // Display layer options
    /// Realize exclusive fullscreen at desktop size as windowed fullscreen.
    pub prefer_windowed_fullscreen: bool,
    /// Never decorate windows.
    pub undecorated: bool,
    pub controller_dead_zone: f32,
    pub repeat_events: bool,
    pub log_level: LogLevel,

    // Demo options
    pub resolution: Option<Resolution>,
    pub fullscreen: Option<bool>,
    pub gamma: Option<f32>,
    pub vsync: Option<bool>,
    pub title: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prefer_windowed_fullscreen: false,
            undecorated: false,
            controller_dead_zone: DEFAULT_DEAD_ZONE,
            repeat_events: false,
            log_level: LogLevel::Info,
            resolution: None,
            fullscreen: None,
            gamma: None,
            vsync: None,
            title: None,
            icon: None,
        }
    }
}

/// Load options from a `key = value` property file.
///
/// A missing file yields the defaults; a file that exists but cannot be read
/// or holds an invalid value is an error.
pub fn load_config(path: &Path) -> Result<Options> {
    let mut opts = Options::default();
    if !path.exists() {
        log::debug!("No config file at {}; using defaults", path.display());
        return Ok(opts);
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    apply_properties(&mut opts, &parse_properties(&data))
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(opts)
}

/// Overlay recognized properties onto `opts`. Unknown keys are logged and
/// skipped.
pub fn apply_properties(opts: &mut Options, properties: &HashMap<String, String>) -> Result<()> {
    for (key, value) in properties {
        match key.as_str() {
            "prefer_windowed_fullscreen" => opts.prefer_windowed_fullscreen = parse_bool(value),
            "undecorated" => opts.undecorated = parse_bool(value),
            "controller_dead_zone" => opts.controller_dead_zone = parse_dead_zone(value)?,
            "repeat_events" => opts.repeat_events = parse_bool(value),
            "log_level" => opts.log_level = LogLevel::parse(value)?,
            "resolution" => opts.resolution = Some(parse_resolution(value)?),
            "fullscreen" => opts.fullscreen = Some(parse_bool(value)),
            "gamma" => opts.gamma = Some(parse_gamma(value)?),
            "vsync" => opts.vsync = Some(parse_bool(value)),
            "title" => opts.title = Some(value.clone()),
            "icon" => opts.icon = Some(value.clone()),
            _ => log::warn!("Ignoring unknown config key '{}'", key),
        }
    }
    Ok(())
}

/// Parse `key = value` lines.
///
/// Keys keep their case. `#` starts a comment, also after a value. Lines
/// without `=` are skipped with a warning; a repeated key keeps its last
/// value.
pub fn parse_properties(data: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    for (number, raw) in data.lines().enumerate() {
        let line = match raw.find('#') {
            Some(hash) => &raw[..hash],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            log::warn!("Key without value on line {}", number + 1);
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            log::warn!("Value without key on line {}", number + 1);
            continue;
        }
        properties.insert(key.to_string(), value.trim().to_string());
    }
    properties
}

/// Case-insensitive `true` is true; anything else is false.
pub fn parse_bool(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("true")
}

/// Parse a resolution string in the format "WIDTHxHEIGHT"
pub fn parse_resolution(s: &str) -> Result<Resolution> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        anyhow::bail!("Resolution must be in WIDTHxHEIGHT format");
    }

    let width: u32 = parts[0].trim().parse().context("Invalid width value")?;
    let height: u32 = parts[1].trim().parse().context("Invalid height value")?;

    if width == 0 || height == 0 {
        anyhow::bail!("Resolution values must be positive");
    }

    Ok(Resolution { width, height })
}

/// Parse a legacy gamma exponent
pub fn parse_gamma(s: &str) -> Result<f32> {
    let gamma: f32 = s.trim().parse().context("Invalid gamma value")?;

    const MIN_GAMMA: f32 = 0.03;
    const MAX_GAMMA: f32 = 9.9;

    if !(MIN_GAMMA..=MAX_GAMMA).contains(&gamma) {
        anyhow::bail!("Gamma correction value out of range (0.03 to 9.9)");
    }

    Ok(gamma)
}

/// Parse an axis dead zone in 0.0..1.0
pub fn parse_dead_zone(s: &str) -> Result<f32> {
    let zone: f32 = s.trim().parse().context("Invalid dead zone value")?;
    if !(0.0..1.0).contains(&zone) {
        anyhow::bail!("Dead zone out of range (0.0 to below 1.0)");
    }
    Ok(zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_resolution_valid() {
        let res = parse_resolution("640x480").unwrap();
        assert_eq!(res.width, 640);
        assert_eq!(res.height, 480);
    }

    #[test]
    fn test_parse_resolution_invalid_format() {
        assert!(parse_resolution("640-480").is_err());
        assert!(parse_resolution("640x480x120").is_err());
    }

    #[test]
    fn test_parse_resolution_invalid_values() {
        assert!(parse_resolution("0x480").is_err());
        assert!(parse_resolution("640x0").is_err());
        assert!(parse_resolution("abcxdef").is_err());
    }

    #[test]
    fn test_parse_gamma() {
        assert_eq!(parse_gamma("1.0").unwrap(), 1.0);
        assert!(parse_gamma("0.02").is_err()); // Too low
        assert!(parse_gamma("10.0").is_err()); // Too high
        assert!(parse_gamma("abc").is_err()); // Invalid
        assert!(parse_gamma("NaN").is_err());
    }

    #[test]
    fn test_parse_dead_zone() {
        assert_eq!(parse_dead_zone("0.1").unwrap(), 0.1);
        assert_eq!(parse_dead_zone("0").unwrap(), 0.0);
        assert!(parse_dead_zone("1.0").is_err());
        assert!(parse_dead_zone("-0.1").is_err());
    }

    #[test]
    fn test_parse_bool_like_legacy_properties() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" True "));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool("1"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_parse_properties() {
        let props = parse_properties(
            "# display\nprefer_windowed_fullscreen = true\n\nTitle=Hello # inline\nbare\n=orphan\nvsync=false\nvsync=true\n",
        );
        assert_eq!(props.len(), 3);
        assert_eq!(props["prefer_windowed_fullscreen"], "true");
        assert_eq!(props["Title"], "Hello");
        assert_eq!(props["vsync"], "true");
    }

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert!(!opts.prefer_windowed_fullscreen);
        assert!(!opts.undecorated);
        assert_eq!(opts.controller_dead_zone, 0.05);
        assert_eq!(opts.log_level, LogLevel::Info);
        assert!(opts.resolution.is_none());
    }

    #[test]
    fn test_load_config_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let opts = load_config(&dir.path().join("absent.properties")).unwrap();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn test_load_config_reads_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prefer_windowed_fullscreen=true").unwrap();
        writeln!(file, "undecorated=TRUE").unwrap();
        writeln!(file, "controller_dead_zone=0.2").unwrap();
        writeln!(file, "log_level=debug").unwrap();
        writeln!(file, "resolution=1280x720").unwrap();
        writeln!(file, "something_else=1").unwrap();

        let opts = load_config(file.path()).unwrap();
        assert!(opts.prefer_windowed_fullscreen);
        assert!(opts.undecorated);
        assert_eq!(opts.controller_dead_zone, 0.2);
        assert_eq!(opts.log_level, LogLevel::Debug);
        assert_eq!(
            opts.resolution,
            Some(Resolution {
                width: 1280,
                height: 720
            })
        );
    }

    #[test]
    fn test_load_config_rejects_invalid_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gamma=42").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
