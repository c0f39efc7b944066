use crate::config::{parse_dead_zone, parse_gamma, parse_resolution, Options};
use crate::logging::LogLevel;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Legacy display layer demo
#[derive(Parser, Debug, Default)]
#[command(name = "legacy-display")]
#[command(version)]
#[command(about = "Opens a window through the legacy display layer and echoes its input", long_about = None)]
pub struct Cli {
    /// Property file with default options
    #[arg(short, long, value_name = "FILE", default_value = "legacy-display.properties")]
    pub config: PathBuf,

    /// Display mode (e.g., 800x600); the desktop mode if omitted
    #[arg(short, long, value_name = "WIDTHxHEIGHT")]
    pub res: Option<String>,

    /// Request exclusive fullscreen
    #[arg(short, long)]
    pub fullscreen: bool,

    /// Force a window even if the config asks for fullscreen
    #[arg(short, long, conflicts_with = "fullscreen")]
    pub windowed: bool,

    /// Gamma correction value (default 1.0)
    #[arg(short, long, value_name = "CORRECTIONVALUE")]
    pub gamma: Option<String>,

    /// Synchronize buffer swaps with the display refresh
    #[arg(long)]
    pub vsync: bool,

    /// Window title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Image file used as the window icon
    #[arg(short, long, value_name = "FILE")]
    pub icon: Option<String>,

    /// Realize desktop-sized fullscreen as a borderless window
    #[arg(long)]
    pub prefer_windowed_fullscreen: bool,

    /// Never decorate windows
    #[arg(long)]
    pub undecorated: bool,

    /// Report held keys as repeat events
    #[arg(long)]
    pub repeat_events: bool,

    /// Controller axis dead zone (0.0 to below 1.0)
    #[arg(long, value_name = "ZONE")]
    pub dead_zone: Option<String>,

    /// Log level (nothing, user, error, warning, info, debug, all)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        // Override with command line arguments
        if let Some(ref res) = self.res {
            opts.resolution = Some(parse_resolution(res).context("Invalid resolution format")?);
        }

        if self.fullscreen {
            opts.fullscreen = Some(true);
        }
        if self.windowed {
            opts.fullscreen = Some(false);
        }

        if let Some(ref gamma) = self.gamma {
            opts.gamma = Some(parse_gamma(gamma)?);
        }

        if self.vsync {
            opts.vsync = Some(true);
        }

        if let Some(ref title) = self.title {
            opts.title = Some(title.clone());
        }

        if let Some(ref icon) = self.icon {
            opts.icon = Some(icon.clone());
        }

        if self.prefer_windowed_fullscreen {
            opts.prefer_windowed_fullscreen = true;
        }
        if self.undecorated {
            opts.undecorated = true;
        }
        if self.repeat_events {
            opts.repeat_events = true;
        }

        if let Some(ref zone) = self.dead_zone {
            opts.controller_dead_zone = parse_dead_zone(zone)?;
        }

        if let Some(ref level) = self.log_level {
            opts.log_level = LogLevel::parse(level)?;
        }

        Ok(opts)
    }
}
