use anyhow::{Context, Result};
use clap::Parser;
use legacy_display::backend::{Icon, SdlBackend};
use legacy_display::config::{self, Options};
use legacy_display::input::keycodes;
use legacy_display::logging::init_logging;
use legacy_display::{Cli, DisplayMode, Session};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration file, then let the CLI override it
    let options = config::load_config(&cli.config)?;
    let options = cli.merge_into_options(options)?;

    init_logging(options.log_level)?;
    log::info!("legacy-display {} starting", env!("CARGO_PKG_VERSION"));
    log_options(&options);

    let backend = SdlBackend::new().context("Failed to initialize SDL")?;
    let mut session = Session::new(backend, &options)?;

    configure(&mut session, &options)?;
    session.create().context("Failed to create display")?;
    run(&mut session)?;
    session.destroy();

    log::info!("Shutdown complete");
    Ok(())
}

fn log_options(options: &Options) {
    log::info!("Configuration:");
    if let Some(res) = &options.resolution {
        log::info!("  Resolution: {}x{}", res.width, res.height);
    }
    if let Some(fullscreen) = options.fullscreen {
        log::info!("  Fullscreen: {}", fullscreen);
    }
    if let Some(gamma) = options.gamma {
        log::info!("  Gamma: {}", gamma);
    }
    log::info!(
        "  Prefer windowed fullscreen: {}",
        options.prefer_windowed_fullscreen
    );
    log::info!("  Undecorated: {}", options.undecorated);
}

fn configure(session: &mut Session<SdlBackend>, options: &Options) -> Result<()> {
    let display = session.display_mut();
    display.set_title(options.title.as_deref().unwrap_or("Legacy Display"));

    if let Some(path) = &options.icon {
        let image = image::open(path)
            .with_context(|| format!("Failed to load icon {}", path))?
            .to_rgba8();
        display.set_icons(vec![Icon::from_image(&image)?]);
    }

    if let Some(vsync) = options.vsync {
        display.set_vsync_enabled(vsync);
    }
    if let Some(gamma) = options.gamma {
        display.set_display_configuration(gamma, 0.0, 1.0);
    }

    display.set_fullscreen(options.fullscreen.unwrap_or(false));
    let mode = match options.resolution {
        Some(res) => pick_mode(session, res.width as i32, res.height as i32)?,
        None => session.display().desktop_display_mode(),
    };
    session.set_display_mode(mode)?;
    Ok(())
}

/// Prefer a monitor mode of the requested size so exclusive fullscreen is
/// possible; fall back to a plain windowed mode.
fn pick_mode(session: &mut Session<SdlBackend>, width: i32, height: i32) -> Result<DisplayMode> {
    let wanted = DisplayMode::new(width, height);
    let modes = session.display_mut().available_display_modes()?;
    let best = modes
        .into_iter()
        .filter(|mode| mode.same_size_as(&wanted))
        .max_by_key(|mode| (mode.bits_per_pixel(), mode.frequency()));
    Ok(best.unwrap_or(wanted))
}

fn run(session: &mut Session<SdlBackend>) -> Result<()> {
    while !session.display().is_close_requested() {
        session.update()?;
        drain_input(session);
        std::thread::sleep(std::time::Duration::from_millis(16));
    }
    Ok(())
}

fn drain_input(session: &mut Session<SdlBackend>) {
    let height = session.display_height();

    let keyboard = session.keyboard_mut();
    while keyboard.next() {
        log::info!(
            "Key {} ({}) {} char {:?}{}",
            keyboard.event_key(),
            keycodes::key_name(keyboard.event_key()).unwrap_or("?"),
            if keyboard.event_key_state() { "down" } else { "up" },
            keyboard.event_character(),
            if keyboard.is_repeat_event() { " (repeat)" } else { "" }
        );
    }

    let mouse = session.mouse_mut();
    while mouse.next() {
        if mouse.event_button() >= 0 {
            log::info!(
                "Mouse button {} {} at {},{}",
                mouse.event_button(),
                if mouse.event_button_state() { "down" } else { "up" },
                mouse.event_x(),
                mouse.event_y(height)
            );
        } else if mouse.event_dwheel() != 0 {
            log::info!("Mouse wheel {}", mouse.event_dwheel());
        } else {
            log::trace!("Mouse at {},{}", mouse.event_x(), mouse.event_y(height));
        }
    }

    let controllers = session.controllers_mut();
    while controllers.next() {
        let index = controllers.event_control_index();
        let Some(source) = controllers.event_source() else {
            continue;
        };
        if controllers.is_event_button() {
            log::info!(
                "{}: button {} {}",
                source.name(),
                index,
                if source.is_button_pressed(index) { "down" } else { "up" }
            );
        } else if controllers.is_event_axis() {
            log::info!(
                "{}: axis {} = {:.3}",
                source.name(),
                source.axis_name(index).unwrap_or("?"),
                source.axis_value(index)
            );
        } else {
            log::info!(
                "{}: pov ({}, {})",
                source.name(),
                source.pov_x(),
                source.pov_y()
            );
        }
    }
}
