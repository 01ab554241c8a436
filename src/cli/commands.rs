//! Subcommand handlers for run and config actions.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::args::{ConfigAction, RunArgs};
use crate::config::{default_path as get_config_path, Config, DEFAULT_CONFIG};
use crate::device::SimulatedDeviceFactory;
use crate::event_loop::{self, setup_ctrlc_handler, StopReason};
use crate::fleet::FleetController;
use crate::recorder::VideoFormat;

/// Effective run options: config values overridden by CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub cameras: usize,
    pub frame_interval: Duration,
    pub telemetry_interval: Duration,
    pub auto_connect: bool,
    pub auto_start: bool,
    pub record_dir: Option<PathBuf>,
    pub format: VideoFormat,
    pub log_dir: Option<PathBuf>,
    pub parameter_logging: bool,
    pub duration: Option<Duration>,
}

impl RunSettings {
    pub fn resolve(config: &Config, args: &RunArgs) -> Self {
        Self {
            cameras: args.cameras.unwrap_or(config.fleet.cameras),
            frame_interval: args
                .interval
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.fleet.frame_interval()),
            telemetry_interval: config.fleet.telemetry_interval(),
            auto_connect: config.fleet.auto_connect,
            auto_start: config.fleet.auto_start,
            record_dir: args
                .record
                .clone()
                .or_else(|| config.recording.output_dir.clone()),
            format: args
                .format
                .map(VideoFormat::from)
                .unwrap_or(config.recording.format),
            log_dir: args
                .log_dir
                .clone()
                .or_else(|| config.logging.directory.clone()),
            parameter_logging: args.parameter_log || config.logging.parameter_logging,
            duration: args.duration.map(Duration::from_secs),
        }
    }
}

/// Run the simulated fleet until Ctrl+C or the configured duration.
pub fn run_fleet(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load(args.config.as_deref())?;
    let settings = RunSettings::resolve(&config, &args);

    setup_ctrlc_handler()?;

    let factory = SimulatedDeviceFactory::new(config.simulator.clone());
    let mut fleet = FleetController::new(Box::new(factory));
    prepare_fleet(&mut fleet, &settings)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let reason = runtime.block_on(event_loop::run(&mut fleet, settings.duration));
    if reason == StopReason::Interrupted {
        log::info!("Interrupted, shutting down");
    }

    if let Some(summary) = fleet.stop_recording() {
        for stream in &summary.streams {
            println!(
                "  camera {}: {} frame(s) -> {}",
                stream.camera_id,
                stream.frames_written,
                stream.path.display()
            );
        }
    }
    fleet.shutdown();
    Ok(())
}

/// Create the cameras and open the sinks requested by `settings`.
pub fn prepare_fleet(
    fleet: &mut FleetController,
    settings: &RunSettings,
) -> Result<(), Box<dyn Error>> {
    for _ in 0..settings.cameras {
        fleet.add_camera();
    }

    if let Some(dir) = &settings.log_dir {
        fleet.set_log_directory(dir)?;
        if settings.parameter_logging {
            fleet.start_parameter_logging(dir, settings.telemetry_interval)?;
        }
    }
    if !fleet.is_parameter_logging() {
        fleet.set_telemetry_refresh(true, settings.telemetry_interval);
    }

    if settings.auto_connect && !fleet.connect_all() {
        log::warn!("Continuing with the cameras that connected");
    }
    if settings.auto_connect && settings.auto_start && !fleet.start_all() {
        log::warn!("Continuing with the cameras that started");
    }
    fleet.set_auto_update(true, settings.frame_interval);

    if let Some(dir) = &settings.record_dir {
        fleet.start_recording(dir, settings.format)?;
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            println!("Current configuration:");
            println!("  Cameras: {}", config.fleet.cameras);
            println!("  Frame interval: {} ms", config.fleet.frame_interval_ms);
            println!("  Telemetry interval: {} ms", config.fleet.telemetry_interval_ms);
            println!("  Auto connect: {}", yes_no(config.fleet.auto_connect));
            println!("  Auto start: {}", yes_no(config.fleet.auto_start));
            println!(
                "  Recording: {}",
                config
                    .recording
                    .output_dir
                    .as_deref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| "off".to_string())
            );
            println!("  Format: {}", config.recording.format);
            println!(
                "  Log directory: {}",
                config
                    .logging
                    .directory
                    .as_deref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            println!("  Parameter logging: {}", yes_no(config.logging.parameter_logging));
            println!(
                "  Simulator: {}x{}x{} @ {} fps",
                config.simulator.width,
                config.simulator.height,
                config.simulator.channels,
                config.simulator.fps
            );
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            init_config(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}

/// Write the default config template to `path`. Never overwrites.
pub fn init_config(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        return Err(format!(
            "Config file already exists: {} (use 'multicam-recorder config show' to view it)",
            path.display()
        )
        .into());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraId;
    use crate::device::{Device, SimulatedDevice, SimulatorSettings};
    use crate::recorder::{
        EncoderError, EncoderFactory, EncoderSpec, StreamRecorder, VideoEncoder,
    };

    struct NullEncoder;

    impl VideoEncoder for NullEncoder {
        fn write_frame(&mut self, _frame: &crate::camera::Frame) -> Result<(), EncoderError> {
            Ok(())
        }
        fn finish(self: Box<Self>) -> Result<(), EncoderError> {
            Ok(())
        }
    }

    struct NullFactory;

    impl EncoderFactory for NullFactory {
        fn open(&self, _spec: &EncoderSpec) -> Result<Box<dyn VideoEncoder>, EncoderError> {
            Ok(Box::new(NullEncoder))
        }
    }

    fn fleet() -> FleetController {
        let devices = |_id: CameraId| -> Box<dyn Device> {
            Box::new(SimulatedDevice::new(SimulatorSettings {
                width: 4,
                height: 4,
                ..SimulatorSettings::default()
            }))
        };
        FleetController::with_recorder(
            Box::new(devices),
            StreamRecorder::with_encoder_factory(Box::new(NullFactory)),
        )
    }

    #[test]
    fn test_flags_override_config() {
        let config: Config =
            toml::from_str("[fleet]\ncameras = 5\n[recording]\noutput_dir = \"cfg\"").unwrap();
        let args = RunArgs {
            cameras: Some(1),
            format: Some(crate::cli::Format::Mp4),
            interval: Some(50),
            duration: Some(3),
            ..RunArgs::default()
        };

        let settings = RunSettings::resolve(&config, &args);
        assert_eq!(settings.cameras, 1);
        assert_eq!(settings.record_dir, Some(PathBuf::from("cfg")));
        assert_eq!(settings.format, VideoFormat::Mp4);
        assert_eq!(settings.frame_interval, Duration::from_millis(50));
        assert_eq!(settings.telemetry_interval, Duration::from_millis(500));
        assert_eq!(settings.duration, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_prepare_fleet_starts_everything() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let args = RunArgs {
            cameras: Some(2),
            record: Some(dir.path().join("rec")),
            log_dir: Some(dir.path().join("logs")),
            parameter_log: true,
            ..RunArgs::default()
        };
        let settings = RunSettings::resolve(&config, &args);

        let mut fleet = fleet();
        prepare_fleet(&mut fleet, &settings).unwrap();

        assert_eq!(fleet.camera_count(), 2);
        assert!(fleet
            .camera_ids()
            .iter()
            .all(|&id| fleet.camera_state(id).map(|s| s.is_running()) == Some(true)));
        assert!(fleet.is_recording());
        assert!(fleet.is_parameter_logging());
        assert!(fleet.is_auto_update_enabled());
        assert!(fleet.telemetry().transcript_path().is_some());
    }

    #[test]
    fn test_init_config_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        init_config(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        std::fs::write(&path, "# mine").unwrap();
        assert!(init_config(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");
    }
}
