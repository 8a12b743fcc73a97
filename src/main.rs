use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use tuxctl_lib::adapters::MockTux;
use tuxctl_lib::commands::{self, config, link, serial, status, TuxRequest};
use tuxctl_lib::domain::{Button, Buttons, DisplayRequest, LinkConfig, DEFAULT_BAUD_RATE};
use tuxctl_lib::state::AppState;

/// How often the demo refreshes the display and polls buttons
const TICK: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "tuxctl")]
#[command(about = "Drive a Tux controller over its serial link")]
struct Cli {
    /// Directory holding saved link profiles
    #[arg(long, global = true, default_value = "profiles")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List serial ports on this machine
    Ports,
    /// List saved link profiles
    Profiles,
    /// Save a link profile
    SaveProfile {
        name: String,
        #[arg(long)]
        port: String,
        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,
    },
    /// Attach, initialize, count on the display and log button changes
    Run {
        /// Serial port to open
        #[arg(long, conflicts_with_all = ["mock", "profile"])]
        port: Option<String>,
        /// Saved profile to connect with
        #[arg(long, conflicts_with = "mock")]
        profile: Option<String>,
        /// Use the built-in controller simulator
        #[arg(long)]
        mock: bool,
        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,
        /// How long to run before detaching
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ports => {
            for port in serial::list_serial_ports()? {
                println!("{}\t{}", port.name, port.port_type);
            }
        }
        Commands::Profiles => {
            for name in config::list_configurations(&cli.config_dir)? {
                println!("{name}");
            }
        }
        Commands::SaveProfile { name, port, baud } => {
            let profile = LinkConfig {
                name,
                serial_port: Some(port),
                baud_rate: baud,
                ..LinkConfig::default()
            };
            config::save_configuration(&cli.config_dir, &profile)?;
        }
        Commands::Run {
            port,
            profile,
            mock,
            baud,
            seconds,
        } => {
            let state = AppState::new();
            if mock {
                let tux = MockTux::new();
                let handle = tux.handle();
                link::attach(&state, Box::new(tux), "mock")?;
                // Give the simulated pad something to report
                thread::spawn(move || {
                    thread::sleep(Duration::from_secs(1));
                    handle.button_event(0x0E, 0x0F);
                    thread::sleep(Duration::from_secs(1));
                    handle.button_event(0x0F, 0x0F);
                });
            } else {
                let profile = match (port, profile) {
                    (Some(port), _) => LinkConfig {
                        name: port.clone(),
                        serial_port: Some(port),
                        baud_rate: baud,
                        ..LinkConfig::default()
                    },
                    (None, Some(name)) => config::load_configuration(&cli.config_dir, &name)?,
                    (None, None) => {
                        return Err("one of --port, --profile or --mock is required".into())
                    }
                };
                serial::connect_serial(&state, &profile)?;
            }

            run_demo(&state, Duration::from_secs(seconds))?;

            let final_status = status::get_connection_status(&state)?;
            log::info!("final status: {}", serde_json::to_string(&final_status)?);
            serial::disconnect_serial(&state)?;
        }
    }

    Ok(())
}

/// Show an incrementing hex counter with a walking decimal point and log
/// every change in the button mask.
fn run_demo(state: &AppState, duration: Duration) -> Result<(), Box<dyn std::error::Error>> {
    commands::dispatch(state, TuxRequest::Init)?;

    let started = Instant::now();
    let mut count: u32 = 0;
    let mut last_buttons = None;

    while started.elapsed() < duration {
        let digits = [0, 4, 8, 12].map(|shift| ((count >> shift) & 0xF) as u8);
        let request = DisplayRequest::new(digits, 0xF, 1 << (count % 4));
        commands::dispatch(state, TuxRequest::SetLed(request.to_raw()))?;

        let mut raw = 0u32;
        commands::dispatch(state, TuxRequest::Buttons(Some(&mut raw)))?;
        if last_buttons != Some(raw) {
            let buttons = Buttons::from_bits(raw as u8);
            let set: Vec<Button> = Button::ALL
                .into_iter()
                .filter(|&b| buttons.is_set(b))
                .collect();
            log::info!("buttons: {raw:#04x} {set:?}");
            last_buttons = Some(raw);
        }

        count = count.wrapping_add(1);
        thread::sleep(TICK);
    }
    Ok(())
}
