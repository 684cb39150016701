/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::{error, info};
use std::io;
use std::sync::Arc;
use std::thread::{sleep, Builder};
use std::time::Duration;

/* Custom libraries */
use dispatcher::ElevatorSystem;
use events::{ChannelSink, Event, EventSink, LogSink};

/* Modules */
#[macro_use]
mod shared;
mod config;
mod console;
mod dispatcher;
mod elevator;
mod events;

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("elevator_bank")
        .about("Dispatches pickup/dropoff requests across a bank of elevators")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("elevators")
                .long("elevators")
                .takes_value(true)
                .help("Number of elevators, overrides the configuration"),
        )
        .arg(
            Arg::new("travel-time")
                .long("travel-time")
                .takes_value(true)
                .help("Milliseconds per floor, overrides the configuration"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print status events as JSON lines"),
        )
        .arg(
            Arg::new("log-events")
                .long("log-events")
                .conflicts_with("json")
                .help("Route status events through the logger"),
        )
        .get_matches();

    // Load the configuration
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let mut config = unwrap_or_exit!(config::load_config(config_path));
    if let Some(n) = matches.value_of("elevators") {
        config.system.n_elevators = unwrap_or_exit!(n.parse::<usize>());
    }
    if let Some(ms) = matches.value_of("travel-time") {
        config.elevator.floor_travel_time = unwrap_or_exit!(ms.parse::<u64>());
    }

    // Event output
    let json = matches.is_present("json");
    let mut printer = None;
    let sink: Arc<dyn EventSink> = if matches.is_present("log-events") {
        Arc::new(LogSink)
    } else {
        let (sink, event_rx) = ChannelSink::unbounded();
        printer = Some(unwrap_or_exit!(Builder::new()
            .name("event_printer".into())
            .spawn(move || print_events(event_rx, json))));
        Arc::new(sink)
    };

    // Start the elevators
    let mut system = ElevatorSystem::new(&config.elevator, sink);
    system.initialize(config.system.n_elevators);
    unwrap_or_exit!(system.start());
    info!(
        "Accepting requests for floors 1..={} ('<start> <end>', 'status', 'quit')",
        config.system.n_floors
    );

    console::console_input_loop(io::stdin().lock(), &system, config.system.n_floors);

    // Let the fleet finish what it was given
    while !system.is_idle() {
        sleep(Duration::from_millis(100));
    }
    system.shutdown();
    for status in system.snapshot() {
        info!("Elevator {} parked at floor {}", status.id, status.floor);
    }

    // Workers are gone, dropping the system closes the event channel
    drop(system);
    if let Some(printer) = printer {
        if printer.join().is_err() {
            error!("Event printer panicked");
        }
    }
}

fn print_events(event_rx: cbc::Receiver<Event>, json: bool) {
    for event in event_rx.iter() {
        if json {
            println!("{}", event.to_json());
        } else {
            println!("{}", event);
        }
    }
}
