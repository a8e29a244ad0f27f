//! JIG test fixture control client.
//!
//! Station-side program for a hardware test fixture: shows status on
//! the local panel and answers framed commands from the remote test
//! controller over a serial link. The control loop is cooperative and
//! non-blocking; the only other threads are the link reader and writer,
//! which communicate through single-producer/single-consumer byte
//! queues.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use static_cell::StaticCell;

use jig_core::{send_ready, Dispatcher};
use jig_protocol::{ByteQueue, JigEngine, SentinelCodec};

mod config;
mod devices;
mod panel;
mod serial;

use devices::OnboardDevices;
use panel::{StatusPanel, TermBackend};
use serial::SerialPort;

/// Delay between control-loop iterations
const LOOP_DELAY: Duration = Duration::from_micros(100);

// Queue halves cross thread boundaries, so the queues must live forever
static RX_QUEUE: StaticCell<ByteQueue> = StaticCell::new();
static TX_QUEUE: StaticCell<ByteQueue> = StaticCell::new();

#[derive(Parser)]
#[command(name = "jig-client", version, about = "JIG test fixture control client")]
struct Args {
    /// Client config file
    #[arg(short = 'f', long = "config", default_value = "default_client.cfg")]
    config: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    info!("JIG config file: {}", args.config.display());
    let config = config::load(&args.config)?;
    info!("model {:?}, uart {}", config.model, config.uart_dev);

    let port = SerialPort::open(config.uart_dev.as_ref())?;

    let (rx_producer, mut rx) = RX_QUEUE.init(ByteQueue::new()).split();
    let (mut tx, tx_consumer) = TX_QUEUE.init(ByteQueue::new()).split();
    let _reader = port.spawn_reader(rx_producer)?;
    let _writer = port.spawn_writer(tx_consumer)?;

    let mut engine = JigEngine::new();
    engine
        .register(SentinelCodec::default())
        .map_err(|_| std::io::Error::other("framing channel limit reached"))?;
    let mut dispatcher = Dispatcher::new(OnboardDevices::new());

    // Tell the controller we finished booting
    send_ready(&mut tx);
    info!("ready announced, entering control loop");

    let mut backend = TermBackend::new();
    let mut panel = StatusPanel::new(&config.model);

    loop {
        panel.tick(dispatcher.stats(), &mut backend);

        // Dispatch inside the drain: a burst can complete several
        // frames before the queue is empty
        while let Some(byte) = rx.dequeue() {
            engine.feed(byte);
            dispatcher.poll(&mut engine, &mut tx);
        }

        thread::sleep(LOOP_DELAY);
    }
}
