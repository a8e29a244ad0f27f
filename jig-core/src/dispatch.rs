//! Command dispatch: ready frame in, acknowledgment record out.
//!
//! `poll` runs once per control-loop tick. Every anomaly is absorbed
//! here: framing noise never reaches this layer, unroutable payloads
//! are counted and dropped without a response, and handler failures
//! become `Error`/`Busy` records instead of local faults. Nothing
//! escalates past the dispatcher.

use core::fmt::Write;

use heapless::String;
use log::{debug, info, warn};

use jig_protocol::{
    enqueue_record, parse_request, payload_text, ByteProducer, CommandClass, ControllerCmd,
    FrameCodec, ProtocolEngine, Request, ResponseKind, WireRecord, DATA_SIZE, RECORD_SIZE,
};

use crate::devices::{DeviceAccess, DeviceError};

/// Counters exposed for the status panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Frames taken from the engine
    pub frames: u32,
    /// Response records queued for transmission
    pub responses: u32,
    /// Frames dropped as unroutable (unknown class or non-text payload)
    pub ignored: u32,
}

/// Routes inbound commands to device handlers and queues the responses.
///
/// Owns the device handles for the process lifetime; callers thread it
/// by reference through the control loop.
pub struct Dispatcher<D: DeviceAccess> {
    devices: D,
    stats: DispatchStats,
}

impl<D: DeviceAccess> Dispatcher<D> {
    pub fn new(devices: D) -> Self {
        Self {
            devices,
            stats: DispatchStats::default(),
        }
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Consume every ready frame and queue its response.
    ///
    /// Drains each channel until it is accepting again, so a burst of
    /// back-to-back records is answered in arrival order within one
    /// poll. Polling again without new bytes is a no-op.
    pub fn poll<C: FrameCodec<RECORD_SIZE>>(
        &mut self,
        engine: &mut ProtocolEngine<C, RECORD_SIZE>,
        tx: &mut ByteProducer<'_>,
    ) {
        let mut frame = [0u8; RECORD_SIZE];
        for channel in 0..engine.channel_count() {
            while let Some(len) = engine.consume(channel, &mut frame) {
                self.dispatch(&frame[..len], tx);
            }
        }
    }

    /// Frame body in: tag byte, then the payload text
    fn dispatch(&mut self, frame: &[u8], tx: &mut ByteProducer<'_>) {
        self.stats.frames += 1;

        let Some((&tag, payload)) = frame.split_first() else {
            self.stats.ignored += 1;
            return;
        };
        match ControllerCmd::from_byte(tag) {
            Some(ControllerCmd::Command) => {}
            Some(ControllerCmd::Ready) => {
                info!("controller reports ready");
                return;
            }
            None => {
                self.stats.ignored += 1;
                debug!("unknown command tag {:#04x} ignored", tag);
                return;
            }
        }

        let Some(text) = payload_text(payload) else {
            self.stats.ignored += 1;
            debug!("non-text payload ignored");
            return;
        };
        let Some(req) = parse_request(text) else {
            // Unroutable traffic gets no response
            self.stats.ignored += 1;
            debug!("unroutable payload ignored: {:?}", text);
            return;
        };

        debug!(
            "command {} routed to {}, args {:?}",
            req.command_id,
            req.class.tag(),
            req.args
        );
        match req.class {
            CommandClass::Gpio => self.run_gpio(&req, tx),
            CommandClass::Usb => {
                let outcome = self.devices.usb_run(req.args);
                self.respond_echo(&req, outcome, tx);
            }
            CommandClass::Uart => {
                let outcome = self.devices.uart_run(req.args);
                self.respond_echo(&req, outcome, tx);
            }
        }
    }

    /// GPIO handler: `pin_name, gpio_no, gpio_level, ui_id`
    fn run_gpio(&mut self, req: &Request<'_>, tx: &mut ByteProducer<'_>) {
        let mut args = req.args.split(',');
        let pin = args.next().unwrap_or("").trim();
        let gpio_no: u32 = next_number(&mut args);
        let gpio_level: u8 = next_number(&mut args);
        let ui_id: u32 = next_number(&mut args);

        let outcome = self.devices.gpio_set(pin, gpio_no, gpio_level);

        let mut desc: String<DATA_SIZE> = String::new();
        let _ = write!(desc, "GPIO,{},{},{},{}", pin, gpio_no, gpio_level, ui_id);
        self.respond(req.command_id, outcome, &desc, tx);
    }

    /// USB/UART handlers echo the raw argument list
    fn respond_echo(
        &mut self,
        req: &Request<'_>,
        outcome: Result<(), DeviceError>,
        tx: &mut ByteProducer<'_>,
    ) {
        let mut desc: String<DATA_SIZE> = String::new();
        let _ = write!(desc, "{},{}", req.class.tag(), req.args);
        self.respond(req.command_id, outcome, &desc, tx);
    }

    fn respond(
        &mut self,
        command_id: u8,
        outcome: Result<(), DeviceError>,
        desc: &str,
        tx: &mut ByteProducer<'_>,
    ) {
        let kind = match outcome {
            Ok(()) => ResponseKind::Okay,
            Err(DeviceError::Busy) => ResponseKind::Busy,
            Err(DeviceError::Failed) => ResponseKind::Error,
        };

        let record = WireRecord::response(kind, command_id, desc);
        if enqueue_record(tx, &record) {
            self.stats.responses += 1;
        } else {
            warn!("tx queue full, response dropped (id={})", command_id);
        }
    }
}

/// Queue the boot announcement record
pub fn send_ready(tx: &mut ByteProducer<'_>) -> bool {
    enqueue_record(tx, &WireRecord::ready())
}

fn next_number<'a, T: core::str::FromStr + Default>(
    args: &mut impl Iterator<Item = &'a str>,
) -> T {
    args.next()
        .and_then(|t| t.trim().parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use jig_protocol::{ByteQueue, JigEngine, SentinelCodec};

    #[derive(Default)]
    struct MockDevices {
        gpio_calls: Vec<(std::string::String, u32, u8)>,
        outcome: Option<DeviceError>,
    }

    impl DeviceAccess for MockDevices {
        fn gpio_set(&mut self, pin: &str, gpio_no: u32, level: u8) -> Result<(), DeviceError> {
            self.gpio_calls.push((pin.into(), gpio_no, level));
            match self.outcome {
                None => Ok(()),
                Some(e) => Err(e),
            }
        }

        fn usb_run(&mut self, _args: &str) -> Result<(), DeviceError> {
            match self.outcome {
                None => Ok(()),
                Some(e) => Err(e),
            }
        }

        fn uart_run(&mut self, _args: &str) -> Result<(), DeviceError> {
            match self.outcome {
                None => Ok(()),
                Some(e) => Err(e),
            }
        }
    }

    fn engine_with_channel() -> JigEngine {
        let mut engine = JigEngine::new();
        engine.register(SentinelCodec::default()).unwrap();
        engine
    }

    fn feed_record(engine: &mut JigEngine, record: &WireRecord) {
        for b in record.encode() {
            engine.feed(b);
        }
    }

    fn drain(rx: &mut jig_protocol::ByteConsumer<'_>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = rx.dequeue() {
            out.push(b);
        }
        out
    }

    #[test]
    fn test_gpio_command_round_trip() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices::default());

        feed_record(&mut engine, &WireRecord::command(7, "GPIO,A3,17,1,2"));
        dispatcher.poll(&mut engine, &mut tx);

        let out = drain(&mut rx);
        assert_eq!(out.len(), RECORD_SIZE);
        let record = WireRecord::decode(out[..].try_into().unwrap()).unwrap();
        assert_eq!(record.cmd, ResponseKind::Okay.to_byte());
        assert_eq!(&record.data[..18], b"007,GPIO,A3,17,1,2");

        let devices = &dispatcher.devices;
        assert_eq!(devices.gpio_calls.len(), 1);
        assert_eq!(devices.gpio_calls[0], ("A3".into(), 17, 1));
        assert_eq!(dispatcher.stats().responses, 1);
    }

    #[test]
    fn test_unknown_class_produces_no_record() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices::default());

        feed_record(&mut engine, &WireRecord::command(3, "FOO"));
        dispatcher.poll(&mut engine, &mut tx);

        assert!(drain(&mut rx).is_empty());
        assert_eq!(dispatcher.stats().frames, 1);
        assert_eq!(dispatcher.stats().ignored, 1);
        assert_eq!(dispatcher.stats().responses, 0);
    }

    #[test]
    fn test_device_failure_maps_to_error_record() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices {
            outcome: Some(DeviceError::Failed),
            ..MockDevices::default()
        });

        feed_record(&mut engine, &WireRecord::command(8, "GPIO,B2,4,0,3"));
        dispatcher.poll(&mut engine, &mut tx);

        let out = drain(&mut rx);
        let record = WireRecord::decode(out[..].try_into().unwrap()).unwrap();
        assert_eq!(record.cmd, ResponseKind::Error.to_byte());
        assert_eq!(&record.data[..4], b"008,");
    }

    #[test]
    fn test_busy_device_maps_to_busy_record() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices {
            outcome: Some(DeviceError::Busy),
            ..MockDevices::default()
        });

        feed_record(&mut engine, &WireRecord::command(9, "USB,1,write"));
        dispatcher.poll(&mut engine, &mut tx);

        let out = drain(&mut rx);
        let record = WireRecord::decode(out[..].try_into().unwrap()).unwrap();
        assert_eq!(record.cmd, ResponseKind::Busy.to_byte());
        assert_eq!(&record.data[..15], b"009,USB,1,write");
    }

    #[test]
    fn test_uart_echo_response() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices::default());

        feed_record(&mut engine, &WireRecord::command(11, "UART,2,115200"));
        dispatcher.poll(&mut engine, &mut tx);

        let out = drain(&mut rx);
        let record = WireRecord::decode(out[..].try_into().unwrap()).unwrap();
        assert_eq!(record.cmd, ResponseKind::Okay.to_byte());
        assert_eq!(&record.data[..17], b"011,UART,2,115200");
    }

    #[test]
    fn test_back_to_back_records_get_two_responses() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices::default());

        // Both records land in one burst before the dispatcher runs
        feed_record(&mut engine, &WireRecord::command(1, "USB,0"));
        feed_record(&mut engine, &WireRecord::command(2, "UART,1"));
        dispatcher.poll(&mut engine, &mut tx);

        let out = drain(&mut rx);
        assert_eq!(out.len(), 2 * RECORD_SIZE);
        let first = WireRecord::decode(out[..RECORD_SIZE].try_into().unwrap()).unwrap();
        let second = WireRecord::decode(out[RECORD_SIZE..].try_into().unwrap()).unwrap();
        assert_eq!(&first.data[..4], b"001,");
        assert_eq!(&second.data[..4], b"002,");
        assert_eq!(dispatcher.stats().responses, 2);
    }

    #[test]
    fn test_controller_ready_gets_no_response() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices::default());

        feed_record(&mut engine, &WireRecord::new(b'R', 0, ""));
        dispatcher.poll(&mut engine, &mut tx);

        assert!(drain(&mut rx).is_empty());
        assert_eq!(dispatcher.stats().frames, 1);
        assert_eq!(dispatcher.stats().ignored, 0);
        assert!(dispatcher.devices.gpio_calls.is_empty());
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices::default());

        feed_record(&mut engine, &WireRecord::new(b'Z', 5, "GPIO,A1,2,1,0"));
        dispatcher.poll(&mut engine, &mut tx);

        assert!(drain(&mut rx).is_empty());
        assert_eq!(dispatcher.stats().ignored, 1);
        assert!(dispatcher.devices.gpio_calls.is_empty());
    }

    #[test]
    fn test_poll_without_ready_frame_is_noop() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices::default());

        dispatcher.poll(&mut engine, &mut tx);
        assert!(drain(&mut rx).is_empty());
        assert_eq!(dispatcher.stats().frames, 0);
    }

    #[test]
    fn test_malformed_id_echoes_zero() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();
        let mut engine = engine_with_channel();
        let mut dispatcher = Dispatcher::new(MockDevices::default());

        let mut raw = WireRecord::command(123, "GPIO,A1,2,1,0").encode();
        raw[2..5].copy_from_slice(b"abc"); // corrupt the id digits
        for b in raw {
            engine.feed(b);
        }
        dispatcher.poll(&mut engine, &mut tx);

        let out = drain(&mut rx);
        assert_eq!(out.len(), RECORD_SIZE);
        let record = WireRecord::decode(out[..].try_into().unwrap()).unwrap();
        assert_eq!(record.cmd, ResponseKind::Okay.to_byte());
        assert_eq!(&record.data[..4], b"000,");
    }

    #[test]
    fn test_send_ready() {
        let mut queue = ByteQueue::new();
        let (mut tx, mut rx) = queue.split();

        assert!(send_ready(&mut tx));
        let out = drain(&mut rx);
        let record = WireRecord::decode(out[..].try_into().unwrap()).unwrap();
        assert_eq!(record.cmd, ResponseKind::Ready.to_byte());
    }
}
