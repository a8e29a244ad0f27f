//! Byte queues decoupling the link I/O threads from the control loop.
//!
//! Both directions use a lock-free single-producer/single-consumer ring:
//! the link reader owns the rx producer half, the dispatcher owns the tx
//! producer half, and the halves can run on different threads without
//! extra synchronization. Queues are only ever accessed through this
//! interface, never by direct indexing.

use heapless::spsc::{Consumer, Producer, Queue};

use crate::record::{WireRecord, RECORD_SIZE};

/// Queue depth in bytes, a comfortable multiple of the record size
pub const QUEUE_DEPTH: usize = RECORD_SIZE * 16;

/// SPSC ring of raw link bytes
pub type ByteQueue = Queue<u8, QUEUE_DEPTH>;

/// Enqueue half of a [`ByteQueue`]
pub type ByteProducer<'a> = Producer<'a, u8, QUEUE_DEPTH>;

/// Dequeue half of a [`ByteQueue`]
pub type ByteConsumer<'a> = Consumer<'a, u8, QUEUE_DEPTH>;

/// Serialize a record onto the tx queue byte by byte.
///
/// The physical writer drains the queue independently and must see a
/// plain byte stream. The record goes out whole or not at all: when the
/// queue lacks room for every byte, nothing is queued and `false` is
/// returned, so no partial record ever reaches the wire.
pub fn enqueue_record(tx: &mut ByteProducer<'_>, record: &WireRecord) -> bool {
    if tx.capacity() - tx.len() < RECORD_SIZE {
        return false;
    }
    for byte in record.encode() {
        // Cannot fail after the space check; we are the only producer
        let _ = tx.enqueue(byte);
    }
    true
}
