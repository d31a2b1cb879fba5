//! Channel message-passing exercises with crossbeam.

use crossbeam_channel::{Receiver, bounded};
use std::thread;

/// Spawns a producer thread that sends `0..count` over a rendezvous channel.
///
/// The channel disconnects once the producer finishes, so receivers can
/// simply iterate to exhaustion.
pub fn spawn_sequence(count: usize) -> Receiver<usize> {
    let (tx, rx) = bounded(0);
    thread::spawn(move || {
        for i in 0..count {
            if tx.send(i).is_err() {
                // Receiver went away; nothing left to do.
                break;
            }
        }
    });
    rx
}
