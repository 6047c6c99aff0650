//! Sample channel between the emulated audio generator and a host sink.
//! Wiring `AudioSource` to an actual output device is host-level plumbing
//! and out of scope here; this module only carries samples across the
//! channel.

use std::sync::mpsc::sync_channel;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::SyncSender;

pub struct AudioConsumer {
    sender: SyncSender<f32>,
}

impl AudioConsumer {
    pub fn consume(&self, sample: f32) {
        if let Err(e) = self.sender.send(sample) {
            eprintln!("Unable to send audio sample: {}", e);
        }
    }
}

pub struct AudioSource {
    receiver: Receiver<f32>,
}

impl AudioSource {
    pub const SAMPLE_RATE: u32 = 31440;
}

impl Iterator for AudioSource {
    type Item = f32;
    fn next(&mut self) -> Option<Self::Item> {
        self.receiver
            .recv()
            .map_err(|e| {
                eprintln!("Unable to retrieve audio sample: {}", e);
                e
            })
            .ok()
    }
}

pub fn create_consumer_and_source() -> (AudioConsumer, AudioSource) {
    let (sender, receiver) = sync_channel(10000);
    (AudioConsumer { sender }, AudioSource { receiver })
}
