/// Activity stream example: a simulated sensor thread feeding a subscription
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use motion_sensing::stream::RegistrationId;
use motion_sensing::{
    AccelerometerSource, ActivityChannel, PipelineConfig, RawSample, SensingResult,
};

/// Plays back a synthetic walk at roughly 50 Hz on its own thread.
#[derive(Default)]
struct SimulatedAccelerometer {
    next_id: AtomicU64,
    running: Mutex<HashMap<RegistrationId, Arc<AtomicBool>>>,
}

impl AccelerometerSource for SimulatedAccelerometer {
    fn register(&self, delivery: SyncSender<RawSample>) -> SensingResult<RegistrationId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let active = Arc::new(AtomicBool::new(true));
        if let Ok(mut running) = self.running.lock() {
            running.insert(id, Arc::clone(&active));
        }

        thread::spawn(move || {
            for i in 0..60 {
                if !active.load(Ordering::SeqCst) {
                    break;
                }
                let z = if i < 15 {
                    9.81
                } else if i % 2 == 0 {
                    11.0
                } else {
                    13.2
                };
                // drop the sample rather than block the sensor thread
                let _ = delivery.try_send(RawSample::new(0.1, 0.2, z));
                thread::sleep(Duration::from_millis(20));
            }
        });
        Ok(id)
    }

    fn unregister(&self, id: RegistrationId) {
        if let Ok(mut running) = self.running.lock() {
            if let Some(active) = running.remove(&id) {
                active.store(false, Ordering::SeqCst);
            }
        }
    }
}

fn main() -> SensingResult<()> {
    println!("=== Motion Sensing: Activity Stream ===\n");

    let sensor = Arc::new(SimulatedAccelerometer::default());
    let mut channel = ActivityChannel::new(Arc::clone(&sensor), PipelineConfig::default());
    channel.subscribe()?;

    let mut received = 0;
    while let Some(report) = channel.next_record() {
        received += 1;
        println!("{}", report.to_json()?);

        if received == 10 {
            let ack = channel.handle_method("reset")?;
            println!("-- reset, steps now {} --", ack.step_count);
        }
    }

    println!("\nSensor finished after {received} reports");
    println!("Subscribed: {}", channel.is_subscribed());
    Ok(())
}
