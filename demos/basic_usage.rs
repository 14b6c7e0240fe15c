/// Basic usage example: feed accelerometer samples, get activity reports
use motion_sensing::{ControlCommand, MotionPipeline, PipelineConfig, RawSample};

fn main() {
    println!("=== Motion Sensing: Basic Example ===\n");

    // Default config: 10-sample smoothing, report every 3 samples
    let config = PipelineConfig::default();
    let mut pipeline = MotionPipeline::new(config);

    // Simulated stream: device at rest, a short walk, then a sprint
    let mut samples = Vec::new();
    // Rest (gravity only)
    for _ in 0..6 {
        samples.push([0.05, 0.1, 9.81]);
    }
    // Walking: alternating swing and heel strike
    for i in 0..12 {
        samples.push(if i % 2 == 0 { [0.8, 1.2, 10.8] } else { [1.5, 2.0, 12.6] });
    }
    // Running
    for i in 0..12 {
        samples.push(if i % 2 == 0 { [2.0, 3.0, 13.0] } else { [3.5, 4.0, 16.0] });
    }

    println!("Processing {} samples...\n", samples.len());

    let mut report_count = 0;
    for axes in samples {
        if let Some(report) = pipeline.ingest(&RawSample::from(axes)) {
            report_count += 1;
            println!(
                "[{report_count:>2}] steps={:<3} activity={:<10} magnitude={:.2}",
                report.step_count, report.activity_type, report.smoothed_magnitude
            );
        }
    }

    let ack = pipeline.apply(ControlCommand::Reset);
    println!("\nReset acknowledged, step count now {}", ack.step_count);

    println!("\n=== Summary ===");
    println!("Total samples: {}", pipeline.total_samples());
    println!("Reports emitted: {report_count}");
    println!("Final activity: {}", pipeline.activity());
}
