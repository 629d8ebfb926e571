//! Capture a finger and search the template library for it.

use std::time::Duration;

use dy50::{CharBuffer, ConfirmationCode, Device, SearchOutcome};

#[tokio::main]
async fn main() -> dy50::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut sensor = Device::open(port);
    sensor.connect().await?;

    let count = sensor.template_count().await?;
    println!("Library holds {count} templates.");

    println!("Place your finger on the sensor.");
    loop {
        match sensor.get_image().await? {
            ConfirmationCode::Ok => break,
            code => {
                println!("  ... {code}");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
    println!("Image taken.");

    let code = sensor.extract_features(CharBuffer::One).await?;
    if !code.is_ok() {
        println!("Could not extract features: {code}");
        return sensor.disconnect().await;
    }

    match sensor.search(CharBuffer::One).await? {
        SearchOutcome::Match { page, confidence } => {
            println!("✓ Fingerprint found at page {page} (confidence {confidence})");
        }
        SearchOutcome::Miss(code) => {
            println!("✗ No match: {code}");
        }
    }

    sensor.disconnect().await
}
