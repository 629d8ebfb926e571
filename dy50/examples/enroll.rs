//! Two-pass enrollment: capture, extract, merge, store.
//!
//! Set `SENSOR_PORT` to your serial device and `PAGE_ID` to the library
//! page the template should occupy.

use std::time::Duration;

use dy50::{CharBuffer, ConfirmationCode, Device};

#[tokio::main]
async fn main() -> dy50::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let page: u16 = std::env::var("PAGE_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let mut sensor = Device::open(port);
    sensor.connect().await?;
    sensor.led(true).await?;

    println!("Place your finger on the sensor.");
    wait_for_image(&mut sensor).await?;
    expect_ok(sensor.extract_features(CharBuffer::One).await?)?;
    println!("First read captured. Remove your finger.");

    while sensor.get_image().await? != ConfirmationCode::NoFinger {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    println!("Place the same finger again.");
    wait_for_image(&mut sensor).await?;
    expect_ok(sensor.extract_features(CharBuffer::Two).await?)?;

    println!("Merging captures...");
    expect_ok(sensor.merge_template().await?)?;
    expect_ok(sensor.store_template(CharBuffer::One, page).await?)?;
    println!("✓ Template stored at page {page}");

    sensor.led(false).await?;
    sensor.disconnect().await
}

async fn wait_for_image(sensor: &mut Device) -> dy50::Result<()> {
    loop {
        match sensor.get_image().await? {
            ConfirmationCode::Ok => return Ok(()),
            code => {
                println!("  ... {code}");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}

fn expect_ok(code: ConfirmationCode) -> dy50::Result<()> {
    if code.is_ok() {
        Ok(())
    } else {
        Err(dy50::Error::Device(code))
    }
}
