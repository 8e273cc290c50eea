use irig_stream::stream::Session;
use irig_stream::StreamConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional JSON config file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => StreamConfig::default(),
    };

    println!("Streaming to {}:", config.destination);
    println!("- Sub-protocol: {:?}", config.sub_protocol);
    println!("- Encapsulation: {:?}", config.encapsulation);
    println!(
        "- Signal: {} Hz sine, amplitude {}, sampled at {} Hz",
        config.signal_frequency, config.amplitude, config.sample_rate
    );
    println!("- Packet interval: {:?}", config.packet_interval);
    println!("\nPress Ctrl-C to stop");

    let session = Session::start(config)?;

    tokio::signal::ctrl_c().await?;

    // A send failure that ended the session early is reported here
    let stats = session.shutdown().await?;
    println!(
        "\nSent {} datagrams ({} bytes, {} time packets)",
        stats.datagrams, stats.bytes, stats.time_packets
    );

    Ok(())
}
