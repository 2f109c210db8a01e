use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sercon::{Config, OperatorInput, OperatorOutput, Supervisor};

/// Initialize tracing with RUST_LOG and SERCON_LOG support.
///
/// Logs go to stderr; stdout belongs to the operator conversation.
fn init_tracing() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match std::env::var("SERCON_LOG").as_deref() {
            Ok("debug") => "debug",
            Ok("warn") | Ok("warning") => "warn",
            Ok("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!("sercon={level}"))
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));
    let _ = subscriber.try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = match Config::from_env_and_args(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            eprintln!("Usage: sercon [device] [baud]");
            eprintln!();
            eprintln!("Arguments:");
            eprintln!("  [device]    Serial device path [default: /dev/ttyAMA0]");
            eprintln!("  [baud]      Baud rate [default: 115200]");
            std::process::exit(2);
        }
    };

    let link = sercon::link::open(&cfg)
        .with_context(|| format!("cannot open serial device {}", cfg.device))?;
    println!("Connected!");

    Supervisor::new(cfg)
        .run(link, OperatorInput::stdio(), OperatorOutput::stdout())
        .await;

    println!("\nExiting.");
    Ok(())
}
