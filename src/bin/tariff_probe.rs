//! One-off lookup against the live sources: `tariff_probe <product> <to> [from]`.

use std::process::ExitCode;

use tariff_lookup::{TariffConfig, TariffService};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tariff=debug,warn")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (product, to) = match (args.first(), args.get(1)) {
        (Some(p), Some(t)) => (p.as_str(), t.as_str()),
        _ => {
            eprintln!("usage: tariff_probe <product> <to-country> [from-country]");
            return Ok(ExitCode::FAILURE);
        }
    };

    let cfg = TariffConfig::load_default()?;
    let from = args.get(2).map(String::as_str).unwrap_or(&cfg.default_from);
    let svc = TariffService::from_config(&cfg)?;

    let lookup = svc.lookup(product, from, to).await;
    if let Some(hs) = lookup.hs {
        println!("hs code: {} ({:?})", hs.code, hs.kind);
    }
    match lookup.record {
        Some(r) => {
            println!("{}", serde_json::to_string_pretty(&r)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("no tariff data for {product} from {from} to {to}");
            Ok(ExitCode::FAILURE)
        }
    }
}
