use product_catalog::app::COUNTER_KEY;
use product_catalog::infra::config::{Settings, StoreEndpoint};
use product_catalog::infra::logging;
use product_catalog::storage;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--seed]\n\
         \n\
         Reads the same env vars as api_server:\n\
           DATABASE_URL or VCAP_SERVICES or STORE_HOST/STORE_PORT/STORE_USER/STORE_PASSWORD/STORE_DATABASE\n\
           STORE_BACKEND, PORT, SEED_SAMPLE_DATA\n\
         \n\
         --seed   reset the store and load the three sample products\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::setup_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let seed = args.iter().any(|a| a == "--seed");

    // Force-read config (nice error messages if invalid)
    let settings = Settings::from_env()?;

    println!("> Preflight:");
    println!("  STORE_BACKEND={:?}", settings.store.backend);
    match &settings.store.endpoint {
        StoreEndpoint::Url(_) => println!("  store endpoint: connection URL"),
        StoreEndpoint::Parts { host, port, credentials } => println!(
            "  store endpoint: {}:{} (user={}, database={})",
            host, port, credentials.username, credentials.database
        ),
    }
    println!("  PORT={}", settings.http_port);

    // Connect + ping
    let store = storage::connect(&settings.store).await?;
    println!("  Store reachable (ping ok).");

    let keys = store.keys().await?;
    let records = keys.iter().filter(|k| k.as_str() != COUNTER_KEY).count();
    println!("  Stored products: {}", records);

    match store.get(COUNTER_KEY).await? {
        Some(raw) => println!("  Id counter: {}", String::from_utf8_lossy(&raw)),
        None => println!("  Id counter: not yet created (next id will be 1)"),
    }

    if seed {
        let repository = product_catalog::ProductRepository::new(store);
        let seeded = repository.load_sample_data().await?;
        println!("  Seeded {} sample products.", seeded.len());
    }

    println!("> Preflight OK.");
    Ok(())
}
