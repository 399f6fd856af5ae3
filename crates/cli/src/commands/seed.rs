use storefront_core::config::{AppConfig, LoadOptions};
use storefront_core::CatalogStore;

use crate::commands::{CommandResult, CONFIG_FAILURE_EXIT_CODE, RUNTIME_FAILURE_EXIT_CODE};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                CONFIG_FAILURE_EXIT_CODE,
            );
        }
    };

    if !config.catalog.seed_sample_data {
        return CommandResult::success(
            "seed",
            "sample data disabled (catalog.seed_sample_data = false); the server starts empty",
        );
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(error) => return runtime_failure(&error),
    };

    let products = runtime.block_on(CatalogStore::seeded().snapshot());
    let mut lines = vec![format!("sample catalog ({} products):", products.len())];
    lines.extend(products.iter().map(|product| {
        format!("  - {}: {} ({}) price {}", product.id, product.name, product.category, product.price)
    }));

    CommandResult::success("seed", lines.join("\n"))
}

fn runtime_failure(error: &std::io::Error) -> CommandResult {
    CommandResult::failure(
        "seed",
        "runtime_init",
        format!("failed to initialize async runtime: {error}"),
        RUNTIME_FAILURE_EXIT_CODE,
    )
}
