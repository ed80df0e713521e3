//! Quadview - A preview server for four-quadrant image comparison sets.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quadview::{
    config::Config,
    preview::PreviewService,
    server::{create_router, RouterConfig, StaticMounts},
    set::{PathResolver, SetRegistry},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Reference directory: {}", config.reference_dir.display());
    info!("  Variant directory 1: {}", config.image_dir_1.display());
    info!("  Variant directory 2: {}", config.image_dir_2.display());
    info!(
        "  Cache: {} images, previews {}px wide at quality {}",
        config.cache_images, config.preview_width, config.jpeg_quality
    );

    for (label, dir) in [
        ("Reference", &config.reference_dir),
        ("Variant 1", &config.image_dir_1),
        ("Variant 2", &config.image_dir_2),
    ] {
        if !dir.is_dir() {
            warn!(
                "  {} directory does not exist yet: {}",
                label,
                dir.display()
            );
        }
    }

    // Create resolver and registry, then run discovery up front so missing
    // data is visible at startup rather than on the first request.
    let resolver = PathResolver::new(
        &config.reference_dir,
        &config.image_dir_1,
        &config.image_dir_2,
    );
    let registry = SetRegistry::new(resolver);

    let sets = registry.available_sets();
    if sets.is_empty() {
        warn!("No complete image sets found - the API will serve an empty list");
    } else {
        info!("Discovered {} complete image set(s)", sets.len());
    }

    // Create preview service
    let service = PreviewService::with_settings(
        registry,
        config.cache_images,
        config.preview_width,
        config.jpeg_quality,
    );

    // Build router configuration
    let router_config = build_router_config(&config);

    // Create router
    let router = create_router(service, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("");
    info!("Try these endpoints:");
    info!("  curl http://{}/health", addr);
    info!("  curl http://{}/api/image-sets", addr);
    info!("  curl http://{}/api/image-preview/<key>/tl -o preview.jpg", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "quadview=debug,tower_http=debug"
    } else {
        "quadview=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_quadrant_hint(config.quadrant_width, config.quadrant_height)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    if !config.no_static_mounts {
        router_config = router_config.with_static_mounts(StaticMounts {
            reference_dir: config.reference_dir.clone(),
            variant_dir_1: config.image_dir_1.clone(),
            variant_dir_2: config.image_dir_2.clone(),
        });
    }

    router_config
}
