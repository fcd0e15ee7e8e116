use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{NodeSpec, TaxonomyDocument};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // RUST_LOG wins, otherwise everything from this crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flavortree=trace"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Small coffee wheel used across tests:
///
/// ```text
/// Coffee
/// ├── Sweet
/// │   ├── Chocolate
/// │   │   ├── Dark Chocolate
/// │   │   └── Milk Chocolate
/// │   └── Vanilla
/// ├── Fruity
/// │   ├── Berry
/// │   │   ├── Blackberry
/// │   │   └── Raspberry
/// │   └── Citrus
/// │       └── Lemon
/// └── Floral
///     └── Jasmine
/// ```
pub fn sample_document() -> TaxonomyDocument {
    TaxonomyDocument {
        name: "Coffee".to_string(),
        children: vec![
            NodeSpec::branch(
                "Sweet",
                vec![
                    NodeSpec::branch(
                        "Chocolate",
                        vec![NodeSpec::leaf("Dark Chocolate"), NodeSpec::leaf("Milk Chocolate")],
                    ),
                    NodeSpec::leaf("Vanilla"),
                ],
            ),
            NodeSpec::branch(
                "Fruity",
                vec![
                    NodeSpec::branch(
                        "Berry",
                        vec![NodeSpec::leaf("Blackberry"), NodeSpec::leaf("Raspberry")],
                    ),
                    NodeSpec::branch("Citrus", vec![NodeSpec::leaf("Lemon")]),
                ],
            ),
            NodeSpec::branch("Floral", vec![NodeSpec::leaf("Jasmine")]),
        ],
    }
}
