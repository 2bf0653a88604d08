//! Subscriber installation for the `quill` binary.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=quill_eval=debug`. With `QUILL_LOG_TREE` also set, spans are
/// printed as an indented call tree instead of flat lines.
///
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var_os("RUST_LOG").is_none() {
            return;
        }
        let tree = std::env::var_os("QUILL_LOG_TREE").is_some();
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(tree.then(|| HierarchicalLayer::new(2).with_targets(true)))
            .with((!tree).then(|| {
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr)
            }))
            .init();
    });
}
