//! One-time tracing setup for test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Level used when neither `TEST_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_TEST_FILTER: &str = "warn";

/// Install a test-writer subscriber once per process.
///
/// `TEST_LOG` wins over `RUST_LOG`; both fall back to [`DEFAULT_TEST_FILTER`].
/// Safe to call from every test and from a `ctor` hook.
///
/// ```bash
/// TEST_LOG=zpy_backend=debug cargo test -p zpy-backend
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = filter_from(|key| std::env::var(key).ok());
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

fn filter_from<F>(lookup: F) -> EnvFilter
where
    F: Fn(&str) -> Option<String>,
{
    lookup("TEST_LOG")
        .or_else(|| lookup("RUST_LOG"))
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_TEST_FILTER))
}
