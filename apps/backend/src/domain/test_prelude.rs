use proptest::test_runner::Config as ProptestConfig;

/// Proptest config; raise cases locally with `PROPTEST_CASES=800`.
pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(32); // Low default for fast CI

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}
