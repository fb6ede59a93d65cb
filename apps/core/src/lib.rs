pub mod action_executor;
pub mod catalog;
pub mod config;
pub mod contract;
pub mod debounce;
pub mod icon;
pub mod launcher;
pub mod logging;
pub mod model;
pub mod provider;
pub mod providers;
pub mod runtime;
pub mod search;
pub mod usage;

#[cfg(test)]
mod tests {
    mod query_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/query_latency_test.rs"
        ));
    }
}
