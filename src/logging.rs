//! Log output for the binaries.
//!
//! Library events are emitted with `tracing`; with no tracing subscriber
//! installed they are forwarded as `log` records, which `env_logger`
//! prints to stderr. `RUST_LOG` overrides the verbosity flag.

/// Default filter for a `-v` count: warnings only, then info, then debug.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the stderr logger. Call once, at the top of `main`.
pub fn init(verbose: u8) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter(verbose)))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "info");
        assert_eq!(default_filter(2), "debug");
        assert_eq!(default_filter(9), "debug");
    }
}
