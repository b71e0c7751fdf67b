#![allow(missing_docs)]
#![allow(dead_code)]

use std::sync::Once;

static INIT: Once = Once::new();

/// Routes the crate's tracing output to the test harness. `RUST_LOG`
/// selects what is shown.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const CONFIG: &str = r#"// server settings
listen = "0.0.0.0", 8080
name = "edge \"primary\"" // inline note
retries = 3
"#;

/// `line N` records joined by newlines, long enough to span many windows.
pub fn numbered_lines(count: usize) -> String {
    (0..count).map(|i| format!("line {i}\n")).collect()
}
