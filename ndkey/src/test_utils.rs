use std::fmt;
use std::sync::OnceLock;

use serde::Deserialize;
use serde::Serialize;
use tracing::Level;

/// A one-dimensional integer tensor, standing in for a real tensor
/// type as the payload of gather keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTensor {
    values: Vec<i64>,
}

impl IndexTensor {
    pub fn from_vec(values: Vec<i64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

impl fmt::Display for IndexTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexTensor({:?})", self.values)
    }
}

/// Set up a tracing subscriber with a filter, so tests can print
/// tracing logs with >= level. Only the first call in a process takes
/// effect.
pub fn set_tracing_env_filter(level: Level) {
    static INITIALIZED: OnceLock<()> = OnceLock::new();
    INITIALIZED.get_or_init(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(level.as_str()))
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
    });
}
