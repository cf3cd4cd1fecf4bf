//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call into a backend port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (e.g. "shell").
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Host description (OS and architecture) at recording time.
    pub host: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_round_trip() {
        let cassette = Cassette {
            name: "shell-session".into(),
            recorded_at: Utc::now(),
            host: "linux-x86_64".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "shell".into(),
                method: "output_to_file".into(),
                input: json!({"command": "ls -l"}),
                output: json!({"Ok": null}),
            }],
        };
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        let deserialized: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(cassette, deserialized);
    }
}
