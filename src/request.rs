//! The request as the CGI host handed it to us.

use std::collections::BTreeMap;

pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
pub const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
pub const CONTENT_TYPE: &str = "CONTENT_TYPE";
pub const QUERY_STRING: &str = "QUERY_STRING";
pub const HTTP_TRANSFER_ENCODING: &str = "HTTP_TRANSFER_ENCODING";
pub const GATEWAY_INTERFACE: &str = "GATEWAY_INTERFACE";

/// Name prefixes of the variables listed in the environment dump.
pub const ECHOED_PREFIXES: [&str; 6] = [
    "HTTP_", "REQUEST_", "CONTENT_", "QUERY_", "SERVER_", "GATEWAY_",
];

/// A read-only snapshot of the CGI meta-variables for one invocation.
///
/// The tracked variables are pulled out into their own fields. Everything
/// else stays in `env_table`, which is ordered by name so the environment
/// dump can be written straight from it.
#[derive(Clone, Debug, Default)]
pub struct RequestSnapshot {
    pub method: Option<String>,
    /// Kept as raw text. It is only interpreted when deciding how much of
    /// the body to read, see [`RequestSnapshot::declared_length`].
    pub content_length: Option<String>,
    pub content_type: Option<String>,
    pub query_string: Option<String>,
    pub transfer_encoding: Option<String>,
    pub env_table: BTreeMap<String, String>,
}

impl RequestSnapshot {
    /// Build a snapshot from name/value pairs. A name given twice keeps its last value.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env_table: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let lookup = |name: &str| env_table.get(name).cloned();

        Self {
            method: lookup(REQUEST_METHOD),
            content_length: lookup(CONTENT_LENGTH),
            content_type: lookup(CONTENT_TYPE),
            query_string: lookup(QUERY_STRING),
            transfer_encoding: lookup(HTTP_TRANSFER_ENCODING),
            env_table,
        }
    }

    /// Snapshot the environment of the current process.
    ///
    /// Variables that are not valid Unicode cannot be echoed as text and are skipped.
    pub fn from_process_env() -> Self {
        let vars = std::env::vars_os().filter_map(|(k, v)| {
            match (k.into_string(), v.into_string()) {
                (Ok(k), Ok(v)) => Some((k, v)),
                (k, _) => {
                    let name = k.unwrap_or_else(|n| n.to_string_lossy().into_owned());
                    tracing::debug!(%name, "Skipping non-Unicode environment variable");
                    None
                }
            }
        });
        let snapshot = Self::from_vars(vars);
        tracing::debug!(vars = snapshot.env_table.len(), "Snapshotted CGI environment");
        snapshot
    }

    pub fn is_post(&self) -> bool {
        self.method.as_deref() == Some("POST")
    }

    /// The body length the client declared, if `CONTENT_LENGTH` holds a
    /// non-negative integer. Garbage, negative values and absence all give `None`.
    pub fn declared_length(&self) -> Option<u64> {
        self.content_length.as_deref()?.trim().parse().ok()
    }

    pub fn gateway_interface(&self) -> Option<&str> {
        self.env_table.get(GATEWAY_INTERFACE).map(String::as_str)
    }

    /// The variables that belong in the environment dump, ascending by name.
    pub fn echoed_variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env_table
            .iter()
            .filter(|(k, _)| ECHOED_PREFIXES.iter().any(|p| k.starts_with(p)))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
