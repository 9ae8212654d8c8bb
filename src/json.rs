//! Reading and writing automata as JSON records:
//!
//! ```json
//! {
//!     "states": ["q0", "q1"],
//!     "alphabet": ["a", "b"],
//!     "transitions": { "q0": { "a": "q1" }, "q1": { "b": "q1" } },
//!     "start_state": "q0",
//!     "accept_states": ["q1"]
//! }
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::dfa::DFA;
use crate::error::{Error, Result};

pub fn from_json_str(json: &str) -> Result<DFA> {
    let dfa: DFA = serde_json::from_str(json)?;
    debug!("transitions loaded from JSON: {:?}", dfa.transitions());
    Ok(dfa)
}

/// Pretty-printed with four-space indentation.
pub fn to_json_string(dfa: &DFA) -> Result<String> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    dfa.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub fn import_from_json<P: AsRef<Path>>(path: P) -> Result<DFA> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    from_json_str(&text)
}

pub fn export_to_json<P: AsRef<Path>>(dfa: &DFA, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = to_json_string(dfa)?;
    fs::write(path, text).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    info!("DFA saved to {}", path.display());
    Ok(())
}
