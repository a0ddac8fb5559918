use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;

use super::parse_document;

/// Document piped on stdin, or None when stdin is a terminal or blank.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    debug!(bytes = buffer.len(), "read document from stdin");

    match buffer.trim() {
        "" => Ok(None),
        text => parse_document(text, false).map(Some),
    }
}
