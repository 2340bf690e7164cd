//! Chat message record and CSV ingestion.
//!
//! Messages arrive as six-column CSV rows with a header line:
//! `name, content, create_at, channel, sender_role, sender_id`.
//! Columns are read by position, so header names are not significant.

use std::{fmt, path::Path};

use log::info;
use serde::Serialize;

use crate::error::{Error, Result};

/// Number of columns in a message row.
const MESSAGE_COLUMNS: usize = 6;

/// One chat message. Only `content` is rewritten by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Sender / merchant display label.
    pub name: String,
    pub content: String,
    /// Timestamp as recorded by the source.
    pub create_at: String,
    pub channel: String,
    pub sender_role: String,
    pub sender_id: String,
}

impl ChatMessage {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { name: name.into(), content: content.into(), ..Self::default() }
    }

    /// The identity fields, without content, for log lines.
    pub fn identity(&self) -> Identity<'_> {
        Identity(self)
    }
}

/// Display adapter for a message's identity fields.
pub struct Identity<'a>(&'a ChatMessage);

impl fmt::Display for Identity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        write!(
            f,
            "name={:?} sender_id={:?} sender_role={:?} channel={:?} create_at={:?}",
            m.name, m.sender_id, m.sender_role, m.channel, m.create_at
        )
    }
}

/// Read every message row from `path`, in file order.
///
/// # Errors
/// [`Error::Csv`] for unreadable or malformed files, [`Error::MissingColumn`]
/// for rows with fewer than six columns.
pub fn read_messages(path: &Path) -> Result<Vec<ChatMessage>> {
    let csv_err = |source: csv::Error| Error::Csv { path: path.to_path_buf(), source };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut messages = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.len() < MESSAGE_COLUMNS {
            return Err(Error::MissingColumn {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                expected: MESSAGE_COLUMNS,
            });
        }
        messages.push(ChatMessage {
            name: record[0].to_string(),
            content: record[1].to_string(),
            create_at: record[2].to_string(),
            channel: record[3].to_string(),
            sender_role: record[4].to_string(),
            sender_id: record[5].to_string(),
        });
    }

    if messages.is_empty() {
        info!("No chat message yet.");
    } else {
        info!("Succeeded get chat message, total message {}", messages.len());
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_messages_in_order() {
        let file = csv_file(
            "name,content,create_at,channel,sender_role,sender_id\n\
             Toko A,\"Halo, kak\",2018-08-01 10:00:00,web,buyer,u1\n\
             Toko A,Gpp kok,2018-08-01 10:05:00,app,seller,u2\n",
        );
        let messages = read_messages(file.path()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "Halo, kak");
        assert_eq!(messages[1].sender_role, "seller");
        assert_eq!(messages[1].sender_id, "u2");
    }

    #[test]
    fn test_header_only_is_empty() {
        let file = csv_file("name,content,create_at,channel,sender_role,sender_id\n");
        assert!(read_messages(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_short_row_rejected() {
        let file = csv_file("name,content,create_at,channel,sender_role,sender_id\nToko,halo\n");
        let err = read_messages(file.path()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { line: 2, expected: 6, .. }), "got: {}", err);
    }

    #[test]
    fn test_identity_omits_content() {
        let mut m = ChatMessage::new("Toko A", "rahasia");
        m.sender_id = "u9".into();
        let id = m.identity().to_string();
        assert!(id.contains("u9"), "got: {}", id);
        assert!(!id.contains("rahasia"), "got: {}", id);
    }
}
