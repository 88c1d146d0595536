//! Wire envelope carrying the schema global id.
//!
//! ```text
//! +-------+----------------------+-----------------+
//! | 0x00  | global id (8 or 4 B) | encoded payload |
//! +-------+----------------------+-----------------+
//! ```
//!
//! The id is big-endian. With header mode the id travels in the
//! `apicurio.value.globalId` / `apicurio.key.globalId` record header as a
//! decimal string and the payload is written bare.

use std::str::FromStr;

use super::error::SerializationError;
use crate::schemastreams::kafka::Headers;

pub const MAGIC_BYTE: u8 = 0x0;

pub const VALUE_GLOBAL_ID_HEADER: &str = "apicurio.value.globalId";
pub const KEY_GLOBAL_ID_HEADER: &str = "apicurio.key.globalId";

/// Width of the global id in the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdHandler {
    /// 8-byte id
    #[default]
    Default,
    /// 4-byte id, for consumers built against older registries
    Legacy,
}

impl IdHandler {
    pub fn id_size(&self) -> usize {
        match self {
            IdHandler::Default => 8,
            IdHandler::Legacy => 4,
        }
    }

    fn write_id(&self, global_id: i64, buf: &mut Vec<u8>) -> Result<(), SerializationError> {
        match self {
            IdHandler::Default => buf.extend_from_slice(&global_id.to_be_bytes()),
            IdHandler::Legacy => {
                let id = i32::try_from(global_id).map_err(|_| {
                    SerializationError::SerializationFailed(format!(
                        "global id {} does not fit the 4-byte id handler",
                        global_id
                    ))
                })?;
                buf.extend_from_slice(&id.to_be_bytes());
            }
        }
        Ok(())
    }

    fn read_id(&self, bytes: &[u8]) -> i64 {
        match self {
            IdHandler::Default => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[..8]);
                i64::from_be_bytes(raw)
            }
            IdHandler::Legacy => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&bytes[..4]);
                i64::from(i32::from_be_bytes(raw))
            }
        }
    }
}

impl FromStr for IdHandler {
    type Err = SerializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
        match name.as_str() {
            "default" | "defaultidhandler" | "8" => Ok(IdHandler::Default),
            "legacy" | "legacy4byteidhandler" | "4" => Ok(IdHandler::Legacy),
            _ => Err(SerializationError::SchemaError(format!(
                "Unknown id handler '{}'",
                s
            ))),
        }
    }
}

/// Prefix `payload` with the magic byte and the global id
pub fn encode(
    id_handler: IdHandler,
    global_id: i64,
    payload: &[u8],
) -> Result<Vec<u8>, SerializationError> {
    let mut buf = Vec::with_capacity(1 + id_handler.id_size() + payload.len());
    buf.push(MAGIC_BYTE);
    id_handler.write_id(global_id, &mut buf)?;
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Split an enveloped record into its global id and payload
pub fn decode(id_handler: IdHandler, data: &[u8]) -> Result<(i64, &[u8]), SerializationError> {
    let header_len = 1 + id_handler.id_size();
    if data.len() < header_len {
        return Err(SerializationError::InvalidEnvelope(format!(
            "expected at least {} bytes, got {}",
            header_len,
            data.len()
        )));
    }
    if data[0] != MAGIC_BYTE {
        return Err(SerializationError::InvalidEnvelope(format!(
            "unknown magic byte 0x{:02x}",
            data[0]
        )));
    }

    let global_id = id_handler.read_id(&data[1..header_len]);
    Ok((global_id, &data[header_len..]))
}

pub fn global_id_header(is_key: bool) -> &'static str {
    if is_key {
        KEY_GLOBAL_ID_HEADER
    } else {
        VALUE_GLOBAL_ID_HEADER
    }
}

/// Bytes and headers produced by a value codec for one record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodedValue {
    pub payload: Vec<u8>,
    pub headers: Headers,
}

/// Attach `global_id` to an encoded body, in the envelope or in a header
pub fn frame(
    id_handler: IdHandler,
    use_headers: bool,
    is_key: bool,
    global_id: i64,
    body: Vec<u8>,
) -> Result<EncodedValue, SerializationError> {
    if use_headers {
        let headers = Headers::new().insert(global_id_header(is_key), global_id.to_string());
        return Ok(EncodedValue {
            payload: body,
            headers,
        });
    }

    Ok(EncodedValue {
        payload: encode(id_handler, global_id, &body)?,
        headers: Headers::new(),
    })
}

/// Recover the global id and the encoded body of a record.
///
/// A global-id header wins over the envelope, so records written in either
/// mode can be read by the same consumer.
pub fn unframe<'a>(
    id_handler: IdHandler,
    is_key: bool,
    headers: &Headers,
    data: &'a [u8],
) -> Result<(i64, &'a [u8]), SerializationError> {
    match global_id_from_headers(headers, is_key)? {
        Some(global_id) => Ok((global_id, data)),
        None => decode(id_handler, data),
    }
}

/// Global id carried in the record headers, if any
pub fn global_id_from_headers(
    headers: &Headers,
    is_key: bool,
) -> Result<Option<i64>, SerializationError> {
    let name = global_id_header(is_key);
    match headers.get(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|e| {
            SerializationError::InvalidEnvelope(format!(
                "header '{}' does not hold a global id ('{}'): {}",
                name, raw, e
            ))
        }),
    }
}
