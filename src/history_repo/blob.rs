// BLOB version prefix helpers. [version: u8][payload].
// element_protocol.data: version 1 = wincode ProtocolDefinition.

pub(super) const BLOB_VERSION_PROTOCOL: u8 = 1;

pub(super) fn with_version_prefix(version: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(version);
    out.extend_from_slice(&payload);
    out
}

/// Payload after the version byte, or None if the blob is empty or of another version.
pub(super) fn blob_payload(bytes: &[u8], expected_version: u8) -> Option<&[u8]> {
    match bytes.split_first() {
        Some((&version, payload)) if version == expected_version => Some(payload),
        _ => None,
    }
}
