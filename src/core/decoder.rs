use crate::domain::message::{ProtocolMessage, ResultsPhase};
use csv::{ByteRecord, ReaderBuilder};

/// Drops the whitespace at the start of every unquoted field, so that a quote
/// after `", "` still opens a quoted field for the csv reader.
fn strip_field_padding(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut at_field_start = true;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            out.push(c);
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    out.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        if at_field_start && c.is_whitespace() {
            continue;
        }
        in_quotes = at_field_start && c == '"';
        at_field_start = c == ',';
        out.push(c);
    }
    out
}

/// Splits one protocol line into trimmed fields using CSV quoting rules.
///
/// The csv reader is lenient: an unterminated quote simply runs to the end of
/// the line, and invalid UTF-8 inside a field is replaced rather than rejected.
/// Returns an empty vector for a blank line.
pub fn split_fields(line: &str) -> Vec<String> {
    let line = strip_field_padding(line);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => record
            .iter()
            .map(|field| String::from_utf8_lossy(field).trim().to_string())
            .collect(),
        Ok(false) => Vec::new(),
        Err(e) => {
            tracing::trace!("Unparseable line {:?}: {}", line, e);
            Vec::new()
        }
    }
}

/// Decodes one line into a [`ProtocolMessage`]. Never fails: anything that is
/// not a recognised tag becomes [`ProtocolMessage::Unknown`].
pub fn decode(line: &str) -> ProtocolMessage {
    let fields = split_fields(line);
    let Some(tag) = fields.first() else {
        return ProtocolMessage::Unknown;
    };

    // 缺少的欄位一律視為空字串
    let arg = |index: usize| fields.get(index).cloned().unwrap_or_default();

    match tag.to_ascii_uppercase().as_str() {
        "CL" => ProtocolMessage::Clear,
        "RH" => ProtocolMessage::Header {
            title: arg(1),
            heat: arg(4),
        },
        "TM" => ProtocolMessage::Clock { text: arg(1) },
        "SRMODE" => match arg(1).to_ascii_uppercase().as_str() {
            "BEGIN" => ProtocolMessage::ResultsMode(ResultsPhase::Begin),
            "END" => ProtocolMessage::ResultsMode(ResultsPhase::End),
            _ => ProtocolMessage::Unknown,
        },
        "SR" => ProtocolMessage::Result {
            place: arg(1),
            name: arg(2),
            mark: arg(3),
        },
        "TX" => ProtocolMessage::Text { title: arg(1) },
        _ => ProtocolMessage::Unknown,
    }
}
