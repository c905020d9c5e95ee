use peershare_config::{MARKER_INVALID, MARKER_NOT_FOUND, MARKER_OK};

#[derive(Debug, Clone, Copy, PartialEq)]
/// The three fixed server replies. `Ok` is followed by the raw file bytes on
/// the same connection; the other two are terminal.
pub enum Reply {
    Ok,
    NotFound,
    Invalid,
}

impl Reply {
    pub fn marker(self) -> &'static [u8] {
        match self {
            Reply::Ok => MARKER_OK,
            Reply::NotFound => MARKER_NOT_FOUND,
            Reply::Invalid => MARKER_INVALID,
        }
    }
}

#[derive(Debug, PartialEq)]
/// Client-side classification of the first read of a reply.
pub enum FirstReply<'a> {
    /// The `OK` marker. TCP may deliver the start of the file in the same
    /// segment as the marker; those bytes are the first chunk, not noise.
    Ok { remainder: &'a [u8] },
    NotFound,
    Invalid,
}

impl<'a> FirstReply<'a> {
    pub fn classify(buf: &'a [u8]) -> FirstReply<'a> {
        if let Some(remainder) = buf.strip_prefix(MARKER_OK) {
            FirstReply::Ok { remainder }
        } else if buf == MARKER_NOT_FOUND {
            FirstReply::NotFound
        } else {
            FirstReply::Invalid
        }
    }
}
