use super::RouteError;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::fmt;

/// Bytes that must stay escaped in a request path after decoding.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Decodes percent-escapes in a request path so it can be matched against
/// prefixes, re-escaping only what a URI path cannot carry literally.
///
/// An encoded slash (`%2F`) is not a segment boundary and stays encoded.
/// Pieces that do not decode to UTF-8 are kept as sent.
pub fn decode_path(path: &str) -> String {
    path.split("%2F")
        .map(|part| {
            part.split("%2f")
                .map(decode_piece)
                .collect::<Vec<_>>()
                .join("%2F")
        })
        .collect::<Vec<_>>()
        .join("%2F")
}

fn decode_piece(piece: &str) -> String {
    match percent_decode_str(piece).decode_utf8() {
        Ok(decoded) => utf8_percent_encode(&decoded, PATH_ESCAPE).to_string(),
        Err(_) => piece.to_string(),
    }
}

/// A normalized, segment-aligned URL path prefix such as `/api/ai/fraud`.
///
/// A path is under a prefix when it equals the prefix or continues with `/`,
/// so `/api/ai/fraud` covers `/api/ai/fraud/score` but not `/api/ai/fraudulent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePrefix(String);

impl RoutePrefix {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &'static str| RouteError::InvalidPrefix {
            prefix: raw.to_string(),
            reason,
        };

        if !raw.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let trimmed = raw.strip_suffix('/').unwrap_or(raw);
        if trimmed.is_empty() {
            return Err(invalid("the root prefix would shadow every other route"));
        }

        for segment in trimmed[1..].split('/') {
            match segment {
                "" => return Err(invalid("contains an empty segment")),
                "." | ".." => return Err(invalid("contains a relative segment")),
                s if s.chars().any(|c| c.is_whitespace() || c == '?' || c == '#') => {
                    return Err(invalid("contains a character not allowed in a path"));
                }
                _ => {}
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of path segments, `/api/ai/fraud` has three.
    pub fn depth(&self) -> usize {
        self.0[1..].split('/').count()
    }

    /// The remainder of `path` below this prefix, empty when `path` is the
    /// prefix itself. `None` when `path` is not under the prefix.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.0.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }

    /// True when the two prefixes are equal or one lies under the other.
    pub fn overlaps(&self, other: &RoutePrefix) -> bool {
        self.matches(other.as_str()) || other.matches(self.as_str())
    }
}

impl fmt::Display for RoutePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
