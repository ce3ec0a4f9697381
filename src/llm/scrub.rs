use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Token prefixes Google endpoints echo back in error bodies.
const PREFIX_PATTERNS: [&str; 4] = ["AIza", "ya29.", "GOCSPX-", "eyJ"];

/// Markers followed by a secret value.
const MARKER_PATTERNS: [&str; 7] = [
    "key=",
    "Authorization: Bearer ",
    "authorization: bearer ",
    "x-goog-api-key: ",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "access_token=",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_secret_char(*c))
        .map_or(input.len(), |(i, _)| from + i)
}

/// Replace the token following each `marker` occurrence. With
/// `keep_marker`, the marker text itself survives (`key=[REDACTED]`).
fn scrub_after_marker(scrubbed: &mut String, marker: &str, keep_marker: bool) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        if end == content_start {
            search_from = content_start;
            continue;
        }

        let replace_from = if keep_marker { content_start } else { start };
        scrubbed.replace_range(replace_from..end, REDACTED);
        search_from = replace_from + REDACTED.len();
    }
}

/// Scrub credential-shaped tokens out of provider error text.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let needs_scrubbing = PREFIX_PATTERNS
        .iter()
        .chain(MARKER_PATTERNS.iter())
        .any(|pattern| input.contains(pattern));
    if !needs_scrubbing {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in MARKER_PATTERNS {
        scrub_after_marker(&mut scrubbed, marker, true);
    }
    for prefix in PREFIX_PATTERNS {
        scrub_after_marker(&mut scrubbed, prefix, false);
    }
    Cow::Owned(scrubbed)
}

/// Sanitize API error text: redact the active credential and known token
/// shapes, then cap the length.
pub fn sanitize_api_error(input: &str, credential: Option<&str>) -> String {
    let mut text = scrub_secret_patterns(input).into_owned();
    if let Some(secret) = credential.filter(|s| !s.is_empty()) {
        text = text.replace(secret, REDACTED);
    }

    match text.char_indices().nth(MAX_API_ERROR_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}
