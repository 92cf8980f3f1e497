//! HTML fragment injection.

const BODY_CLOSE: &[u8] = b"</body>";

/// Insert `fragment` before the first `</body>`, or append it when there is none.
///
/// The fragment is opaque; it is copied byte for byte.
pub fn inject_fragment(html: &[u8], fragment: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(html.len() + fragment.len());

    match html.windows(BODY_CLOSE.len()).position(|w| w == BODY_CLOSE) {
        Some(at) => {
            out.extend_from_slice(&html[..at]);
            out.extend_from_slice(fragment);
            out.extend_from_slice(&html[at..]);
        }
        None => {
            out.extend_from_slice(html);
            out.extend_from_slice(fragment);
        }
    }

    out
}
