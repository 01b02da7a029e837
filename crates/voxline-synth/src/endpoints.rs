//! URL construction for the synthesis API.

use url::Url;

use crate::error::{SynthError, SynthResult};

/// `{base}/text-to-speech/{voice_id}/with-timestamps`
pub fn timed_url(base: &Url, voice_id: &str) -> SynthResult<Url> {
    with_segments(base, &["text-to-speech", voice_id, "with-timestamps"])
}

/// `{base}/text-to-speech/{voice_id}`
pub fn plain_url(base: &Url, voice_id: &str) -> SynthResult<Url> {
    with_segments(base, &["text-to-speech", voice_id])
}

/// `{base}/voices`
pub fn voices_url(base: &Url) -> SynthResult<Url> {
    with_segments(base, &["voices"])
}

/// Parse and check a base URL once, at client construction.
pub fn parse_base(raw: &str) -> SynthResult<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(SynthError::Configuration {
            message: format!("base URL '{raw}' cannot carry a path"),
        });
    }
    Ok(url)
}

fn with_segments(base: &Url, segments: &[&str]) -> SynthResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SynthError::Configuration {
            message: format!("base URL '{base}' cannot carry a path"),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
