//! Stencil font embedding.
//!
//! Labels render in Ubuntu Medium. The woff2 payload is fetched once from
//! the Google Fonts CDN and cached as a ready-to-embed data URI; if the
//! fetch fails the @font-face falls back to a locally installed font so the
//! build still completes.

use std::path::Path;

use base64::Engine;
use tracing::warn;

pub const FONT_URL: &str =
    "https://fonts.gstatic.com/s/ubuntu/v14/4iCv6KVjbNBYlgoCjC3jsGyN.woff2";

pub const FONT_FALLBACK: &str = "local('Ubuntu Medium'), local('Ubuntu-Medium')";

pub const DEFAULT_CACHE_FILE: &str = "_faceplate_font_cache.txt";

/// Returns the `src` value for the stencil @font-face rule, consulting the
/// cache first. Network or cache-write failures degrade to [`FONT_FALLBACK`]
/// with a warning; they never abort a build.
#[must_use]
pub fn font_src(cache_path: &Path) -> String {
    if let Ok(cached) = std::fs::read_to_string(cache_path) {
        let cached = cached.trim().to_string();
        if !cached.is_empty() {
            return cached;
        }
    }

    match fetch_font() {
        Ok(src) => {
            if let Err(e) = std::fs::write(cache_path, &src) {
                warn!("could not write font cache {cache_path:?}: {e}");
            }
            src
        }
        Err(e) => {
            warn!("unable to download stencil font, using local fallback: {e}");
            FONT_FALLBACK.to_string()
        }
    }
}

fn fetch_font() -> Result<String, reqwest::Error> {
    let bytes = reqwest::blocking::get(FONT_URL)?.error_for_status()?.bytes()?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!(
        "url(\"data:application/font-woff;charset=utf-8;base64,{encoded}\")"
    ))
}

/// The complete @font-face CSS block embedded in the document defs.
#[must_use]
pub fn font_face_css(src: &str) -> String {
    format!(
        "@font-face {{ font-family: 'Ubuntu'; font-style: normal; font-weight: 500; src: {src}; }}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_hit_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(DEFAULT_CACHE_FILE);
        std::fs::write(&cache, "url(\"data:application/font-woff;base64,AAAA\")").unwrap();
        let src = font_src(&cache);
        assert!(src.starts_with("url(\"data:"));
    }

    #[test]
    fn font_face_css_embeds_src() {
        let css = font_face_css(FONT_FALLBACK);
        assert!(css.contains("font-family: 'Ubuntu'"));
        assert!(css.contains(FONT_FALLBACK));
    }
}
