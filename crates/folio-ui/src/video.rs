//! Video format detection.
//!
//! Posts embed short clips as `<video>` with WebM and MP4 sources. The
//! formats the browser reports as playable are published on the root
//! element so the stylesheet can hide embeds that would not play.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::HtmlMediaElement;

/// Attribute on `<html>` listing the playable formats.
pub const SUPPORT_ATTRIBUTE: &str = "data-video-support";

/// A video container/codec combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    Ogg,
    H264,
    Webm,
    Vp9,
    Hls,
}

impl VideoFormat {
    /// Every known format.
    pub const ALL: [Self; 5] = [Self::Ogg, Self::H264, Self::Webm, Self::Vp9, Self::Hls];

    /// Short name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ogg => "ogg",
            Self::H264 => "h264",
            Self::Webm => "webm",
            Self::Vp9 => "vp9",
            Self::Hls => "hls",
        }
    }

    /// MIME type with codecs, as passed to `canPlayType`.
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Ogg => r#"video/ogg; codecs="theora""#,
            Self::H264 => r#"video/mp4; codecs="avc1.42E01E""#,
            Self::Webm => r#"video/webm; codecs="vp8, vorbis""#,
            Self::Vp9 => r#"video/webm; codecs="vp9""#,
            Self::Hls => r#"application/x-mpegURL; codecs="avc1.42E01E""#,
        }
    }
}

/// Create a detached `<video>` element to query.
fn probe() -> Option<HtmlMediaElement> {
    let document = web_sys::window()?.document()?;
    match document.create_element("video") {
        Ok(element) => element.dyn_into().ok(),
        Err(err) => {
            log::debug!("cannot create video element: {err:?}");
            None
        }
    }
}

fn plays(video: &HtmlMediaElement, format: VideoFormat) -> bool {
    video.can_play_type(format.mime_type()) == "probably"
}

/// Whether the browser is confident it can play `format`.
///
/// Always `false` outside a browser document.
pub fn supports_video_type(format: VideoFormat) -> bool {
    probe().is_some_and(|video| plays(&video, format))
}

/// Formats the browser is confident it can play.
pub fn supported_formats() -> Vec<VideoFormat> {
    let Some(video) = probe() else {
        return Vec::new();
    };
    VideoFormat::ALL
        .into_iter()
        .filter(|&format| plays(&video, format))
        .collect()
}

/// Space separated format names for [`SUPPORT_ATTRIBUTE`].
pub fn support_attribute(formats: &[VideoFormat]) -> String {
    formats
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(VideoFormat::Ogg.mime_type(), "video/ogg; codecs=\"theora\"");
        assert_eq!(VideoFormat::H264.mime_type(), "video/mp4; codecs=\"avc1.42E01E\"");
        assert_eq!(VideoFormat::Webm.mime_type(), "video/webm; codecs=\"vp8, vorbis\"");
        assert_eq!(VideoFormat::Vp9.mime_type(), "video/webm; codecs=\"vp9\"");
        assert_eq!(
            VideoFormat::Hls.mime_type(),
            "application/x-mpegURL; codecs=\"avc1.42E01E\""
        );
    }

    #[test]
    fn test_support_attribute() {
        assert_eq!(support_attribute(&[]), "");
        assert_eq!(
            support_attribute(&[VideoFormat::Webm, VideoFormat::H264]),
            "webm h264"
        );
    }

    #[test]
    fn test_serde_matches_names() {
        for format in VideoFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.as_str()));
        }
    }
}
