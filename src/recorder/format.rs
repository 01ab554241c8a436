//! Container formats and the codecs they are paired with.

use serde::Deserialize;
use std::fmt;

/// Output container chosen at recording start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[default]
    Avi,
    Mp4,
}

impl VideoFormat {
    pub fn extension(self) -> &'static str {
        match self {
            VideoFormat::Avi => "avi",
            VideoFormat::Mp4 => "mp4",
        }
    }

    /// Codec used for this container.
    pub fn codec(self) -> Codec {
        match self {
            VideoFormat::Avi => Codec::Mjpeg,
            VideoFormat::Mp4 => Codec::H264,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "avi" => Some(VideoFormat::Avi),
            "mp4" => Some(VideoFormat::Mp4),
            _ => None,
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

/// Video codec written into the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Motion JPEG, every frame an independent JPEG
    Mjpeg,
    H264,
}

impl Codec {
    pub fn display_name(self) -> &'static str {
        match self {
            Codec::Mjpeg => "MJPEG",
            Codec::H264 => "H.264",
        }
    }

    /// ffmpeg output arguments selecting this codec.
    pub fn ffmpeg_args(self) -> &'static [&'static str] {
        match self {
            Codec::Mjpeg => &["-c:v", "mjpeg", "-q:v", "3"],
            Codec::H264 => &["-c:v", "libx264", "-preset", "veryfast", "-pix_fmt", "yuv420p"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_codec_pairing() {
        assert_eq!(VideoFormat::Avi.codec(), Codec::Mjpeg);
        assert_eq!(VideoFormat::Mp4.codec(), Codec::H264);
        assert_eq!(VideoFormat::Avi.extension(), "avi");
        assert_eq!(VideoFormat::Mp4.extension(), "mp4");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(VideoFormat::from_str("MP4"), Some(VideoFormat::Mp4));
        assert_eq!(VideoFormat::from_str("avi"), Some(VideoFormat::Avi));
        assert_eq!(VideoFormat::from_str("mkv"), None);
    }

    #[test]
    fn test_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: VideoFormat,
        }
        let w: Wrapper = toml::from_str("format = \"mp4\"").unwrap();
        assert_eq!(w.format, VideoFormat::Mp4);
    }

    #[test]
    fn test_codec_args() {
        assert!(Codec::H264.ffmpeg_args().contains(&"libx264"));
        assert!(Codec::Mjpeg.ffmpeg_args().contains(&"mjpeg"));
        assert_eq!(format!("{}", VideoFormat::Mp4), "MP4");
    }
}
