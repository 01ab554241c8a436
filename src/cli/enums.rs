//! CLI enum types for the video container option.

use clap::ValueEnum;

use crate::recorder::VideoFormat;

/// Video container of the recorded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Motion-JPEG in AVI
    #[default]
    Avi,
    /// H.264 in MP4
    Mp4,
}

impl From<Format> for VideoFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Avi => VideoFormat::Avi,
            Format::Mp4 => VideoFormat::Mp4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_conversion() {
        assert_eq!(VideoFormat::from(Format::Avi), VideoFormat::Avi);
        assert_eq!(VideoFormat::from(Format::Mp4), VideoFormat::Mp4);
    }

    #[test]
    fn test_format_value_names() {
        let names: Vec<_> = Format::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["avi", "mp4"]);
    }
}
