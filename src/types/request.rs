//! ConversionRequest type describing one extraction run.
//!
//! A request is built once from the command line and is immutable after
//! validation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::SacdError;

/// Output PCM sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleRate {
    /// 88.2kHz, the default.
    #[default]
    Hz88200,
    /// 176.4kHz.
    Hz176400,
}

impl SampleRate {
    /// Returns the rate in Hz.
    pub fn hz(&self) -> u32 {
        match self {
            SampleRate::Hz88200 => 88_200,
            SampleRate::Hz176400 => 176_400,
        }
    }

    /// Parses a rate from its exact decimal text.
    ///
    /// Only `"88200"` and `"176400"` are accepted; no trimming, no signs,
    /// no leading zeros.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "88200" => Some(SampleRate::Hz88200),
            "176400" => Some(SampleRate::Hz176400),
            _ => None,
        }
    }
}

impl FromStr for SampleRate {
    type Err = SacdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SacdError::invalid_sample_rate(s))
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hz())
    }
}

/// Which area of the source the engine should extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AreaSelector {
    /// Let the engine choose; the multichannel area wins when present.
    #[default]
    Auto,
    /// Only the two-channel area.
    TwoChannel,
}

impl AreaSelector {
    /// Returns the string representation of the selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaSelector::Auto => "auto",
            AreaSelector::TwoChannel => "two-channel",
        }
    }
}

impl fmt::Display for AreaSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Source disc image or DSD file. Never empty.
    pub input_path: PathBuf,

    /// Explicit output directory. `None` means next to the input.
    pub output_dir: Option<PathBuf>,

    /// Output sample rate.
    pub sample_rate: SampleRate,

    /// Area to extract.
    pub area: AreaSelector,

    /// Print disc metadata only, never convert.
    pub details_only: bool,
}

impl ConversionRequest {
    /// Creates a request for `input_path` with default options.
    ///
    /// Returns a MISSING_INPUT error when the path is empty.
    pub fn new(input_path: impl Into<PathBuf>) -> Result<Self, SacdError> {
        let input_path = input_path.into();
        if input_path.as_os_str().is_empty() {
            return Err(SacdError::missing_input("Input path is empty"));
        }

        Ok(Self {
            input_path,
            output_dir: None,
            sample_rate: SampleRate::default(),
            area: AreaSelector::default(),
            details_only: false,
        })
    }

    /// Returns the directory PCM files are written to.
    ///
    /// Defaults to the input file's directory, or the current directory
    /// when the input path has no parent component.
    pub fn effective_output_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.output_dir {
            return dir.clone();
        }

        match self.input_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Returns the input path.
    pub fn input(&self) -> &Path {
        &self.input_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn sample_rate_accepts_exact_text_only() {
        assert_eq!(SampleRate::parse("88200"), Some(SampleRate::Hz88200));
        assert_eq!(SampleRate::parse("176400"), Some(SampleRate::Hz176400));

        for bad in ["48000", "44100", "", " 88200", "88200 ", "088200", "+88200", "88200.0", "352800"] {
            assert_eq!(SampleRate::parse(bad), None, "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn sample_rate_from_str_reports_code() {
        let err = "96000".parse::<SampleRate>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSampleRate);
    }

    #[test]
    fn sample_rate_defaults_to_88200() {
        assert_eq!(SampleRate::default().hz(), 88_200);
        assert_eq!(SampleRate::Hz176400.to_string(), "176400");
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = ConversionRequest::new("").unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingInput);
    }

    #[test]
    fn output_dir_defaults_to_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("disc.iso");

        let request = ConversionRequest::new(&input).unwrap();
        assert_eq!(request.effective_output_dir(), dir.path());
    }

    #[test]
    fn output_dir_for_bare_file_name_is_current_dir() {
        let request = ConversionRequest::new("disc.iso").unwrap();
        assert_eq!(request.effective_output_dir(), PathBuf::from("."));
    }

    #[test]
    fn explicit_output_dir_wins() {
        let mut request = ConversionRequest::new("/music/disc.iso").unwrap();
        request.output_dir = Some(PathBuf::from("/tmp/out"));
        assert_eq!(request.effective_output_dir(), PathBuf::from("/tmp/out"));
    }
}
