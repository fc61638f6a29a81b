//! Command-line argument parsing.
//!
//! Turns raw arguments into a validated [`ConversionRequest`]. Parsing has no
//! side effects: it never touches the filesystem or the decode engine.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::error::{ErrorCode, Result, SacdError};
use crate::types::{AreaSelector, ConversionRequest, SampleRate};

const HELP_TEMPLATE: &str = "\n{usage-heading} {usage}\n\n{options}\n";

/// odio-sacd: extract SACD audio areas to PCM files
#[derive(Parser, Debug)]
#[command(name = "odio-sacd")]
#[command(about = "Command-line decoder for SACD ISO, DSF and DFF files")]
#[command(override_usage = "odio-sacd -i /path/to/file [options]")]
#[command(help_template = HELP_TEMPLATE)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Specify the input file (*.iso, *.dsf, *.dff)
    #[arg(short, long, value_name = "PATH", allow_hyphen_values = true)]
    pub infile: Option<PathBuf>,

    /// The folder to write the WAVE files to. If you omit this, the files
    /// will be placed in the input file's directory
    #[arg(short, long, value_name = "PATH", allow_hyphen_values = true)]
    pub outdir: Option<PathBuf>,

    /// The output samplerate. Valid rates are: 88200 and 176400. If you
    /// omit this, 88.2kHz will be used
    #[arg(short, long, value_name = "RATE", allow_hyphen_values = true)]
    pub rate: Option<String>,

    /// Only extract the 2-channel area if it exists. If you omit this, the
    /// multichannel area will have priority
    #[arg(short, long)]
    pub stereo: bool,

    /// Show detailed information about the disc
    #[arg(short, long)]
    pub details: bool,

    /// Words that are not options. Accepted and ignored.
    #[arg(hide = true, value_name = "IGNORED")]
    pub ignored: Vec<OsString>,
}

impl Cli {
    /// Parses arguments (including the program name) without exiting.
    ///
    /// Unknown options and missing option values surface as MISSING_INPUT,
    /// the invalid-syntax outcome.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args)
            .map_err(|e| SacdError::with_source(ErrorCode::MissingInput, "Invalid command-line syntax", e))
    }

    /// Validates the parsed options into a request.
    ///
    /// A bad rate is reported before a missing input.
    pub fn into_request(self) -> Result<ConversionRequest> {
        let sample_rate = match self.rate.as_deref() {
            Some(text) => text.parse::<SampleRate>()?,
            None => SampleRate::default(),
        };

        let input = self
            .infile
            .ok_or_else(|| SacdError::missing_input("No input file given"))?;

        let mut request = ConversionRequest::new(input)?;
        request.output_dir = self.outdir;
        request.sample_rate = sample_rate;
        request.area = if self.stereo {
            AreaSelector::TwoChannel
        } else {
            AreaSelector::Auto
        };
        request.details_only = self.details;

        Ok(request)
    }
}

/// Returns the first rate value that is not a supported rate.
///
/// Walks the arguments the way a getopt scan does, so a bad rate is found
/// even when the rest of the command line would not parse. Values taken by
/// `-i`/`-o` are skipped and scanning stops at `--`.
fn first_invalid_rate(args: &[OsString]) -> Option<String> {
    let mut rest = args.iter().map(|arg| arg.to_string_lossy());

    while let Some(arg) = rest.next() {
        if arg == "--" {
            break;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (long, None),
            };
            match name {
                "rate" => {
                    let value = inline.or_else(|| rest.next().map(|v| v.into_owned()));
                    if let Some(value) = value.filter(|v| SampleRate::parse(v).is_none()) {
                        return Some(value);
                    }
                }
                "infile" | "outdir" if inline.is_none() => {
                    rest.next();
                }
                _ => {}
            }
            continue;
        }

        let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) else {
            continue;
        };
        for (at, flag) in cluster.char_indices() {
            if !matches!(flag, 'i' | 'o' | 'r') {
                continue;
            }
            let attached = &cluster[at + flag.len_utf8()..];
            let value = if attached.is_empty() {
                rest.next().map(|v| v.into_owned())
            } else {
                Some(attached.to_string())
            };
            if flag == 'r' {
                if let Some(value) = value.filter(|v| SampleRate::parse(v).is_none()) {
                    return Some(value);
                }
            }
            break;
        }
    }

    None
}

/// Builds a conversion request from raw arguments.
///
/// `args` includes the program name, as with `std::env::args_os()`. An
/// unsupported rate wins over every other usage problem.
pub fn build_request<I, T>(args: I) -> Result<ConversionRequest>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if let Some(rate) = args.get(1..).and_then(first_invalid_rate) {
        return Err(SacdError::invalid_sample_rate(&rate));
    }
    Cli::try_parse_args(args)?.into_request()
}

/// Renders the help text shown after usage errors.
pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(args: &[&str]) -> Result<ConversionRequest> {
        build_request(std::iter::once("odio-sacd").chain(args.iter().copied()))
    }

    #[test]
    fn minimal_request_uses_defaults() {
        let request = build(&["-i", "disc.iso"]).unwrap();
        assert_eq!(request.input_path, PathBuf::from("disc.iso"));
        assert_eq!(request.output_dir, None);
        assert_eq!(request.sample_rate, SampleRate::Hz88200);
        assert_eq!(request.area, AreaSelector::Auto);
        assert!(!request.details_only);
    }

    #[test]
    fn long_options() {
        let request = build(&[
            "--infile", "disc.iso", "--outdir", "/tmp/out", "--rate", "176400", "--stereo",
            "--details",
        ])
        .unwrap();
        assert_eq!(request.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(request.sample_rate, SampleRate::Hz176400);
        assert_eq!(request.area, AreaSelector::TwoChannel);
        assert!(request.details_only);
    }

    #[test]
    fn short_flags_combine() {
        let request = build(&["-sd", "-i", "disc.iso"]).unwrap();
        assert_eq!(request.area, AreaSelector::TwoChannel);
        assert!(request.details_only);
    }

    #[test]
    fn no_arguments_is_invalid_syntax() {
        let err = build(&[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingInput);
    }

    #[test]
    fn missing_infile_is_invalid_syntax() {
        let err = build(&["-o", "/tmp", "-d"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingInput);
    }

    #[test]
    fn unknown_option_is_invalid_syntax() {
        for args in [
            &["-i", "disc.iso", "-x"][..],
            &["-i", "disc.iso", "--verbose"][..],
            &["-i", "disc.iso", "--help"][..],
            &["-i", "disc.iso", "-h"][..],
            &["-i", "disc.iso", "--version"][..],
            &["-i"][..],
        ] {
            let err = build(args).unwrap_err();
            assert_eq!(err.code, ErrorCode::MissingInput, "{:?}", args);
        }
    }

    #[test]
    fn rejects_unsupported_rates() {
        for rate in ["48000", "44100", "96000", "352800", "abc", "88200Hz", "0"] {
            let err = build(&["-i", "disc.iso", "-r", rate]).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidSampleRate, "{}", rate);
            assert!(err.is_usage());
        }
    }

    #[test]
    fn rate_error_wins_over_missing_input() {
        let err = build(&["-r", "48000"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSampleRate);
    }

    #[test]
    fn rate_error_wins_over_other_syntax_errors() {
        for args in [
            &["-i", "disc.iso", "-r", "48000", "-x"][..],
            &["-x", "-r48000"][..],
            &["--rate=44100", "--verbose"][..],
            &["-sr", "96000", "-i"][..],
            &["-r", "48000", "stray"][..],
        ] {
            let err = build(args).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidSampleRate, "{:?}", args);
        }
    }

    #[test]
    fn first_bad_rate_stops_the_scan() {
        let err = build(&["-i", "disc.iso", "-r", "48000", "-r", "88200"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSampleRate);
    }

    #[test]
    fn rate_scan_skips_path_values() {
        // "-r" here is the input path, not a rate option
        let request = build(&["-i", "-r", "-o", "48000"]).unwrap();
        assert_eq!(request.input_path, PathBuf::from("-r"));
        assert_eq!(request.output_dir, Some(PathBuf::from("48000")));
        assert_eq!(request.sample_rate, SampleRate::Hz88200);

        let request = build(&["-i", "disc.iso", "--", "-r", "48000"]).unwrap();
        assert_eq!(request.sample_rate, SampleRate::Hz88200);
    }

    #[test]
    fn stray_words_are_ignored() {
        let request = build(&["-i", "disc.iso", "extra.iso"]).unwrap();
        assert_eq!(request.input_path, PathBuf::from("disc.iso"));

        let request = build(&["first.iso", "-i", "disc.iso", "-s"]).unwrap();
        assert_eq!(request.input_path, PathBuf::from("disc.iso"));
        assert_eq!(request.area, AreaSelector::TwoChannel);

        let err = build(&["disc.iso"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingInput);
    }

    #[test]
    fn path_values_may_start_with_a_hyphen() {
        let request = build(&["-i", "-disc.iso", "-o", "-out"]).unwrap();
        assert_eq!(request.input_path, PathBuf::from("-disc.iso"));
        assert_eq!(request.output_dir, Some(PathBuf::from("-out")));
    }

    #[test]
    fn repeated_options_take_last_value() {
        let request = build(&["-i", "a.iso", "-i", "b.iso", "-r", "176400", "-r", "88200"]).unwrap();
        assert_eq!(request.input_path, PathBuf::from("b.iso"));
        assert_eq!(request.sample_rate, SampleRate::Hz88200);
    }

    #[test]
    fn empty_infile_is_invalid_syntax() {
        let err = build(&["-i", ""]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingInput);
    }

    #[test]
    fn help_text_lists_every_option() {
        let help = help_text();
        for flag in ["--infile", "--outdir", "--rate", "--stereo", "--details"] {
            assert!(help.contains(flag), "help is missing {}", flag);
        }
        assert!(help
            .trim_start()
            .starts_with("Usage: odio-sacd -i /path/to/file [options]"));
        assert!(!help.contains("IGNORED"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
