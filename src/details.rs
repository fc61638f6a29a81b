//! Disc metadata rendering for `--details`.

use std::io::{self, Write};

use crate::types::{AreaKind, DiscDetails, TrackDetails};

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Writes album fields, then every two-channel track, then every
/// multi-channel track, then a trailing blank line.
///
/// Album fields are skipped when absent or empty. The artist line is only
/// written when the title is present as well.
pub fn print_details<W: Write>(out: &mut W, details: &DiscDetails) -> io::Result<()> {
    if let Some(title) = present(&details.title) {
        writeln!(out, "ALBUM TITLE: {}", title)?;
    }

    // Gated on the title field too; kept identical to the historical output.
    if details.title.is_some() {
        if let Some(artist) = present(&details.artist) {
            writeln!(out, "ALBUM ARTIST: {}", artist)?;
        }
    }

    if let Some(publisher) = present(&details.publisher) {
        writeln!(out, "ALBUM PUBLISHER: {}", publisher)?;
    }

    if let Some(copyright) = present(&details.copyright) {
        writeln!(out, "ALBUM COPYRIGHT: {}", copyright)?;
    }

    for area in [AreaKind::TwoChannel, AreaKind::MultiChannel] {
        for (index, track) in details.tracks(area).iter().enumerate() {
            print_track(out, area, index + 1, track)?;
        }
    }

    writeln!(out)?;
    out.flush()
}

fn print_track<W: Write>(
    out: &mut W,
    area: AreaKind,
    number: usize,
    track: &TrackDetails,
) -> io::Result<()> {
    let label = area.label();
    writeln!(out)?;
    writeln!(out, "{} AREA TRACK {:02} PERFORMER: {}", label, number, track.performer)?;
    writeln!(out, "{} AREA TRACK {:02} TITLE: {}", label, number, track.title)?;
    writeln!(out, "{} AREA TRACK {:02} CHANNELS: {}", label, number, track.channels)
}
