//! Disc metadata reported by the decode engine after a successful open.

use std::fmt;

/// One of the two track sets a source can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaKind {
    /// Stereo area.
    TwoChannel,
    /// Surround area.
    MultiChannel,
}

impl AreaKind {
    /// Returns the upper-case label used in details output.
    pub fn label(&self) -> &'static str {
        match self {
            AreaKind::TwoChannel => "TWO-CHANNEL",
            AreaKind::MultiChannel => "MULTI-CHANNEL",
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Metadata for a single track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackDetails {
    pub performer: String,
    pub title: String,
    pub channels: u32,
}

impl TrackDetails {
    pub fn new(performer: impl Into<String>, title: impl Into<String>, channels: u32) -> Self {
        Self {
            performer: performer.into(),
            title: title.into(),
            channels,
        }
    }
}

/// Album-level metadata plus both track lists.
///
/// Album fields are `None` when the engine reports no value at all, which
/// is distinct from an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscDetails {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub publisher: Option<String>,
    pub copyright: Option<String>,
    pub two_channel_tracks: Vec<TrackDetails>,
    pub multi_channel_tracks: Vec<TrackDetails>,
}

impl DiscDetails {
    /// Returns the tracks of the given area in disc order.
    pub fn tracks(&self, area: AreaKind) -> &[TrackDetails] {
        match area {
            AreaKind::TwoChannel => &self.two_channel_tracks,
            AreaKind::MultiChannel => &self.multi_channel_tracks,
        }
    }

    /// Total number of tracks across both areas.
    pub fn track_count(&self) -> usize {
        self.two_channel_tracks.len() + self.multi_channel_tracks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_by_area() {
        let details = DiscDetails {
            two_channel_tracks: vec![TrackDetails::new("A", "One", 2)],
            multi_channel_tracks: vec![
                TrackDetails::new("A", "One", 6),
                TrackDetails::new("A", "Two", 6),
            ],
            ..Default::default()
        };

        assert_eq!(details.tracks(AreaKind::TwoChannel).len(), 1);
        assert_eq!(details.tracks(AreaKind::MultiChannel)[1].title, "Two");
        assert_eq!(details.track_count(), 3);
    }

    #[test]
    fn area_labels() {
        assert_eq!(AreaKind::TwoChannel.to_string(), "TWO-CHANNEL");
        assert_eq!(AreaKind::MultiChannel.label(), "MULTI-CHANNEL");
    }
}
