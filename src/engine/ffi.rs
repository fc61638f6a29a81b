//! Decode engine backed by the system libodiosacd library.
//!
//! libodiosacd keeps a single global decoder, so only one [`LibOdioSacd`]
//! should be open per process.

use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, warn};

use super::{DecodeEngine, ProgressCallback, ProgressEvent};
use crate::error::{ErrorCode, Result, SacdError};
use crate::types::{AreaSelector, DiscDetails, SampleRate, TrackDetails};

mod sys {
    use std::ffi::{c_char, c_int, c_void};

    pub type Area = c_int;
    pub const AREA_TWOCH: Area = 1;
    pub const AREA_AUTO: Area = 3;

    #[repr(C)]
    pub struct TrackDetails {
        pub track_title: *const c_char,
        pub track_performer: *const c_char,
        pub channels: c_int,
    }

    #[repr(C)]
    pub struct DiscDetails {
        pub album_title: *const c_char,
        pub album_artist: *const c_char,
        pub album_publisher: *const c_char,
        pub album_copyright: *const c_char,
        pub two_ch_tracks: c_int,
        pub two_ch_track_details: *const TrackDetails,
        pub mul_ch_tracks: c_int,
        pub mul_ch_track_details: *const TrackDetails,
    }

    pub type ProgressCallback =
        extern "C" fn(progress: f32, path: *mut c_char, track: c_int, user: *mut c_void) -> bool;

    #[link(name = "odiosacd")]
    extern "C" {
        /// Returns true on error.
        pub fn odiolibsacd_Open(path: *mut c_char, area: Area) -> bool;
        pub fn odiolibsacd_GetDiscDetails() -> *const DiscDetails;
        /// Returns true on error.
        pub fn odiolibsacd_Convert(
            out_path: *mut c_char,
            sample_rate: c_int,
            callback: ProgressCallback,
            user: *mut c_void,
        ) -> bool;
        pub fn odiolibsacd_Close();
    }
}

/// libodiosacd-backed engine.
#[derive(Debug, Default)]
pub struct LibOdioSacd {
    open: bool,
    details: Option<DiscDetails>,
}

impl LibOdioSacd {
    pub fn new() -> Self {
        Self::default()
    }
}

fn c_path(path: &Path, code: ErrorCode) -> Result<CString> {
    CString::new(path.to_string_lossy().into_owned()).map_err(|e| {
        SacdError::with_source(code, format!("Path contains a NUL byte: {}", path.display()), e)
    })
}

/// Copies a C string, treating null as absent.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn owned(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

/// # Safety
/// `list` must point to at least `count` valid entries when `count > 0`.
unsafe fn tracks(list: *const sys::TrackDetails, count: c_int) -> Vec<TrackDetails> {
    if list.is_null() || count <= 0 {
        return Vec::new();
    }

    std::slice::from_raw_parts(list, count as usize)
        .iter()
        .map(|t| TrackDetails {
            performer: owned(t.track_performer).unwrap_or_default(),
            title: owned(t.track_title).unwrap_or_default(),
            channels: t.channels.max(0) as u32,
        })
        .collect()
}

/// # Safety
/// `raw` must be null or point to details owned by the open decoder.
unsafe fn copy_details(raw: *const sys::DiscDetails) -> Option<DiscDetails> {
    let raw = raw.as_ref()?;
    Some(DiscDetails {
        title: owned(raw.album_title),
        artist: owned(raw.album_artist),
        publisher: owned(raw.album_publisher),
        copyright: owned(raw.album_copyright),
        two_channel_tracks: tracks(raw.two_ch_track_details, raw.two_ch_tracks),
        multi_channel_tracks: tracks(raw.mul_ch_track_details, raw.mul_ch_tracks),
    })
}

type Trampoline<'a, 'b> = &'a mut ProgressCallback<'b>;

extern "C" fn on_progress(progress: f32, path: *mut c_char, track: c_int, user: *mut c_void) -> bool {
    if user.is_null() {
        return false;
    }

    catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: `user` is the `&mut Trampoline` passed to Convert below and
        // outlives that call.
        let callback = unsafe { &mut *(user as *mut Trampoline<'_, '_>) };
        let source = if path.is_null() {
            std::borrow::Cow::Borrowed("")
        } else {
            unsafe { CStr::from_ptr(path) }.to_string_lossy()
        };

        callback(&ProgressEvent {
            percent: progress,
            source_path: &source,
            track,
        })
    }))
    .unwrap_or(false)
}

impl DecodeEngine for LibOdioSacd {
    fn open(&mut self, path: &Path, area: AreaSelector) -> Result<()> {
        let c_path = c_path(path, ErrorCode::OpenFailed)?;
        let area = match area {
            AreaSelector::Auto => sys::AREA_AUTO,
            AreaSelector::TwoChannel => sys::AREA_TWOCH,
        };

        // SAFETY: the library copies the path during open.
        let failed = unsafe { sys::odiolibsacd_Open(c_path.as_ptr() as *mut c_char, area) };
        if failed {
            return Err(SacdError::open_failed(path.display().to_string()));
        }

        self.open = true;
        // SAFETY: details stay valid until close; they are copied right away.
        self.details = unsafe { copy_details(sys::odiolibsacd_GetDiscDetails()) };
        debug!(
            tracks = self.details.as_ref().map(DiscDetails::track_count),
            "libodiosacd opened source"
        );
        Ok(())
    }

    fn disc_details(&self) -> Option<&DiscDetails> {
        self.details.as_ref()
    }

    fn convert(
        &mut self,
        output_dir: &Path,
        sample_rate: SampleRate,
        on_progress: &mut ProgressCallback<'_>,
    ) -> Result<()> {
        if !self.open {
            return Err(SacdError::convert_failed("no source is open"));
        }

        let c_dir = c_path(output_dir, ErrorCode::ConvertFailed)?;
        let mut trampoline: Trampoline<'_, '_> = on_progress;

        // SAFETY: `trampoline` lives on this stack frame for the whole
        // blocking call, which is the only time the library uses it.
        let failed = unsafe {
            sys::odiolibsacd_Convert(
                c_dir.as_ptr() as *mut c_char,
                sample_rate.hz() as c_int,
                self::on_progress,
                &mut trampoline as *mut Trampoline<'_, '_> as *mut c_void,
            )
        };

        if failed {
            return Err(SacdError::convert_failed(format!(
                "libodiosacd reported an error writing to {}",
                output_dir.display()
            )));
        }
        Ok(())
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.details = None;
        self.open = false;
        // SAFETY: paired with the successful open above.
        unsafe { sys::odiolibsacd_Close() };
    }
}

impl Drop for LibOdioSacd {
    fn drop(&mut self) {
        if self.open {
            warn!("libodiosacd engine dropped while open, closing");
            self.close();
        }
    }
}
