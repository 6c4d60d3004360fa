//! Pre-flight checks for the capture pipeline.
//!
//! The pipeline is an external collaborator; before handing it the
//! [`VideoSettings`], the direct-socket endpoint makes sure the requested
//! display and encoder exist so the user gets an actionable error instead of
//! a failure deep inside the pipeline.

use mirror_core::{DisplayInfo, DisplayManager, DisplayService};

use crate::application::supervisor::SessionFault;
use crate::domain::video::VideoSettings;

/// Resolves the display to capture and validates the encoder name.
///
/// # Errors
///
/// - [`SessionFault::InvalidDisplayId`] with the available ids.
/// - [`SessionFault::InvalidEncoder`] with the known encoder names.
/// - [`SessionFault::Display`] if the display service fails.
pub fn check_video_settings<S: DisplayService>(
    video: &VideoSettings,
    displays: &DisplayManager<S>,
) -> Result<DisplayInfo, SessionFault> {
    let Some(display) = displays.display_info(video.display_id)? else {
        return Err(SessionFault::InvalidDisplayId {
            display_id: video.display_id,
            available: displays.display_ids()?,
        });
    };

    if let Some(name) = &video.encoder_name {
        if !video.known_encoders.is_empty() && !video.known_encoders.contains(name) {
            return Err(SessionFault::InvalidEncoder {
                name: name.clone(),
                available: video.known_encoders.clone(),
            });
        }
    }

    Ok(display)
}
