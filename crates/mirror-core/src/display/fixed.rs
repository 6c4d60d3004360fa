//! A [`DisplayService`] over a fixed list of displays.

use super::{DisplayError, DisplayInfo, DisplayService, Size, DEFAULT_DISPLAY};

/// Serves display metadata from a list supplied at construction time.
///
/// Makes no platform calls; both "list display ids" signatures are served.
#[derive(Debug, Clone)]
pub struct StaticDisplayService {
    displays: Vec<DisplayInfo>,
}

impl StaticDisplayService {
    pub fn new(displays: Vec<DisplayInfo>) -> Self {
        Self { displays }
    }

    /// A single 1080×1920 built-in display.
    pub fn single_default() -> Self {
        Self::new(vec![DisplayInfo {
            display_id: DEFAULT_DISPLAY,
            size: Size::new(1080, 1920),
            rotation: 0,
            layer_stack: 0,
            flags: 0,
        }])
    }
}

impl DisplayService for StaticDisplayService {
    fn display_info(&self, display_id: i32) -> Result<Option<DisplayInfo>, DisplayError> {
        Ok(self
            .displays
            .iter()
            .find(|d| d.display_id == display_id)
            .cloned())
    }

    fn display_ids(&self) -> Result<Vec<i32>, DisplayError> {
        Ok(self.displays.iter().map(|d| d.display_id).collect())
    }

    fn display_ids_filtered(&self, _include_disabled: bool) -> Result<Vec<i32>, DisplayError> {
        self.display_ids()
    }
}
