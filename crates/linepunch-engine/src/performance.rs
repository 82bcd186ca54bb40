//! Scoped performance mode
//!
//! Multi-step edits run much faster with repainting, events, alerts and
//! recalculation switched off. [`PerformanceMode`] switches them off for as
//! long as it lives and puts the captured settings back when dropped, on
//! success, error and unwinding alike.

use std::ops::{Deref, DerefMut};

use linepunch_core::{AppSettings, GridAccessor};
use tracing::{debug, warn};

/// Guard holding a grid in fast-edit mode
///
/// The grid is reachable through `Deref`/`DerefMut` while the guard lives.
pub struct PerformanceMode<'g, G: GridAccessor + ?Sized> {
    grid: &'g mut G,
    saved: Option<AppSettings>,
}

impl<'g, G: GridAccessor + ?Sized> PerformanceMode<'g, G> {
    /// Capture the current settings and apply the fast profile
    ///
    /// When the settings cannot be read nothing is changed, so there is
    /// nothing to restore either.
    pub fn enter(grid: &'g mut G) -> Self {
        let saved = match grid.app_settings() {
            Ok(settings) => {
                if let Err(err) = grid.set_app_settings(&AppSettings::fast()) {
                    warn!(error = %err, "could not apply fast settings");
                }
                Some(settings)
            }
            Err(err) => {
                debug!(error = %err, "application settings unavailable");
                None
            }
        };
        Self { grid, saved }
    }

    /// Settings that will be restored on drop
    pub fn saved_settings(&self) -> Option<&AppSettings> {
        self.saved.as_ref()
    }
}

impl<G: GridAccessor + ?Sized> Deref for PerformanceMode<'_, G> {
    type Target = G;

    fn deref(&self) -> &G {
        self.grid
    }
}

impl<G: GridAccessor + ?Sized> DerefMut for PerformanceMode<'_, G> {
    fn deref_mut(&mut self) -> &mut G {
        self.grid
    }
}

impl<G: GridAccessor + ?Sized> Drop for PerformanceMode<'_, G> {
    fn drop(&mut self) {
        if let Some(settings) = self.saved.take() {
            if let Err(err) = self.grid.set_app_settings(&settings) {
                warn!(error = %err, "could not restore application settings");
            }
        }
        if let Err(err) = self.grid.clear_copy_mode() {
            warn!(error = %err, "could not clear copy mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linepunch_core::{CalculationMode, Worksheet};

    #[test]
    fn test_settings_restored_on_drop() {
        let mut sheet = Worksheet::new("Plan");
        let custom = AppSettings {
            calculation: CalculationMode::SemiAutomatic,
            ..AppSettings::default()
        };
        sheet.set_app_settings(&custom).unwrap();

        {
            let mut fast = PerformanceMode::enter(&mut sheet);
            assert_eq!(fast.app_settings().unwrap(), AppSettings::fast());
            assert_eq!(fast.saved_settings(), Some(&custom));
            fast.set_cell_value(1, 1, "edited").unwrap();
        }

        assert_eq!(sheet.app_settings().unwrap(), custom);
        assert_eq!(sheet.cell_text(1, 1).unwrap(), "edited");
    }

    #[test]
    fn test_restored_when_operation_fails() {
        fn failing_edit(sheet: &mut Worksheet) -> linepunch_core::Result<()> {
            let mut fast = PerformanceMode::enter(sheet);
            fast.set_cell_value(0, 1, "bad")
        }

        let mut sheet = Worksheet::new("Plan");
        assert!(failing_edit(&mut sheet).is_err());
        assert_eq!(sheet.app_settings().unwrap(), AppSettings::default());
    }
}
