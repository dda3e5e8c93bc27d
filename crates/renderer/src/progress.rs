//! Progress notification for long raster passes.

/// Optional percent-complete callback.
///
/// Raster operations report every 8th scanline. The callback cannot cancel
/// the operation.
#[derive(Default)]
pub struct Progress<'a> {
    callback: Option<&'a mut dyn FnMut(u32)>,
}

impl<'a> Progress<'a> {
    pub fn new(callback: &'a mut dyn FnMut(u32)) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// No reporting.
    pub fn none() -> Self {
        Self { callback: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.callback.is_some()
    }

    /// Report `percent`, clamped to 100.
    pub fn report(&mut self, percent: u32) {
        if let Some(cb) = self.callback.as_mut() {
            cb(percent.min(100));
        }
    }

    /// Report `done / total` when `line` falls on an 8-line boundary.
    pub fn scanline(&mut self, line: usize, done: usize, total: usize) {
        if line & 7 == 0 && total > 0 {
            self.report((done * 100 / total) as u32);
        }
    }
}

impl<'a> From<&'a mut dyn FnMut(u32)> for Progress<'a> {
    fn from(callback: &'a mut dyn FnMut(u32)) -> Self {
        Self::new(callback)
    }
}

impl std::fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
