/// ProgressReporter port for run progress and warnings
///
/// Every "file not found", fallback and skip notice of a generation run
/// goes through this port, so the console stays the only logging sink.
pub trait ProgressReporter {
    /// Reports an informational step
    fn report(&self, message: &str);

    /// Reports progress through a counted sequence
    ///
    /// # Arguments
    /// * `current` - Items done so far
    /// * `total` - Items expected
    /// * `message` - Optional label for the current item
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning or recoverable error
    fn report_error(&self, message: &str);

    /// Reports the end of an operation
    fn report_completion(&self, message: &str);
}

impl<T: ProgressReporter + ?Sized> ProgressReporter for &T {
    fn report(&self, message: &str) {
        (**self).report(message)
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        (**self).report_progress(current, total, message)
    }

    fn report_error(&self, message: &str) {
        (**self).report_error(message)
    }

    fn report_completion(&self, message: &str) {
        (**self).report_completion(message)
    }
}
