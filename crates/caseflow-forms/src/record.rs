/// The record a form flow is filled in against.
///
/// Page completion is never stored: a page is complete when the record is
/// valid under the validation context named after the page.
pub trait FormRecord {
    /// Identifier used when building locations for this record
    fn record_id(&self) -> String;

    /// Whether the record passes validation under the named context
    fn is_valid_in(&self, context: &str) -> bool;
}

impl<T: FormRecord + ?Sized> FormRecord for &T {
    fn record_id(&self) -> String {
        (**self).record_id()
    }

    fn is_valid_in(&self, context: &str) -> bool {
        (**self).is_valid_in(context)
    }
}
