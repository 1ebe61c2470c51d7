//! Console reporting channel

/// Text sink for the operator console
pub trait Reporter {
    /// One status or diagnostic line
    fn status(&mut self, line: &str);

    /// The complete answer to a question
    fn response(&mut self, text: &str);
}
