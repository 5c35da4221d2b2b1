/// The response of a [`FlagSet`](crate::FlagSet) to a parse failure.
///
/// Declaration faults (redeclaring a name or shortcut) are programming
/// errors and always panic; this policy gates user input failures only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Return the failure to the calling program.
    Continue,
    /// Terminate the process with status `2`.
    Exit,
    /// Panic with the failure message.
    Panic,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
