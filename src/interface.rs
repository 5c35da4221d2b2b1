/// Destination for a flag set's diagnostics and usage output.
pub trait UserInterface {
    /// Write one line of usage/help output.
    fn print(&self, message: String);
    /// Write one line of error diagnostics.
    fn print_error(&self, message: String);
}

/// Writes to the process standard error stream.
///
/// Flag diagnostics and the usage dump both belong on stderr so that a
/// program's own stdout stays machine-consumable.
#[derive(Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        eprintln!("{message}");
    }

    fn print_error(&self, message: String) {
        eprintln!("{message}");
    }
}
