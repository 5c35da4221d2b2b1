//! The process-wide default flag set.
//!
//! A convenience layer over the same core: one shared [`FlagSet`] per
//! thread, named after the program and configured with
//! [`ErrorPolicy::Exit`], lazily constructed on first access. Being
//! thread-local, the serialization the core requires is structural; a
//! program that parses its command line anywhere but its main thread is
//! responsible for keeping that to one place.
//!
//! The shared set is `'static`, so only the allocating declaration style
//! applies to it:
//!
//! ```no_run
//! use flagset::command_line;
//!
//! let verbose = command_line::with(|flags| {
//!     flags.bool_flag("verbose", Some('v'), false, "Emit progress details.")
//! });
//! command_line::with(|flags| flags.parse()).unwrap();
//!
//! if *verbose.borrow() {
//!     eprintln!("verbose on");
//! }
//! ```

use std::cell::RefCell;
use std::env;

use crate::model::ErrorPolicy;
use crate::set::FlagSet;

thread_local! {
    static COMMAND_LINE: RefCell<FlagSet<'static>> =
        RefCell::new(FlagSet::new(program(), ErrorPolicy::Exit));
}

/// Run `body` against this thread's shared flag set.
///
/// Declare flags in one `with` call or several, then parse once; the
/// positional arguments remain readable through later calls.
pub fn with<R>(body: impl FnOnce(&mut FlagSet<'static>) -> R) -> R {
    COMMAND_LINE.with(|flags| body(&mut flags.borrow_mut()))
}

fn program() -> String {
    env::args().next().unwrap_or_else(|| String::from("program"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_set_declares_and_parses() {
        let count = with(|flags| flags.isize_flag("count", Some('c'), 0, "The count."));
        with(|flags| flags.parse_tokens(&["--count=3", "extra"])).unwrap();

        assert_eq!(*count.borrow(), 3);
        with(|flags| {
            assert!(flags.parsed());
            assert_eq!(flags.args(), &["extra".to_string()]);
        });
    }
}
