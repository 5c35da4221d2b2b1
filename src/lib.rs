//! `flagset` is a command line flag parser for Rust.
//!
//! A program declares named flags of primitive types against a [`FlagSet`],
//! binds each flag to a value, and then parses an argument vector into those
//! values. Tokens that are not flags (and everything after the `--`
//! terminator) remain available as positional arguments afterwards.
//!
//! Specifically, `flagset` prioritizes the following design concerns:
//! * *Typed value bindings*:
//! Each flag writes through to a typed storage cell, either a variable the
//! caller owns or a freshly allocated cell returned at declaration time.
//! The user should not call any `&str -> T` conversion functions directly.
//! * *POSIX/GNU flag syntax*:
//! Long names (`--verbose`), single-character shortcuts (`-v`), `=`-joined
//! or separate-token values, bundled boolean shortcuts (`-abc`), and the
//! `--` terminator.
//! * *Selectable failure policy*:
//! A flag set either reports parse failures to the program, exits the
//! process, or panics, chosen at construction via [`ErrorPolicy`].
//! * *Detailed yet basic UX*:
//! Every failure produces one diagnostic line and a usage dump.
//! We do not aim to support rich display configurations, such as colour
//! output, shell completions, etc.
//!
//! # Usage
//! ```
//! use flagset::{ErrorPolicy, FlagSet};
//!
//! let mut verbose: bool = false;
//! let mut flags = FlagSet::new("tool", ErrorPolicy::Continue);
//! flags.bool_var(&mut verbose, "verbose", Some('v'), false, "Emit progress details.");
//! let count = flags.isize_flag("count", Some('c'), 0, "Number of times to run.");
//!
//! flags.parse_tokens(&["--verbose", "--count=3", "file.txt"]).unwrap();
//!
//! assert_eq!(flags.args(), &["file.txt".to_string()]);
//! drop(flags);
//! assert!(verbose);
//! assert_eq!(*count.borrow(), 3);
//! ```
//!
//! # Flag Syntax
//! `flagset` applies the argument vector according to the following rules.
//!
//! * A token that is empty, does not start with `-`, or is exactly `-` is a
//! positional argument. Parsing continues with the next token.
//! * The token `--` terminates flag parsing; every remaining token is
//! positional, verbatim. This is the only way to pass positional arguments
//! that look like flags.
//! * `--name` resolves the flag `name`. A value may be joined with `=`
//! (`--name=value`, only the first `=` splits) or, for non-boolean flags,
//! supplied as the next token (`--name value`).
//! * `-abc` is a cluster of shortcuts. Leading boolean shortcuts are switched
//! on in place; the first non-boolean shortcut (or a `=`) takes the rest of
//! the cluster as its value, so `-cvalue` and `-c=value` both bind `value`
//! to `c`. The final shortcut in a cluster resolves exactly like a
//! standalone flag.
//! * A boolean flag never borrows the next token: `--verbose false` leaves
//! `verbose` on and treats `false` as positional. Use `--verbose=false`.
//!
//! # Help
//! `--help` and `-h` are reserved while no flag claims them: either one
//! prints the usage dump and yields the distinguished
//! [`ParseError::HelpRequested`] value, so callers can tell "user asked for
//! help" apart from "user made a mistake". Declaring a flag named `help` or
//! with shortcut `h` preempts this.
//!
//! # Threading
//! A [`FlagSet`] is a plain mutable object with no internal synchronization;
//! declaring or parsing against one set from multiple threads must be
//! serialized by the caller. The shared per-process set lives in
//! [`command_line`] and is thread-local by construction.
#![deny(missing_docs)]
mod constant;
mod interface;
mod model;
mod set;
mod value;

pub mod command_line;

pub use interface::{ConsoleInterface, UserInterface};
pub use model::ErrorPolicy;
pub use set::{Flag, FlagSet, ParseError};
pub use value::primitive::{
    BoolValue, DurationValue, F64Value, I64Value, IsizeValue, StringValue, U64Value, UsizeValue,
};
pub use value::{Value, ValueError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            let b = &$base;
            assert!(
                b.contains($sub),
                "'{b}' does not contain '{s}'",
                b = b,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
