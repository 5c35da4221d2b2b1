use std::cell::RefCell;
use std::num::{ParseFloatError, ParseIntError};
use std::rc::Rc;

use thiserror::Error;

pub(crate) mod primitive;

/// The failure of a typed coercion, carrying the underlying parse message.
///
/// A flag set never surfaces this raw; it is wrapped with the offending flag
/// token and input text before propagating (see
/// [`ParseError`](crate::ParseError)).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValueError(pub(crate) String);

impl ValueError {
    /// Describe a coercion failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ParseIntError> for ValueError {
    fn from(error: ParseIntError) -> Self {
        Self(error.to_string())
    }
}

impl From<ParseFloatError> for ValueError {
    fn from(error: ParseFloatError) -> Self {
        Self(error.to_string())
    }
}

impl From<humantime::DurationError> for ValueError {
    fn from(error: humantime::DurationError) -> Self {
        Self(error.to_string())
    }
}

/// The dynamic value bound to a flag.
///
/// Every built-in primitive adapter and every user-defined extension
/// implements this same two-operation capability; the registry treats them
/// identically. Implement it to add flag types the built-ins do not cover,
/// for example a comma-separated list:
///
/// ```
/// use flagset::{ErrorPolicy, FlagSet, Value, ValueError};
///
/// struct CsvValue<'a>(&'a mut Vec<String>);
///
/// impl Value for CsvValue<'_> {
///     fn set(&mut self, text: &str) -> Result<(), ValueError> {
///         *self.0 = text.split(',').map(String::from).collect();
///         Ok(())
///     }
///
///     fn render(&self) -> String {
///         self.0.join(",")
///     }
/// }
///
/// let mut fields: Vec<String> = Vec::default();
/// let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
/// flags.add(CsvValue(&mut fields), "fields", Some('f'), "Fields to select.");
/// flags.parse_tokens(&["--fields=a,b,c"]).unwrap();
/// drop(flags);
/// assert_eq!(fields, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
/// ```
pub trait Value {
    /// Coerce `text` and replace the stored value.
    ///
    /// Must be atomic: on failure the stored value is left untouched.
    fn set(&mut self, text: &str) -> Result<(), ValueError>;

    /// Render the canonical textual form of the stored value.
    ///
    /// Canonical, not verbatim: `set("0x10")` on an integer renders as `16`.
    fn render(&self) -> String;

    /// Whether the flag may appear without an explicit value, coercing `"true"`.
    fn is_boolean(&self) -> bool {
        false
    }

    /// Whether renderings should be quoted in the defaults listing.
    fn quoted(&self) -> bool {
        false
    }
}

/// Storage bound to a value adapter: either the caller's own variable, or an
/// allocated cell shared with the caller.
pub(crate) enum Store<'a, T> {
    Borrowed(&'a mut T),
    Shared(Rc<RefCell<T>>),
}

impl<T: Clone> Store<'_, T> {
    pub(crate) fn put(&mut self, value: T) {
        match self {
            Store::Borrowed(variable) => **variable = value,
            Store::Shared(cell) => *cell.borrow_mut() = value,
        }
    }

    pub(crate) fn get(&self) -> T {
        match self {
            Store::Borrowed(variable) => (**variable).clone(),
            Store::Shared(cell) => cell.borrow().clone(),
        }
    }
}
