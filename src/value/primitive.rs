use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::value::{Store, Value, ValueError};

// The boolean vocabulary is fixed; anything else is a coercion failure.
fn parse_bool(text: &str) -> Result<bool, ValueError> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ValueError::new("invalid syntax")),
    }
}

// Detect the numeric base the way C-family literals spell it: `0x`/`0X` is
// hexadecimal, a remaining leading zero is octal, anything else decimal.
// The sign survives in the returned digits; `from_str_radix` accepts it.
fn base_split(text: &str) -> (u32, String) {
    let (sign, magnitude) = match text.strip_prefix(['+', '-']) {
        Some(magnitude) => (&text[..1], magnitude),
        None => ("", text),
    };

    if let Some(digits) = magnitude
        .strip_prefix("0x")
        .or_else(|| magnitude.strip_prefix("0X"))
    {
        (16, format!("{sign}{digits}"))
    } else if magnitude.len() > 1 && magnitude.starts_with('0') {
        (8, format!("{sign}{digits}", digits = &magnitude[1..]))
    } else {
        (10, text.to_string())
    }
}

/// A `bool` flag value.
///
/// Accepts exactly `1`, `t`, `T`, `true`, `TRUE`, `True` and their false
/// counterparts. A boolean flag may appear on the command line without an
/// explicit value.
pub struct BoolValue<'a> {
    store: Store<'a, bool>,
}

impl<'a> BoolValue<'a> {
    /// Bind the caller's cell.
    pub fn bind(variable: &'a mut bool) -> Self {
        Self {
            store: Store::Borrowed(variable),
        }
    }

    pub(crate) fn shared(cell: Rc<RefCell<bool>>) -> Self {
        Self {
            store: Store::Shared(cell),
        }
    }
}

impl Value for BoolValue<'_> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        let value = parse_bool(text)?;
        self.store.put(value);
        Ok(())
    }

    fn render(&self) -> String {
        self.store.get().to_string()
    }

    fn is_boolean(&self) -> bool {
        true
    }
}

/// A signed integer flag value (`isize`).
pub struct IsizeValue<'a> {
    store: Store<'a, isize>,
}

impl<'a> IsizeValue<'a> {
    /// Bind the caller's cell.
    pub fn bind(variable: &'a mut isize) -> Self {
        Self {
            store: Store::Borrowed(variable),
        }
    }

    pub(crate) fn shared(cell: Rc<RefCell<isize>>) -> Self {
        Self {
            store: Store::Shared(cell),
        }
    }
}

impl Value for IsizeValue<'_> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        let (radix, digits) = base_split(text);
        let value = isize::from_str_radix(&digits, radix)?;
        self.store.put(value);
        Ok(())
    }

    fn render(&self) -> String {
        self.store.get().to_string()
    }
}

/// A 64-bit signed integer flag value.
pub struct I64Value<'a> {
    store: Store<'a, i64>,
}

impl<'a> I64Value<'a> {
    /// Bind the caller's cell.
    pub fn bind(variable: &'a mut i64) -> Self {
        Self {
            store: Store::Borrowed(variable),
        }
    }

    pub(crate) fn shared(cell: Rc<RefCell<i64>>) -> Self {
        Self {
            store: Store::Shared(cell),
        }
    }
}

impl Value for I64Value<'_> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        let (radix, digits) = base_split(text);
        let value = i64::from_str_radix(&digits, radix)?;
        self.store.put(value);
        Ok(())
    }

    fn render(&self) -> String {
        self.store.get().to_string()
    }
}

/// An unsigned integer flag value (`usize`).
///
/// A leading minus surfaces the underlying numeric-parse failure; there is
/// no separate negative-rejection message.
pub struct UsizeValue<'a> {
    store: Store<'a, usize>,
}

impl<'a> UsizeValue<'a> {
    /// Bind the caller's cell.
    pub fn bind(variable: &'a mut usize) -> Self {
        Self {
            store: Store::Borrowed(variable),
        }
    }

    pub(crate) fn shared(cell: Rc<RefCell<usize>>) -> Self {
        Self {
            store: Store::Shared(cell),
        }
    }
}

impl Value for UsizeValue<'_> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        let (radix, digits) = base_split(text);
        let value = usize::from_str_radix(&digits, radix)?;
        self.store.put(value);
        Ok(())
    }

    fn render(&self) -> String {
        self.store.get().to_string()
    }
}

/// A 64-bit unsigned integer flag value.
pub struct U64Value<'a> {
    store: Store<'a, u64>,
}

impl<'a> U64Value<'a> {
    /// Bind the caller's cell.
    pub fn bind(variable: &'a mut u64) -> Self {
        Self {
            store: Store::Borrowed(variable),
        }
    }

    pub(crate) fn shared(cell: Rc<RefCell<u64>>) -> Self {
        Self {
            store: Store::Shared(cell),
        }
    }
}

impl Value for U64Value<'_> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        let (radix, digits) = base_split(text);
        let value = u64::from_str_radix(&digits, radix)?;
        self.store.put(value);
        Ok(())
    }

    fn render(&self) -> String {
        self.store.get().to_string()
    }
}

/// A string flag value. Coercion never fails.
pub struct StringValue<'a> {
    store: Store<'a, String>,
}

impl<'a> StringValue<'a> {
    /// Bind the caller's cell.
    pub fn bind(variable: &'a mut String) -> Self {
        Self {
            store: Store::Borrowed(variable),
        }
    }

    pub(crate) fn shared(cell: Rc<RefCell<String>>) -> Self {
        Self {
            store: Store::Shared(cell),
        }
    }
}

impl Value for StringValue<'_> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        self.store.put(text.to_string());
        Ok(())
    }

    fn render(&self) -> String {
        self.store.get()
    }

    fn quoted(&self) -> bool {
        true
    }
}

/// A 64-bit floating point flag value.
pub struct F64Value<'a> {
    store: Store<'a, f64>,
}

impl<'a> F64Value<'a> {
    /// Bind the caller's cell.
    pub fn bind(variable: &'a mut f64) -> Self {
        Self {
            store: Store::Borrowed(variable),
        }
    }

    pub(crate) fn shared(cell: Rc<RefCell<f64>>) -> Self {
        Self {
            store: Store::Shared(cell),
        }
    }
}

impl Value for F64Value<'_> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        let value = text.parse::<f64>()?;
        self.store.put(value);
        Ok(())
    }

    fn render(&self) -> String {
        self.store.get().to_string()
    }
}

/// A [`Duration`] flag value.
///
/// Accepts unit-suffixed pairs such as `1h 30m` or `300ms` (the
/// [`humantime`] grammar) and renders back in the same form.
pub struct DurationValue<'a> {
    store: Store<'a, Duration>,
}

impl<'a> DurationValue<'a> {
    /// Bind the caller's cell.
    pub fn bind(variable: &'a mut Duration) -> Self {
        Self {
            store: Store::Borrowed(variable),
        }
    }

    pub(crate) fn shared(cell: Rc<RefCell<Duration>>) -> Self {
        Self {
            store: Store::Shared(cell),
        }
    }
}

impl Value for DurationValue<'_> {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        let value = humantime::parse_duration(text)?;
        self.store.put(value);
        Ok(())
    }

    fn render(&self) -> String {
        humantime::format_duration(self.store.get()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;
    use rand::{thread_rng, Rng};
    use rstest::rstest;

    #[rstest]
    #[case("1", true)]
    #[case("t", true)]
    #[case("T", true)]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("True", true)]
    #[case("0", false)]
    #[case("f", false)]
    #[case("F", false)]
    #[case("false", false)]
    #[case("FALSE", false)]
    #[case("False", false)]
    fn bool_vocabulary(#[case] text: &str, #[case] expected: bool) {
        let mut variable = !expected;
        let mut value = BoolValue::bind(&mut variable);
        value.set(text).unwrap();
        assert_eq!(value.render(), expected.to_string());
        drop(value);
        assert_eq!(variable, expected);
    }

    #[rstest]
    #[case("")]
    #[case("yes")]
    #[case("tRuE")]
    #[case("2")]
    #[case(" true")]
    fn bool_rejects(#[case] text: &str) {
        let mut variable = false;
        let mut value = BoolValue::bind(&mut variable);
        assert_matches!(value.set(text), Err(ValueError(_)));
        drop(value);
        assert!(!variable);
    }

    #[test]
    fn bool_is_boolean() {
        let mut variable = false;
        assert!(BoolValue::bind(&mut variable).is_boolean());
        let mut variable: isize = 0;
        assert!(!IsizeValue::bind(&mut variable).is_boolean());
    }

    #[rstest]
    #[case("0", 0)]
    #[case("1234", 1234)]
    #[case("-1234", -1234)]
    #[case("+7", 7)]
    #[case("0x1234", 0x1234)]
    #[case("0X10", 16)]
    #[case("-0x10", -16)]
    #[case("0664", 0o664)]
    #[case("-010", -8)]
    #[case("00", 0)]
    fn integer_bases(#[case] text: &str, #[case] expected: i64) {
        let mut variable: i64 = 0;
        let mut value = I64Value::bind(&mut variable);
        value.set(text).unwrap();
        drop(value);
        assert_eq!(variable, expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("0x")]
    #[case("08")]
    #[case("1.5")]
    #[case("1e3")]
    fn integer_rejects(#[case] text: &str) {
        let mut variable: i64 = 42;
        let mut value = I64Value::bind(&mut variable);
        assert_matches!(value.set(text), Err(ValueError(_)));
        drop(value);
        // Failed coercions leave the stored value untouched.
        assert_eq!(variable, 42);
    }

    #[test]
    fn unsigned_rejects_minus_with_parse_message() {
        let mut variable: u64 = 0;
        let mut value = U64Value::bind(&mut variable);
        let error = value.set("-3").unwrap_err();
        // The plain numeric-parse failure, not a bespoke negative message.
        assert_eq!(
            error.to_string(),
            "-3".parse::<u64>().unwrap_err().to_string()
        );
    }

    #[rstest]
    #[case("3.14", 3.14)]
    #[case("-2.5e3", -2500.0)]
    #[case("7", 7.0)]
    fn float(#[case] text: &str, #[case] expected: f64) {
        let mut variable: f64 = 0.0;
        let mut value = F64Value::bind(&mut variable);
        value.set(text).unwrap();
        drop(value);
        assert_eq!(variable, expected);
    }

    #[test]
    fn string_never_fails() {
        let mut variable = String::from("before");
        let mut value = StringValue::bind(&mut variable);
        value.set("").unwrap();
        assert_eq!(value.render(), "");
        value.set("--looks-like-a-flag").unwrap();
        assert!(value.quoted());
        drop(value);
        assert_eq!(variable, "--looks-like-a-flag");
    }

    #[rstest]
    #[case("1h 30m", Duration::from_secs(5400))]
    #[case("1h30m", Duration::from_secs(5400))]
    #[case("300ms", Duration::from_millis(300))]
    #[case("2s", Duration::from_secs(2))]
    fn duration(#[case] text: &str, #[case] expected: Duration) {
        let mut variable = Duration::default();
        let mut value = DurationValue::bind(&mut variable);
        value.set(text).unwrap();
        drop(value);
        assert_eq!(variable, expected);
    }

    #[rstest]
    #[case("")]
    #[case("5")]
    #[case("5 parsecs")]
    fn duration_rejects(#[case] text: &str) {
        let mut variable = Duration::default();
        let mut value = DurationValue::bind(&mut variable);
        assert_matches!(value.set(text), Err(ValueError(_)));
    }

    // set . render . set must be equivalent to a single set.
    #[test]
    fn round_trip() {
        for _ in 0..100 {
            let expected: i64 = thread_rng().gen();
            let mut variable: i64 = 0;
            let mut value = I64Value::bind(&mut variable);
            value.set(&expected.to_string()).unwrap();
            let rendered = value.render();
            value.set(&rendered).unwrap();
            drop(value);
            assert_eq!(variable, expected);
        }
    }

    #[test]
    fn round_trip_canonicalizes() {
        let mut variable: isize = 0;
        let mut value = IsizeValue::bind(&mut variable);
        value.set("0x10").unwrap();
        // Rendering is canonical, not verbatim.
        let rendered = value.render();
        assert_eq!(rendered, "16");
        value.set(&rendered).unwrap();
        drop(value);
        assert_eq!(variable, 16);
    }

    #[test]
    fn round_trip_duration() {
        let mut variable = Duration::default();
        let mut value = DurationValue::bind(&mut variable);
        value.set("90m").unwrap();
        let rendered = value.render();
        assert_eq!(rendered, "1h 30m");
        value.set(&rendered).unwrap();
        drop(value);
        assert_eq!(variable, Duration::from_secs(5400));
    }

    #[test]
    fn shared_storage() {
        let cell = Rc::new(RefCell::new(0u64));
        let mut value = U64Value::shared(Rc::clone(&cell));
        value.set("0x2a").unwrap();
        assert_eq!(*cell.borrow(), 42);
        assert_contains!(value.render(), "42");
    }
}
