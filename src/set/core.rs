use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;
use std::time::Duration;

use crate::interface::{ConsoleInterface, UserInterface};
use crate::model::ErrorPolicy;
use crate::set::parser::ParseError;
use crate::value::primitive::{
    BoolValue, DurationValue, F64Value, I64Value, IsizeValue, StringValue, U64Value, UsizeValue,
};
use crate::value::Value;

/// One declared flag: a name, an optional shortcut, usage text, and the
/// bound value.
pub struct Flag<'a> {
    name: String,
    shortcut: Option<char>,
    usage: String,
    value: Box<dyn Value + 'a>,
    default_text: String,
}

impl<'a> Flag<'a> {
    /// The full name, as it appears after `--`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The one-character shortcut, if declared.
    pub fn shortcut(&self) -> Option<char> {
        self.shortcut
    }

    /// The free-text description.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value's rendering captured at declaration time, frozen thereafter.
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    /// Render the current stored value.
    pub fn render(&self) -> String {
        self.value.render()
    }

    /// The bound value.
    pub fn value(&self) -> &(dyn Value + 'a) {
        self.value.as_ref()
    }

    pub(crate) fn value_mut(&mut self) -> &mut (dyn Value + 'a) {
        self.value.as_mut()
    }
}

impl<'a> std::fmt::Debug for Flag<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shortcut = match &self.shortcut {
            Some(shortcut) => format!(" -{shortcut},"),
            None => "".to_string(),
        };

        write!(
            f,
            "Flag[--{name},{shortcut} default={default}]",
            name = self.name,
            default = self.default_text,
        )
    }
}

/// A registry of declared flags and the parser that applies an argument
/// vector to them.
///
/// Declare flags first, then call [`FlagSet::parse_tokens`] (or
/// [`FlagSet::parse`]) exactly once, then read the bound variables and
/// [`FlagSet::args`].
///
/// A `FlagSet` has no internal synchronization; concurrent declaration or
/// parsing must be serialized by the caller.
///
/// ### Example
/// ```
/// use flagset::{ErrorPolicy, FlagSet};
///
/// let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
/// // Declare with FlagSet::add or the typed declaration methods.
/// flags.parse_tokens(&[] as &[&str]).unwrap();
/// ```
pub struct FlagSet<'a> {
    pub(crate) name: String,
    pub(crate) policy: ErrorPolicy,
    pub(crate) formal: BTreeMap<String, Flag<'a>>,
    pub(crate) shortcuts: HashMap<char, String>,
    pub(crate) actual: BTreeSet<String>,
    pub(crate) positional: Vec<String>,
    pub(crate) parsed: bool,
    pub(crate) interface: Box<dyn UserInterface>,
    pub(crate) usage: Option<Box<dyn Fn(&FlagSet<'a>) + 'a>>,
}

impl<'a> std::fmt::Debug for FlagSet<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("flags", &self.formal.len())
            .finish()
    }
}

impl Default for FlagSet<'_> {
    fn default() -> Self {
        Self::new("", ErrorPolicy::Continue)
    }
}

impl<'a> FlagSet<'a> {
    /// Create an empty flag set.
    ///
    /// `name` appears in diagnostics and the usage dump; `policy` selects
    /// the response to parse failures.
    ///
    /// ### Example
    /// ```
    /// use flagset::{ErrorPolicy, FlagSet};
    ///
    /// let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
    /// flags.parse_tokens(vec![].as_slice()).unwrap();
    /// ```
    pub fn new(name: impl Into<String>, policy: ErrorPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            formal: BTreeMap::default(),
            shortcuts: HashMap::default(),
            actual: BTreeSet::default(),
            positional: Vec::default(),
            parsed: false,
            interface: Box::new(ConsoleInterface::default()),
            usage: None,
        }
    }

    /// Name the set and choose its policy after construction.
    ///
    /// Useful with [`FlagSet::default`], which starts with an empty name
    /// and [`ErrorPolicy::Continue`].
    pub fn init(&mut self, name: impl Into<String>, policy: ErrorPolicy) {
        self.name = name.into();
        self.policy = policy;
    }

    /// The registry name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Redirect diagnostics and usage output (standard error by default).
    pub fn set_interface(&mut self, interface: Box<dyn UserInterface>) {
        self.interface = interface;
    }

    /// Replace the usage dump invoked on parse failures and help requests.
    ///
    /// The callback receives the flag set, typically to call
    /// [`FlagSet::print_defaults`] after its own header.
    pub fn set_usage(&mut self, callback: impl Fn(&FlagSet<'a>) + 'a) {
        self.usage = Some(Box::new(callback));
    }

    /// Invoke the usage callback, or print the default usage dump.
    pub fn usage(&self) {
        match &self.usage {
            Some(callback) => callback(self),
            None => self.default_usage(),
        }
    }

    /// Declare `value` as the flag `name`, with an optional one-character
    /// `shortcut`.
    ///
    /// This is the generic registration every typed declaration funnels
    /// through, and the extension point for user-defined [`Value`]
    /// implementations; the set treats those identically to the built-in
    /// primitives. The value's rendering is captured here as the frozen
    /// default text.
    ///
    /// Redeclaring a name or shortcut, or declaring a non-ASCII shortcut,
    /// is a programming error: one diagnostic line is written and the call
    /// panics.
    ///
    /// ### Example
    /// ```
    /// use flagset::{ErrorPolicy, FlagSet, StringValue};
    ///
    /// let mut output = String::from("out.txt");
    /// let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
    /// flags.add(StringValue::bind(&mut output), "output", Some('o'), "Write to this file.");
    /// flags.parse_tokens(&["-o", "target.txt"]).unwrap();
    /// drop(flags);
    /// assert_eq!(output, "target.txt");
    /// ```
    pub fn add(
        &mut self,
        value: impl Value + 'a,
        name: impl Into<String>,
        shortcut: Option<char>,
        usage: impl Into<String>,
    ) {
        let name = name.into();

        if self.formal.contains_key(&name) {
            let message = format!("{} flag redefined: {}", self.name, name);
            self.interface.print_error(message.clone());
            panic!("{message}");
        }

        if let Some(shortcut) = shortcut {
            if !shortcut.is_ascii() {
                let message = format!(
                    "{} shortcut is not one ASCII character: {:?}",
                    self.name, shortcut
                );
                self.interface.print_error(message.clone());
                panic!("{message}");
            }

            if let Some(existing) = self.shortcuts.get(&shortcut) {
                let message = format!(
                    "{} shortcut reused: {:?} for {} and {}",
                    self.name, shortcut, name, existing
                );
                self.interface.print_error(message.clone());
                panic!("{message}");
            }

            self.shortcuts.insert(shortcut, name.clone());
        }

        // Remember the default value as text; it won't change.
        let default_text = value.render();
        self.formal.insert(
            name.clone(),
            Flag {
                name,
                shortcut,
                usage: usage.into(),
                value: Box::new(value),
                default_text,
            },
        );
    }

    /// Declare a `bool` flag bound to `variable`.
    ///
    /// `default` is written into `variable` immediately.
    ///
    /// ### Example
    /// ```
    /// use flagset::{ErrorPolicy, FlagSet};
    ///
    /// let mut verbose: bool = false;
    /// let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
    /// flags.bool_var(&mut verbose, "verbose", Some('v'), false, "Emit progress details.");
    /// flags.parse_tokens(&["-v"]).unwrap();
    /// drop(flags);
    /// assert!(verbose);
    /// ```
    pub fn bool_var(
        &mut self,
        variable: &'a mut bool,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: bool,
        usage: impl Into<String>,
    ) {
        *variable = default;
        self.add(BoolValue::bind(variable), name, shortcut, usage);
    }

    /// Declare a `bool` flag with freshly allocated storage, returning the
    /// shared cell.
    pub fn bool_flag(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: bool,
        usage: impl Into<String>,
    ) -> Rc<RefCell<bool>> {
        let cell = Rc::new(RefCell::new(default));
        self.add(BoolValue::shared(Rc::clone(&cell)), name, shortcut, usage);
        cell
    }

    /// Declare an `isize` flag bound to `variable`.
    pub fn isize_var(
        &mut self,
        variable: &'a mut isize,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: isize,
        usage: impl Into<String>,
    ) {
        *variable = default;
        self.add(IsizeValue::bind(variable), name, shortcut, usage);
    }

    /// Declare an `isize` flag with freshly allocated storage, returning the
    /// shared cell.
    pub fn isize_flag(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: isize,
        usage: impl Into<String>,
    ) -> Rc<RefCell<isize>> {
        let cell = Rc::new(RefCell::new(default));
        self.add(IsizeValue::shared(Rc::clone(&cell)), name, shortcut, usage);
        cell
    }

    /// Declare an `i64` flag bound to `variable`.
    pub fn i64_var(
        &mut self,
        variable: &'a mut i64,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: i64,
        usage: impl Into<String>,
    ) {
        *variable = default;
        self.add(I64Value::bind(variable), name, shortcut, usage);
    }

    /// Declare an `i64` flag with freshly allocated storage, returning the
    /// shared cell.
    pub fn i64_flag(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: i64,
        usage: impl Into<String>,
    ) -> Rc<RefCell<i64>> {
        let cell = Rc::new(RefCell::new(default));
        self.add(I64Value::shared(Rc::clone(&cell)), name, shortcut, usage);
        cell
    }

    /// Declare a `usize` flag bound to `variable`.
    pub fn usize_var(
        &mut self,
        variable: &'a mut usize,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: usize,
        usage: impl Into<String>,
    ) {
        *variable = default;
        self.add(UsizeValue::bind(variable), name, shortcut, usage);
    }

    /// Declare a `usize` flag with freshly allocated storage, returning the
    /// shared cell.
    pub fn usize_flag(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: usize,
        usage: impl Into<String>,
    ) -> Rc<RefCell<usize>> {
        let cell = Rc::new(RefCell::new(default));
        self.add(UsizeValue::shared(Rc::clone(&cell)), name, shortcut, usage);
        cell
    }

    /// Declare a `u64` flag bound to `variable`.
    pub fn u64_var(
        &mut self,
        variable: &'a mut u64,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: u64,
        usage: impl Into<String>,
    ) {
        *variable = default;
        self.add(U64Value::bind(variable), name, shortcut, usage);
    }

    /// Declare a `u64` flag with freshly allocated storage, returning the
    /// shared cell.
    pub fn u64_flag(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: u64,
        usage: impl Into<String>,
    ) -> Rc<RefCell<u64>> {
        let cell = Rc::new(RefCell::new(default));
        self.add(U64Value::shared(Rc::clone(&cell)), name, shortcut, usage);
        cell
    }

    /// Declare a `String` flag bound to `variable`.
    pub fn string_var(
        &mut self,
        variable: &'a mut String,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) {
        *variable = default.into();
        self.add(StringValue::bind(variable), name, shortcut, usage);
    }

    /// Declare a `String` flag with freshly allocated storage, returning the
    /// shared cell.
    pub fn string_flag(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) -> Rc<RefCell<String>> {
        let cell = Rc::new(RefCell::new(default.into()));
        self.add(StringValue::shared(Rc::clone(&cell)), name, shortcut, usage);
        cell
    }

    /// Declare an `f64` flag bound to `variable`.
    pub fn f64_var(
        &mut self,
        variable: &'a mut f64,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: f64,
        usage: impl Into<String>,
    ) {
        *variable = default;
        self.add(F64Value::bind(variable), name, shortcut, usage);
    }

    /// Declare an `f64` flag with freshly allocated storage, returning the
    /// shared cell.
    pub fn f64_flag(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: f64,
        usage: impl Into<String>,
    ) -> Rc<RefCell<f64>> {
        let cell = Rc::new(RefCell::new(default));
        self.add(F64Value::shared(Rc::clone(&cell)), name, shortcut, usage);
        cell
    }

    /// Declare a [`Duration`] flag bound to `variable`.
    pub fn duration_var(
        &mut self,
        variable: &'a mut Duration,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: Duration,
        usage: impl Into<String>,
    ) {
        *variable = default;
        self.add(DurationValue::bind(variable), name, shortcut, usage);
    }

    /// Declare a [`Duration`] flag with freshly allocated storage, returning
    /// the shared cell.
    pub fn duration_flag(
        &mut self,
        name: impl Into<String>,
        shortcut: Option<char>,
        default: Duration,
        usage: impl Into<String>,
    ) -> Rc<RefCell<Duration>> {
        let cell = Rc::new(RefCell::new(default));
        self.add(
            DurationValue::shared(Rc::clone(&cell)),
            name,
            shortcut,
            usage,
        );
        cell
    }

    /// The declared flag named `name`.
    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.formal.get(name)
    }

    /// Assign `text` to the flag named `name`, under the same coercion rules
    /// as parsing. A successful assignment records the flag as set.
    ///
    /// ### Example
    /// ```
    /// use flagset::{ErrorPolicy, FlagSet};
    ///
    /// let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
    /// let level = flags.isize_flag("level", None, 0, "The level.");
    /// flags.set("level", "7").unwrap();
    /// assert_eq!(*level.borrow(), 7);
    /// ```
    pub fn set(&mut self, name: &str, text: &str) -> Result<(), ParseError> {
        let flag = match self.formal.get_mut(name) {
            Some(flag) => flag,
            None => return Err(ParseError::UnknownFlag(name.to_string())),
        };

        if let Err(error) = flag.value_mut().set(text) {
            return Err(ParseError::InvalidValue {
                value: text.to_string(),
                flag: format!("--{name}"),
                message: error.to_string(),
            });
        }

        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Visit every declared flag in lexicographic name order.
    ///
    /// ### Example
    /// ```
    /// use flagset::{ErrorPolicy, FlagSet};
    ///
    /// let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
    /// flags.bool_flag("zeta", None, false, "Last.");
    /// flags.bool_flag("alpha", None, false, "First.");
    ///
    /// let mut names = Vec::default();
    /// flags.visit_all(|flag| names.push(flag.name().to_string()));
    /// assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
    /// ```
    pub fn visit_all(&self, mut visitor: impl FnMut(&Flag<'a>)) {
        for flag in self.formal.values() {
            visitor(flag);
        }
    }

    /// Visit, in lexicographic name order, only the flags touched by a
    /// successful coercion during the most recent parse (or by
    /// [`FlagSet::set`]).
    pub fn visit(&self, mut visitor: impl FnMut(&Flag<'a>)) {
        for name in &self.actual {
            let flag = self
                .formal
                .get(name)
                .expect("internal error - set flags must be declared");
            visitor(flag);
        }
    }

    /// Whether a parse has run.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// The positional arguments left over by the most recent parse.
    pub fn args(&self) -> &[String] {
        &self.positional
    }

    /// The positional argument at `index`, if any.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }
}
