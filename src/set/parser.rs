use std::env;

use thiserror::Error;

use crate::constant::{HELP_NAME, HELP_SHORT};
use crate::model::ErrorPolicy;
use crate::set::core::FlagSet;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The failure of a parse, carried as a structured value.
///
/// [`ParseError::HelpRequested`] is distinguished from the user-mistake
/// variants so callers can render help and exit zero rather than treating it
/// as a failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A long-form token whose name begins with `-` or `=`.
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    /// A long name with no matching declaration.
    #[error("flag provided but not defined: --{0}")]
    UnknownFlag(String),

    /// A shortcut character with no matching declaration.
    #[error("flag provided but not defined: '{shortcut}' in -{cluster}")]
    UnknownShortcut {
        /// The unresolvable character.
        shortcut: char,
        /// The whole cluster it appeared in, without the leading dash.
        cluster: String,
    },

    /// A non-boolean flag at the end of the argument list, with no value.
    #[error("flag needs an argument: {0}")]
    MissingValue(String),

    /// A boolean flag given a value outside the boolean vocabulary.
    #[error("invalid boolean value \"{value}\" for {flag}: {message}")]
    InvalidBoolean {
        /// The rejected text.
        value: String,
        /// The token that named the flag.
        flag: String,
        /// The underlying coercion failure.
        message: String,
    },

    /// A flag value the typed coercion rejected.
    #[error("invalid value \"{value}\" for {flag}: {message}")]
    InvalidValue {
        /// The rejected text.
        value: String,
        /// The token that named the flag.
        flag: String,
        /// The underlying coercion failure.
        message: String,
    },

    /// The user asked for help via `--help` or `-h`.
    #[error("help requested")]
    HelpRequested,
}

impl<'a> FlagSet<'a> {
    /// Parse `tokens` into the declared flags.
    ///
    /// Walks the argument vector token by token: positional arguments
    /// accumulate for [`FlagSet::args`], flag tokens resolve against the
    /// declarations and coerce their values, and `--` terminates flag
    /// parsing. The first failure short-circuits the rest of the vector.
    ///
    /// On failure, one diagnostic line and a usage dump are written to the
    /// configured interface, and then the set's [`ErrorPolicy`] applies:
    /// `Continue` returns the error, `Exit` terminates the process with
    /// status `2`, `Panic` panics.
    ///
    /// ### Example
    /// ```
    /// use flagset::{ErrorPolicy, FlagSet};
    ///
    /// let mut verbose: bool = false;
    /// let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
    /// flags.bool_var(&mut verbose, "verbose", Some('v'), false, "Emit progress details.");
    ///
    /// flags.parse_tokens(&["--verbose", "--", "--not-a-flag"]).unwrap();
    ///
    /// assert_eq!(flags.args(), &["--not-a-flag".to_string()]);
    /// ```
    pub fn parse_tokens(&mut self, tokens: &[&str]) -> Result<(), ParseError> {
        self.parsed = true;
        self.positional = Vec::with_capacity(tokens.len());
        self.actual.clear();

        match self.parse_args(tokens) {
            Ok(()) => Ok(()),
            Err(error) => match self.policy {
                ErrorPolicy::Continue => Err(error),
                ErrorPolicy::Exit => std::process::exit(2),
                ErrorPolicy::Panic => panic!("{error}"),
            },
        }
    }

    /// Parse the ambient command line, [`env::args`] minus the program name.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        let command_input: Vec<String> = env::args().skip(1).collect();
        self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        )
    }

    fn parse_args(&mut self, tokens: &[&str]) -> Result<(), ParseError> {
        let mut index = 0;

        while index < tokens.len() {
            let token = tokens[index];
            index += 1;

            if token.is_empty() || !token.starts_with('-') || token == "-" {
                self.positional.push(token.to_string());
                continue;
            }

            if token == "--" {
                // The terminator: everything remaining is positional, verbatim.
                self.positional
                    .extend(tokens[index..].iter().map(|token| token.to_string()));
                return Ok(());
            }

            let (name, inline) = match token.strip_prefix("--") {
                Some(remainder) => self.resolve_long(token, remainder)?,
                None => self.resolve_shortcuts(token)?,
            };

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Token '{token}' resolved to flag '{name}'.");
            }

            let flag = self
                .formal
                .get_mut(&name)
                .expect("internal error - resolved flags must be declared");

            if flag.value().is_boolean() {
                // A boolean never borrows the next token.
                let text = inline.unwrap_or_else(|| String::from("true"));

                if let Err(error) = flag.value_mut().set(&text) {
                    let failure = ParseError::InvalidBoolean {
                        value: text,
                        flag: token.to_string(),
                        message: error.to_string(),
                    };
                    return Err(self.fail(failure));
                }
            } else {
                let text = match inline {
                    Some(text) => text,
                    None if index < tokens.len() => {
                        index += 1;
                        tokens[index - 1].to_string()
                    }
                    None => {
                        return Err(self.fail(ParseError::MissingValue(token.to_string())));
                    }
                };

                if let Err(error) = flag.value_mut().set(&text) {
                    let failure = ParseError::InvalidValue {
                        value: text,
                        flag: token.to_string(),
                        message: error.to_string(),
                    };
                    return Err(self.fail(failure));
                }
            }

            self.actual.insert(name);
        }

        Ok(())
    }

    // --name, --name=value.
    fn resolve_long(
        &self,
        token: &str,
        remainder: &str,
    ) -> Result<(String, Option<String>), ParseError> {
        if remainder.is_empty() || remainder.starts_with(['-', '=']) {
            return Err(self.fail(ParseError::BadSyntax(token.to_string())));
        }

        // Only the first '=' splits, and never the one a name starts with.
        let (name, inline) = match remainder.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (remainder, None),
        };

        if !self.formal.contains_key(name) {
            if name == HELP_NAME {
                self.usage();
                return Err(ParseError::HelpRequested);
            }

            return Err(self.fail(ParseError::UnknownFlag(name.to_string())));
        }

        Ok((name.to_string(), inline))
    }

    // -c, -cvalue, -c=value, and bundles like -abc.
    //
    // Boolean shortcuts ahead of the final character are switched on in
    // place; the first non-boolean (or a '=') takes the rest of the cluster
    // as its value and ends the walk. The final character resolves exactly
    // like a standalone flag, so its value may still arrive as the next
    // token.
    fn resolve_shortcuts(&mut self, token: &str) -> Result<(String, Option<String>), ParseError> {
        let cluster = &token[1..];
        let mut characters = cluster.char_indices().peekable();

        while let Some((_, shortcut)) = characters.next() {
            let name = match self.shortcuts.get(&shortcut) {
                Some(name) => name.clone(),
                None => {
                    if shortcut == HELP_SHORT {
                        self.usage();
                        return Err(ParseError::HelpRequested);
                    }

                    let failure = ParseError::UnknownShortcut {
                        shortcut,
                        cluster: cluster.to_string(),
                    };
                    return Err(self.fail(failure));
                }
            };

            match characters.peek().copied() {
                None => {
                    return Ok((name, None));
                }
                Some((offset, '=')) => {
                    // Everything past the '=', the empty string included.
                    return Ok((name, Some(cluster[offset + 1..].to_string())));
                }
                Some((offset, _)) => {
                    let flag = self
                        .formal
                        .get_mut(&name)
                        .expect("internal error - resolved flags must be declared");

                    if flag.value().is_boolean() {
                        flag.value_mut()
                            .set("true")
                            .expect("internal error - boolean values accept 'true'");
                        self.actual.insert(name);
                    } else {
                        return Ok((name, Some(cluster[offset..].to_string())));
                    }
                }
            }
        }

        unreachable!("internal error - a shortcut cluster is never empty");
    }

    // One diagnostic line, then the usage dump, then the failure back to the
    // parse loop.
    pub(crate) fn fail(&self, error: ParseError) -> ParseError {
        self.interface.print_error(error.to_string());
        self.usage();
        error
    }
}
