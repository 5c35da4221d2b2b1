use crate::set::core::{Flag, FlagSet};

impl<'a> FlagSet<'a> {
    /// Print one line per declared flag, in lexicographic name order, to the
    /// configured interface.
    ///
    /// Each line reads `  -c, --name=default: usage` (the shortcut part only
    /// when one is declared); string defaults are quoted.
    pub fn print_defaults(&self) {
        self.visit_all(|flag| self.interface.print(defaults_line(flag)));
    }

    pub(crate) fn default_usage(&self) {
        self.interface.print(format!("Usage of {}:", self.name));
        self.print_defaults();
    }
}

fn defaults_line(flag: &Flag<'_>) -> String {
    let default = if flag.value().quoted() {
        format!("{:?}", flag.default_text())
    } else {
        flag.default_text().to_string()
    };

    match flag.shortcut() {
        Some(shortcut) => format!(
            "  -{shortcut}, --{name}={default}: {usage}",
            name = flag.name(),
            usage = flag.usage(),
        ),
        None => format!(
            "  --{name}={default}: {usage}",
            name = flag.name(),
            usage = flag.usage(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use crate::interface::util::channel_interface;
    use crate::model::ErrorPolicy;
    use crate::set::core::FlagSet;

    #[test]
    fn print_defaults_lines() {
        // Setup
        let (sender, receiver) = channel_interface();
        let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
        flags.set_interface(Box::new(sender));
        flags.string_flag("output", Some('o'), "out.txt", "Write to this file.");
        flags.isize_flag("count", None, 0, "The count.");
        flags.bool_flag("verbose", Some('v'), false, "Emit progress details.");

        // Execute
        flags.print_defaults();

        // Verify
        drop(flags);
        let message = receiver.consume_message();
        assert_eq!(
            message,
            vec![
                "  --count=0: The count.",
                "  -o, --output=\"out.txt\": Write to this file.",
                "  -v, --verbose=false: Emit progress details.",
            ]
            .join("\n")
        );
    }

    #[test]
    fn default_usage_header() {
        // Setup
        let (sender, receiver) = channel_interface();
        let mut flags = FlagSet::new("program", ErrorPolicy::Continue);
        flags.set_interface(Box::new(sender));
        flags.u64_flag("jobs", Some('j'), 4, "Worker count.");

        // Execute
        flags.usage();

        // Verify
        drop(flags);
        let message = receiver.consume_message();
        assert_eq!(
            message,
            vec!["Usage of program:", "  -j, --jobs=4: Worker count.",].join("\n")
        );
    }
}
