use std::time::Duration;

use flagset::{ErrorPolicy, FlagSet, ParseError};

#[test]
fn gnu_style_command_line() {
    let mut verbose: bool = false;
    let mut quiet: bool = false;
    let mut output = String::default();
    let mut timeout = Duration::default();

    let mut flags = FlagSet::new("tool", ErrorPolicy::Continue);
    flags.bool_var(&mut verbose, "verbose", Some('v'), false, "Emit progress details.");
    flags.bool_var(&mut quiet, "quiet", Some('q'), false, "Suppress output.");
    flags.string_var(&mut output, "output", Some('o'), "-", "Write to this file.");
    flags.duration_var(
        &mut timeout,
        "timeout",
        Some('t'),
        Duration::from_secs(30),
        "Give up after this long.",
    );
    let jobs = flags.usize_flag("jobs", Some('j'), 1, "Worker count.");

    flags
        .parse_tokens(&[
            "-vqo",
            "report.txt",
            "--jobs=8",
            "-t",
            "1h 30m",
            "--",
            "-literal",
        ])
        .unwrap();

    assert_eq!(flags.args(), &["-literal".to_string()]);
    assert_eq!(*jobs.borrow(), 8);
    drop(flags);
    assert!(verbose);
    assert!(quiet);
    assert_eq!(output, "report.txt");
    assert_eq!(timeout, Duration::from_secs(5400));
}

#[test]
fn help_is_not_a_user_mistake() {
    let mut flags = FlagSet::new("tool", ErrorPolicy::Continue);
    flags.bool_flag("verbose", None, false, "Emit progress details.");

    match flags.parse_tokens(&["--help"]) {
        Err(ParseError::HelpRequested) => {}
        other => panic!("expected the help sentinel, got {other:?}"),
    }

    match flags.parse_tokens(&["--bogus"]) {
        Err(ParseError::UnknownFlag(name)) => assert_eq!(name, "bogus"),
        other => panic!("expected an unknown flag failure, got {other:?}"),
    }
}
