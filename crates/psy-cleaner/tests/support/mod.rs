#![allow(dead_code)]
use pretty_assertions::assert_eq;
use psy_cleaner::{CleanerConfig, CodeCleaner, Error, ErrorKind, Pass, PassSet, PhpVersion};

/// A cleaner running only `pass`.
pub fn cleaner_with(pass: impl Pass + 'static) -> CodeCleaner {
    CodeCleaner::builder()
        .passes(PassSet::single(pass))
        .build()
        .expect("cleaner builds")
}

pub fn cleaner_for_version(pass: impl Pass + 'static, major: u32, minor: u32) -> CodeCleaner {
    let config = CleanerConfig {
        php_version: PhpVersion::new(major, minor),
        ..CleanerConfig::default()
    };
    CodeCleaner::builder()
        .config(config)
        .passes(PassSet::single(pass))
        .build()
        .expect("cleaner builds")
}

pub fn clean_with(cleaner: &mut CodeCleaner, input: &str) -> Result<String, Error> {
    let lines: Vec<&str> = input.lines().collect();
    cleaner
        .clean(&lines)
        .map(|cleaned| cleaned.unwrap_or_else(|| panic!("incomplete input: {}", input)))
}

pub fn assert_processes_as(pass: impl Pass + 'static, input: &str, expected: &str) {
    let mut cleaner = cleaner_with(pass);
    match clean_with(&mut cleaner, input) {
        Ok(cleaned) => assert_eq!(cleaned, expected, "input: {}", input),
        Err(err) => panic!("{} rejected: {}", input, err),
    }
}

pub fn assert_accepts(pass: impl Pass + 'static, input: &str) {
    let mut cleaner = cleaner_with(pass);
    if let Err(err) = clean_with(&mut cleaner, input) {
        panic!("{} rejected: {}", input, err);
    }
}

pub fn assert_rejects_with(
    cleaner: &mut CodeCleaner,
    input: &str,
    kind: ErrorKind,
    fragment: &str,
) -> Error {
    let err = match clean_with(cleaner, input) {
        Ok(cleaned) => panic!("{} accepted as {}", input, cleaned),
        Err(err) => err,
    };
    assert_eq!(err.kind(), Some(kind), "input: {}, error: {}", input, err);
    assert!(
        err.message().contains(fragment),
        "input: {}, expected {:?} in {:?}",
        input,
        fragment,
        err.message()
    );
    err
}

pub fn assert_fatal(pass: impl Pass + 'static, input: &str, fragment: &str) -> Error {
    assert_rejects_with(&mut cleaner_with(pass), input, ErrorKind::Fatal, fragment)
}

pub fn assert_parse_error(pass: impl Pass + 'static, input: &str, fragment: &str) -> Error {
    assert_rejects_with(&mut cleaner_with(pass), input, ErrorKind::Parse, fragment)
}
