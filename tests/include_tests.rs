//! End-to-end tests for the include_one directive

use include_one::{
    include_one, try_include_one, CmdStatus, Config, ErrorSink, ExpandOptions, Expander, FileLoader,
    IncludeScope, IncludeSet,
};
use serial_test::serial;
use similar_asserts::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(&path, content).expect("write");
    path
}

fn recording_loader(path: &Path, loaded: &mut Vec<PathBuf>, _: &mut ErrorSink) {
    loaded.push(path.to_path_buf());
}

#[test]
fn same_base_name_in_two_directories_loads_first_path_only() {
    let tmp = TempDir::new().expect("tmp");
    write(tmp.path(), "a/x.conf", "");
    write(tmp.path(), "b/x.conf", "");
    let set = IncludeSet::new();
    let scope = IncludeScope::new(&set, Expander::default().with_base_dir(tmp.path()));

    let mut loaded = Vec::new();
    let report = try_include_one(&["b/x.conf", "a/x.conf"], &scope, &mut recording_loader, &mut loaded, &mut ErrorSink::new())
        .expect("include");

    assert_eq!(loaded, vec![tmp.path().join("a/x.conf")]);
    assert_eq!(report.skipped, vec![tmp.path().join("b/x.conf")]);
}

#[test]
fn base_names_are_remembered_across_invocations_and_patterns() {
    let tmp = TempDir::new().expect("tmp");
    write(tmp.path(), "first/shared.conf", "");
    write(tmp.path(), "second/shared.conf", "");
    write(tmp.path(), "second/new.conf", "");
    let set = IncludeSet::new();
    let scope = IncludeScope::new(&set, Expander::default().with_base_dir(tmp.path()));

    let mut loaded = Vec::new();
    let first = include_one(&["first/*"], &scope, &mut recording_loader, &mut loaded, &mut ErrorSink::new());
    let second = include_one(&["second/*"], &scope, &mut recording_loader, &mut loaded, &mut ErrorSink::new());

    assert_eq!(first.status, CmdStatus::Success);
    assert_eq!(second.status, CmdStatus::Success);
    assert_eq!(loaded, vec![tmp.path().join("first/shared.conf"), tmp.path().join("second/new.conf")]);
}

#[test]
fn failed_invocation_leaves_the_set_untouched() {
    let tmp = TempDir::new().expect("tmp");
    let set = IncludeSet::new();
    let scope = IncludeScope::new(&set, Expander::default().with_base_dir(tmp.path()));

    let mut loaded = Vec::new();
    let result = include_one(&["'unterminated"], &scope, &mut recording_loader, &mut loaded, &mut ErrorSink::new());

    assert_eq!(result.error.as_deref(), Some("include_one: Failed to expand file patterns"));
    assert!(loaded.is_empty());
    assert!(set.is_empty());
}

#[test]
#[serial]
fn variables_and_tilde_come_from_the_environment() {
    let home = TempDir::new().expect("tmp");
    write(home.path(), ".config/app/10.conf", "");
    write(home.path(), "extra/20.conf", "");

    let previous = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());
    std::env::set_var("INCLUDE_ONE_TEST_EXTRA", home.path().join("extra"));

    let set = IncludeSet::new();
    let scope = IncludeScope::new(&set, Expander::default());
    let mut loaded = Vec::new();
    let result = include_one(
        &["~/.config/app/*.conf", "$INCLUDE_ONE_TEST_EXTRA/*.conf"],
        &scope,
        &mut recording_loader,
        &mut loaded,
        &mut ErrorSink::new(),
    );

    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
    std::env::remove_var("INCLUDE_ONE_TEST_EXTRA");

    assert!(result.is_success(), "{result}");
    assert_eq!(loaded, vec![home.path().join(".config/app/10.conf"), home.path().join("extra/20.conf")]);
}

#[test]
#[serial]
fn strict_variables_reject_unset_names() {
    std::env::remove_var("INCLUDE_ONE_TEST_UNSET");
    let tmp = TempDir::new().expect("tmp");
    let set = IncludeSet::new();
    let strict = ExpandOptions { strict_variables: true, ..ExpandOptions::default() };
    let scope = IncludeScope::new(&set, Expander::new(strict).with_base_dir(tmp.path()));

    let mut loaded = Vec::new();
    let result = include_one(&["$INCLUDE_ONE_TEST_UNSET/*"], &scope, &mut recording_loader, &mut loaded, &mut ErrorSink::new());
    assert_eq!(result.error.as_deref(), Some("include_one: Failed to expand file patterns"));
}

#[test]
fn nested_includes_merge_in_sorted_order() {
    let tmp = TempDir::new().expect("tmp");
    let root = write(tmp.path(), "config", "bar top\ninclude_one config.d/*.conf\n");
    write(tmp.path(), "config.d/b.conf", "bar b\ninclude_one ../shared/*.conf\n");
    write(tmp.path(), "config.d/a.conf", "bar a\nfont a\n");
    write(tmp.path(), "shared/theme.conf", "font theme\n");
    write(tmp.path(), "shared/a.conf", "font duplicate-name\n");

    let set = IncludeSet::new();
    let mut config = Config::new();
    let mut errors = ErrorSink::new();
    FileLoader::new(&set, ExpandOptions::default()).load(&root, &mut config, &mut errors);

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(config.get("bar"), Some("b"));
    assert_eq!(config.get("font"), Some("theme"));
    let names: Vec<String> = set.names().iter().map(|n| n.to_string_lossy().into_owned()).collect();
    assert_eq!(names, ["a.conf", "b.conf", "theme.conf"].map(String::from).to_vec());
}

#[test]
fn reload_with_same_set_loads_nothing_new() {
    let tmp = TempDir::new().expect("tmp");
    let root = write(tmp.path(), "config", "include_one parts/*\n");
    write(tmp.path(), "parts/one", "value 1\n");

    let set = IncludeSet::new();
    let mut first = Config::new();
    let mut second = Config::new();
    let mut errors = ErrorSink::new();
    FileLoader::new(&set, ExpandOptions::default()).load(&root, &mut first, &mut errors);
    FileLoader::new(&set, ExpandOptions::default()).load(&root, &mut second, &mut errors);

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(first.get("value"), Some("1"));
    assert_eq!(second.get("value"), None);
    assert_eq!(second.sources().to_vec(), vec![root]);
}
