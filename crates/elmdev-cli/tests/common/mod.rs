//! Shared helpers for tests that drive a real toolchain.
//!
//! A shell script stands in for the `elm` executable. It understands
//! `--version`, `init` (reads the confirmation from stdin) and `make`, and
//! fails `make` when a source contains `BROKEN`.

#![cfg(unix)]
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub const FAKE_ELM: &str = r#"#!/bin/sh
case "$1" in
  --version)
    echo "0.19.1"
    ;;
  init)
    read answer
    [ "$answer" = "Y" ] || exit 3
    printf '{"type":"application","source-directories":["src"],"elm-version":"0.19.1"}' > elm.json
    ;;
  make)
    shift
    out=""
    srcs=""
    while [ $# -gt 0 ]; do
      if [ "$1" = "--output" ]; then out="$2"; shift 2; else srcs="$srcs $1"; shift; fi
    done
    if grep -q BROKEN $srcs; then
      echo "-- PARSE ERROR ----------------------------------------- Main.elm" >&2
      exit 1
    fi
    cat $srcs > "$out"
    ;;
  *)
    exit 2
    ;;
esac
"#;

/// Write the fake compiler into `dir` and return its path.
pub fn install_fake_elm(dir: &Path) -> PathBuf {
    let program = dir.join("fake-elm");
    fs::write(&program, FAKE_ELM).unwrap();
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
    program
}
