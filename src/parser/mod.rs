//! Source parser: per-language extraction of cross-file relationships.
//!
//! [`parse`] is pure and never fails. Comments are stripped first and
//! string literals are tracked, so import-like prose or quoted snippets are
//! never extracted. Only same-repository relative imports and upper-case
//! exported declarations are kept. Unknown
//! extensions yield an empty record.

mod extract;
pub mod language;
pub(crate) mod strip;

use indexmap::IndexSet;
use serde::Serialize;

pub use language::Language;

/// Imports and exports of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    pub language: Language,
    /// Relative (same-repository) module references, deduplicated.
    pub imports: IndexSet<String>,
    /// Exported upper-case symbol names, deduplicated.
    pub exports: IndexSet<String>,
}

impl DependencyRecord {
    /// Whether any relative import mentions `base_name`.
    pub fn imports_base_name(&self, base_name: &str) -> bool {
        !base_name.is_empty()
            && self
                .imports
                .iter()
                .any(|i| i.contains(base_name) && self.language.is_relative_import(i))
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.exports.is_empty()
    }
}

/// Parse `content` as the language implied by `filename`.
pub fn parse(filename: &str, content: &str) -> DependencyRecord {
    let language = Language::from_path(filename);
    let Some(syntax) = language.comment_syntax() else {
        tracing::debug!(file = filename, "unsupported language, no relationships extracted");
        return DependencyRecord::default();
    };

    let stripped = strip::strip_comments(content, &syntax);
    let captures = extract::extract(language, &stripped);

    let imports = captures
        .imports
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| language.is_relative_import(i))
        .collect();
    let exports = captures
        .exports
        .into_iter()
        .filter(|e| e.starts_with(|c: char| c.is_ascii_uppercase()))
        .collect();

    DependencyRecord {
        language,
        imports,
        exports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> IndexSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn typescript_relative_imports_only() {
        let src = r#"
import React from 'react';
import { ProfileService } from '../services/Profile';
import type { User } from "./types";
import * as utils from './utils';
import './styles.css';
import {
  A,
  B,
} from '../multi/line';
const lodash = require('lodash');
const cfg = require('./config');
const Lazy = import('./lazy/Widget');
export { helper } from './helpers';
"#;
        let rec = parse("components/Profile.tsx", src);
        assert_eq!(rec.language, Language::TypeScript);
        for expected in [
            "../services/Profile",
            "./types",
            "./utils",
            "./styles.css",
            "../multi/line",
            "./config",
            "./lazy/Widget",
            "./helpers",
        ] {
            assert!(rec.imports.contains(expected), "missing {expected}");
        }
        assert!(!rec.imports.contains("react"));
        assert!(!rec.imports.contains("lodash"));
        assert_eq!(rec.imports.len(), 8);
    }

    #[test]
    fn typescript_upper_case_exports() {
        let src = r#"
export class ProfileService {}
export default class DefaultThing {}
export interface ProfileProps {}
export type ProfileId = string;
export enum Role { Admin }
export const MAX_SIZE = 10;
export async function FetchProfile() {}
export function helper() {}
export const lowerThing = 1;
export abstract class Base {}
"#;
        let rec = parse("services/Profile.ts", src);
        assert_eq!(
            rec.exports,
            set(&[
                "ProfileService",
                "DefaultThing",
                "ProfileProps",
                "ProfileId",
                "Role",
                "MAX_SIZE",
                "FetchProfile",
                "Base",
            ])
        );
    }

    #[test]
    fn commented_imports_are_ignored() {
        let src = r#"
// import Foo from './fake'
/* import { Bar } from '../also-fake' */
/**
 * export class Documented {}
 */
import { Real } from './real';
"#;
        let rec = parse("a.ts", src);
        assert_eq!(rec.imports, set(&["./real"]));
        assert!(rec.exports.is_empty());
    }

    #[test]
    fn string_literal_mentioning_service_is_not_an_import() {
        let rec = parse("utils/helper.ts", r#"const msg = "ProfileService is ready";"#);
        assert!(rec.imports.is_empty());
        assert!(!rec.imports_base_name("Profile"));
    }

    #[test]
    fn require_inside_string_literal_is_not_an_import() {
        let src = r#"const hint = "call require('../services/Profile') to load";
const lazy = 'or import("../services/Profile") later';
"#;
        let rec = parse("utils/docs.ts", src);
        assert!(rec.imports.is_empty(), "got {:?}", rec.imports);
        assert!(!rec.imports_base_name("Profile"));
    }

    #[test]
    fn statements_inside_template_literal_are_ignored() {
        let src = "const snippet = `\nimport { ProfileService } from '../services/Profile';\nexport class Fake {}\n`;\nimport { Real } from './real';\nexport class Shown {}\n";
        let rec = parse("utils/tmpl.ts", src);
        assert_eq!(rec.imports, set(&["./real"]));
        assert_eq!(rec.exports, set(&["Shown"]));
    }

    #[test]
    fn rust_multi_line_string_hides_use_lines() {
        let src = "const HELP: &str = \"usage:\nuse super::profile::Profile;\n\";\nlet q = '\"';\nuse super::billing::Invoice;\n";
        let rec = parse("src/cli.rs", src);
        assert_eq!(rec.imports, set(&["super::billing::Invoice"]));
    }

    #[test]
    fn duplicates_are_collapsed() {
        let src = "import { A } from './a';\nimport { B } from './a';\nexport class X {}\nexport class X {}\n";
        let rec = parse("m.js", src);
        assert_eq!(rec.imports, set(&["./a"]));
        assert_eq!(rec.exports, set(&["X"]));
    }

    #[test]
    fn rust_use_and_mod() {
        let src = r#"
use std::collections::HashMap;
use serde::Serialize;
use super::profile::ProfileService;
pub use crate::models::{
    User,
    Account,
};
mod helpers;
pub(crate) mod wire;
// use super::commented::Out;

pub struct Profile;
pub(crate) struct Hidden;
pub fn build() {}
pub trait Store {}
pub const LIMIT: usize = 3;
    pub fn Nested() {}
"#;
        let rec = parse("src/lib.rs", src);
        assert_eq!(
            rec.imports,
            set(&[
                "super::profile::ProfileService",
                "crate::models::{User,Account,}",
                "self::helpers",
                "self::wire",
            ])
        );
        assert_eq!(rec.exports, set(&["Profile", "Store", "LIMIT"]));
    }

    #[test]
    fn go_relative_imports_and_capitalised_exports() {
        let src = r#"
package main

import "fmt"
import (
    "os"
    util "./util"
    "../shared/Profile"
)

func Exported() {}
func internal() {}
type Service struct{}
const Limit = 5
func (s *Service) Method() {}
"#;
        let rec = parse("cmd/main.go", src);
        assert_eq!(rec.imports, set(&["./util", "../shared/Profile"]));
        assert_eq!(rec.exports, set(&["Exported", "Service", "Limit"]));
    }

    #[test]
    fn swift_has_no_relative_imports() {
        let src = r#"
import Foundation
@testable import App

public final class ProfileService {}
open class BaseView {}
public struct Profile {}
public func helper() {}
struct Internal {}
"#;
        let rec = parse("ProfileService.swift", src);
        assert!(rec.imports.is_empty());
        assert_eq!(rec.exports, set(&["ProfileService", "BaseView", "Profile"]));
    }

    #[test]
    fn kotlin_top_level_non_private_declarations() {
        let src = r#"
package com.acme

import com.acme.data.Repo

data class User(val id: String)
private class Hidden
internal class AlsoHidden
object Registry
fun Build() = 1
sealed interface Event
"#;
        let rec = parse("User.kt", src);
        assert!(rec.imports.is_empty());
        assert_eq!(rec.exports, set(&["User", "Registry", "Build", "Event"]));
    }

    #[test]
    fn java_public_types() {
        let src = r#"
import java.util.List;
import static org.junit.Assert.*;

public final class ProfileService {
    public static class Inner {}
}
class PackagePrivate {}
public record Point(int x, int y) {}
"#;
        let rec = parse("ProfileService.java", src);
        assert!(rec.imports.is_empty());
        assert_eq!(rec.exports, set(&["ProfileService", "Point"]));
    }

    #[test]
    fn python_relative_from_imports() {
        let src = r#"
"""Module docstring.

from .docstring_only import Nope
"""
import os
from typing import List
from .profile import ProfileService
from ..services.billing import Invoice
from . import helpers, models as m
# from .commented import X

class ProfileView:
    def Method(self):
        pass

def Build():
    pass

def private_helper():
    pass
"#;
        let rec = parse("app/views.py", src);
        assert_eq!(
            rec.imports,
            set(&[".profile", "..services.billing", ".", ".helpers", ".models"])
        );
        assert_eq!(rec.exports, set(&["ProfileView", "Build"]));
    }

    #[test]
    fn unknown_extension_yields_empty_record() {
        let rec = parse("README.md", "import { A } from './a'\nexport class B {}");
        assert_eq!(rec.language, Language::Unknown);
        assert!(rec.is_empty());
    }

    #[test]
    fn imports_base_name_requires_relative_match() {
        let rec = parse(
            "components/Profile.ts",
            "import { ProfileService } from '../services/Profile';\nimport x from 'Profile';",
        );
        assert!(rec.imports_base_name("Profile"));
        assert!(!rec.imports_base_name("Billing"));
        assert!(!rec.imports_base_name(""));
    }
}
