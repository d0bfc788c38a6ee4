//! Compile-time version defines for the firmware build.
//!
//! The build framework reads the output of `fw-ota flags` as extra compiler
//! arguments, one `'-DNAME="value"'` per line.

use crate::exec::shell_quote;
use crate::version::VersionInfo;

/// A single preprocessor string definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFlag {
    pub name: &'static str,
    pub value: String,
}

impl BuildFlag {
    fn new(name: &'static str, value: &str) -> Self {
        BuildFlag {
            name,
            value: value.to_string(),
        }
    }

    /// Renders the flag as a single shell-quoted compiler argument.
    ///
    /// The value becomes a C string literal, and the whole argument is
    /// wrapped in single quotes so the build tool's shell passes it through
    /// untouched.
    ///
    /// # Example
    /// ```ignore
    /// BuildFlag { name: "APP_TAG", value: "v2.3.0".into() }.to_define()
    /// // => '-DAPP_TAG="v2.3.0"'
    /// ```
    pub fn to_define(&self) -> String {
        let define = format!("-D{}=\"{}\"", self.name, escape_c_string(&self.value));
        shell_quote(&define)
    }
}

/// Produces the five version defines in their fixed order.
pub fn emit(info: &VersionInfo) -> Vec<BuildFlag> {
    vec![
        BuildFlag::new("APP_TAG", info.base_tag()),
        BuildFlag::new("APP_VERSION", info.version()),
        BuildFlag::new("SRC_REVISION", info.commit_hash()),
        BuildFlag::new("SRC_BRANCH", info.branch()),
        BuildFlag::new("BUILD_TIMESTAMP", info.build_timestamp()),
    ]
}

/// Joins rendered defines, one per line.
pub fn render(flags: &[BuildFlag]) -> String {
    flags
        .iter()
        .map(BuildFlag::to_define)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_c_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}
