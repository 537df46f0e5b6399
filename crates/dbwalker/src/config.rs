//! Builder configuration: the set of SQL functions allowed to bypass literal escaping.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Functions a value may call without being escaped as a string literal.
pub const DEFAULT_FUNCTIONS: &[&str] = &[
    "UUID",
    "DATE",
    "NOW",
    "CURDATE",
    "CURTIME",
    "UNIX_TIMESTAMP",
    "MD5",
    "SHA1",
    "SHA2",
    "RAND",
    "LENGTH",
    "LOWER",
    "UPPER",
    "SUBSTRING",
    "CONCAT",
    "CONCAT_WS",
    "REPLACE",
    "TRIM",
    "LEFT",
    "RIGHT",
    "LTRIM",
    "RTRIM",
];

/// Configuration shared by the value encoder and the statement builders.
///
/// Function names are stored upper-cased; matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    allowed_functions: BTreeSet<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::with_functions(DEFAULT_FUNCTIONS.iter().copied())
    }
}

impl BuilderConfig {
    /// Create a configuration with the dialect's standard function set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared default configuration.
    pub fn shared() -> &'static BuilderConfig {
        static DEFAULT: OnceLock<BuilderConfig> = OnceLock::new();
        DEFAULT.get_or_init(BuilderConfig::default)
    }

    /// Create a configuration with exactly the given functions.
    pub fn with_functions<I, S>(functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_functions = functions
            .into_iter()
            .map(|f| f.as_ref().trim().to_ascii_uppercase())
            .filter(|f| !f.is_empty())
            .collect();
        Self { allowed_functions }
    }

    /// Allow one more function.
    pub fn allow_function(self, function: &str) -> Self {
        self.allow_functions([function])
    }

    /// Allow several more functions.
    pub fn allow_functions<I, S>(self, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut all = self.allowed_functions;
        all.extend(
            functions
                .into_iter()
                .map(|f| f.as_ref().trim().to_ascii_uppercase())
                .filter(|f| !f.is_empty()),
        );
        Self {
            allowed_functions: all,
        }
    }

    /// Remove a function from the allowed set.
    pub fn deny_function(self, function: &str) -> Self {
        let mut allowed_functions = self.allowed_functions;
        allowed_functions.remove(&function.trim().to_ascii_uppercase());
        Self { allowed_functions }
    }

    /// Whether `function` may be emitted as a passthrough call.
    pub fn is_allowed(&self, function: &str) -> bool {
        self.allowed_functions
            .contains(&function.trim().to_ascii_uppercase())
    }

    /// The allowed function names, upper-cased and sorted.
    pub fn allowed_functions(&self) -> impl Iterator<Item = &str> {
        self.allowed_functions.iter().map(String::as_str)
    }

    /// Split `NAME(args)` into the upper-cased name and the untouched argument text,
    /// when `NAME` is allowed and its parenthesis is the one closing the text.
    pub(crate) fn match_call<'a>(&self, text: &'a str) -> Option<(String, &'a str)> {
        let caps = call_pattern().captures(text)?;
        let name = caps.get(1)?.as_str();
        let args = caps.get(2)?.as_str();
        (self.is_allowed(name) && is_balanced(args)).then(|| (name.to_ascii_uppercase(), args))
    }
}

/// Parentheses in `args` balance, ignoring those inside quoted strings.
///
/// Rejects `NOW()) OR (MD5(1)` style text where the call closes before the end.
fn is_balanced(args: &str) -> bool {
    let mut depth: usize = 0;
    let mut quote: Option<char> = None;
    let mut chars = args.chars();
    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' => depth += 1,
                ')' => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return false,
                },
                _ => {}
            },
        }
    }
    depth == 0 && quote.is_none()
}

fn call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_]*)\((.*)\)$").expect("invalid built-in call regex")
    })
}
