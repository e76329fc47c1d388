//! Node attributes
//!
//! Adjacent `key '=' value` triples of one node's token list, collected once per node.

use super::token::DumpToken;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static POSITION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":\d+:\d+$").expect("valid position pattern"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
}

impl Attributes {
    /// Collect the attributes of one node's tokens.
    ///
    /// A key preceded by the bare word `interface` is stored as `interface <key>`, so that
    /// `interface type='(Bar) -> ()'` does not shadow the node's `type`. Values written in
    /// several tokens are joined with a single space: bracketed ranges
    /// (`[t.swift:3:5 - line:3:9]`) and extension-qualified decls
    /// (`Swift.(file).Int extension.==`), and paths containing spaces
    /// (`location=/tmp/My Tests/t.swift:3:5`). The first occurrence of a key wins.
    pub fn collect(tokens: &[DumpToken]) -> Self {
        let mut values = HashMap::new();
        let mut i = 0;
        while i + 1 < tokens.len() {
            let (Some(key), true) = (tokens[i].as_token(), tokens[i + 1].is("=")) else {
                i += 1;
                continue;
            };
            let Some(first) = tokens.get(i + 2) else {
                break;
            };
            let key = match i.checked_sub(1).map(|p| &tokens[p]) {
                Some(previous) if previous.is("interface") => format!("interface {}", key),
                _ => key.to_string(),
            };

            let mut end = i + 3;
            let value = match first {
                DumpToken::Symbol(text) | DumpToken::String(text) => text.clone(),
                DumpToken::Token(text) if text.starts_with('[') && !text.ends_with(']') => {
                    let mut parts = vec![text.as_str()];
                    while let Some(DumpToken::Token(part)) = tokens.get(end) {
                        parts.push(part);
                        end += 1;
                        if part.ends_with(']') {
                            break;
                        }
                    }
                    parts.join(" ")
                }
                DumpToken::Token(text) => {
                    let mut parts = vec![text.as_str()];
                    while let Some(DumpToken::Token(part)) = tokens.get(end) {
                        if !part.starts_with("extension.") {
                            break;
                        }
                        parts.push(part);
                        end += 1;
                    }
                    let mut value = parts.join(" ");
                    if let Some((joined, next)) = join_spaced_path(tokens, &value, end) {
                        value = joined;
                        end = next;
                    }
                    value
                }
                DumpToken::Indent(_) => {
                    i += 2;
                    continue;
                }
            };
            values.entry(key).or_insert(value);
            i = end;
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A path value cut at a space: `/tmp/My` followed by `Tests/t.swift:3:5`.
///
/// Joins the bare tokens from `next` on until the value ends in `:line:column`, stopping at
/// the next key. Returns the joined value and the index after it, or `None` when no
/// position ever ends it.
fn join_spaced_path(tokens: &[DumpToken], value: &str, next: usize) -> Option<(String, usize)> {
    if !value.contains('/') || POSITION_SUFFIX.is_match(value) {
        return None;
    }
    let mut joined = value.to_string();
    let mut end = next;
    while let Some(DumpToken::Token(part)) = tokens.get(end) {
        if tokens.get(end + 1).is_some_and(|t| t.is("=")) {
            return None;
        }
        joined.push(' ');
        joined.push_str(part);
        end += 1;
        if POSITION_SUFFIX.is_match(&joined) {
            return Some((joined, end));
        }
    }
    None
}

/// Whether a bare flag word such as `implicit` or `throws` is present.
pub fn has_flag(tokens: &[DumpToken], flag: &str) -> bool {
    tokens.iter().any(|t| t.is(flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::dump::tokenizer::tokenize;

    fn attributes(line: &str) -> Attributes {
        Attributes::collect(&tokenize(line))
    }

    #[test]
    fn test_symbols_and_bare_values() {
        let attrs = attributes("(declref_expr type='Bar' location=t.swift:15:15 function_ref=unapplied)");
        assert_eq!(attrs.get("type"), Some("Bar"));
        assert_eq!(attrs.get("location"), Some("t.swift:15:15"));
        assert_eq!(attrs.get("function_ref"), Some("unapplied"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_bracketed_range_is_joined() {
        let attrs = attributes("(member_ref_expr type='Int' range=[t.swift:15:15 - line:15:19] decl=main.(file).Bar.val@t.swift:3:7)");
        assert_eq!(attrs.get("range"), Some("[t.swift:15:15 - line:15:19]"));
        assert_eq!(attrs.get("decl"), Some("main.(file).Bar.val@t.swift:3:7"));
    }

    #[test]
    fn test_extension_decl_is_joined() {
        let attrs = attributes("(declref_expr type='(Int, Int) -> Bool' decl=Swift.(file).Int extension.== function_ref=unapplied)");
        assert_eq!(attrs.get("decl"), Some("Swift.(file).Int extension.=="));
        assert_eq!(attrs.get("function_ref"), Some("unapplied"));
    }

    #[test]
    fn test_path_with_spaces_is_joined() {
        let attrs = attributes("(declref_expr type='Int' location=/tmp/My Tests/t.swift:3:5 range=[/tmp/My Tests/t.swift:3:5 - line:3:5] decl=main.(file).x@/tmp/My Tests/t.swift:2:5 function_ref=unapplied)");
        assert_eq!(attrs.get("location"), Some("/tmp/My Tests/t.swift:3:5"));
        assert_eq!(attrs.get("range"), Some("[/tmp/My Tests/t.swift:3:5 - line:3:5]"));
        assert_eq!(attrs.get("decl"), Some("main.(file).x@/tmp/My Tests/t.swift:2:5"));
        assert_eq!(attrs.get("function_ref"), Some("unapplied"));
    }

    #[test]
    fn test_unterminated_path_keeps_first_word() {
        let attrs = attributes("(import_decl module=/opt/lib nothrow access=internal)");
        assert_eq!(attrs.get("module"), Some("/opt/lib"));
        assert_eq!(attrs.get("access"), Some("internal"));
    }

    #[test]
    fn test_interface_type_is_distinct() {
        let attrs = attributes("(func_decl \"test()\" interface type='(Tests) -> () -> ()' access=internal type='Int')");
        assert_eq!(attrs.get("interface type"), Some("(Tests) -> () -> ()"));
        assert_eq!(attrs.get("type"), Some("Int"));
        assert_eq!(attrs.get("access"), Some("internal"));
    }

    #[test]
    fn test_flags() {
        let tokens = tokenize("(autoclosure_expr implicit type='() throws -> Bool' discriminator=0)");
        assert!(has_flag(&tokens, "implicit"));
        assert!(!has_flag(&tokens, "throws"));
    }
}
