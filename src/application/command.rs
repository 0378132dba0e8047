//! Commands and the argument cursor they consume from

use crate::application::error::CommandError;
use crate::infrastructure::di::Registry;

/// Prefix of long-form command tokens (`--help`).
pub const COMMAND_PREFIX: &str = "--";

/// Prefix of short-form switch tokens (`-h`).
pub const SWITCH_PREFIX: &str = "-";

/// The namespace a prefixed token is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Command,
    Switch,
}

impl TokenKind {
    pub fn prefix(self) -> &'static str {
        match self {
            TokenKind::Command => COMMAND_PREFIX,
            TokenKind::Switch => SWITCH_PREFIX,
        }
    }

    /// Split a token into its kind and bare name. `None` for plain arguments.
    pub fn classify(token: &str) -> Option<(TokenKind, &str)> {
        if let Some(name) = token.strip_prefix(COMMAND_PREFIX) {
            Some((TokenKind::Command, name))
        } else {
            token
                .strip_prefix(SWITCH_PREFIX)
                .map(|name| (TokenKind::Switch, name))
        }
    }
}

/// Whether `token` starts with a command or switch prefix.
pub fn is_flag(token: &str) -> bool {
    token.starts_with(COMMAND_PREFIX) || token.starts_with(SWITCH_PREFIX)
}

/// How scanning continues after a command returns normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Flow {
    /// Keep scanning the command line.
    Continue,
    /// Stop scanning and exit cleanly without running the main unit.
    SkipRun,
}

pub type CommandResult = Result<Flow, CommandError>;

/// A handler bound to a command-line token.
pub trait Command {
    /// Handle one occurrence of the command. `args` is positioned just after
    /// the matched token (at the token itself for the default handler).
    fn process(&self, args: &mut ArgCursor<'_>, registry: &Registry) -> CommandResult;

    /// Synopsis of the arguments, shown in help output.
    fn arg_spec(&self) -> Option<&str> {
        None
    }

    /// One-paragraph description, shown in help output.
    fn summary(&self) -> &str;
}

/// Bidirectional cursor over the argument vector.
#[derive(Debug, Clone)]
pub struct ArgCursor<'a> {
    args: &'a [String],
    position: usize,
}

impl<'a> ArgCursor<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self { args, position: 0 }
    }

    pub fn has_next(&self) -> bool {
        self.position < self.args.len()
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.args.get(self.position).map(String::as_str)
    }

    /// Step back over the last returned token. Returns `false` at the start.
    pub fn back(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    /// Index of the next token.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> &'a [String] {
        &self.args[self.position..]
    }

    /// Claim the next plain argument.
    ///
    /// Returns `None` without consuming anything when no token is left or the
    /// next token is a command or switch, so variable-arity commands stop at
    /// the next flag.
    pub fn fetch_argument(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        if is_flag(token) {
            return None;
        }
        self.position += 1;
        Some(token)
    }

    /// Take the next token whatever it looks like; a missing token is a
    /// parse failure attributed to `command`.
    pub fn require_argument(&mut self, command: &str, what: &str) -> Result<&'a str, CommandError> {
        self.next().ok_or_else(|| CommandError::MissingArgument {
            command: command.to_string(),
            what: what.to_string(),
        })
    }
}

impl<'a> Iterator for ArgCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[rstest]
    #[case("--help", Some((TokenKind::Command, "help")))]
    #[case("-h", Some((TokenKind::Switch, "h")))]
    #[case("---x", Some((TokenKind::Command, "-x")))]
    #[case("--", Some((TokenKind::Command, "")))]
    #[case("-", Some((TokenKind::Switch, "")))]
    #[case("file.txt", None)]
    fn given_token_when_classifying_then_kind_and_name(
        #[case] token: &str,
        #[case] expected: Option<(TokenKind, &str)>,
    ) {
        assert_eq!(TokenKind::classify(token), expected);
    }

    #[test]
    fn given_cursor_when_stepping_back_then_token_visible_again() {
        let tokens = args(&["a", "b"]);
        let mut cursor = ArgCursor::new(&tokens);
        assert!(!cursor.back());
        assert_eq!(cursor.next(), Some("a"));
        assert!(cursor.back());
        assert_eq!(cursor.next(), Some("a"));
        assert_eq!(cursor.next(), Some("b"));
        assert_eq!(cursor.next(), None);
        assert!(!cursor.has_next());
    }

    #[test]
    fn given_plain_tokens_when_fetching_then_consumes_until_flag() {
        let tokens = args(&["3", "app", "--next", "x"]);
        let mut cursor = ArgCursor::new(&tokens);
        assert_eq!(cursor.fetch_argument(), Some("3"));
        assert_eq!(cursor.fetch_argument(), Some("app"));
        assert_eq!(cursor.fetch_argument(), None);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.peek(), Some("--next"));
    }

    #[test]
    fn given_switch_token_when_fetching_then_left_in_place() {
        let tokens = args(&["-v"]);
        let mut cursor = ArgCursor::new(&tokens);
        assert_eq!(cursor.fetch_argument(), None);
        assert_eq!(cursor.remaining(), &tokens[..]);
    }

    #[test]
    fn given_exhausted_cursor_when_fetching_then_none() {
        let tokens: Vec<String> = Vec::new();
        let mut cursor = ArgCursor::new(&tokens);
        assert_eq!(cursor.fetch_argument(), None);
    }

    #[test]
    fn given_flag_when_requiring_then_taken_unconditionally() {
        let tokens = args(&["-weird-name.toml"]);
        let mut cursor = ArgCursor::new(&tokens);
        assert_eq!(
            cursor.require_argument("--config", "config-file").unwrap(),
            "-weird-name.toml"
        );
    }

    #[test]
    fn given_nothing_left_when_requiring_then_missing_argument() {
        let tokens: Vec<String> = Vec::new();
        let mut cursor = ArgCursor::new(&tokens);
        let err = cursor.require_argument("--config", "config-file").unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument { .. }));
        assert_eq!(err.to_string(), "--config: missing config-file");
    }
}
