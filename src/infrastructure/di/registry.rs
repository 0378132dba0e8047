//! Command registry for dependency injection
//!
//! Maps command-line tags to command handlers and holds the main unit.
//! Built once at start-up and passed to the launcher.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::application::command::{Command, TokenKind};
use crate::domain::UnitRef;
use crate::infrastructure::error::{RegistryError, RegistryResult};

/// Shared handle to a registered command.
pub type CommandRef = Rc<dyn Command>;

/// A command name qualified by the token kind it answers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    kind: TokenKind,
    name: String,
}

impl Tag {
    pub fn new(kind: TokenKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Tag answering to `--name`.
    pub fn command(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Command, name)
    }

    /// Tag answering to `-name`.
    pub fn switch(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Switch, name)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.name)
    }
}

/// One registered command with all tags it answers to.
pub struct CommandListing<'a> {
    pub tag: &'a Tag,
    pub aliases: Vec<&'a Tag>,
    pub command: &'a CommandRef,
}

/// Registry of commands, aliases, default handler and main unit.
pub struct Registry {
    /// Primary tags in registration order.
    entries: Vec<(Tag, CommandRef)>,
    /// Alias tags in registration order, pointing into `entries`.
    aliases: Vec<(Tag, usize)>,
    /// Every primary and alias tag.
    index: HashMap<Tag, usize>,
    default_handler: Option<CommandRef>,
    main: Option<UnitRef>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Command answering to `name` under the namespace of `kind`.
    pub fn resolve(&self, kind: TokenKind, name: &str) -> Option<CommandRef> {
        let tag = Tag::new(kind, name);
        self.index
            .get(&tag)
            .map(|&entry| Rc::clone(&self.entries[entry].1))
    }

    /// Handler for tokens no command claims.
    pub fn default_handler(&self) -> Option<CommandRef> {
        self.default_handler.clone()
    }

    pub fn main_unit(&self) -> Option<UnitRef> {
        self.main.clone()
    }

    /// All registered commands in registration order, with their aliases.
    pub fn list_commands(&self) -> Vec<CommandListing<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(entry, (tag, command))| CommandListing {
                tag,
                aliases: self
                    .aliases
                    .iter()
                    .filter(|(_, target)| *target == entry)
                    .map(|(alias, _)| alias)
                    .collect(),
                command,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects registrations; wiring mistakes surface from [`RegistryBuilder::build`].
#[derive(Default)]
pub struct RegistryBuilder {
    commands: Vec<(Tag, CommandRef)>,
    aliases: Vec<(Tag, Tag)>,
    default_handler: Option<CommandRef>,
    main: Option<UnitRef>,
}

impl RegistryBuilder {
    pub fn command(self, tag: Tag, command: impl Command + 'static) -> Self {
        self.command_ref(tag, Rc::new(command))
    }

    /// Register an already shared command.
    pub fn command_ref(mut self, tag: Tag, command: CommandRef) -> Self {
        self.commands.push((tag, command));
        self
    }

    /// Make `alias` answer with the command registered under `target`.
    pub fn alias(mut self, alias: Tag, target: Tag) -> Self {
        self.aliases.push((alias, target));
        self
    }

    pub fn default_handler(mut self, command: impl Command + 'static) -> Self {
        self.default_handler = Some(Rc::new(command));
        self
    }

    pub fn main(mut self, unit: UnitRef) -> Self {
        self.main = Some(unit);
        self
    }

    pub fn build(self) -> RegistryResult<Registry> {
        let mut index = HashMap::new();
        let mut entries = Vec::with_capacity(self.commands.len());

        for (tag, command) in self.commands {
            if tag.name().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if index.insert(tag.clone(), entries.len()).is_some() {
                return Err(RegistryError::DuplicateTag(tag.to_string()));
            }
            entries.push((tag, command));
        }

        let mut aliases = Vec::with_capacity(self.aliases.len());
        for (alias, target) in self.aliases {
            if alias.name().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            let entry = match entries.iter().position(|(tag, _)| *tag == target) {
                Some(entry) => entry,
                None => {
                    return Err(RegistryError::UnknownAliasTarget {
                        alias: alias.to_string(),
                        target: target.to_string(),
                    })
                }
            };
            if index.insert(alias.clone(), entry).is_some() {
                return Err(RegistryError::DuplicateTag(alias.to_string()));
            }
            aliases.push((alias, entry));
        }

        debug!(
            commands = entries.len(),
            aliases = aliases.len(),
            default_handler = self.default_handler.is_some(),
            main = self.main.is_some(),
            "registry built"
        );
        Ok(Registry {
            entries,
            aliases,
            index,
            default_handler: self.default_handler,
            main: self.main,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::command::{ArgCursor, CommandResult, Flow};

    struct Noop(&'static str);

    impl Command for Noop {
        fn process(&self, _args: &mut ArgCursor<'_>, _registry: &Registry) -> CommandResult {
            Ok(Flow::Continue)
        }

        fn summary(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn given_tags_when_displayed_then_prefixed_by_kind() {
        assert_eq!(Tag::command("help").to_string(), "--help");
        assert_eq!(Tag::switch("h").to_string(), "-h");
    }

    #[test]
    fn given_alias_when_resolving_then_returns_target_command() {
        let registry = Registry::builder()
            .command(Tag::command("help"), Noop("help"))
            .alias(Tag::switch("h"), Tag::command("help"))
            .build()
            .unwrap();

        let command = registry.resolve(TokenKind::Switch, "h").unwrap();
        assert_eq!(command.summary(), "help");
        assert!(registry.resolve(TokenKind::Command, "h").is_none());
        assert!(registry.resolve(TokenKind::Switch, "help").is_none());
    }

    #[test]
    fn given_registrations_when_listing_then_keeps_order_and_aliases() {
        let registry = Registry::builder()
            .command(Tag::command("verbose"), Noop("verbose"))
            .command(Tag::command("help"), Noop("help"))
            .alias(Tag::switch("h"), Tag::command("help"))
            .alias(Tag::switch("?"), Tag::command("help"))
            .build()
            .unwrap();

        let listing = registry.list_commands();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].tag.to_string(), "--verbose");
        assert!(listing[0].aliases.is_empty());
        assert_eq!(listing[1].tag.to_string(), "--help");
        let aliases: Vec<String> = listing[1].aliases.iter().map(|a| a.to_string()).collect();
        assert_eq!(aliases, vec!["-h", "-?"]);
    }

    #[test]
    fn given_duplicate_tag_when_building_then_rejected() {
        let result = Registry::builder()
            .command(Tag::command("help"), Noop("a"))
            .command(Tag::command("help"), Noop("b"))
            .build();
        assert!(matches!(result, Err(RegistryError::DuplicateTag(tag)) if tag == "--help"));
    }

    #[test]
    fn given_alias_to_unknown_target_when_building_then_rejected() {
        let result = Registry::builder()
            .alias(Tag::switch("h"), Tag::command("help"))
            .build();
        assert!(matches!(result, Err(RegistryError::UnknownAliasTarget { .. })));
    }

    #[test]
    fn given_empty_registry_when_queried_then_nothing_found() {
        let registry = Registry::builder().build().unwrap();
        assert!(registry.is_empty());
        assert!(registry.default_handler().is_none());
        assert!(registry.main_unit().is_none());
        assert!(registry.resolve(TokenKind::Command, "help").is_none());
    }
}
