//! Demo application: greets the names given on the command line

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use launchkit::application::command::{is_flag, ArgCursor, Command, CommandResult, Flow};
use launchkit::application::commands::{
    ConfigCommand, HelpCommand, StatusMapCommand, VerboseCommand, VersionCommand,
};
use launchkit::application::CommandError;
use launchkit::cli::output;
use launchkit::config::ConfigurableUnit;
use launchkit::domain::{AbsorbError, LocalStatus, RunResult, StatusWidth, Unit, UnitError, UnitRef};
use launchkit::infrastructure::{LogLevels, RegistryError};
use launchkit::{local_status, Registry, Tag};

pub const APP: &str = env!("CARGO_PKG_NAME");

local_status! {
    pub enum HelloStatus {
        Ok,
        SettingsUnreadable,
    }
}

local_status! {
    pub enum AudienceStatus {
        Ok,
        DuplicateName,
    }
}

/// `greeting` and `punctuation`, from the config file or `LAUNCHKIT_*`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HelloSettings {
    pub greeting: String,
    pub punctuation: String,
}

impl Default for HelloSettings {
    fn default() -> Self {
        Self {
            greeting: "Hello".to_string(),
            punctuation: "!".to_string(),
        }
    }
}

/// Names collected from the command line.
#[derive(Debug, Default)]
pub struct Audience {
    names: Vec<String>,
    status: Option<AudienceStatus>,
}

impl Audience {
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Unit for Audience {
    fn run(&mut self) -> RunResult {
        Ok(())
    }

    fn local_status(&self) -> Option<u32> {
        self.status.map(LocalStatus::ordinal)
    }

    fn status_width(&self) -> StatusWidth {
        AudienceStatus::width()
    }

    fn absorb(&mut self, error: &UnitError) -> Result<(), AbsorbError> {
        debug!(error = %error, "recording audience error");
        self.status = Some(AudienceStatus::DuplicateName);
        Ok(())
    }
}

/// Main unit: prints one greeting per audience member.
pub struct Hello {
    config_file: Option<PathBuf>,
    audience: Rc<RefCell<Audience>>,
    dependencies: Vec<UnitRef>,
    status: Option<HelloStatus>,
}

impl Hello {
    pub fn new(audience: Rc<RefCell<Audience>>) -> Self {
        let dependency: UnitRef = audience.clone();
        Self {
            config_file: None,
            audience,
            dependencies: vec![dependency],
            status: None,
        }
    }
}

impl Unit for Hello {
    #[instrument(level = "debug", skip(self))]
    fn run(&mut self) -> RunResult {
        let settings = match self.load_settings(APP) {
            Ok(settings) => settings,
            Err(err) => {
                output::error(&err);
                self.status = Some(HelloStatus::SettingsUnreadable);
                return Ok(());
            }
        };
        let HelloSettings {
            greeting,
            punctuation,
        } = settings.extract::<HelloSettings>()?;

        let audience = self.audience.borrow();
        let world = ["world".to_string()];
        let names = if audience.names().is_empty() {
            &world[..]
        } else {
            audience.names()
        };
        for name in names {
            output::info(&format!("{greeting}, {name}{punctuation}"));
        }
        info!(count = names.len(), "greetings sent");
        self.status = Some(HelloStatus::Ok);
        Ok(())
    }

    fn local_status(&self) -> Option<u32> {
        self.status.map(LocalStatus::ordinal)
    }

    fn status_width(&self) -> StatusWidth {
        HelloStatus::width()
    }

    fn dependencies(&self) -> &[UnitRef] {
        &self.dependencies
    }
}

impl ConfigurableUnit for Hello {
    fn set_config_file(&mut self, path: PathBuf) {
        self.config_file = Some(path);
    }

    fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}

/// Default handler: every plain argument is a name to greet.
pub struct NamesCommand {
    audience: Rc<RefCell<Audience>>,
}

impl NamesCommand {
    pub fn new(audience: Rc<RefCell<Audience>>) -> Self {
        Self { audience }
    }

    fn add(&self, name: &str) -> Result<(), CommandError> {
        let mut audience = self.audience.borrow_mut();
        if audience.names.iter().any(|known| known == name) {
            let unit: UnitRef = self.audience.clone();
            return Err(UnitError::new(unit, format!("{name} is already greeted")).into());
        }
        audience.names.push(name.to_string());
        Ok(())
    }
}

impl Command for NamesCommand {
    fn process(&self, args: &mut ArgCursor<'_>, _registry: &Registry) -> CommandResult {
        let token = args
            .next()
            .ok_or_else(|| CommandError::Failed("no argument to handle".to_string()))?;
        if is_flag(token) {
            return Err(CommandError::invalid("names", "argument", token, "unknown option"));
        }
        self.add(token)?;
        while let Some(name) = args.fetch_argument() {
            self.add(name)?;
        }
        Ok(Flow::Continue)
    }

    fn arg_spec(&self) -> Option<&str> {
        Some("name ...")
    }

    fn summary(&self) -> &str {
        "Names to greet, each at most once. Without names the world is greeted."
    }
}

/// Wire the demo's units and commands.
pub fn registry(levels: Rc<dyn LogLevels>) -> Result<Registry, RegistryError> {
    let audience = Rc::new(RefCell::new(Audience::default()));
    let hello = Rc::new(RefCell::new(Hello::new(Rc::clone(&audience))));
    let main: UnitRef = hello.clone();

    Registry::builder()
        .main(main.clone())
        .command(Tag::command("help"), HelpCommand::new(APP))
        .alias(Tag::switch("h"), Tag::command("help"))
        .command(Tag::command("verbose"), VerboseCommand::new(main.clone(), levels))
        .alias(Tag::switch("v"), Tag::command("verbose"))
        .command(Tag::command("config"), ConfigCommand::new(hello))
        .command(
            Tag::command("version"),
            VersionCommand::new(APP, env!("CARGO_PKG_VERSION")),
        )
        .command(Tag::command("status-map"), StatusMapCommand::new(main))
        .default_handler(NamesCommand::new(audience))
        .build()
}
