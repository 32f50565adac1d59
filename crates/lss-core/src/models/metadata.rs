//! Run metadata (speedrun.com identity, platform, region, variables)

use crate::codec::unbind;
use crate::schema::{bind_all, unbind_all, FieldSpec, Location, Origins, Presence, Record};

/// Optional run metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    run: Option<MetadataRun>,
    platform: Option<Platform>,
    region: Option<String>,
    variables: Option<Vec<Variable>>,
    origins: Origins,
}

static METADATA_FIELDS: [FieldSpec<Metadata>; 4] = [
    FieldSpec::record(
        "run",
        Location::Element("Run"),
        Presence::Optional,
        |metadata, nested| {
            metadata.run = Some(nested.bind()?);
            Ok(())
        },
        |metadata, emit| metadata.run.as_ref().map(|run| unbind(run, emit)),
    ),
    FieldSpec::record(
        "platform",
        Location::Element("Platform"),
        Presence::Optional,
        |metadata, nested| {
            metadata.platform = Some(nested.bind()?);
            Ok(())
        },
        |metadata, emit| metadata.platform.as_ref().map(|platform| unbind(platform, emit)),
    ),
    FieldSpec::text(
        "region",
        Location::Element("Region"),
        Presence::Optional,
        |metadata| metadata.region.clone(),
        |metadata, value| metadata.region = Some(value),
    ),
    FieldSpec::records(
        "variables",
        Location::Wrapped {
            wrapper: "Variables",
            item: "Variable",
        },
        Presence::Optional,
        |metadata, items| {
            metadata.variables = Some(bind_all(items)?);
            Ok(())
        },
        |metadata, emit| {
            metadata
                .variables
                .as_deref()
                .map(|variables| unbind_all(variables, emit))
        },
    ),
];

impl Record for Metadata {
    const TAG: &'static str = "Metadata";

    fn fields() -> &'static [FieldSpec<Self>] {
        &METADATA_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl Metadata {
    /// The run's identifier on the leaderboard site
    #[must_use]
    pub fn run_id(&self) -> Option<&str> {
        self.run.as_ref().map(|run| run.id.as_str())
    }

    #[must_use]
    pub const fn platform(&self) -> Option<&Platform> {
        self.platform.as_ref()
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Variables in file order; empty when the block is missing
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        self.variables.as_deref().unwrap_or_default()
    }

    /// Look up a variable value by name
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables()
            .iter()
            .find(|variable| variable.name.as_deref() == Some(name))
            .map(Variable::value)
    }
}

/// `<Run id="..."/>` inside the metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRun {
    id: String,
    origins: Origins,
}

static METADATA_RUN_FIELDS: [FieldSpec<MetadataRun>; 1] = [FieldSpec::text(
    "id",
    Location::Attribute("id"),
    Presence::Required,
    |run| Some(run.id.clone()),
    |run, value| run.id = value,
)];

impl Record for MetadataRun {
    const TAG: &'static str = "Run";

    fn fields() -> &'static [FieldSpec<Self>] {
        &METADATA_RUN_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

/// Platform name with its emulator flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    uses_emulator: Option<bool>,
    name: Option<String>,
    origins: Origins,
}

static PLATFORM_FIELDS: [FieldSpec<Platform>; 2] = [
    FieldSpec::flag(
        "uses_emulator",
        Location::Attribute("usesEmulator"),
        |platform| platform.uses_emulator,
        |platform, value| platform.uses_emulator = Some(value),
    ),
    FieldSpec::text(
        "name",
        Location::Text,
        Presence::Optional,
        |platform| platform.name.clone(),
        |platform, value| platform.name = Some(value),
    ),
];

impl Record for Platform {
    const TAG: &'static str = "Platform";

    fn fields() -> &'static [FieldSpec<Self>] {
        &PLATFORM_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl Platform {
    #[must_use]
    pub const fn uses_emulator(&self) -> Option<bool> {
        self.uses_emulator
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A named run variable (`<Variable name="...">value</Variable>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variable {
    name: Option<String>,
    value: Option<String>,
    origins: Origins,
}

static VARIABLE_FIELDS: [FieldSpec<Variable>; 2] = [
    FieldSpec::text(
        "name",
        Location::Attribute("name"),
        Presence::Optional,
        |variable| variable.name.clone(),
        |variable, value| variable.name = Some(value),
    ),
    FieldSpec::text(
        "value",
        Location::Text,
        Presence::Optional,
        |variable| variable.value.clone(),
        |variable, value| variable.value = Some(value),
    ),
];

impl Record for Variable {
    const TAG: &'static str = "Variable";

    fn fields() -> &'static [FieldSpec<Self>] {
        &VARIABLE_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl Variable {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Variable value; empty when the element has no text
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}
