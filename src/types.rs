use clap::ValueEnum;
use serde::Deserialize;

/// Behaviour when a change arrives while a compile is already in flight.
///
/// - `Queue`: remember that another compile is needed and start it as soon
///   as the current one finishes. Any number of changes during one compile
///   collapse into a single follow-up run (default behaviour).
/// - `Ignore`: drop the change; only changes seen while armed start a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    #[default]
    Queue,
    Ignore,
}

/// Named pipeline presets, one per historical build setup.
///
/// | Variant | bulk import | fingerprint | source maps |
/// |---------|-------------|-------------|-------------|
/// | A       | yes         | no          | no          |
/// | B       | yes         | yes         | no          |
/// | C       | no          | no          | yes         |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    A,
    B,
    C,
}

impl Variant {
    pub fn flags(self) -> PipelineFlags {
        match self {
            Variant::A => PipelineFlags {
                bulk_import: true,
                fingerprint: false,
                source_maps: false,
            },
            Variant::B => PipelineFlags {
                bulk_import: true,
                fingerprint: true,
                source_maps: false,
            },
            Variant::C => PipelineFlags {
                bulk_import: false,
                fingerprint: false,
                source_maps: true,
            },
        }
    }
}

/// Which optional stages the compile pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineFlags {
    pub bulk_import: bool,
    pub fingerprint: bool,
    pub source_maps: bool,
}

impl Default for PipelineFlags {
    fn default() -> Self {
        Variant::default().flags()
    }
}

/// CSS output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

impl From<OutputStyle> for grass::OutputStyle {
    fn from(style: OutputStyle) -> Self {
        match style {
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
        }
    }
}
