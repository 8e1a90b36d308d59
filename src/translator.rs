//! PAN filter → KQL translation pipeline
//!
//! A query is rewritten by six stages over a single text buffer. There is no
//! parse tree: each stage matches the syntactic shapes left behind by the
//! stages before it, so the order in [`Stage::PIPELINE`] is part of the
//! contract.
//!
//! ```text
//! time range → field mapping → address expansion → quoting → domain literals → CIDR
//! ```
//!
//! # Examples
//!
//! ```text
//! addr eq 10.0.0.1            SourceIP == '10.0.0.1' or DestinationIP == '10.0.0.1'
//! port.dst eq '443'           DestinationPort == 443
//! user.src eq 'CONTOSO\jdoe'  SourceUserName == @'CONTOSO\jdoe'
//! ```

mod address;
mod cidr;
pub mod error;
mod literal;
pub mod mapping;
mod quoting;
mod rewrite;
mod time_range;

use crate::config::{ConfigError, TranslatorConfig};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

pub use error::{FormatError, TIME_FILTER_USAGE};
pub use mapping::{MappingError, MappingRule, MappingTable, default_rules};
pub use time_range::{TIME_FIELDS, to_utc};

/// Timezone PAN timestamps are read in unless configured otherwise
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// One rewrite stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// `time_generated`/`receive_time` predicates → `TimeGenerated` in UTC
    TimeRange,
    /// Table-driven field name and operator substitution
    FieldMapping,
    /// `addr ==`/`!=` → source-or-destination form
    AddressExpansion,
    /// Quote bare values, unquote ports, collapse doubled quotes
    QuoteNormalization,
    /// `'DOMAIN\user'` → `@'DOMAIN\user'`
    DomainLiteral,
    /// CIDR comparisons → `ipv4_is_match`
    Cidr,
}

impl Stage {
    /// Execution order. Later stages depend on shapes earlier ones produce.
    pub const PIPELINE: [Stage; 6] = [
        Stage::TimeRange,
        Stage::FieldMapping,
        Stage::AddressExpansion,
        Stage::QuoteNormalization,
        Stage::DomainLiteral,
        Stage::Cidr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::TimeRange => "time-range",
            Stage::FieldMapping => "field-mapping",
            Stage::AddressExpansion => "address-expansion",
            Stage::QuoteNormalization => "quote-normalization",
            Stage::DomainLiteral => "domain-literal",
            Stage::Cidr => "cidr",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Buffer contents before and after one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageStep {
    pub stage: Stage,
    pub before: String,
    pub after: String,
}

impl StageStep {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// A completed translation with the per-stage history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub input: String,
    pub output: String,
    pub steps: Vec<StageStep>,
}

/// Translates PAN filters into KQL using a fixed timezone and mapping table
#[derive(Debug, Clone)]
pub struct Translator {
    timezone: Tz,
    mappings: MappingTable,
}

impl Default for Translator {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            mappings: MappingTable::default(),
        }
    }
}

impl Translator {
    pub fn new(config: &TranslatorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            timezone: config.parse_timezone()?,
            mappings: config.mapping_table()?,
        })
    }

    pub fn with_parts(timezone: Tz, mappings: MappingTable) -> Self {
        Self { timezone, mappings }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn mappings(&self) -> &MappingTable {
        &self.mappings
    }

    fn run_stage(&self, stage: Stage, buffer: &str) -> Result<String, FormatError> {
        match stage {
            Stage::TimeRange => time_range::translate_time_range(buffer, self.timezone),
            Stage::FieldMapping => Ok(self.mappings.apply(buffer)),
            Stage::AddressExpansion => Ok(address::expand_address(buffer)),
            Stage::QuoteNormalization => Ok(quoting::normalize_quotes(buffer)),
            Stage::DomainLiteral => Ok(literal::escape_domain_literals(buffer)),
            Stage::Cidr => Ok(cidr::rewrite_cidr(buffer)),
        }
    }

    /// Translate `query`, recording the buffer around every stage.
    ///
    /// A failing stage aborts the whole pipeline; no partial output is returned.
    pub fn explain(&self, query: &str) -> Result<Translation, FormatError> {
        let mut buffer = query.to_string();
        let mut steps = Vec::with_capacity(Stage::PIPELINE.len());

        for stage in Stage::PIPELINE {
            let after = self.run_stage(stage, &buffer).inspect_err(|e| {
                debug!(%stage, error = %e, "translation aborted");
            })?;

            if after != buffer {
                debug!(%stage, "stage rewrote query");
                trace!(%stage, before = %buffer, after = %after);
            }

            steps.push(StageStep {
                stage,
                before: std::mem::replace(&mut buffer, after.clone()),
                after,
            });
        }

        Ok(Translation {
            input: query.to_string(),
            output: buffer,
            steps,
        })
    }

    pub fn translate(&self, query: &str) -> Result<String, FormatError> {
        self.explain(query).map(|translation| translation.output)
    }
}

/// Translate with the default timezone and mapping table
pub fn translate(query: &str) -> Result<String, FormatError> {
    Translator::default().translate(query)
}
