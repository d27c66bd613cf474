//! Pipeline step vocabulary
//!
//! `StepType` is the closed set of node values every workflow graph is
//! built from. It serializes as the SCREAMING_SNAKE_CASE constant name; the
//! camelCase label is what the pipelines themselves log and report.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// One stage of the ingestion or validator pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepType {
    /// Generic conversion used when the client does not know the endpoint type
    ToVerbatim,
    DwcaToVerbatim,
    XmlToVerbatim,
    AbcdToVerbatim,
    VerbatimToIdentifier,
    VerbatimToInterpreted,
    InterpretedToIndex,
    HdfsView,
    Fragmenter,
    EventsVerbatimToInterpreted,
    EventsInterpretedToIndex,
    EventsHdfsView,
    DataWarehouse,
    // Validator
    ValidatorUploadArchive,
    ValidatorValidateArchive,
    ValidatorDwcaToVerbatim,
    ValidatorXmlToVerbatim,
    ValidatorAbcdToVerbatim,
    ValidatorTabularToVerbatim,
    ValidatorVerbatimToInterpreted,
    ValidatorInterpretedToIndex,
    ValidatorCollectMetrics,
}

impl StepType {
    /// Every step, in declaration order
    pub const ALL: [StepType; 22] = [
        StepType::ToVerbatim,
        StepType::DwcaToVerbatim,
        StepType::XmlToVerbatim,
        StepType::AbcdToVerbatim,
        StepType::VerbatimToIdentifier,
        StepType::VerbatimToInterpreted,
        StepType::InterpretedToIndex,
        StepType::HdfsView,
        StepType::Fragmenter,
        StepType::EventsVerbatimToInterpreted,
        StepType::EventsInterpretedToIndex,
        StepType::EventsHdfsView,
        StepType::DataWarehouse,
        StepType::ValidatorUploadArchive,
        StepType::ValidatorValidateArchive,
        StepType::ValidatorDwcaToVerbatim,
        StepType::ValidatorXmlToVerbatim,
        StepType::ValidatorAbcdToVerbatim,
        StepType::ValidatorTabularToVerbatim,
        StepType::ValidatorVerbatimToInterpreted,
        StepType::ValidatorInterpretedToIndex,
        StepType::ValidatorCollectMetrics,
    ];

    /// Constant name, as serialized
    pub fn name(self) -> &'static str {
        match self {
            StepType::ToVerbatim => "TO_VERBATIM",
            StepType::DwcaToVerbatim => "DWCA_TO_VERBATIM",
            StepType::XmlToVerbatim => "XML_TO_VERBATIM",
            StepType::AbcdToVerbatim => "ABCD_TO_VERBATIM",
            StepType::VerbatimToIdentifier => "VERBATIM_TO_IDENTIFIER",
            StepType::VerbatimToInterpreted => "VERBATIM_TO_INTERPRETED",
            StepType::InterpretedToIndex => "INTERPRETED_TO_INDEX",
            StepType::HdfsView => "HDFS_VIEW",
            StepType::Fragmenter => "FRAGMENTER",
            StepType::EventsVerbatimToInterpreted => "EVENTS_VERBATIM_TO_INTERPRETED",
            StepType::EventsInterpretedToIndex => "EVENTS_INTERPRETED_TO_INDEX",
            StepType::EventsHdfsView => "EVENTS_HDFS_VIEW",
            StepType::DataWarehouse => "DATA_WAREHOUSE",
            StepType::ValidatorUploadArchive => "VALIDATOR_UPLOAD_ARCHIVE",
            StepType::ValidatorValidateArchive => "VALIDATOR_VALIDATE_ARCHIVE",
            StepType::ValidatorDwcaToVerbatim => "VALIDATOR_DWCA_TO_VERBATIM",
            StepType::ValidatorXmlToVerbatim => "VALIDATOR_XML_TO_VERBATIM",
            StepType::ValidatorAbcdToVerbatim => "VALIDATOR_ABCD_TO_VERBATIM",
            StepType::ValidatorTabularToVerbatim => "VALIDATOR_TABULAR_TO_VERBATIM",
            StepType::ValidatorVerbatimToInterpreted => "VALIDATOR_VERBATIM_TO_INTERPRETED",
            StepType::ValidatorInterpretedToIndex => "VALIDATOR_INTERPRETED_TO_INDEX",
            StepType::ValidatorCollectMetrics => "VALIDATOR_COLLECT_METRICS",
        }
    }

    /// camelCase label used by the pipelines
    pub fn label(self) -> &'static str {
        match self {
            StepType::ToVerbatim => "toVerbatim",
            StepType::DwcaToVerbatim => "dwcaToVerbatim",
            StepType::XmlToVerbatim => "xmlToVerbatim",
            StepType::AbcdToVerbatim => "abcdToVerbatim",
            StepType::VerbatimToIdentifier => "verbatimToIdentifier",
            StepType::VerbatimToInterpreted => "verbatimToInterpreted",
            StepType::InterpretedToIndex => "interpretedToIndex",
            StepType::HdfsView => "hdfsView",
            StepType::Fragmenter => "fragmenter",
            StepType::EventsVerbatimToInterpreted => "eventsVerbatimToInterpreted",
            StepType::EventsInterpretedToIndex => "eventsInterpretedToIndex",
            StepType::EventsHdfsView => "eventsHdfsView",
            StepType::DataWarehouse => "dataWarehouse",
            StepType::ValidatorUploadArchive => "validatorUploadArchive",
            StepType::ValidatorValidateArchive => "validatorValidateArchive",
            StepType::ValidatorDwcaToVerbatim => "validatorDwcaToVerbatim",
            StepType::ValidatorXmlToVerbatim => "validatorXmlToVerbatim",
            StepType::ValidatorAbcdToVerbatim => "validatorAbcdToVerbatim",
            StepType::ValidatorTabularToVerbatim => "validatorTabularToVerbatim",
            StepType::ValidatorVerbatimToInterpreted => "validatorVerbatimToInterpreted",
            StepType::ValidatorInterpretedToIndex => "validatorInterpretedToIndex",
            StepType::ValidatorCollectMetrics => "validatorCollectMetrics",
        }
    }

    pub fn is_validator(self) -> bool {
        matches!(
            self,
            StepType::ValidatorUploadArchive
                | StepType::ValidatorValidateArchive
                | StepType::ValidatorDwcaToVerbatim
                | StepType::ValidatorXmlToVerbatim
                | StepType::ValidatorAbcdToVerbatim
                | StepType::ValidatorTabularToVerbatim
                | StepType::ValidatorVerbatimToInterpreted
                | StepType::ValidatorInterpretedToIndex
                | StepType::ValidatorCollectMetrics
        )
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StepType {
    type Err = WorkflowError;

    /// Accepts `DWCA_TO_VERBATIM` (any case) or the label `dwcaToVerbatim`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        StepType::ALL
            .iter()
            .copied()
            .find(|step| step.label() == s || step.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WorkflowError::UnknownStep {
                value: s.to_string(),
            })
    }
}
