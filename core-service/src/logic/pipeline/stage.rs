//! Per-request pipeline stages
//!
//! `Collecting → Assembling → Validating → {Invoking → Done} | Rejected`.
//! No state survives between requests.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Collecting,
    Assembling,
    Validating,
    Invoking,
    Done,
    Rejected,
}

impl PipelineStage {
    /// Legal successor of this stage on the success path
    pub fn next(self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Collecting => Some(PipelineStage::Assembling),
            PipelineStage::Assembling => Some(PipelineStage::Validating),
            PipelineStage::Validating => Some(PipelineStage::Invoking),
            PipelineStage::Invoking => Some(PipelineStage::Done),
            PipelineStage::Done | PipelineStage::Rejected => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Rejected)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Collecting => "collecting",
            PipelineStage::Assembling => "assembling",
            PipelineStage::Validating => "validating",
            PipelineStage::Invoking => "invoking",
            PipelineStage::Done => "done",
            PipelineStage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
