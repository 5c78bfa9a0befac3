use thiserror::Error;

use crate::components::{TribeId, VillagerId};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u64 },

    #[error("villager {villager:?} references unknown tribe {tribe:?}")]
    UnknownTribe { villager: VillagerId, tribe: TribeId },

    #[error("invariant violated after tick {tick}: {detail}")]
    InvariantViolated { tick: u64, detail: String },

    #[error("system '{system}' failed: {source}")]
    System {
        system: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("snapshot io error: {0}")]
    Snapshot(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type SimResult<T> = std::result::Result<T, SimError>;
