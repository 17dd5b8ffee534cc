use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the leave/ready/unready reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdRequest {
    pub player_id: String,
}

/// Body of the game started report. The start time is relayed untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub start_time: Value,
}
