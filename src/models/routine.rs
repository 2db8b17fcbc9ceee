use serde::{Deserialize, Serialize};

/// Saved configuration template that applies its action to the bots of a
/// target exchange when run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routine {
    /// UUID string assigned by the backend.
    pub id: String,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub routine_type: Option<String>,
    pub action: RoutineAction,
    pub triggered_at: Option<String>,
    pub triggered_by: Option<String>,
    pub created_at: Option<String>,
}

/// The change a routine applies when triggered.
///
/// `lm`/`sm` are the per-side mode codes (n, m, gs, t, p); `lwe`/`swe` the
/// wallet exposures, bounded [0, 11] server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineAction {
    pub grid_mode: String,
    pub grid_id: i64,
    pub lm: String,
    pub lwe: f64,
    pub sm: String,
    pub swe: f64,
}

/// Response of `POST /routines/{id}/run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRoutineResponse {
    pub message: String,
    pub triggered_at: Option<String>,
    pub triggered_by: Option<String>,
}
