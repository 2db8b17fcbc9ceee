//! Routine tools: saved action templates that can be applied to the bots
//! of a target exchange via `/routines`.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::{get_json, patch_json, post_json, ApiError, Gateway};
use crate::models::{Routine, RoutineAction, RoutineParameters, RunRoutineResponse};

use super::format::opt_text;
use super::validate::{
    require_exposure, require_non_empty, require_non_negative, require_one_of, require_positive,
    require_uuid, BOT_MODES, GRID_MODES,
};

#[derive(Debug, Clone, Deserialize)]
pub struct GetRoutineParams {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoutineParams {
    pub user_id: i64,
    pub name: String,
    pub grid_mode: String,
    pub grid_id: i64,
    pub lm: String,
    pub lwe: f64,
    pub sm: String,
    pub swe: f64,
}

impl CreateRoutineParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.user_id, "user_id")?;
        require_non_empty(&self.name, "name")?;
        require_one_of(&self.grid_mode, GRID_MODES, "grid_mode")?;
        require_non_negative(self.grid_id, "grid_id")?;
        require_one_of(&self.lm, BOT_MODES, "lm")?;
        require_exposure(self.lwe, "lwe")?;
        require_one_of(&self.sm, BOT_MODES, "sm")?;
        require_exposure(self.swe, "swe")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoutineParams {
    pub id: String,
    pub name: Option<String>,
    pub grid_mode: Option<String>,
    pub grid_id: Option<i64>,
    pub lm: Option<String>,
    pub lwe: Option<f64>,
    pub sm: Option<String>,
    pub swe: Option<f64>,
}

impl UpdateRoutineParams {
    pub fn validate(&self) -> Result<(), String> {
        require_uuid(&self.id, "id")?;
        if let Some(ref name) = self.name {
            require_non_empty(name, "name")?;
        }
        if let Some(ref grid_mode) = self.grid_mode {
            require_one_of(grid_mode, GRID_MODES, "grid_mode")?;
        }
        if let Some(grid_id) = self.grid_id {
            require_non_negative(grid_id, "grid_id")?;
        }
        if let Some(ref lm) = self.lm {
            require_one_of(lm, BOT_MODES, "lm")?;
        }
        if let Some(lwe) = self.lwe {
            require_exposure(lwe, "lwe")?;
        }
        if let Some(ref sm) = self.sm {
            require_one_of(sm, BOT_MODES, "sm")?;
        }
        if let Some(swe) = self.swe {
            require_exposure(swe, "swe")?;
        }
        Ok(())
    }

    /// Sparse body: `name` and an `action` object holding only the action
    /// fields that were actually provided; `action` is omitted entirely
    /// when none were.
    fn build_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(ref name) = self.name {
            body.insert("name".to_string(), json!(name));
        }
        let mut action = Map::new();
        if let Some(ref grid_mode) = self.grid_mode {
            action.insert("grid_mode".to_string(), json!(grid_mode));
        }
        if let Some(grid_id) = self.grid_id {
            action.insert("grid_id".to_string(), json!(grid_id));
        }
        if let Some(ref lm) = self.lm {
            action.insert("lm".to_string(), json!(lm));
        }
        if let Some(lwe) = self.lwe {
            action.insert("lwe".to_string(), json!(lwe));
        }
        if let Some(ref sm) = self.sm {
            action.insert("sm".to_string(), json!(sm));
        }
        if let Some(swe) = self.swe {
            action.insert("swe".to_string(), json!(swe));
        }
        if !action.is_empty() {
            body.insert("action".to_string(), Value::Object(action));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunRoutineParams {
    pub id: String,
    pub exchange_id: i64,
}

impl RunRoutineParams {
    pub fn validate(&self) -> Result<(), String> {
        require_uuid(&self.id, "id")?;
        require_positive(self.exchange_id, "exchange_id")
    }
}

pub async fn get_routine_parameters(gateway: &dyn Gateway) -> Result<String, ApiError> {
    match get_json::<RoutineParameters>(gateway, "/routine-parameters").await {
        Ok(params) => Ok(render_parameters(&params)),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching routine parameters: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn list_routines(gateway: &dyn Gateway) -> Result<String, ApiError> {
    match get_json::<Vec<Routine>>(gateway, "/routines").await {
        Ok(routines) => {
            let mut out = format!("Found {} routines:\n", routines.len());
            for routine in &routines {
                out.push('\n');
                out.push_str(&render_routine(routine));
            }
            Ok(out)
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error listing routines: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn get_routine(
    gateway: &dyn Gateway,
    params: GetRoutineParams,
) -> Result<String, ApiError> {
    if let Err(msg) = require_uuid(&params.id, "id") {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<Routine>(gateway, &format!("/routines/{}", params.id)).await {
        Ok(routine) => Ok(render_routine(&routine)),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Routine with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching routine: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn create_routine(
    gateway: &dyn Gateway,
    params: CreateRoutineParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let body = json!({
        "user_id": params.user_id,
        "name": params.name,
        "action": {
            "grid_mode": params.grid_mode,
            "grid_id": params.grid_id,
            "lm": params.lm,
            "lwe": params.lwe,
            "sm": params.sm,
            "swe": params.swe,
        },
    });
    match post_json::<Routine>(gateway, "/routines", Some(body)).await {
        Ok(routine) => Ok(format!(
            "Routine created successfully\n  ID: {}\n  Name: {}\n  User: {}\n  Action: {}",
            routine.id,
            routine.name,
            routine.user_id,
            render_action(&routine.action)
        )),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error creating routine: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn update_routine(
    gateway: &dyn Gateway,
    params: UpdateRoutineParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let body = params.build_body();
    match patch_json::<Routine>(gateway, &format!("/routines/{}", params.id), body).await {
        Ok(routine) => Ok(format!(
            "Routine {} updated.\n  Name: {}\n  Action: {}",
            routine.id,
            routine.name,
            render_action(&routine.action)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Routine with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error updating routine: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn run_routine(
    gateway: &dyn Gateway,
    params: RunRoutineParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let body = json!({ "exchange_id": params.exchange_id });
    match post_json::<RunRoutineResponse>(
        gateway,
        &format!("/routines/{}/run", params.id),
        Some(body),
    )
    .await
    {
        Ok(result) => Ok(format!(
            "{}\n  Triggered at: {}\n  Triggered by: {}",
            result.message,
            opt_text(&result.triggered_at),
            opt_text(&result.triggered_by)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Routine with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error running routine: {}", e)),
        Err(e) => Err(e),
    }
}

fn render_action(action: &RoutineAction) -> String {
    format!(
        "grid_mode={}, grid_id={}, lm={}, lwe={}, sm={}, swe={}",
        action.grid_mode, action.grid_id, action.lm, action.lwe, action.sm, action.swe
    )
}

fn render_routine(routine: &Routine) -> String {
    format!(
        "Routine {}: {}\n  User: {} | Type: {}\n  Action: {}\n  Last triggered: {} by {}\n  Created: {}",
        routine.id,
        routine.name,
        routine.user_id,
        opt_text(&routine.routine_type),
        render_action(&routine.action),
        opt_text(&routine.triggered_at),
        opt_text(&routine.triggered_by),
        opt_text(&routine.created_at)
    )
}

fn render_parameters(params: &RoutineParameters) -> String {
    let mut out = String::from("Routine parameters:");
    out.push_str(&format!(
        "\n  Grid modes: {}",
        params.grid_modes.join(", ")
    ));
    out.push_str("\n  Bot modes:");
    for mode in &params.bot_modes {
        out.push_str(&format!("\n    {} = {}", mode.code, mode.label));
    }
    out.push_str("\n  Grids:");
    for grid in &params.grids {
        out.push_str(&format!("\n    - #{} {}", grid.id, grid.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubGateway;
    use reqwest::Method;

    const ROUTINE_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn sample_routine() -> Value {
        json!({
            "id": ROUTINE_ID,
            "user_id": 7,
            "name": "Trend Flip",
            "type": "manual",
            "action": {
                "grid_mode": "static", "grid_id": 0,
                "lm": "n", "lwe": 2.0, "sm": "n", "swe": 2.0
            },
            "triggered_at": null,
            "triggered_by": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_create_routine_nests_action() {
        let stub = StubGateway::returning(sample_routine());
        let text = create_routine(
            &stub,
            CreateRoutineParams {
                user_id: 7,
                name: "Trend Flip".to_string(),
                grid_mode: "static".to_string(),
                grid_id: 0,
                lm: "n".to_string(),
                lwe: 2.0,
                sm: "n".to_string(),
                swe: 2.0,
            },
        )
        .await
        .unwrap();

        assert!(text.starts_with("Routine created successfully"));
        assert!(text.contains("Name: Trend Flip"));
        assert!(text.contains("User: 7"));
        assert!(text.contains("Action: grid_mode=static, grid_id=0, lm=n, lwe=2, sm=n, swe=2"));

        let call = &stub.calls()[0];
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.endpoint, "/routines");
        let body = call.body.as_ref().unwrap();
        assert_eq!(body["user_id"], 7);
        assert_eq!(body["name"], "Trend Flip");
        assert_eq!(body["action"]["grid_mode"], "static");
        assert_eq!(body["action"]["lwe"], 2.0);
    }

    #[tokio::test]
    async fn test_create_routine_rejects_bad_mode_without_network() {
        let stub = StubGateway::default();
        let text = create_routine(
            &stub,
            CreateRoutineParams {
                user_id: 7,
                name: "x".to_string(),
                grid_mode: "static".to_string(),
                grid_id: 0,
                lm: "zz".to_string(),
                lwe: 2.0,
                sm: "n".to_string(),
                swe: 2.0,
            },
        )
        .await
        .unwrap();
        assert_eq!(text, "Error: lm must be one of: n, m, gs, t, p");
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_routine_sends_sparse_action() {
        let stub = StubGateway::returning(sample_routine());
        let text = update_routine(
            &stub,
            UpdateRoutineParams {
                id: ROUTINE_ID.to_string(),
                name: None,
                grid_mode: None,
                grid_id: None,
                lm: Some("gs".to_string()),
                lwe: None,
                sm: None,
                swe: Some(0.5),
            },
        )
        .await
        .unwrap();
        assert!(text.contains("updated."));

        let body = stub.calls()[0].body.as_ref().unwrap().as_object().unwrap().clone();
        assert!(!body.contains_key("name"));
        let action = body["action"].as_object().unwrap();
        assert_eq!(action.len(), 2);
        assert_eq!(action["lm"], "gs");
        assert_eq!(action["swe"], 0.5);
    }

    #[tokio::test]
    async fn test_update_routine_omits_action_when_only_name() {
        let stub = StubGateway::returning(sample_routine());
        update_routine(
            &stub,
            UpdateRoutineParams {
                id: ROUTINE_ID.to_string(),
                name: Some("Renamed".to_string()),
                grid_mode: None,
                grid_id: None,
                lm: None,
                lwe: None,
                sm: None,
                swe: None,
            },
        )
        .await
        .unwrap();

        let body = stub.calls()[0].body.as_ref().unwrap().as_object().unwrap().clone();
        assert_eq!(body.len(), 1);
        assert_eq!(body["name"], "Renamed");
    }

    #[tokio::test]
    async fn test_run_routine_includes_exchange_id() {
        let stub = StubGateway::returning(json!({
            "message": "Routine Trend Flip applied to 3 bots",
            "triggered_at": "2024-05-01T10:00:00Z",
            "triggered_by": "alice"
        }));
        let text = run_routine(
            &stub,
            RunRoutineParams {
                id: ROUTINE_ID.to_string(),
                exchange_id: 3,
            },
        )
        .await
        .unwrap();
        assert!(text.starts_with("Routine Trend Flip applied to 3 bots"));
        assert!(text.contains("Triggered at: 2024-05-01T10:00:00Z"));
        assert!(text.contains("Triggered by: alice"));

        let call = &stub.calls()[0];
        assert_eq!(call.endpoint, format!("/routines/{}/run", ROUTINE_ID));
        assert_eq!(call.body.as_ref().unwrap()["exchange_id"], 3);
    }

    #[tokio::test]
    async fn test_get_routine_rejects_malformed_uuid() {
        let stub = StubGateway::default();
        let text = get_routine(
            &stub,
            GetRoutineParams {
                id: "123".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(text, "Error: id must be a valid UUID");
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_routine_404() {
        let stub = StubGateway::failing(ApiError::http(404, "Not Found", ""));
        let text = get_routine(
            &stub,
            GetRoutineParams {
                id: ROUTINE_ID.to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            text,
            format!("Routine with ID {} not found.", ROUTINE_ID)
        );
    }

    #[tokio::test]
    async fn test_parameters_rendering() {
        let stub = StubGateway::returning(json!({
            "grid_modes": ["recursive", "neat", "static", "clock", "custom"],
            "bot_modes": [
                {"code": "n", "label": "Normal"},
                {"code": "gs", "label": "Graceful Stop"}
            ],
            "grids": [{"id": 1, "name": "Main grid"}]
        }));
        let text = get_routine_parameters(&stub).await.unwrap();
        assert!(text.contains("Grid modes: recursive, neat, static, clock, custom"));
        assert!(text.contains("gs = Graceful Stop"));
        assert!(text.contains("- #1 Main grid"));
    }
}
