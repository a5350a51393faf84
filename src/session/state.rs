use serde::Serialize;
use utoipa::ToSchema;

use super::panel::{ai_panel, list_message, AiPanel, AiPanelInputs};
use crate::ai::GeminiClient;
use crate::catalog::{Satellite, TleData};
use crate::orbit::OrbitalData;

/// Mutable session data. Only ever touched under the session mutex.
#[derive(Default)]
pub(super) struct SessionState {
    pub search_term: String,
    pub satellites: Vec<Satellite>,
    pub selected: Option<Satellite>,
    pub tle: Option<TleData>,
    pub loading_satellites: bool,
    pub loading_tle: bool,
    pub error: Option<String>,

    pub api_key: String,
    pub ai_client: Option<GeminiClient>,
    pub ai_enabled: bool,
    pub ai_description: Option<String>,
    pub loading_ai: bool,
    pub ai_error: Option<String>,

    // Request tickets. A background result is applied only if its ticket is
    // still the latest one for that kind of request.
    pub search_seq: u64,
    pub tle_seq: u64,
    pub ai_seq: u64,
}

impl SessionState {
    pub fn api_key_provided(&self) -> bool {
        self.ai_client.is_some()
    }

    pub fn snapshot(&self, min_query_len: usize, orbital_data: Option<OrbitalData>) -> Snapshot {
        let ai = ai_panel(AiPanelInputs {
            error: self.ai_error.as_deref(),
            api_key_provided: self.api_key_provided(),
            enabled: self.ai_enabled,
            loading: self.loading_ai,
            description: self.ai_description.as_deref(),
            has_tle: self.tle.is_some(),
        });

        Snapshot {
            search_term: self.search_term.clone(),
            satellites: self.satellites.clone(),
            list_message: list_message(
                &self.search_term,
                min_query_len,
                self.satellites.len(),
                self.loading_satellites,
            )
            .map(str::to_string),
            selected: self.selected.clone(),
            tle: self.tle.clone(),
            loading_satellites: self.loading_satellites,
            loading_tle: self.loading_tle,
            error: self.error.clone(),
            api_key_provided: self.api_key_provided(),
            ai_enabled: self.ai_enabled,
            ai,
            orbital_data,
        }
    }
}

/// Read-only view of the session, as served by `GET /api/state`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Snapshot {
    pub search_term: String,
    pub satellites: Vec<Satellite>,
    /// Placeholder for an empty result list.
    pub list_message: Option<String>,
    pub selected: Option<Satellite>,
    pub tle: Option<TleData>,
    pub loading_satellites: bool,
    pub loading_tle: bool,
    pub error: Option<String>,
    pub api_key_provided: bool,
    pub ai_enabled: bool,
    pub ai: AiPanel,
    pub orbital_data: Option<OrbitalData>,
}
