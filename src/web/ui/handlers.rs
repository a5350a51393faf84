use axum::{extract::State, response::IntoResponse};

use crate::catalog::Satellite;
use crate::orbit::OrbitalData;
use crate::web::state::AppState;

use super::templates::{DashboardTemplate, InfoItem, SatelliteRow, TleView};

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session.snapshot();
    let globe_svg = state.session.globe().lock().await.render_svg();
    let selected_id = snapshot.selected.as_ref().map(|s| s.satellite_id);

    let rows = |list: &[Satellite]| -> Vec<SatelliteRow> {
        list.iter()
            .map(|s| SatelliteRow {
                name: s.name.clone(),
                satellite_id: s.satellite_id,
                selected: Some(s.satellite_id) == selected_id,
            })
            .collect()
    };

    DashboardTemplate {
        search_term: snapshot.search_term.clone(),
        recommended: rows(&state.config.catalog.recommended),
        satellites: rows(&snapshot.satellites),
        list_message: snapshot.list_message.clone(),
        loading_satellites: snapshot.loading_satellites,
        loading_tle: snapshot.loading_tle,
        error: snapshot.error.clone(),
        tle: snapshot.tle.as_ref().map(|tle| TleView {
            name: tle.name.clone(),
            satellite_id: tle.satellite_id,
            date: tle.date.clone().unwrap_or_default(),
            line1: tle.line1.clone(),
            line2: tle.line2.clone(),
        }),
        orbital: snapshot.orbital_data.map(info_items).unwrap_or_default(),
        api_key_provided: snapshot.api_key_provided,
        ai_enabled: snapshot.ai_enabled,
        ai_status: snapshot.ai.to_string(),
        ai_message: snapshot.ai.message().to_string(),
        globe_svg,
    }
}

fn info_items(data: OrbitalData) -> Vec<InfoItem> {
    let item = |label, value: f64, unit| InfoItem {
        label,
        value: format!("{:.2}", value),
        unit,
    };
    vec![
        item("Current altitude", data.altitude_km, "km"),
        item("Current velocity", data.velocity_km_s, "km/s"),
        item("Orbital period", data.period_min, "min"),
        item("Inclination", data.inclination_deg, "°"),
    ]
}
