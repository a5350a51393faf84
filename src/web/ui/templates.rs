use askama::Template;
use askama_web::WebTemplate;

pub struct SatelliteRow {
    pub name: String,
    pub satellite_id: u32,
    pub selected: bool,
}

pub struct TleView {
    pub name: String,
    pub satellite_id: u32,
    pub date: String,
    pub line1: String,
    pub line2: String,
}

pub struct InfoItem {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct DashboardTemplate {
    pub search_term: String,
    pub recommended: Vec<SatelliteRow>,
    pub satellites: Vec<SatelliteRow>,
    pub list_message: Option<String>,
    pub loading_satellites: bool,
    pub loading_tle: bool,
    pub error: Option<String>,
    pub tle: Option<TleView>,
    pub orbital: Vec<InfoItem>,
    pub api_key_provided: bool,
    pub ai_enabled: bool,
    pub ai_status: String,
    pub ai_message: String,
    pub globe_svg: String,
}
