use axum::Router;
use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::TleData;

pub const ISS_LINE1: &str = "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
pub const ISS_LINE2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

pub fn iss_tle() -> TleData {
    TleData {
        name: "ISS (ZARYA)".to_string(),
        satellite_id: 25544,
        date: Some("2020-07-12T21:16:01+00:00".to_string()),
        line1: ISS_LINE1.to_string(),
        line2: ISS_LINE2.to_string(),
    }
}

/// A time close to the epoch of [`iss_tle`].
pub fn iss_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 7, 12, 21, 16, 1).unwrap()
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
