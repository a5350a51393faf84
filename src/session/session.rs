use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use super::panel::{AI_KEY_INIT_FAILED, AI_KEY_MISSING, AI_REQUEST_FAILED};
use super::state::{SessionState, Snapshot};
use crate::ai::{CredentialStore, GeminiClient};
use crate::catalog::{is_searchable, CatalogClient, CatalogError, Satellite, SearchDebouncer, TleData};
use crate::config::Config;
use crate::globe::Globe;
use crate::orbit::{Clock, OrbitalData, Propagator};

struct Inner {
    config: Arc<Config>,
    catalog: CatalogClient,
    debouncer: SearchDebouncer,
    credentials: CredentialStore,
    clock: Clock,
    state: StdMutex<SessionState>,
    globe: Mutex<Globe>,
}

/// The one user session: search, selection, AI description and the globe.
///
/// Cheap to clone. Background requests hold a clone and write their result
/// back into the shared state when they finish.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new(config: Arc<Config>, globe: Globe, clock: Clock) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let debouncer = SearchDebouncer::new(config.catalog.debounce);
        let credentials = CredentialStore::new(config.ai.credential_file.clone());
        let initial_key = credentials.initial_key(&config.ai.env_var);

        let session = Self {
            inner: Arc::new(Inner {
                config,
                catalog,
                debouncer,
                credentials,
                clock,
                state: StdMutex::new(SessionState::default()),
                globe: Mutex::new(globe),
            }),
        };
        session.apply_api_key(initial_key);
        Ok(session)
    }

    pub fn globe(&self) -> &Mutex<Globe> {
        &self.inner.globe
    }

    /// Starts the idle globe and runs the initial search.
    pub async fn start(&self) {
        self.inner.globe.lock().await.retarget(None).await;

        let term = self.inner.config.catalog.initial_search.clone();
        self.inner.state.lock().unwrap().search_term = term.clone();
        self.search_now(&term).await;
    }

    pub async fn shutdown(&self) {
        self.inner.debouncer.cancel();
        self.inner.globe.lock().await.stop().await;
    }

    /// Records the new term and schedules a search once typing pauses.
    pub fn set_search_term(&self, term: &str) {
        self.inner.state.lock().unwrap().search_term = term.to_string();

        log::debug!("search for {:?} in {:?}", term, self.inner.debouncer.delay());
        let session = self.clone();
        let term = term.to_string();
        self.inner
            .debouncer
            .schedule(move || async move { session.search_now(&term).await });
    }

    /// Searches right away. Terms that are too short clear the list instead.
    async fn search_now(&self, term: &str) {
        let min_len = self.inner.config.catalog.min_query_len;
        let ticket = {
            let mut locked = self.inner.state.lock().unwrap();
            locked.search_seq += 1;
            if !is_searchable(term, min_len) {
                locked.satellites.clear();
                locked.loading_satellites = false;
                return;
            }
            locked.loading_satellites = true;
            locked.error = None;
            locked.search_seq
        };

        let result = self.inner.catalog.search(term).await;

        let mut locked = self.inner.state.lock().unwrap();
        if locked.search_seq != ticket {
            log::debug!("dropping stale results for {:?}", term);
            return;
        }
        locked.loading_satellites = false;
        match result {
            Ok(satellites) => {
                log::debug!("{} satellites match {:?}", satellites.len(), term);
                locked.satellites = satellites;
            }
            Err(e) => {
                log::warn!("search for {:?} failed: {}", term, e);
                locked.error = Some(e.to_string());
                locked.satellites.clear();
            }
        }
    }

    /// Makes `satellite` the current selection and loads its TLE in the background.
    pub async fn select(&self, satellite: Satellite) {
        let (ticket, ai_enabled) = {
            let mut locked = self.inner.state.lock().unwrap();
            locked.selected = Some(satellite.clone());
            locked.tle = None;
            locked.error = None;
            locked.ai_description = None;
            locked.ai_error = None;
            locked.loading_tle = true;
            locked.tle_seq += 1;
            (locked.tle_seq, locked.ai_enabled)
        };
        log::info!("selected {} ({})", satellite.name, satellite.satellite_id);

        self.inner.globe.lock().await.retarget(None).await;

        let session = self.clone();
        let satellite_id = satellite.satellite_id;
        tokio::spawn(async move { session.load_tle(ticket, satellite_id).await });

        if ai_enabled {
            self.describe(&satellite.name);
        }
    }

    /// Selects a recommended satellite and searches for its name.
    pub async fn select_recommended(&self, satellite: Satellite) {
        let name = satellite.name.clone();
        self.inner.debouncer.cancel();
        self.inner.state.lock().unwrap().search_term = name.clone();

        self.select(satellite).await;
        self.search_now(&name).await;
    }

    /// Replaces the term and searches without waiting for the debounce.
    pub async fn submit_search(&self, term: &str) {
        self.inner.debouncer.cancel();
        self.inner.state.lock().unwrap().search_term = term.to_string();
        self.search_now(term).await;
    }

    async fn load_tle(&self, ticket: u64, satellite_id: u32) {
        let result = self.inner.catalog.fetch_tle(satellite_id).await;

        let tle = {
            let mut locked = self.inner.state.lock().unwrap();
            if locked.tle_seq != ticket {
                log::debug!("dropping stale TLE for {}", satellite_id);
                return;
            }
            locked.loading_tle = false;
            match result {
                Ok(tle) => {
                    locked.tle = Some(tle.clone());
                    tle
                }
                Err(e) => {
                    log::warn!("TLE for {} unavailable: {}", satellite_id, e);
                    locked.error = Some(e.to_string());
                    locked.tle = None;
                    return;
                }
            }
        };

        self.retarget_if_current(ticket, tle).await;
    }

    async fn retarget_if_current(&self, ticket: u64, tle: TleData) {
        let mut globe = self.inner.globe.lock().await;
        // a newer selection may have slipped in while we waited for the globe
        let stale = self.inner.state.lock().unwrap().tle_seq != ticket;
        if !stale {
            globe.retarget(Some(tle)).await;
        }
    }

    /// Stores the key and rebuilds the AI client. Returns `false` for blank input.
    pub fn save_api_key(&self, key: &str) -> std::io::Result<bool> {
        match self.inner.credentials.save(key)? {
            Some(stored) => {
                self.apply_api_key(stored);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_api_key(&self) -> std::io::Result<()> {
        self.inner.credentials.delete()?;

        let mut locked = self.inner.state.lock().unwrap();
        locked.api_key.clear();
        locked.ai_client = None;
        locked.ai_enabled = false;
        locked.ai_description = None;
        locked.ai_error = None;
        locked.loading_ai = false;
        locked.ai_seq += 1;
        log::info!("AI key removed from {}", self.inner.credentials.path().display());
        Ok(())
    }

    fn apply_api_key(&self, key: String) {
        let mut locked = self.inner.state.lock().unwrap();
        locked.ai_client = None;
        if !key.is_empty() {
            match GeminiClient::new(&self.inner.config.ai, &key) {
                Ok(client) => {
                    locked.ai_client = Some(client);
                    locked.ai_error = None;
                }
                Err(e) => {
                    log::warn!("cannot initialize AI client: {}", e);
                    locked.ai_error = Some(AI_KEY_INIT_FAILED.to_string());
                }
            }
        }
        locked.api_key = key;
    }

    /// Flips the AI switch and returns the new setting. Does nothing without a key.
    pub fn toggle_ai(&self) -> bool {
        let pending = {
            let mut locked = self.inner.state.lock().unwrap();
            if !locked.api_key_provided() {
                return locked.ai_enabled;
            }
            locked.ai_enabled = !locked.ai_enabled;

            if locked.ai_enabled {
                let idle = locked.ai_description.is_none() && !locked.loading_ai && locked.ai_error.is_none();
                locked
                    .selected
                    .as_ref()
                    .filter(|_| idle)
                    .map(|s| s.name.clone())
            } else {
                locked.ai_description = None;
                locked.ai_error = None;
                locked.loading_ai = false;
                locked.ai_seq += 1;
                None
            }
        };

        if let Some(name) = pending {
            self.describe(&name);
        }
        self.inner.state.lock().unwrap().ai_enabled
    }

    /// Requests a description of `name` in the background.
    pub fn describe(&self, name: &str) {
        let (ticket, client) = {
            let mut locked = self.inner.state.lock().unwrap();
            let Some(client) = locked.ai_client.clone() else {
                locked.ai_error = Some(AI_KEY_MISSING.to_string());
                return;
            };
            locked.loading_ai = true;
            locked.ai_error = None;
            locked.ai_description = None;
            locked.ai_seq += 1;
            (locked.ai_seq, client)
        };

        let session = self.clone();
        let name = name.to_string();
        tokio::spawn(async move {
            let result = client.describe(&name).await;

            let mut locked = session.inner.state.lock().unwrap();
            if locked.ai_seq != ticket {
                log::debug!("dropping stale description of {}", name);
                return;
            }
            locked.loading_ai = false;
            match result {
                Ok(text) => locked.ai_description = Some(text),
                Err(e) => {
                    log::warn!("AI description of {} failed: {}", name, e);
                    locked.ai_error = Some(AI_REQUEST_FAILED.to_string());
                }
            }
        });
    }

    /// Orbital parameters of the loaded TLE at the current clock time.
    pub fn orbital_data(&self) -> Option<OrbitalData> {
        let tle = self.inner.state.lock().unwrap().tle.clone()?;
        let now = (self.inner.clock)();
        match Propagator::from_tle(&tle).and_then(|p| p.orbital_data(now)) {
            Ok(data) => Some(data),
            Err(e) => {
                log::debug!("no orbital data for {}: {}", tle.name, e);
                None
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let orbital_data = self.orbital_data();
        self.inner
            .state
            .lock()
            .unwrap()
            .snapshot(self.inner.config.catalog.min_query_len, orbital_data)
    }
}
