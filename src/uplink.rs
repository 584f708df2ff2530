use std::sync::{Arc, OnceLock};

use crate::{
    access::{Access, AccessGrant},
    error::{Error, Result},
    project::{Project, ProjectConfig},
    satellite::Satellite,
    universe::Universe,
};

/// Client library instance: the satellites it can dial and the universe
/// tracking every resource it hands out.
#[derive(Debug, Default)]
pub struct Uplink {
    universe: Arc<Universe>,
    satellites: dashmap::DashMap<String, Arc<Satellite>>,
}

impl Uplink {
    pub fn new() -> Self {
        Default::default()
    }

    /// process wide instance used by [`crate::helpers::with_test_project`]
    pub fn global() -> &'static Uplink {
        static GLOBAL: OnceLock<Uplink> = OnceLock::new();
        GLOBAL.get_or_init(Uplink::new)
    }

    pub fn universe(&self) -> &Arc<Universe> {
        &self.universe
    }

    pub fn universe_is_empty(&self) -> bool {
        self.universe.is_empty()
    }

    /// bring up a satellite at `address`, replacing any previous one
    pub fn start_satellite(&self, address: &str) -> Arc<Satellite> {
        let satellite = Arc::new(Satellite::new(address.to_owned()));
        if let Some(old) = self
            .satellites
            .insert(address.to_owned(), Arc::clone(&satellite))
        {
            old.stop();
        }
        tracing::debug!(address, "satellite started");
        satellite
    }

    pub fn stop_satellite(&self, address: &str) -> bool {
        match self.satellites.remove(address) {
            Some((_, satellite)) => {
                satellite.stop();
                tracing::debug!(address, "satellite stopped");
                true
            }
            None => false,
        }
    }

    pub fn parse_access(&self, access: &str) -> Result<Access> {
        let grant = AccessGrant::parse(access)?;
        Ok(Access::new(grant, self.universe.add("access")))
    }

    pub fn open_project(&self, access: &Access) -> Result<Project> {
        self.open_project_with(access, &ProjectConfig::default())
    }

    pub fn open_project_with(&self, access: &Access, config: &ProjectConfig) -> Result<Project> {
        let address = access.satellite_address();
        let satellite = self
            .satellites
            .get(address)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::Dial(address.to_owned()))?;
        satellite.check(&access.grant().api_key)?;
        tracing::debug!(address, "project opened");
        Ok(Project::new(
            satellite,
            access.grant().api_key.clone(),
            config,
            self.universe.add("project"),
            Arc::clone(&self.universe),
        ))
    }
}
