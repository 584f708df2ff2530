use std::sync::Arc;

use rand::Rng;
use uplink_testsuite::prelude::*;

mod project_helper;

pub use project_helper::*;

pub const SATELLITE_ADDR: &str = "127.0.0.1:10000";

/// Library instance with one running satellite and a grant for it.
pub struct TestNet {
    pub uplink: Uplink,
    pub satellite: Arc<Satellite>,
    pub grant: AccessGrant,
}

impl TestNet {
    pub fn new() -> Self {
        let uplink = Uplink::new();
        let satellite = uplink.start_satellite(SATELLITE_ADDR);
        let grant = satellite.grant("testpass");
        Self {
            uplink,
            satellite,
            grant,
        }
    }

    pub fn config(&self) -> TestConfig {
        TestConfig::new(SATELLITE_ADDR, self.grant.serialize().unwrap())
    }
}

fn gen_random(size: usize) -> (String, Vec<u8>) {
    let mut rng = rand::thread_rng();
    let data = (&mut rng)
        .sample_iter(rand::distributions::Standard)
        .take(size)
        .collect();
    let key = format!("object-{:016x}", rng.gen::<u64>());
    (key, data)
}
