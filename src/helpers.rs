//! Helpers shared by the integration test suite.

use std::{cell::Cell, io::Write};

use crate::{
    config::TestConfig, project::Project, require::require_noerror, requiref, uplink::Uplink,
};

// the global library instance has a single universe, fixtures on it take turns
static GLOBAL_FIXTURE: parking_lot::Mutex<()> = parking_lot::const_mutex(());

thread_local! {
    static IN_GLOBAL_FIXTURE: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as running a global fixture until dropped.
struct FixtureGuard;

impl FixtureGuard {
    #[track_caller]
    fn enter() -> Self {
        let nested = IN_GLOBAL_FIXTURE.with(|flag| flag.replace(true));
        requiref!(!nested, "with_test_project is not reentrant\n");
        FixtureGuard
    }
}

impl Drop for FixtureGuard {
    fn drop(&mut self) {
        IN_GLOBAL_FIXTURE.with(|flag| flag.set(false));
    }
}

/// Open the default test project described by `SATELLITE_0_ADDR` and
/// `UPLINK_0_ACCESS`, run `handle_project` against it and release it.
///
/// Panics when the project cannot be opened or released, when any
/// resource is still alive afterwards, or when called from inside another
/// `with_test_project` callback.
#[track_caller]
pub fn with_test_project<F>(handle_project: F)
where
    F: FnOnce(&Project),
{
    let _nested = FixtureGuard::enter();
    let _serial = GLOBAL_FIXTURE.lock();
    with_test_project_in(Uplink::global(), &TestConfig::from_env(), handle_project)
}

/// [`with_test_project`] against an explicit library instance and configuration.
#[track_caller]
pub fn with_test_project_in<F>(uplink: &Uplink, config: &TestConfig, handle_project: F)
where
    F: FnOnce(&Project),
{
    with_test_project_echo(
        uplink,
        config,
        |line| {
            println!("{line}");
            // diagnostics must reach the terminal even if the test aborts right after
            let _ = std::io::stdout().flush();
        },
        handle_project,
    )
}

/// [`with_test_project_in`] handing each diagnostic line to `echo` instead of stdout.
#[track_caller]
pub fn with_test_project_echo<E, F>(
    uplink: &Uplink,
    config: &TestConfig,
    mut echo: E,
    handle_project: F,
) where
    E: FnMut(&str),
    F: FnOnce(&Project),
{
    for line in config.diagnostic_lines() {
        echo(&line);
    }

    let access = require_noerror(uplink.parse_access(config.access_or_empty()));
    let project = require_noerror(uplink.open_project(&access));
    requiref!(project.handle_id() != 0, "got empty project\n");
    drop(access);

    handle_project(&project);

    require_noerror(project.close());
    requiref!(
        uplink.universe_is_empty(),
        "universe is not empty: {:?}\n",
        uplink.universe().kinds()
    );
}

/// Fill `buffer` with a fixed pattern: byte `i` is the low 8 bits of `i * 31`.
pub fn fill_random_data(buffer: &mut [u8]) {
    buffer
        .iter_mut()
        .enumerate()
        .for_each(|(i, byte)| *byte = i.wrapping_mul(31) as u8);
}

/// Exact, case sensitive membership test.
pub fn array_contains<S: AsRef<str>>(item: &str, array: &[S]) -> bool {
    array.iter().any(|candidate| candidate.as_ref() == item)
}
