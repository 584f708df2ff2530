mod common;

use std::{
    cell::{Cell, RefCell},
    panic::{catch_unwind, AssertUnwindSafe},
};

use uplink_testsuite::prelude::*;

use common::TestNet;

#[test]
fn test_callback_runs_once() {
    let net = TestNet::new();
    let calls = Cell::new(0);
    with_test_project_in(&net.uplink, &net.config(), |project| {
        calls.set(calls.get() + 1);
        assert_ne!(project.handle_id(), 0);
        assert_eq!(project.satellite_address(), common::SATELLITE_ADDR);
        // the access is released before the callback runs
        assert_eq!(net.uplink.universe().kinds(), vec!["project"]);
    });
    assert_eq!(calls.get(), 1);
    assert!(net.uplink.universe_is_empty());
}

#[test]
fn test_callback_can_use_project() {
    let net = TestNet::new();
    with_test_project_in(&net.uplink, &net.config(), |project| {
        common::write_read(project, "fixture");
        let mut data = vec![0; 4096];
        fill_random_data(&mut data);
        project.create_bucket("data").unwrap();
        common::upload_bytes(project, "data", "pattern", &data);
    });
    // objects outlive the project on the satellite
    with_test_project_in(&net.uplink, &net.config(), |project| {
        let keys = project.list_objects("data").unwrap();
        assert!(array_contains("pattern", &keys));
        assert!(!array_contains("Pattern", &keys));
    });
}

#[test]
fn test_empty_access_never_calls_back() {
    let net = TestNet::new();
    let called = Cell::new(false);
    let config = TestConfig::new(common::SATELLITE_ADDR, "");
    let result = catch_unwind(AssertUnwindSafe(|| {
        with_test_project_in(&net.uplink, &config, |_| called.set(true));
    }));
    assert!(result.is_err());
    assert!(!called.get());
    assert!(net.uplink.universe_is_empty());
}

#[test]
#[should_panic(expected = "access grant")]
fn test_malformed_access_panics() {
    let net = TestNet::new();
    let config = TestConfig::new(common::SATELLITE_ADDR, "this is not a grant");
    with_test_project_in(&net.uplink, &config, |_| unreachable!());
}

#[test]
#[should_panic(expected = "unexpected error: permission denied")]
fn test_revoked_key_panics() {
    let net = TestNet::new();
    net.satellite.revoke_api_key(&net.grant.api_key);
    with_test_project_in(&net.uplink, &net.config(), |_| unreachable!());
}

#[test]
#[should_panic(expected = "connection refused")]
fn test_unreachable_satellite_panics() {
    let net = TestNet::new();
    net.uplink.stop_satellite(common::SATELLITE_ADDR);
    with_test_project_in(&net.uplink, &net.config(), |_| unreachable!());
}

#[test]
fn test_leaked_upload_is_reported() {
    let net = TestNet::new();
    let leaked = RefCell::new(Vec::new());
    let result = catch_unwind(AssertUnwindSafe(|| {
        with_test_project_in(&net.uplink, &net.config(), |project| {
            project.create_bucket("bucket").unwrap();
            let upload = project
                .upload_object("bucket", "obj", &UploadOptions::default())
                .unwrap();
            leaked.borrow_mut().push(upload);
        });
    }));
    let message = result
        .unwrap_err()
        .downcast::<String>()
        .map(|message| *message)
        .unwrap_or_default();
    assert!(message.contains("universe is not empty"), "{message}");
    assert!(message.contains("upload"), "{message}");
    leaked.borrow_mut().clear();
    assert!(net.uplink.universe_is_empty());
}

#[test]
#[should_panic(expected = "dial satellite")]
fn test_close_failure_panics() {
    let net = TestNet::new();
    with_test_project_in(&net.uplink, &net.config(), |_| {
        net.uplink.stop_satellite(common::SATELLITE_ADDR);
    });
}

#[test]
fn test_echoes_two_lines() {
    let net = TestNet::new();
    let mut lines = Vec::new();
    let calls = Cell::new(0);
    with_test_project_echo(
        &net.uplink,
        &net.config(),
        |line| lines.push(line.to_owned()),
        |_| calls.set(calls.get() + 1),
    );
    assert_eq!(calls.get(), 1);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "using SATELLITE_0_ADDR: 127.0.0.1:10000");
    assert!(lines[1].starts_with("using UPLINK_0_ACCESS: "));
    let access = net.config().access.unwrap();
    assert!(!lines[1].contains(&access));
    assert!(lines[1].contains(&access[..8]));
}

#[test]
fn test_echo_precedes_failure() {
    let net = TestNet::new();
    let lines = RefCell::new(Vec::new());
    let config = TestConfig::new(common::SATELLITE_ADDR, "");
    let result = catch_unwind(AssertUnwindSafe(|| {
        with_test_project_echo(
            &net.uplink,
            &config,
            |line| lines.borrow_mut().push(line.to_owned()),
            |_| unreachable!(),
        );
    }));
    assert!(result.is_err());
    assert_eq!(lines.borrow().len(), 2);
}
