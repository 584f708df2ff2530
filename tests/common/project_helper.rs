use rand::prelude::Rng;
use uplink_testsuite::prelude::*;

use crate::common::gen_random;

const LOAD: usize = 64;
const OBJECT_SIZE_RANGE: std::ops::Range<usize> = 0..4096;

pub fn upload_bytes(project: &Project, bucket: &str, key: &str, data: &[u8]) {
    let mut upload = project
        .upload_object(bucket, key, &UploadOptions::default())
        .unwrap();
    // split the data over several writes
    for chunk in data.chunks(1000) {
        assert_eq!(upload.write(chunk).unwrap(), chunk.len());
    }
    upload.commit().unwrap();
    assert_eq!(upload.info().content_length, data.len());
}

fn put_objects(project: &Project, bucket: &str) -> Vec<(String, Vec<u8>)> {
    let mut rng = rand::thread_rng();
    (0..LOAD)
        .map(|_| gen_random(rng.gen_range(OBJECT_SIZE_RANGE.clone())))
        .inspect(|(key, data)| upload_bytes(project, bucket, key, data))
        .collect::<Vec<_>>()
}

fn check_objects(project: &Project, bucket: &str, expect: &[(String, Vec<u8>)]) {
    let mut rng = rand::thread_rng();
    expect.iter().for_each(|(key, expect)| {
        let info = project.stat_object(bucket, key).unwrap();
        assert_eq!(info.content_length, expect.len());
        let received = project
            .download_object(bucket, key, &DownloadOptions::default())
            .unwrap();
        assert_eq!(expect, &received);
        // read in range
        let start = rng.gen_range(0..=expect.len());
        let end = rng.gen_range(start..=expect.len());
        let ranged = project
            .download_object(
                bucket,
                key,
                &DownloadOptions {
                    offset: start,
                    length: Some(end - start),
                },
            )
            .unwrap();
        assert_eq!(ranged, expect[start..end]);
    });
}

/// expected to receive a project whose bucket is clean
pub fn write_read(project: &Project, bucket: &str) {
    project.ensure_bucket(bucket).unwrap();
    let expect = put_objects(project, bucket);
    check_objects(project, bucket, &expect);
    let mut keys = expect.iter().map(|(key, _)| key.clone()).collect::<Vec<_>>();
    keys.sort();
    keys.dedup();
    assert_eq!(project.list_objects(bucket).unwrap(), keys);
    keys.iter()
        .for_each(|key| project.delete_object(bucket, key).unwrap());
    project.delete_bucket(bucket).unwrap();
}
