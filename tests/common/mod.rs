//! Shared fixtures: Parquet files of synthetic profiles
#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use profilestore::Loader;
use tempfile::TempDir;

// =============================================================================
// Fixture Data
// =============================================================================

pub const FIRST_FID: i64 = 1000;

/// Stored exactly in canonical form
pub const LOS_ANGELES: &str = "geo:34.05,-118.24";

/// Stored with extra precision; only the fallback scan finds it
pub const NEW_YORK_PRECISE: &str = "geo:40.7128,-74.0060";

pub const LONDON: &str = "geo:51.51,-0.13";

/// Not a geo location at all
pub const UNKNOWN: &str = "unknown";

pub const COLUMNS: [&str; 5] = ["Fid", "Username", "Location", "Score", "Active"];

/// Location of the i-th fixture row
pub fn location_for(i: usize) -> &'static str {
    match i % 4 {
        0 => LOS_ANGELES,
        1 => NEW_YORK_PRECISE,
        2 => LONDON,
        _ => UNKNOWN,
    }
}

/// Username of the i-th fixture row; every tenth one is null
pub fn username_for(i: usize) -> Option<String> {
    if i % 10 == 9 {
        None
    } else {
        Some(format!("user{}", i))
    }
}

pub fn score_for(i: usize) -> f64 {
    i as f64 * 0.5
}

pub fn active_for(i: usize) -> bool {
    i % 2 == 0
}

/// Number of the first `rows` fixture rows stored at `location`
pub fn count_at(rows: usize, location: &str) -> usize {
    (0..rows).filter(|&i| location_for(i) == location).count()
}

// =============================================================================
// Builders
// =============================================================================

pub fn profile_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("Fid", DataType::Int64, false),
        Field::new("Username", DataType::Utf8, true),
        Field::new("Location", DataType::Utf8, false),
        Field::new("Score", DataType::Float64, false),
        Field::new("Active", DataType::Boolean, false),
    ]))
}

/// Batch of `rows` profiles with Fids starting at `first_fid`
pub fn profiles_batch_from(first_fid: i64, rows: usize) -> RecordBatch {
    let fids: Vec<i64> = (0..rows).map(|i| first_fid + i as i64).collect();
    let usernames: Vec<Option<String>> = (0..rows).map(username_for).collect();
    let locations: Vec<&str> = (0..rows).map(location_for).collect();
    let scores: Vec<f64> = (0..rows).map(score_for).collect();
    let active: Vec<bool> = (0..rows).map(active_for).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(fids)),
        Arc::new(StringArray::from(usernames)),
        Arc::new(StringArray::from(locations)),
        Arc::new(Float64Array::from(scores)),
        Arc::new(BooleanArray::from(active)),
    ];

    RecordBatch::try_new(profile_schema(), columns).unwrap()
}

pub fn profiles_batch(rows: usize) -> RecordBatch {
    profiles_batch_from(FIRST_FID, rows)
}

pub fn write_parquet(path: &Path, batches: &[RecordBatch]) {
    let schema = batches
        .first()
        .map(|b| b.schema())
        .unwrap_or_else(profile_schema);
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.close().unwrap();
}

/// Write `rows` fixture profiles to `<dir>/profiles.parquet`
pub fn write_profiles(dir: &Path, rows: usize) -> PathBuf {
    let path = dir.join("profiles.parquet");
    write_parquet(&path, &[profiles_batch(rows)]);
    path
}

/// Load one profile per location, Fids counting from 1; returns the database path
pub fn loaded_locations(dir: &TempDir, locations: &[&str]) -> PathBuf {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Fid", DataType::Int64, false),
        Field::new("Location", DataType::Utf8, false),
    ]));
    let fids: Vec<i64> = (1..=locations.len() as i64).collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(fids)),
        Arc::new(StringArray::from(locations.to_vec())),
    ];
    let batch = RecordBatch::try_new(schema, columns).unwrap();

    let source = dir.path().join("locations.parquet");
    write_parquet(&source, &[batch]);
    let db = dir.path().join("locations.db");
    Loader::new(source, &db).run().unwrap();
    db
}

/// Load `rows` fixture profiles; returns the database path
pub fn loaded_db(dir: &TempDir, rows: usize) -> PathBuf {
    let source = write_profiles(dir.path(), rows);
    let db = dir.path().join("data").join("user_profiles.db");
    Loader::new(source, &db).run().unwrap();
    db
}
