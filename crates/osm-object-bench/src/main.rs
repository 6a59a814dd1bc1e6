//! Benchmark for building, sorting and compressing packed OSM objects.
//!
//! Reads objects from a JSON file given as the first argument, or generates
//! a synthetic data set when no file is given.
//!
//! ```text
//! bench-objects [objects.json] [--count N]
//! ```
//!
//! Set `RUST_LOG=osm_object=trace` to see per-record logging.

use std::collections::BTreeMap;
use std::fs;
use std::time::Instant;

use osm_object::order::{object_le, sort_objects};
use osm_object::{Buffer, ItemType, Location, NodeRef, Object, ObjectBuilder, Timestamp};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: usize = 200_000;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct InputMember {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "ref")]
    ref_id: i64,
    #[serde(default)]
    role: String,
}

#[derive(Debug, Deserialize)]
struct InputObject {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    visible: Option<bool>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    uid: u32,
    #[serde(default)]
    user: String,
    #[serde(default)]
    changeset: u32,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default)]
    nodes: Vec<i64>,
    #[serde(default)]
    members: Vec<InputMember>,
}

// =============================================================================
// SYNTHETIC DATA
// =============================================================================

/// Small deterministic generator so runs are comparable.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

const HIGHWAYS: [&str; 5] = ["residential", "primary", "footway", "service", "track"];
const USERS: [&str; 4] = ["alice", "bob", "mapper_42", ""];

fn synthetic_objects(count: usize, rng: &mut Lcg) -> Vec<InputObject> {
    let mut objects = Vec::with_capacity(count);
    for i in 0..count {
        let kind = match i % 10 {
            0..=6 => "node",
            7..=8 => "way",
            _ => "relation",
        };
        let id = if rng.below(50) == 0 {
            -(rng.below(1000) as i64 + 1)
        } else {
            rng.below(count * 4) as i64 + 1
        };
        let mut tags = BTreeMap::new();
        if kind != "node" || rng.below(4) == 0 {
            tags.insert(
                "highway".to_string(),
                HIGHWAYS[rng.below(HIGHWAYS.len())].to_string(),
            );
            tags.insert("name".to_string(), format!("Street {}", rng.below(10_000)));
        }
        let nodes = if kind == "way" {
            (0..2 + rng.below(12)).map(|_| rng.below(count) as i64 + 1).collect()
        } else {
            Vec::new()
        };
        let members = if kind == "relation" {
            (0..1 + rng.below(6))
                .map(|_| InputMember {
                    kind: "way".to_string(),
                    ref_id: rng.below(count) as i64 + 1,
                    role: if rng.below(2) == 0 { "outer" } else { "inner" }.to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };
        objects.push(InputObject {
            kind: kind.to_string(),
            id,
            version: 1 + rng.below(20) as u32,
            visible: Some(rng.below(30) != 0),
            timestamp: (rng.below(10) != 0)
                .then(|| Timestamp::new(1_200_000_000 + rng.below(500_000_000) as u32).to_iso()),
            uid: rng.below(100_000) as u32,
            user: USERS[rng.below(USERS.len())].to_string(),
            changeset: rng.below(10_000_000) as u32,
            lat: (kind == "node").then(|| rng.below(1_800_000) as f64 / 10_000.0 - 90.0),
            lon: (kind == "node").then(|| rng.below(3_600_000) as f64 / 10_000.0 - 180.0),
            tags,
            nodes,
            members,
        });
    }
    objects
}

// =============================================================================
// CONVERSION
// =============================================================================

fn builder_for(input: &InputObject) -> Option<ObjectBuilder<'_>> {
    let kind: ItemType = input.kind.parse().ok()?;
    let mut builder = ObjectBuilder::new(kind, input.id)
        .ok()?
        .version(input.version)
        .visible(input.visible.unwrap_or(true))
        .uid(input.uid)
        .changeset(input.changeset)
        .name(input.user.as_str())
        .tags(input.tags.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    if let Some(ts) = &input.timestamp {
        builder = builder.timestamp(ts.parse::<Timestamp>().ok()?);
    }
    if let (Some(lat), Some(lon)) = (input.lat, input.lon) {
        builder = builder.location(Location::new(lon, lat));
    }
    if !input.nodes.is_empty() {
        builder = builder.way_nodes(input.nodes.iter().copied().map(NodeRef::from));
    }
    for member in &input.members {
        let member_type: ItemType = member.kind.parse().ok()?;
        builder = builder.member(member.ref_id, member_type, member.role.as_str());
    }
    Some(builder)
}

fn build_buffer(objects: &[InputObject]) -> (Buffer, usize) {
    let mut buffer = Buffer::new();
    let mut rejected = 0;
    for input in objects {
        let committed = builder_for(input).map(|b| b.commit(&mut buffer));
        match committed {
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                warn!(id = input.id, %err, "skipping object");
                rejected += 1;
            }
            None => {
                warn!(id = input.id, kind = %input.kind, "skipping object with bad fields");
                rejected += 1;
            }
        }
    }
    (buffer, rejected)
}

fn mb_per_sec(bytes: usize, secs: f64) -> f64 {
    (bytes as f64 / 1_000_000.0) / secs
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let mut path = None;
    let mut count = DEFAULT_COUNT;
    while let Some(arg) = args.next() {
        if arg == "--count" {
            count = args
                .next()
                .and_then(|n| n.parse().ok())
                .expect("--count needs a number");
        } else {
            path = Some(arg);
        }
    }

    let mut rng = Lcg(0x5EED);
    let load_start = Instant::now();
    let objects: Vec<InputObject> = match &path {
        Some(path) => {
            let json = fs::read_to_string(path).expect("Failed to read input file");
            serde_json::from_str(&json).expect("Failed to parse JSON")
        }
        None => synthetic_objects(count, &mut rng),
    };
    info!(
        objects = objects.len(),
        source = path.as_deref().unwrap_or("synthetic"),
        elapsed = ?load_start.elapsed(),
        "loaded input"
    );

    // Build
    let build_start = Instant::now();
    let (mut buffer, rejected) = build_buffer(&objects);
    let build_time = build_start.elapsed();
    println!(
        "Built {} records ({} rejected), {} bytes in {:?}",
        buffer.count(),
        rejected,
        buffer.len(),
        build_time
    );
    println!(
        "  Throughput: {:.2} MB/s",
        mb_per_sec(buffer.len(), build_time.as_secs_f64())
    );

    // Sort
    let mut views: Vec<Object<&[u8]>> = buffer.iter().map(|(_, obj)| obj).collect();
    for i in (1..views.len()).rev() {
        views.swap(i, rng.below(i + 1));
    }
    let sort_start = Instant::now();
    sort_objects(&mut views);
    let sort_time = sort_start.elapsed();
    let sorted = views.windows(2).all(|w| object_le(&w[0], &w[1]));
    println!("\nSorted {} views in {:?} (ordered: {})", views.len(), sort_time, sorted);
    assert!(sorted, "sort produced an unordered sequence");

    let kinds = views.iter().fold([0usize; 4], |mut acc, obj| {
        acc[obj.item_type().as_u16() as usize - 1] += 1;
        acc
    });
    println!(
        "  - {} nodes, {} ways, {} relations, {} areas",
        kinds[0], kinds[1], kinds[2], kinds[3]
    );
    drop(views);

    // Attribute updates in place
    let update_start = Instant::now();
    let mut updated = 0usize;
    for (_, mut obj) in buffer.iter_mut() {
        if obj.set_attribute("changeset", "1").is_ok() {
            updated += 1;
        }
        obj.remove_tags();
    }
    let update_time = update_start.elapsed();
    let tagged = buffer.iter().filter(|(_, obj)| !obj.tags().is_empty()).count();
    println!(
        "\nUpdated {} records in {:?} ({} still tagged)",
        updated, update_time, tagged
    );

    // Compress
    let compress_start = Instant::now();
    let compressed = zstd::encode_all(buffer.as_bytes(), 3).expect("Failed to compress");
    let compress_time = compress_start.elapsed();
    println!(
        "\nzstd level 3: {} -> {} bytes ({:.1}%) in {:?}",
        buffer.len(),
        compressed.len(),
        100.0 * compressed.len() as f64 / buffer.len().max(1) as f64,
        compress_time
    );

    let restored = zstd::decode_all(compressed.as_slice()).expect("Failed to decompress");
    let restored = Buffer::from_bytes(restored).expect("Decompressed buffer is invalid");
    assert_eq!(restored.count(), buffer.count());
    println!("  Round-trip check: {} records", restored.count());
}
