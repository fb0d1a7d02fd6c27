//! auckland: seeds the persons finder with random people around Auckland
//! and runs a few nearby searches.
//!
//! Usage: `auckland [PERSON_COUNT] [SNAPSHOT_PATH]`
//!
//! Set `RUST_LOG=debug` to see every upsert and query.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pf_core::{FinderConfig, GeoPoint};
use pf_finder::{Finder, FinderBuilder};
use pf_query::{PageRequest, QueryEngine};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_PERSON_COUNT: usize = 10_000;
const SEED:                 u64   = 42;
const PROGRESS_EVERY:       usize = 1_000;

// Seeding area: greater Auckland.
const LAT_RANGE: std::ops::Range<f64> = -37.0..-36.5;
const LON_RANGE: std::ops::Range<f64> = 174.5..175.0;

/// Auckland CBD.
const CBD: (f64, f64) = (-36.8485, 174.7645);

const FIXED_PEOPLE: [(&str, f64, f64); 5] = [
    ("Viaduct",  -36.8415, 174.7570),
    ("Parnell",  -36.8580, 174.7870),
    ("Mt Eden",  -36.8770, 174.7610),
    ("Avondale", -36.8870, 174.6150),
    ("Takapuna", -36.7300, 174.7000),
];

// ── Seeding ───────────────────────────────────────────────────────────────────

fn seed_fixed(finder: &Finder) -> Result<()> {
    for (name, lat, lon) in FIXED_PEOPLE {
        let person = finder.create_person(name);
        finder.update_location(person.id, lat, lon)?;
    }
    Ok(())
}

fn seed_random(finder: &Finder, count: usize) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(SEED);
    for i in 0..count {
        let person = finder.create_person(format!("Person-{i}"));
        finder.update_location(
            person.id,
            rng.gen_range(LAT_RANGE),
            rng.gen_range(LON_RANGE),
        )?;
        if (i + 1) % PROGRESS_EVERY == 0 {
            info!(seeded = i + 1, total = count, "seeding");
        }
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let person_count = match args.next() {
        Some(n) => n.parse()?,
        None => DEFAULT_PERSON_COUNT,
    };
    let snapshot: Option<PathBuf> = args.next().map(PathBuf::from);

    println!("=== auckland — persons finder ===");
    println!("Persons: {person_count}  |  Seed: {SEED}");
    println!();

    // 1. Build an empty finder.
    let finder = FinderBuilder::new(FinderConfig::default()).build()?;

    // 2. Seed: five named people near the CBD, then the random crowd.
    let t0 = Instant::now();
    seed_fixed(&finder)?;
    seed_random(&finder, person_count)?;
    println!(
        "Seeded {} persons in {:.2?}",
        FIXED_PEOPLE.len() + person_count,
        t0.elapsed()
    );

    // 3. 10 km around the CBD, first page.
    let t1 = Instant::now();
    let page = finder.find_nearby_km(CBD.0, CBD.1, 10.0, 0, None)?;
    println!(
        "\nWithin 10 km of the CBD: {} persons ({} pages), query took {:.2?}",
        page.total_elements,
        page.total_pages(),
        t1.elapsed()
    );
    for p in &page.items {
        println!(
            "  {:>8}  {:<12} ({:>9.4}, {:>9.4})  {:>6.3} km",
            p.person_id.get(),
            p.name,
            p.lat,
            p.lon,
            p.distance_km
        );
    }

    // 4. Deadline-bound query in metres straight against the engine.
    let deadline = Instant::now() + Duration::from_millis(250);
    match finder.engine().find_nearby_before(
        GeoPoint::new(CBD.0, CBD.1),
        2_000.0,
        PageRequest::new(0, 5),
        deadline,
    ) {
        Ok(page) => println!("\nWithin 2 km (250 ms budget): {} persons", page.total_elements),
        Err(e) => println!("\n2 km query gave up: {e}"),
    }

    // 5. Move the Viaduct person north and look again.
    let viaduct = pf_core::PersonId(1);
    finder.update_location(viaduct, -36.60, 174.70)?;
    let page = finder.find_nearby_km(CBD.0, CBD.1, 1.5, 0, None)?;
    println!(
        "After moving {viaduct} away: {} persons within 1.5 km of the CBD",
        page.total_elements
    );

    // 6. Tear down.
    finder.shutdown(snapshot.as_deref())?;
    if let Some(path) = &snapshot {
        println!("Snapshot written to {}", path.display());
    }
    println!("\nDone.");
    Ok(())
}
