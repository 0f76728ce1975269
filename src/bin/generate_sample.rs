use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Write a synthetic catalog CSV with the same columns as the Netflix export.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Number of titles to generate
    #[arg(long, default_value_t = 500)]
    rows: usize,

    /// PRNG seed; the same seed always produces the same file
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output path
    #[arg(long, default_value = "sample_titles.csv")]
    output: PathBuf,
}

const HEADER: [&str; 10] = [
    "show_id",
    "type",
    "title",
    "director",
    "country",
    "date_added",
    "release_year",
    "rating",
    "duration",
    "listed_in",
];

const COUNTRIES: [&str; 12] = [
    "United States",
    "India",
    "United Kingdom",
    "Japan",
    "South Korea",
    "Canada",
    "Spain",
    "France",
    "Mexico",
    "Germany",
    "Brazil",
    "Nigeria",
];

const RATINGS: [&str; 6] = ["TV-MA", "TV-14", "TV-PG", "R", "PG-13", "TV-Y7"];

const GENRES: [&str; 8] = [
    "Dramas",
    "Comedies",
    "Documentaries",
    "International Movies",
    "Action & Adventure",
    "Kids' TV",
    "Crime TV Shows",
    "Stand-Up Comedy",
];

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const WORDS: [&str; 16] = [
    "Midnight", "River", "Echo", "Golden", "Last", "Silent", "City", "Garden", "Storm", "Paper",
    "Northern", "Lights", "Secret", "Summer", "Broken", "Road",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Release years cluster around the late 2010s, like the real catalog.
fn release_year(rng: &mut SimpleRng) -> i64 {
    (rng.gauss(2016.0, 5.0).round() as i64).clamp(1960, 2021)
}

fn country(rng: &mut SimpleRng) -> String {
    match rng.below(10) {
        0 => String::new(),
        1 | 2 => {
            let a = rng.pick(&COUNTRIES);
            let b = rng.pick(&COUNTRIES);
            if a == b {
                a.to_string()
            } else {
                format!("{a}, {b}")
            }
        }
        _ => rng.pick(&COUNTRIES).to_string(),
    }
}

fn title(rng: &mut SimpleRng) -> String {
    format!("{} {}", rng.pick(&WORDS), rng.pick(&WORDS))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    writer.write_record(HEADER)?;

    for i in 0..args.rows {
        let is_movie = rng.next_f64() < 0.7;
        let year = release_year(&mut rng);
        let added_year = (year + rng.below(4) as i64).clamp(2008, 2021);
        let duration = if is_movie {
            format!("{} min", rng.gauss(100.0, 20.0).round().clamp(20.0, 240.0))
        } else {
            let seasons = 1 + rng.below(5);
            if seasons == 1 {
                "1 Season".to_string()
            } else {
                format!("{seasons} Seasons")
            }
        };
        let director = if is_movie && rng.below(5) > 0 {
            format!("{} {}", rng.pick(&WORDS), rng.pick(&["Kim", "Patel", "Smith", "Garcia"]))
        } else {
            String::new()
        };

        writer.write_record([
            format!("s{}", i + 1),
            if is_movie { "Movie" } else { "TV Show" }.to_string(),
            title(&mut rng),
            director,
            country(&mut rng),
            format!("{} {}, {added_year}", rng.pick(&MONTHS), 1 + rng.below(28)),
            year.to_string(),
            rng.pick(&RATINGS).to_string(),
            duration,
            rng.pick(&GENRES).to_string(),
        ])?;
    }
    writer.flush()?;

    log::info!("Wrote {} titles to {}", args.rows, args.output.display());
    println!("Wrote {} titles to {}", args.rows, args.output.display());
    Ok(())
}
