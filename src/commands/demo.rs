//! Demo command implementation.
//!
//! Profiles three ways of counting products sold, most frequent first:
//! 1. Membership check before every insert
//! 2. Update, falling back to insert on a miss
//! 3. A single counting pass with the entry API
//!
//! Each version runs under its own decorator and writes its own report.

use anyhow::{Context, Result};
use log::{debug, info};
use profile_decorator::{profile_scope, profiled, ProfileConfig, ReportFormat, SortBy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

/// Characters product names are drawn from
const PRODUCT_ALPHABET: &[u8] = b"ABCDEFG123";

/// Length of every product name
const PRODUCT_NAME_LEN: usize = 3;

/// Arguments for the demo command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct DemoArgs {
    /// Number of products sold
    pub num_products: usize,

    /// Seed for product generation
    pub seed: u64,

    /// Directory for the reports (None = current directory)
    pub output_dir: Option<PathBuf>,

    /// Sort keys, applied in order (empty = unsorted)
    pub sort_by: Vec<String>,

    /// Statistic lines per report (None = all)
    pub lines_to_print: Option<usize>,

    /// Strip directories from file names in the reports
    pub strip_dirs: bool,

    /// Write JSON reports instead of text
    pub json: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            num_products: 1_000_000,
            seed: 20,
            output_dir: None,
            sort_by: vec!["cumulative".to_string()],
            lines_to_print: Some(10),
            strip_dirs: true,
            json: false,
        }
    }
}

impl DemoArgs {
    /// Decorator configuration for one product counter
    fn config_for(&self, target: &str) -> ProfileConfig {
        let format = if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        };

        let mut config = ProfileConfig::new()
            .with_sort_by(SortBy::from(self.sort_by.clone()))
            .with_strip_dirs(self.strip_dirs)
            .with_format(format);

        if let Some(lines) = self.lines_to_print {
            config = config.with_lines_to_print(lines);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_file(dir.join(format!("{}.{}", target, format.extension())));
        }

        config
    }
}

/// Validate demo arguments
///
/// **Public** - can be called before execute_demo for early validation
pub fn validate_args(args: &DemoArgs) -> Result<()> {
    if args.num_products == 0 {
        anyhow::bail!("Number of products must be greater than 0");
    }

    Ok(())
}

/// Execute the demo command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid sort keys (reported before anything runs)
/// * Report write errors
pub fn execute_demo(args: DemoArgs) -> Result<()> {
    let start_time = Instant::now();

    // Decorate first so a bad sort key fails before the workload is built
    let counter_v1 = profiled!(product_counter_v1, args.config_for("product_counter_v1"))
        .context("Invalid profile configuration")?;
    let counter_v2 = profiled!(product_counter_v2, args.config_for("product_counter_v2"))
        .context("Invalid profile configuration")?;
    let counter_v3 = profiled!(product_counter_v3, args.config_for("product_counter_v3"))
        .context("Invalid profile configuration")?;

    info!(
        "Generating {} products (seed {})...",
        args.num_products, args.seed
    );
    let products = create_products(args.num_products, args.seed);

    info!("Profiling product counter v1...");
    let counted_v1 = counter_v1
        .call((products.as_slice(),))
        .context("Failed to profile product counter v1")?;
    info!("✓ Report written to: {}", counter_v1.output_path().display());

    info!("Profiling product counter v2...");
    let counted_v2 = counter_v2
        .call((products.as_slice(),))
        .context("Failed to profile product counter v2")?;
    info!("✓ Report written to: {}", counter_v2.output_path().display());

    info!("Profiling product counter v3...");
    let counted_v3 = counter_v3
        .call((products.as_slice(),))
        .context("Failed to profile product counter v3")?;
    info!("✓ Report written to: {}", counter_v3.output_path().display());

    if counted_v1 != counted_v2 || to_map(&counted_v1) != counted_v3 {
        anyhow::bail!("Product counters disagree");
    }
    debug!("All counters agree on {} distinct products", counted_v3.len());

    let elapsed = start_time.elapsed();
    info!("Demo completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Random products with 3-character names
pub fn create_products(num: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num)
        .map(|_| {
            (0..PRODUCT_NAME_LEN)
                .map(|_| PRODUCT_ALPHABET[rng.gen_range(0..PRODUCT_ALPHABET.len())] as char)
                .collect::<String>()
        })
        .collect()
}

/// Product counts, most frequent first (version 1)
pub fn product_counter_v1(products: &[String]) -> Vec<(String, usize)> {
    let counts = create_counter(products);
    sort_counter(counts)
}

/// Product counts, most frequent first (version 2)
pub fn product_counter_v2(products: &[String]) -> Vec<(String, usize)> {
    let counts = create_counter_v2(products);
    sort_counter(counts)
}

/// Product counts (version 3)
pub fn product_counter_v3(products: &[String]) -> HashMap<String, usize> {
    profile_scope!("count_products");
    products.iter().fold(HashMap::new(), |mut counts, product| {
        *counts.entry(product.clone()).or_insert(0) += 1;
        counts
    })
}

fn create_counter(products: &[String]) -> HashMap<String, usize> {
    profile_scope!();
    let mut counts = HashMap::new();
    for product in products {
        if !counts.contains_key(product) {
            counts.insert(product.clone(), 0);
        }
        if let Some(count) = counts.get_mut(product) {
            *count += 1;
        }
    }
    counts
}

fn create_counter_v2(products: &[String]) -> HashMap<String, usize> {
    profile_scope!();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for product in products {
        match counts.get_mut(product) {
            Some(count) => *count += 1,
            None => {
                counts.insert(product.clone(), 1);
            }
        }
    }
    counts
}

fn sort_counter(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    profile_scope!();
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    // Name as tie-breaker keeps versions 1 and 2 comparable
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

fn to_map(counts: &[(String, usize)]) -> HashMap<String, usize> {
    counts.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_products_is_seeded() {
        let first = create_products(50, 20);
        let second = create_products(50, 20);

        assert_eq!(first, second);
        assert!(first.iter().all(|p| p.len() == PRODUCT_NAME_LEN));
        assert!(first
            .iter()
            .all(|p| p.bytes().all(|b| PRODUCT_ALPHABET.contains(&b))));
    }

    #[test]
    fn test_counters_agree() {
        let products: Vec<String> = ["AB1", "CCC", "AB1", "G23", "AB1", "CCC"]
            .iter()
            .map(|p| p.to_string())
            .collect();

        let v1 = product_counter_v1(&products);
        assert_eq!(v1[0], ("AB1".to_string(), 3));
        assert_eq!(v1, product_counter_v2(&products));
        assert_eq!(to_map(&v1), product_counter_v3(&products));
    }

    #[test]
    fn test_validate_args() {
        assert!(validate_args(&DemoArgs::default()).is_ok());

        let no_products = DemoArgs {
            num_products: 0,
            ..Default::default()
        };
        assert!(validate_args(&no_products).is_err());

        let unsorted = DemoArgs {
            sort_by: Vec::new(),
            ..Default::default()
        };
        assert!(validate_args(&unsorted).is_ok());
    }

    #[test]
    fn test_execute_demo_writes_reports() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = DemoArgs {
            num_products: 500,
            output_dir: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };

        execute_demo(args).unwrap();

        for version in 1..=3 {
            let path = temp_dir
                .path()
                .join(format!("product_counter_v{}.prof", version));
            let report = std::fs::read_to_string(&path).unwrap();
            assert!(report.contains(&format!("(product_counter_v{})", version)));
            assert!(report.contains("Ordered by: cumulative time"));
        }
    }

    #[test]
    fn test_execute_demo_rejects_bad_sort_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = DemoArgs {
            num_products: 10,
            output_dir: Some(temp_dir.path().to_path_buf()),
            sort_by: vec!["fastest".to_string()],
            ..Default::default()
        };

        assert!(execute_demo(args).is_err());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
