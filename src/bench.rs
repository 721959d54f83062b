use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    time::{Duration, Instant},
};

use rand::{distributions::Distribution, rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::{
    error::{BenchError, Result},
    Ray, RayIntersect, Triangle, TriangleSoup, UnitSphere, NO_HIT,
};

/// Rays traced by each worker
pub const DEFAULT_RAYS: usize = 1000;

/// Triangles in the soup
pub const DEFAULT_TRIANGLES: usize = 100 * 1000;

/// How an intersector result is counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HitRule {
    /// Anything but [`NO_HIT`] is a hit, triangles behind the ray origin included
    #[default]
    NotSentinel,
    /// Only `t >= 0` is a hit
    NonNegative,
}

impl HitRule {
    #[inline]
    pub fn is_hit(self, t: f32) -> bool {
        match self {
            HitRule::NotSentinel => t != NO_HIT,
            HitRule::NonNegative => t >= 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub hits: u64,
    pub misses: u64,
}

impl Tally {
    #[inline]
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }
}

impl Add for Tally {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            hits: self.hits + rhs.hits,
            misses: self.misses + rhs.misses,
        }
    }
}

impl AddAssign for Tally {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Tally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Tally::default(), Add::add)
    }
}

/// Workload of a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub rays: usize,
    pub triangles: usize,
    /// Each worker traces `rays` rays against the whole soup with its own generator
    pub workers: usize,
    /// `None` seeds from entropy
    pub seed: Option<u64>,
    pub hit_rule: HitRule,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            rays: DEFAULT_RAYS,
            triangles: DEFAULT_TRIANGLES,
            workers: 1,
            seed: None,
            hit_rule: HitRule::default(),
        }
    }
}

impl BenchConfig {
    pub fn with_rays(mut self, rays: usize) -> Self {
        self.rays = rays;
        self
    }

    pub fn with_triangles(mut self, triangles: usize) -> Self {
        self.triangles = triangles;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_hit_rule(mut self, hit_rule: HitRule) -> Self {
        self.hit_rule = hit_rule;
        self
    }

    /// `None` when the count does not fit in a `u64`
    pub fn checked_total_tests(&self) -> Option<u64> {
        (self.rays as u64)
            .checked_mul(self.triangles as u64)?
            .checked_mul(self.workers as u64)
    }

    /// Saturates at `u64::MAX`, [`validate`](Self::validate) rejects such workloads
    pub fn total_tests(&self) -> u64 {
        self.checked_total_tests().unwrap_or(u64::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(BenchError::NoWorkers);
        }
        if self.checked_total_tests().is_none() {
            return Err(BenchError::WorkloadTooLarge {
                rays: self.rays,
                triangles: self.triangles,
                workers: self.workers,
            });
        }
        Ok(())
    }
}

/// Outcome of [`run`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchReport {
    pub total_tests: u64,
    pub tally: Tally,
    /// Time spent tracing, triangle generation excluded
    pub elapsed: Duration,
}

impl BenchReport {
    fn percent(&self, count: u64) -> f64 {
        if self.total_tests == 0 {
            return 0.0;
        }
        count as f64 / self.total_tests as f64 * 100.0
    }

    pub fn hit_percent(&self) -> f64 {
        self.percent(self.tally.hits)
    }

    pub fn miss_percent(&self) -> f64 {
        self.percent(self.tally.misses)
    }

    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// 0 for an empty workload or one finished below the clock resolution
    pub fn mtests_per_second(&self) -> f64 {
        if self.total_tests == 0 || self.elapsed.is_zero() {
            return 0.0;
        }
        self.total_tests as f64 / self.seconds() / 1_000_000.0
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total intersection tests:  {}", self.total_tests)?;
        writeln!(
            f,
            "  Hits:                    {} ({:.2}%)",
            self.tally.hits,
            self.hit_percent()
        )?;
        writeln!(
            f,
            "  Misses:                  {} ({:.2}%)",
            self.tally.misses,
            self.miss_percent()
        )?;
        writeln!(f, "Total time:                {:.3} seconds", self.seconds())?;
        write!(
            f,
            "Millions of tests per second: {:.2}",
            self.mtests_per_second()
        )
    }
}

/// Test one ray against every triangle
#[inline]
pub fn tally_ray(ray: &Ray, triangles: &[Triangle], rule: HitRule) -> Tally {
    let hits = triangles
        .iter()
        .filter(|tri| rule.is_hit(tri.ray_intersect(ray)))
        .count() as u64;
    Tally {
        hits,
        misses: triangles.len() as u64 - hits,
    }
}

/// Fire `rays` random rays, origin and target both on the unit sphere, at every triangle
pub fn trace_rays<R: Rng + ?Sized>(
    rng: &mut R,
    rays: usize,
    triangles: &[Triangle],
    rule: HitRule,
) -> Tally {
    let mut tally = Tally::default();
    for _ in 0..rays {
        let origin = UnitSphere.sample(rng);
        let target = UnitSphere.sample(rng);
        tally += tally_ray(&Ray::towards(origin, target), triangles, rule);
    }
    tally
}

/// Generate the triangle soup, then time every worker tracing its rays.
///
/// Triangles and per worker seeds all come from one generator, so a fixed seed
/// gives the same tally whatever the worker scheduling.
pub fn run(config: &BenchConfig) -> Result<BenchReport> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let soup = TriangleSoup::random(config.triangles, &mut rng);
    let seeds: Vec<u64> = (0..config.workers).map(|_| rng.gen()).collect();

    let pool = if config.workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()?;
        Some(pool)
    } else {
        None
    };

    let triangles = soup.triangles();
    let trace = |seed: u64| {
        trace_rays(
            &mut StdRng::seed_from_u64(seed),
            config.rays,
            triangles,
            config.hit_rule,
        )
    };

    let start = Instant::now();
    let tally: Tally = match &pool {
        Some(pool) => pool.install(|| seeds.par_iter().map(|&seed| trace(seed)).sum()),
        None => seeds.iter().map(|&seed| trace(seed)).sum(),
    };
    let elapsed = start.elapsed();

    Ok(BenchReport {
        total_tests: config.total_tests(),
        tally,
        elapsed,
    })
}
