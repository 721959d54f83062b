use ray_tri_bench::{run, BenchConfig};

fn main() -> anyhow::Result<()> {
    let report = run(&BenchConfig::default())?;
    println!("{report}");
    Ok(())
}
