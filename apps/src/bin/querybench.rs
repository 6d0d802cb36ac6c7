//! Times the frontier enumeration of the benchmark constraint problems and
//! prints one labelled duration per scenario.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use querytime::model::lang::{eq, gt, lt};
use querytime::{enumerate_and_time, Enumerator, IVar, Solver, INT_CST_MAX, INT_CST_MIN};
use std::time::Duration;

type Model = querytime::Model<String>;

#[derive(Parser, Debug)]
#[command(name = "querybench")]
struct Opt {
    /// Benchmark to run.
    #[arg(value_enum, default_value_t = Benchmark::All)]
    benchmark: Benchmark,
    /// Give up on a scenario after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,
    /// Print solver statistics after each scenario.
    #[arg(long)]
    stats: bool,
    #[arg(long, default_value_t = tracing::Level::WARN)]
    log_level: tracing::Level,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Benchmark {
    Avx,
    Stardust,
    All,
}

/// One variable over `0 < i < 10` pinned to `4`: the smallest probing query
/// of the vector-extension configuration search.
fn avx() -> (Model, Vec<IVar>) {
    let mut model = Model::new();
    let i = model.new_ivar(INT_CST_MIN, INT_CST_MAX, "i2302");
    model.enforce(gt(i, 0));
    model.enforce(lt(i, 10));
    model.enforce(eq(i, 4));
    (model, vec![i])
}

/// Four tile-size variables over `0 < i < 20` whose product must reach
/// `65536`.
fn stardust() -> (Model, Vec<IVar>) {
    let mut model = Model::new();
    let vars: Vec<IVar> = ["i2302", "i2303", "i2304", "i2305"]
        .iter()
        .map(|name| model.new_ivar(INT_CST_MIN, INT_CST_MAX, *name))
        .collect();
    for &v in &vars {
        model.enforce_all([gt(v, 0), lt(v, 20)]);
    }
    model.enforce(eq(vars[0] * vars[1] * vars[2] * vars[3], 65536));
    (model, vars)
}

fn run_scenario(label: &str, model: Model, tracked: Vec<IVar>, opt: &Opt) -> Result<()> {
    let elapsed = if opt.timeout.is_none() && !opt.stats {
        enumerate_and_time(&tracked, model)?
    } else {
        let mut enumerator = Enumerator::new(Solver::new(model), tracked)?;
        if let Some(timeout) = opt.timeout {
            enumerator = enumerator.with_timeout(Duration::from_secs(timeout));
        }
        let measurement = enumerator.run()?;
        if opt.stats {
            enumerator.procedure().print_stats();
        }
        measurement.elapsed
    };
    println!("Time taken to query for {label} is {}s.", elapsed.as_secs_f64());
    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    let subscriber = tracing_subscriber::fmt().with_max_level(opt.log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if matches!(opt.benchmark, Benchmark::Avx | Benchmark::All) {
        let (model, tracked) = avx();
        run_scenario("AVX", model, tracked, &opt)?;
    }
    if matches!(opt.benchmark, Benchmark::Stardust | Benchmark::All) {
        let (model, tracked) = stardust();
        run_scenario("Stardust", model, tracked, &opt)?;
    }
    Ok(())
}
