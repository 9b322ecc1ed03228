use anyhow::Context;
use clap::{Parser, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use dough_core::{compute_dough, DoughInputs, DoughResult, PoolishMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod profile;

/// Poolish mode CLI enum mirrors dough-core (derive for Clap).
#[derive(Copy, Clone, Debug, ValueEnum)]
enum PoolishModeFlag {
    Percent,
    Fixed,
}

impl From<PoolishModeFlag> for PoolishMode {
    fn from(m: PoolishModeFlag) -> Self {
        match m {
            PoolishModeFlag::Percent => PoolishMode::Percent,
            PoolishModeFlag::Fixed => PoolishMode::Fixed,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dough-cli",
    about = "Calculate flour, water & salt for dough balls, with an optional poolish split.",
    version
)]
struct Args {
    /// Number of balls (default 1, 1..100)
    #[arg(long, allow_negative_numbers = true)]
    balls: Option<f64>,

    /// Dough ball weight in grams (default 250, 150..450)
    #[arg(long, allow_negative_numbers = true)]
    ball_weight: Option<f64>,

    /// Hydration in % of flour (default 65, 50..80)
    #[arg(long, allow_negative_numbers = true)]
    hydration: Option<f64>,

    /// Use a poolish (adds 5 g honey to it)
    #[arg(long, overrides_with = "no_poolish")]
    poolish: bool,

    /// Disable the poolish, even if the profile enables it
    #[arg(long, overrides_with = "poolish")]
    no_poolish: bool,

    /// How the poolish flour is given
    #[arg(long, value_enum)]
    poolish_mode: Option<PoolishModeFlag>,

    /// Poolish flour in % of total flour (default 50, percent mode)
    #[arg(long, allow_negative_numbers = true)]
    poolish_percent: Option<f64>,

    /// Poolish flour in grams (default 300, fixed mode)
    #[arg(long, allow_negative_numbers = true)]
    poolish_flour: Option<f64>,

    /// Poolish hydration in % (default 100, 60..130)
    #[arg(long, allow_negative_numbers = true)]
    poolish_hydration: Option<f64>,

    /// Yeast in the poolish, grams (0..100)
    #[arg(long, allow_negative_numbers = true)]
    poolish_yeast: Option<f64>,

    /// Print the result as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Load a profile JSON before applying CLI overrides
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Save the current effective parameters to a profile JSON
    #[arg(long)]
    save_profile: Option<PathBuf>,
}

impl Args {
    /// Flags win over the profile; anything left unset stays 0 and gets the core default.
    fn effective_inputs(&self, base: DoughInputs) -> DoughInputs {
        let use_poolish = if self.poolish {
            true
        } else if self.no_poolish {
            false
        } else {
            base.use_poolish
        };

        DoughInputs {
            balls: self.balls.unwrap_or(base.balls),
            ball_weight_g: self.ball_weight.unwrap_or(base.ball_weight_g),
            hydration_pct: self.hydration.unwrap_or(base.hydration_pct),
            use_poolish,
            poolish_mode: self.poolish_mode.map_or(base.poolish_mode, Into::into),
            poolish_percent: self.poolish_percent.unwrap_or(base.poolish_percent),
            poolish_flour_fixed_g: self.poolish_flour.unwrap_or(base.poolish_flour_fixed_g),
            poolish_hydration_pct: self.poolish_hydration.unwrap_or(base.poolish_hydration_pct),
            poolish_yeast_g: self.poolish_yeast.unwrap_or(base.poolish_yeast_g),
        }
    }
}

fn fmt_g(x: f64) -> String {
    let v = (x * 10.0).round() / 10.0;
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0} g", v)
    } else {
        format!("{:.1} g", v)
    }
}

fn header(cols: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            cols.iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn totals_table(res: &DoughResult) -> Table {
    let mut table = header(&["Ingredient", "Amount", "Notes"]);
    table.add_row(vec![
        Cell::new("Total dough"),
        Cell::new(fmt_g(res.total_dough_g)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Flour"),
        Cell::new(fmt_g(res.flour_g)),
        Cell::new(format!("H={:.0}%", res.water_g / res.flour_g * 100.0)),
    ]);
    table.add_row(vec![Cell::new("Water"), Cell::new(fmt_g(res.water_g)), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Salt"),
        Cell::new(fmt_g(res.salt_g)),
        Cell::new(&res.salt_rule),
    ]);
    if res.poolish.is_some() {
        table.add_row(vec![
            Cell::new("Honey"),
            Cell::new(fmt_g(res.honey_g())),
            Cell::new("poolish only"),
        ]);
    }
    table
}

fn poolish_table(res: &DoughResult) -> Option<Table> {
    let p = res.poolish.as_ref()?;
    let mut table = header(&["Poolish", "Amount"]);
    table.add_row(vec![Cell::new("Flour"), Cell::new(fmt_g(p.flour_g))]);
    table.add_row(vec![
        Cell::new(format!("Water ({:.0}%)", p.hydration_pct)),
        Cell::new(fmt_g(p.water_g)),
    ]);
    table.add_row(vec![Cell::new("Yeast"), Cell::new(fmt_g(p.yeast_g))]);
    table.add_row(vec![Cell::new("Honey"), Cell::new(fmt_g(p.honey_g))]);
    Some(table)
}

fn final_mix_table(res: &DoughResult) -> Table {
    let mut table = header(&["Final mix", "Amount"]);
    table.add_row(vec![Cell::new("Flour"), Cell::new(fmt_g(res.final_mix.flour_g))]);
    table.add_row(vec![Cell::new("Water"), Cell::new(fmt_g(res.final_mix.water_g))]);
    table.add_row(vec![Cell::new("Salt"), Cell::new(fmt_g(res.final_mix.salt_g))]);
    if res.poolish.is_some() {
        table.add_row(vec![Cell::new("Poolish"), Cell::new("all of it")]);
    }
    table
}

fn render_json(res: &DoughResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(res)
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose {
        "dough_cli=debug,dough_core=debug"
    } else {
        "dough_cli=info,dough_core=info"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    // stderr keeps stdout clean for tables/JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    // Load profile if present, then apply CLI overrides (CLI wins).
    let base = match &args.profile {
        Some(path) => {
            let p = profile::load(path).context("loading profile")?;
            tracing::debug!(path = %path.display(), "profile loaded");
            p
        }
        None => DoughInputs::default(),
    };
    let inputs = args.effective_inputs(base);
    tracing::debug!(?inputs, "effective inputs");

    if let Some(path) = &args.save_profile {
        profile::save(path, &inputs).context("saving profile")?;
        tracing::info!(path = %path.display(), "profile saved");
    }

    let res = compute_dough(&inputs);

    if args.json {
        println!("{}", render_json(&res)?);
        return Ok(());
    }

    println!("\n=== Dough summary ===");
    println!("{}", totals_table(&res));

    if let Some(table) = poolish_table(&res) {
        println!("\n=== Poolish ===");
        println!("{}", table);
    }

    println!("\n=== Final mix ===");
    println!("{}", final_mix_table(&res));

    if let Some(note) = &res.final_mix.note {
        println!("\nNote: {note}");
    }
    Ok(())
}
