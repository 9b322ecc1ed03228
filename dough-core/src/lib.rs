use serde::{Deserialize, Deserializer, Serialize};

/// Salt rule: 45 g per 1000 ml water, assuming 1 ml water ≈ 1 g.
pub const SALT_PER_WATER: f64 = 45.0 / 1000.0;

/// Honey added to the poolish. Counted in the total dough mass.
pub const POOLISH_HONEY_G: f64 = 5.0;

pub const SALT_RULE: &str = "Salt fixed at 45 g per 1000 ml water.";

pub const POOLISH_CAPPED_NOTE: &str = "Poolish reduced so the final-mix water does not go negative \
     (hydration too low or poolish too large).";

pub const DEFAULT_BALLS: f64 = 1.0;
pub const DEFAULT_BALL_WEIGHT_G: f64 = 250.0;
pub const DEFAULT_HYDRATION_PCT: f64 = 65.0;
pub const DEFAULT_POOLISH_PERCENT: f64 = 50.0;
pub const DEFAULT_POOLISH_FLOUR_FIXED_G: f64 = 300.0;
pub const DEFAULT_POOLISH_HYDRATION_PCT: f64 = 100.0;
pub const DEFAULT_POOLISH_YEAST_G: f64 = 0.0;

/// How the poolish flour is specified.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PoolishMode {
    /// Share of the total flour, in percent.
    #[default]
    Percent,
    /// Absolute flour mass in grams.
    Fixed,
}

/// Recipe parameters as entered by the baker.
///
/// Numeric fields use `0.0` (or NaN) for "not set"; such values fall back to
/// their defaults. Everything else is clamped into range by [`compute_dough`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoughInputs {
    /// Number of dough balls. Fractions are floored.
    #[serde(deserialize_with = "null_as_unset")]
    pub balls: f64,
    /// Weight of a single ball in grams.
    #[serde(deserialize_with = "null_as_unset")]
    pub ball_weight_g: f64,
    /// Main dough hydration in percent of flour.
    #[serde(deserialize_with = "null_as_unset")]
    pub hydration_pct: f64,
    pub use_poolish: bool,
    pub poolish_mode: PoolishMode,
    /// Poolish flour as percent of total flour (percent mode).
    #[serde(deserialize_with = "null_as_unset")]
    pub poolish_percent: f64,
    /// Poolish flour in grams (fixed mode).
    #[serde(deserialize_with = "null_as_unset")]
    pub poolish_flour_fixed_g: f64,
    /// Poolish hydration in percent, independent of the main hydration.
    #[serde(deserialize_with = "null_as_unset")]
    pub poolish_hydration_pct: f64,
    /// Yeast in grams, poolish only.
    #[serde(deserialize_with = "null_as_unset")]
    pub poolish_yeast_g: f64,
}

/// `null` reads as 0, i.e. "use the default".
fn null_as_unset<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Option::<f64>::deserialize(d).map(|v| v.unwrap_or(0.0))
}

/// Pre-ferment portion of the recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolishResult {
    pub flour_g: f64,
    pub water_g: f64,
    pub yeast_g: f64,
    pub honey_g: f64,
    pub hydration_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// What goes into the bowl after the poolish has matured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalMix {
    pub flour_g: f64,
    pub water_g: f64,
    /// All of the salt; none goes into the poolish.
    pub salt_g: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Output quantities (in grams), rounded to one decimal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoughResult {
    pub total_dough_g: f64,
    pub flour_g: f64,
    pub water_g: f64,
    pub salt_g: f64,
    pub salt_rule: String,
    pub poolish: Option<PoolishResult>,
    pub final_mix: FinalMix,
}

impl DoughResult {
    /// Honey in the batch: the fixed poolish honey, or nothing.
    pub fn honey_g(&self) -> f64 {
        self.poolish.as_ref().map_or(0.0, |p| p.honey_g)
    }
}

#[inline]
fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Round to one decimal, half away from zero. Never yields `-0.0`.
#[inline]
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0 + 0.0
}

/// `0.0` and NaN mean "not set".
#[inline]
fn or_default(v: f64, default: f64) -> f64 {
    if v == 0.0 || v.is_nan() { default } else { v }
}

/// Compute the recipe for given input.
/// - total = flour + water + salt + honey, with water = h·flour and salt = 0.045·water
/// - Poolish: part of flour and water is moved into the pre-ferment; salt stays in the final mix
pub fn compute_dough(input: &DoughInputs) -> DoughResult {
    let balls = clamp(or_default(input.balls, DEFAULT_BALLS).floor(), 1.0, 100.0);
    let ball_weight = clamp(or_default(input.ball_weight_g, DEFAULT_BALL_WEIGHT_G), 150.0, 450.0);
    let total_dough = balls * ball_weight;

    let h = clamp(or_default(input.hydration_pct, DEFAULT_HYDRATION_PCT), 50.0, 80.0) / 100.0;

    // honey is part of the ball weight
    let honey = if input.use_poolish { POOLISH_HONEY_G } else { 0.0 };
    let effective_total = (total_dough - honey).max(1.0);

    // effective_total = F + hF + 0.045·hF
    let flour = effective_total / (1.0 + h * (1.0 + SALT_PER_WATER));
    let water = flour * h;
    let salt = water * SALT_PER_WATER;

    let mut result = DoughResult {
        total_dough_g: round1(total_dough),
        flour_g: round1(flour),
        water_g: round1(water),
        salt_g: round1(salt),
        salt_rule: SALT_RULE.to_string(),
        poolish: None,
        final_mix: FinalMix {
            flour_g: round1(flour),
            water_g: round1(water),
            salt_g: round1(salt),
            note: None,
        },
    };

    if !input.use_poolish {
        return result;
    }

    let poolish_h = clamp(
        or_default(input.poolish_hydration_pct, DEFAULT_POOLISH_HYDRATION_PCT),
        60.0,
        130.0,
    ) / 100.0;

    let mut poolish_flour = match input.poolish_mode {
        PoolishMode::Fixed => clamp(
            or_default(input.poolish_flour_fixed_g, DEFAULT_POOLISH_FLOUR_FIXED_G),
            0.0,
            flour,
        ),
        PoolishMode::Percent => {
            clamp(or_default(input.poolish_percent, DEFAULT_POOLISH_PERCENT), 0.0, 100.0) / 100.0
                * flour
        }
    };

    // poolish may not take more water than the whole dough has
    let max_poolish_flour = water / poolish_h;
    let note = if poolish_flour > max_poolish_flour {
        tracing::debug!(
            requested_g = poolish_flour,
            capped_g = max_poolish_flour,
            "poolish flour capped by available water"
        );
        poolish_flour = max_poolish_flour;
        Some(POOLISH_CAPPED_NOTE.to_string())
    } else {
        None
    };

    let poolish_water = poolish_flour * poolish_h;
    let poolish_yeast = clamp(or_default(input.poolish_yeast_g, DEFAULT_POOLISH_YEAST_G), 0.0, 100.0);

    result.poolish = Some(PoolishResult {
        flour_g: round1(poolish_flour),
        water_g: round1(poolish_water),
        yeast_g: round1(poolish_yeast),
        honey_g: POOLISH_HONEY_G,
        hydration_pct: round1(poolish_h * 100.0),
        note: note.clone(),
    });
    result.final_mix = FinalMix {
        flour_g: round1(flour - poolish_flour),
        water_g: round1(water - poolish_water),
        salt_g: round1(salt),
        note,
    };
    result
}

/* ===========================
Unit tests
=========================== */
