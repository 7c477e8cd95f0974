use crate::{
    config::{PlanParams, ProfileConfig, constants::plans as k},
    models::{
        Bias, EnhancedZone, MarketStructure, Strength, TradeDirection, TradePlan, ZoneKind,
        risk_reward,
    },
    utils::remap,
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Composite ranking score: strength tier, age tier and proximity, discounted when tested.
pub(crate) fn composite_score(zone: &EnhancedZone, tested_weight: f64) -> f64 {
    let strength = zone.strength.rank() as f64 * 10.0;
    let proximity = remap(
        zone.distance,
        0.0,
        k::DISTANCE_BONUS_HORIZON,
        k::MAX_DISTANCE_BONUS,
        0.0,
    )
    .max(0.0);
    let score = strength + zone.age.weight() + proximity;
    if zone.tested { score * tested_weight } else { score }
}

pub(crate) fn grade_plan(zone: &EnhancedZone, risk_reward: f64) -> Strength {
    let mut score = zone.strength.rank() as i32;
    if risk_reward >= 3.0 {
        score += 2;
    } else if risk_reward >= 2.0 {
        score += 1;
    }
    if zone.distance < 2.0 {
        score += 1;
    }
    if zone.tested {
        score -= 1;
    }

    if score >= 5 {
        Strength::Strong
    } else if score >= 3 {
        Strength::Moderate
    } else {
        Strength::Weak
    }
}

/// Zones on the correct side of price, within distance, and not disqualified by a test.
fn eligible<'a>(
    zones: &'a [EnhancedZone],
    direction: TradeDirection,
    current_price: f64,
    params: &PlanParams,
    max_distance: f64,
) -> Vec<&'a EnhancedZone> {
    zones
        .iter()
        .filter(|z| match direction {
            TradeDirection::Buy => z.high() <= current_price,
            TradeDirection::Sell => z.low() >= current_price,
        })
        .filter(|z| !z.tested || params.tested_weight > k::TESTED_FLOOR)
        .filter(|z| z.distance <= max_distance)
        .collect()
}

fn rank<'a>(mut zones: Vec<&'a EnhancedZone>, params: &PlanParams) -> Vec<&'a EnhancedZone> {
    if params.prefer_close {
        zones.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    } else {
        zones.sort_by(|a, b| {
            composite_score(b, params.tested_weight)
                .total_cmp(&composite_score(a, params.tested_weight))
                .then_with(|| a.distance.total_cmp(&b.distance))
        });
    }
    zones
}

fn target_for(structure: &MarketStructure, direction: TradeDirection, entry: f64) -> Option<f64> {
    if structure.bias == Bias::Sideways {
        let (low, high) = structure.major_range()?;
        let projection = k::SIDEWAYS_PROJECTION * (high.price - low.price);
        return Some(match direction {
            TradeDirection::Buy => entry + projection,
            TradeDirection::Sell => entry - projection,
        });
    }
    match direction {
        TradeDirection::Buy => structure.major_high.map(|s| s.price),
        TradeDirection::Sell => structure.major_low.map(|s| s.price),
    }
}

fn plan_from_zone(
    zone: &EnhancedZone,
    direction: TradeDirection,
    structure: &MarketStructure,
) -> Option<TradePlan> {
    // Entry on the edge price meets first, stop behind the far edge
    let (entry, stop) = match direction {
        TradeDirection::Buy => (zone.high(), zone.low()),
        TradeDirection::Sell => (zone.low(), zone.high()),
    };
    let target = target_for(structure, direction, entry)?;
    if !TradePlan::levels_are_valid(direction, entry, stop, target) {
        return None;
    }
    let rr = risk_reward(entry, stop, target)?;

    let target_label = match (structure.bias, direction) {
        (Bias::Sideways, _) => "range projection",
        (_, TradeDirection::Buy) => "major high",
        (_, TradeDirection::Sell) => "major low",
    };
    let explanation = format!(
        "{} {} {} {:.2}% from price{}; target at {}",
        zone.strength,
        zone.age,
        zone.kind,
        zone.distance,
        if zone.tested { " (tested)" } else { "" },
        target_label
    );

    TradePlan::try_new(
        direction,
        format!("{} {} zone", direction, zone.kind),
        entry,
        stop,
        target,
        grade_plan(zone, rr),
        zone.age,
        explanation,
    )
}

fn plans_for_side(
    structure: &MarketStructure,
    zones: &[EnhancedZone],
    direction: TradeDirection,
    current_price: f64,
    params: &PlanParams,
) -> Vec<TradePlan> {
    let mut candidates = eligible(zones, direction, current_price, params, params.max_distance_pct);
    if candidates.is_empty() {
        candidates = eligible(
            zones,
            direction,
            current_price,
            params,
            params.max_distance_pct * k::DISTANCE_RELAX_MULT,
        );
    }

    rank(candidates, params)
        .into_iter()
        .filter_map(|z| plan_from_zone(z, direction, structure))
        .filter(|p| p.risk_reward >= params.min_rr && p.risk_reward <= params.max_rr)
        .take(params.max_plans)
        .collect()
}

/// Buy plans from demand zones and sell plans from supply zones, bounded by the profile.
/// Returns `(buy_plans, sell_plans)`; both empty when the major range is undefined.
pub fn generate_trade_plans(
    structure: &MarketStructure,
    demand: &[EnhancedZone],
    supply: &[EnhancedZone],
    current_price: f64,
    config: &ProfileConfig,
) -> (Vec<TradePlan>, Vec<TradePlan>) {
    if structure.major_range().is_none() {
        return (Vec::new(), Vec::new());
    }
    let params = config.plan_params();

    debug_assert!(demand.iter().all(|z| z.kind == ZoneKind::Demand));
    debug_assert!(supply.iter().all(|z| z.kind == ZoneKind::Supply));

    let buys = plans_for_side(structure, demand, TradeDirection::Buy, current_price, params);
    let sells = plans_for_side(structure, supply, TradeDirection::Sell, current_price, params);

    #[cfg(debug_assertions)]
    if DF.log_plans {
        for plan in buys.iter().chain(&sells) {
            log::info!("generate_trade_plans(): {} [{}]", plan, plan.strength);
        }
    }

    (buys, sells)
}
