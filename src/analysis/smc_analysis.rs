use rayon::prelude::*;

use crate::{
    analysis::{
        analyze_wyckoff, classify_structure, detect_confluences, detect_zones, find_swing_points,
        generate_trade_plans,
    },
    config::ProfileConfig,
    domain::{Candle, Timeframe},
    models::{AnalysisError, Bias, CandleSeries, EnhancedZone, SmcAnalysis, TradeDirection},
};

/// Runs the full pipeline over one candle snapshot.
/// Pure: same candles, timeframe and profile always produce the same result.
pub fn analyze(
    candles: &[Candle],
    timeframe: Timeframe,
    config: &ProfileConfig,
) -> Result<SmcAnalysis, AnalysisError> {
    let label = format!("{} {}", timeframe, config.profile);

    crate::trace_time!(&format!("Total analysis [{}]", label), 5000, {
        // 1. Column view + sanity checks
        let series = CandleSeries::new(candles);
        series.validate()?;
        let current_price = series.current_price();

        // 2. Swings and structure. Either failure is terminal for the call.
        let swings = crate::trace_time!(&format!("1. Swings [{}]", label), 500, {
            find_swing_points(&series, timeframe)
        })?;
        let structure = classify_structure(&swings)?;

        // 3. Zones, then the confluences that cross-check them
        let zones = crate::trace_time!(&format!("2. Zones [{}]", label), 1000, {
            detect_zones(&series, &structure, timeframe, config)
        });
        let all_zones: Vec<&EnhancedZone> = zones.all().collect();
        let confluences = detect_confluences(&series, &structure, &all_zones);

        // 4. Sideways markets get a Wyckoff read; a tradeable phase with surviving plans
        //    replaces the zone-based plans
        let wyckoff = (structure.bias == Bias::Sideways)
            .then(|| analyze_wyckoff(&series, &structure, config));

        let (buy_plans, sell_plans) = match &wyckoff {
            Some(w) if w.is_tradeable() && !w.plans.is_empty() => {
                let (buys, sells): (Vec<_>, Vec<_>) = w
                    .plans
                    .iter()
                    .cloned()
                    .partition(|p| p.direction == TradeDirection::Buy);
                (buys, sells)
            }
            _ => generate_trade_plans(
                &structure,
                &zones.demand,
                &zones.supply,
                current_price,
                config,
            ),
        };

        #[cfg(debug_assertions)]
        log::debug!(
            "analyze(): {} {} | {} zones, {} confluences, {} buy / {} sell plans",
            label,
            structure.bias,
            all_zones.len(),
            confluences.len(),
            buy_plans.len(),
            sell_plans.len()
        );

        let debug_info = config.debug_mode.then(|| zones.debug.clone());

        Ok(SmcAnalysis {
            structure,
            timeframe,
            profile: config.profile,
            current_price,
            demand_zones: zones.demand,
            supply_zones: zones.supply,
            bullish_fvgs: zones.bullish_fvgs,
            bearish_fvgs: zones.bearish_fvgs,
            confluences,
            debug_info,
            wyckoff,
            buy_plans,
            sell_plans,
        })
    })
}

/// Analyzes the same candles under several timeframes in parallel.
/// Results come back in the order the timeframes were given.
pub fn analyze_timeframes(
    candles: &[Candle],
    timeframes: &[Timeframe],
    config: &ProfileConfig,
) -> Vec<(Timeframe, Result<SmcAnalysis, AnalysisError>)> {
    timeframes
        .par_iter()
        .map(|&tf| (tf, analyze(candles, tf, config)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TradingProfile;

    fn zigzag(n: usize) -> Vec<Candle> {
        // Alternating pivots every 7 candles on a rising drift
        (0..n)
            .map(|i| {
                let x = i as f64;
                let mid = 100.0 + 0.15 * x + 2.0 * (x * std::f64::consts::PI / 7.0).sin();
                Candle::new(i as i64 * 3_600_000, mid - 0.1, mid + 0.4, mid - 0.4, mid + 0.1)
            })
            .collect()
    }

    #[test]
    fn deterministic_for_identical_input() {
        let candles = zigzag(120);
        let config = ProfileConfig::new(TradingProfile::Balanced, true);
        let a = analyze(&candles, Timeframe::H1, &config);
        let b = analyze(&candles, Timeframe::H1, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn debug_info_follows_the_flag() {
        let candles = zigzag(120);
        let on = analyze(&candles, Timeframe::H1, &ProfileConfig::new(TradingProfile::Scalp, true)).unwrap();
        let off = analyze(&candles, Timeframe::H1, &ProfileConfig::new(TradingProfile::Scalp, false)).unwrap();
        assert!(on.debug_info.is_some());
        assert!(off.debug_info.is_none());
    }

    #[test]
    fn invalid_candles_are_rejected_before_analysis() {
        let mut candles = zigzag(60);
        candles[10].high_price = candles[10].low_price - 1.0;
        assert!(matches!(
            analyze(&candles, Timeframe::H1, &ProfileConfig::default()),
            Err(AnalysisError::InvalidCandles { .. })
        ));
    }

    #[test]
    fn batch_preserves_timeframe_order() {
        let candles = zigzag(120);
        let tfs = [Timeframe::D1, Timeframe::M15, Timeframe::H4];
        let out = analyze_timeframes(&candles, &tfs, &ProfileConfig::default());
        let order: Vec<Timeframe> = out.iter().map(|(tf, _)| *tf).collect();
        assert_eq!(order, tfs.to_vec());
        for (tf, res) in &out {
            assert_eq!(res, &analyze(&candles, *tf, &ProfileConfig::default()));
        }
    }
}
