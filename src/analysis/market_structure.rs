use crate::{
    config::constants::structure as k,
    models::{
        AnalysisError, Bias, MajorSwing, MarketStructure, Strength, StructureEvent, SwingKind,
        SwingPoint,
    },
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Classifies bias and the latest structural event from the two most recent swing highs
/// and lows. First matching rule wins.
pub fn classify_structure(swings: &[SwingPoint]) -> Result<MarketStructure, AnalysisError> {
    let highs: Vec<&SwingPoint> = swings.iter().filter(|s| s.kind == SwingKind::High).collect();
    let lows: Vec<&SwingPoint> = swings.iter().filter(|s| s.kind == SwingKind::Low).collect();

    if highs.len() < 2 || lows.len() < 2 {
        return Err(AnalysisError::IndeterminateStructure {
            highs: highs.len(),
            lows: lows.len(),
        });
    }

    let (prev_high, last_high) = (highs[highs.len() - 2], highs[highs.len() - 1]);
    let (prev_low, last_low) = (lows[lows.len() - 2], lows[lows.len() - 1]);

    let higher_high = last_high.price > prev_high.price;
    let lower_high = last_high.price < prev_high.price;
    let higher_low = last_low.price > prev_low.price;
    let lower_low = last_low.price < prev_low.price;

    let (bias, last_event, break_level) = if higher_high && higher_low {
        (Bias::Bullish, Some(StructureEvent::Bos), Some(prev_high.price))
    } else if lower_low && lower_high {
        (Bias::Bearish, Some(StructureEvent::Bos), Some(prev_low.price))
    } else if lower_low && last_high.index > prev_low.index {
        (Bias::Bearish, Some(StructureEvent::Choch), Some(prev_low.price))
    } else if higher_high && last_low.index > prev_high.index {
        (Bias::Bullish, Some(StructureEvent::Choch), Some(prev_high.price))
    } else {
        (Bias::Sideways, None, None)
    };

    // Extremes of the whole swing set; ties resolve to the most recent swing
    let major_high = highs
        .iter()
        .copied()
        .reduce(|best, s| if s.price >= best.price { s } else { best })
        .map(MajorSwing::from);
    let major_low = lows
        .iter()
        .copied()
        .reduce(|best, s| if s.price <= best.price { s } else { best })
        .map(MajorSwing::from);

    let probability = probability(last_event, bias);
    let strength = grade_strength(probability, last_event, swings.len());

    #[cfg(debug_assertions)]
    if DF.log_structure {
        let rule = match last_event {
            Some(event) => format!("{} {}", bias, event),
            None => bias.to_string(),
        };
        log::info!(
            "classify_structure(): {} | highs {:.4} -> {:.4} | lows {:.4} -> {:.4} | p={} {}",
            rule,
            prev_high.price,
            last_high.price,
            prev_low.price,
            last_low.price,
            probability,
            strength
        );
    }

    Ok(MarketStructure {
        bias,
        last_event,
        break_level,
        major_high,
        major_low,
        probability,
        strength,
        swing_count: swings.len(),
    })
}

/// Fixed lookup. A BOS can never be classified sideways by the rules above; the 60 entry
/// exists so every (event, bias) pair has a defined value.
pub fn probability(event: Option<StructureEvent>, bias: Bias) -> f64 {
    match (event, bias) {
        (Some(StructureEvent::Bos), Bias::Sideways) => k::PROB_BOS_SIDEWAYS,
        (Some(StructureEvent::Bos), _) => k::PROB_BOS,
        (Some(StructureEvent::Choch), _) => k::PROB_CHOCH,
        (None, _) => k::PROB_SIDEWAYS,
    }
}

pub fn grade_strength(probability: f64, event: Option<StructureEvent>, swing_count: usize) -> Strength {
    let mut score = if probability >= k::HIGH_PROB_TIER {
        3.0
    } else if probability >= k::MID_PROB_TIER {
        2.0
    } else {
        1.0
    };

    score += match event {
        Some(StructureEvent::Bos) => 2.0,
        Some(StructureEvent::Choch) => 1.0,
        None => 0.0,
    };

    if swing_count >= k::MANY_SWINGS {
        score += 1.0;
    } else if swing_count >= k::SOME_SWINGS {
        score += 0.5;
    }

    if score >= k::STRONG_SCORE {
        Strength::Strong
    } else if score >= k::MODERATE_SCORE {
        Strength::Moderate
    } else {
        Strength::Weak
    }
}
