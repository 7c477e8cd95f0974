use {
    anyhow::{Context, Result},
    clap::Parser,
    smc_sniper::{
        Cli, ErrorReport, Timeframe, analyze, analyze_timeframes, data::load_candles, report,
    },
    std::panic,
    strum::IntoEnumIterator,
};

fn init_log() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("smc_sniper"), my_code_level)
        .init();
}

fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    init_log();

    let args = Cli::parse();
    let config = args.profile_config();
    let candles = load_candles(&args.input)?;

    if args.all_timeframes {
        let timeframes: Vec<Timeframe> = Timeframe::iter().collect();
        let results = analyze_timeframes(&candles, &timeframes, &config);
        if args.json {
            let json: Vec<serde_json::Value> = results
                .iter()
                .map(|(tf, res)| {
                    let body = match res {
                        Ok(a) => serde_json::to_value(a),
                        Err(e) => serde_json::to_value(ErrorReport::from(e)),
                    }?;
                    Ok(serde_json::json!({ "timeframe": tf, "result": body }))
                })
                .collect::<Result<_, serde_json::Error>>()
                .context("Failed to serialize batch results")?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        } else {
            println!("{}", report::describe_data(&candles));
            println!("{}", report::render_summary(&results));
        }
        return Ok(());
    }

    let result = analyze(&candles, args.timeframe, &config);
    if args.json {
        let text = match &result {
            Ok(a) => serde_json::to_string_pretty(a),
            Err(e) => serde_json::to_string_pretty(&ErrorReport::from(e)),
        }
        .context("Failed to serialize analysis")?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", report::describe_data(&candles));
    match result {
        Ok(analysis) => println!("{}", report::render_analysis(&analysis)),
        Err(e) => {
            log::warn!("Analysis failed: {}", e);
            println!("Error: {}", e);
        }
    }
    Ok(())
}
