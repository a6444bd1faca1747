//! Runs the compressor over generated audio in real time, with the analyzer
//! driven from a timer thread, and logs the band levels as it goes.
//!
//! Usage: `mbcomp [sample_rate] [block_size] [seconds]`

use mbcomp::app::*;
use mbcomp::dsp::{AudioBuffer, Channel, Rect};
use mbcomp::prelude::*;

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const METER_LOG_INTERVAL: Duration = Duration::from_millis(500);

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Arguments::from_env()?;
    log::info!("running for {:.1} s: {args:?}", args.seconds);

    let store = Arc::new(ParameterStore::new());
    store.set(ParamId::Threshold(Band::Low), -24.0);
    store.set(ParamId::Threshold(Band::Mid), -18.0);
    store.set(ParamId::Threshold(Band::High), -30.0);
    // 4:1
    store.set(ParamId::Ratio(Band::High), 4.0);

    let AudioPackage { mut engine, taps, meters, sample_rate_ref } =
        AudioEngine::build(Arc::clone(&store), NUM_CHANNELS);
    engine.prepare(args.sample_rate, args.block_size);

    let (mut analyzer, _path_outputs) =
        SpectrumAnalyzer::new(taps, meters, Arc::clone(&store), sample_rate_ref);
    analyzer.set_bounds(Rect::new(0.0, 0.0, 800.0, 300.0));
    let analyzer = Arc::new(Mutex::new(analyzer));

    let mut timer = TimerThread::new({
        let analyzer = Arc::clone(&analyzer);
        move || {
            if let Ok(mut analyzer) = analyzer.lock() {
                if let Err(e) = analyzer.update() {
                    log::warn!("analyzer update failed: {e}");
                }
            }
        }
    });
    timer.start_hz(ANALYZER_REFRESH_RATE_HZ);

    let audio_thread = std::thread::spawn(move || run_audio(&mut engine, args));

    let mut last_log = Instant::now();
    while !audio_thread.is_finished() {
        std::thread::sleep(Duration::from_millis(10));

        if last_log.elapsed() >= METER_LOG_INTERVAL {
            last_log = Instant::now();

            if let Ok(analyzer) = analyzer.lock() {
                log_levels(&analyzer);
            }
        }
    }

    if audio_thread.join().is_err() {
        log::error!("audio thread panicked");
    }
    timer.stop();

    log::info!("final parameter state:\n{}", store.save_state()?);
    Ok(())
}

/// Feeds noise with a low tone through the engine, one block per block
/// period.
fn run_audio(engine: &mut AudioEngine, args: Arguments) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut buffer = AudioBuffer::new(NUM_CHANNELS, args.block_size);

    let block_period = Duration::from_secs_f64(args.block_size as f64 / args.sample_rate);
    let num_blocks = (args.seconds * args.sample_rate / args.block_size as f64).ceil() as usize;
    let tone_step = TAU * 80.0 / args.sample_rate;

    let mut phase = 0.0_f64;
    let mut deadline = Instant::now();

    for _ in 0..num_blocks {
        let start_phase = phase;

        for ch in buffer.iter_channels_mut() {
            phase = start_phase;

            for x in ch.iter_mut() {
                *x = 0.4 * phase.sin() + rng.random_range(-0.1..0.1);
                phase = (phase + tone_step) % TAU;
            }
        }

        engine.process_block(&mut buffer);

        deadline += block_period;
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
    }

    log::debug!("audio thread processed {num_blocks} blocks");
}

fn log_levels(analyzer: &SpectrumAnalyzer) {
    for (band, levels) in Band::ALL.into_iter().zip(analyzer.all_band_levels()) {
        log::info!(
            "{band:>4}: in {:6.1} dB, out {:6.1} dB, reduction {:4.1} dB",
            levels.input_db,
            levels.output_db,
            levels.gain_reduction_db(),
        );
    }

    let overlay = analyzer.overlay();
    log::debug!("crossover lines at x = {:.1?}", overlay.crossover_x);

    if let Some(path) = analyzer.path(Channel::Left) {
        log::debug!("left path: {} vertices", path.len());
    }
}
